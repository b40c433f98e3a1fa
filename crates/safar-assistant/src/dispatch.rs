//! Function-call dispatch against the capability registry.
//!
//! One model turn may request several capability invocations. Dispatch
//! resolves each by name, runs siblings concurrently, and produces an
//! outcome list that is order-preserving and one-to-one with the
//! requests: an unknown name or a failing handler becomes an
//! error-tagged outcome and never aborts the rest of the batch.
//!
//! The protocol performs exactly one function round-trip per inbound
//! turn (depth bound = 1): calls requested by the follow-up response are
//! not serviced.

use std::sync::Arc;

use safar_capability::{CapabilityError, CapabilityRegistry};
use safar_core::types::{FunctionCallOutcome, FunctionCallRequest};

/// Executes requested function calls and packages results for the
/// follow-up turn.
pub struct FunctionDispatcher {
    registry: Arc<CapabilityRegistry>,
}

impl FunctionDispatcher {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    /// Run a batch of requested calls.
    ///
    /// Sibling calls run concurrently; the returned outcomes are in
    /// request order regardless of completion order.
    pub async fn dispatch(&self, calls: Vec<FunctionCallRequest>) -> Vec<FunctionCallOutcome> {
        let mut handles = Vec::with_capacity(calls.len());

        for call in calls {
            let registry = Arc::clone(&self.registry);
            handles.push((
                call.name.clone(),
                tokio::spawn(async move { Self::invoke_one(&registry, call).await }),
            ));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(function = %name, error = %e, "Capability task panicked");
                    FunctionCallOutcome::error(&name, format!("Failed to execute {}", name))
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn invoke_one(
        registry: &CapabilityRegistry,
        call: FunctionCallRequest,
    ) -> FunctionCallOutcome {
        tracing::info!(function = %call.name, "Dispatching capability call");
        match registry.invoke(&call.name, &call.args).await {
            Ok(value) => FunctionCallOutcome::success(&call.name, value),
            Err(CapabilityError::Unknown(name)) => {
                tracing::warn!(function = %name, "Model requested unknown capability");
                FunctionCallOutcome::error(&name, format!("Unknown function: {}", name))
            }
            Err(e) => {
                tracing::warn!(function = %call.name, error = %e, "Capability call failed");
                FunctionCallOutcome::error(&call.name, format!("Failed to execute {}", call.name))
            }
        }
    }
}
