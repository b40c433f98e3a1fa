//! Capability trait and name-keyed registry.
//!
//! The registry is the leaf the function dispatcher resolves against:
//! unknown names fail explicitly instead of silently vanishing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::CapabilityError;
use crate::handler::{
    AvailableBusesHandler, AvailableSeatsHandler, ReservationHandler, SeatAvailabilityHandler,
};
use crate::timetable::Timetable;

/// Declared shape of a capability, advertised to the model as a callable
/// tool. `parameters` is a JSON-schema object.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// An external operation the model may request by name with structured
/// arguments.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Registered function name.
    fn name(&self) -> &'static str;

    /// Declaration advertised to the model.
    fn declaration(&self) -> FunctionDeclaration;

    /// Invoke with the model-supplied arguments.
    async fn invoke(&self, args: &serde_json::Map<String, Value>)
        -> Result<Value, CapabilityError>;
}

/// Mapping from function name to handler implementation.
#[derive(Default)]
pub struct CapabilityRegistry {
    handlers: HashMap<&'static str, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a capability. Replaces any handler already registered
    /// under the same name.
    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        self.handlers.insert(capability.name(), capability);
    }

    /// Register the four booking capabilities against a shared timetable.
    pub fn register_defaults(&mut self, timetable: Arc<Timetable>) {
        self.register(Arc::new(AvailableBusesHandler::new(Arc::clone(&timetable))));
        self.register(Arc::new(AvailableSeatsHandler::new(Arc::clone(&timetable))));
        self.register(Arc::new(SeatAvailabilityHandler::new(Arc::clone(
            &timetable,
        ))));
        self.register(Arc::new(ReservationHandler::new(timetable)));
    }

    /// Look up a handler by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.handlers.get(name).cloned()
    }

    /// Resolve and invoke a capability by name. An unregistered name is
    /// an explicit `Unknown` error, never silently ignored.
    pub async fn invoke(
        &self,
        name: &str,
        args: &serde_json::Map<String, Value>,
    ) -> Result<Value, CapabilityError> {
        match self.get(name) {
            Some(handler) => handler.invoke(args).await,
            None => Err(CapabilityError::Unknown(name.to_string())),
        }
    }

    /// Declarations for every registered capability, in stable name order.
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        let mut declarations: Vec<FunctionDeclaration> =
            self.handlers.values().map(|h| h.declaration()).collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    /// Number of registered capabilities.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
