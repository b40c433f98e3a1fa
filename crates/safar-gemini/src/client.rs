//! HTTP client for the generateContent API.
//!
//! `GeminiGateway` implements the model gateway traits. The REST API has
//! no server-side sessions, so `GeminiSession` keeps the full content
//! history and replays it on every call; `start_session` is therefore a
//! local operation and only `send_turn` touches the network.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use safar_assistant::{AssistantError, ModelGateway, ModelSession, ModelTurn, SessionHandle, TurnContent};
use safar_capability::CapabilityRegistry;
use safar_core::config::ModelConfig;
use safar_core::error::SafarError;
use safar_core::types::FunctionCallRequest;

use crate::wire::{
    ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, Tool,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Factory for Gemini-backed model sessions.
pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    config: ModelConfig,
    tools: Option<Vec<Tool>>,
}

impl GeminiGateway {
    pub fn new(
        api_key: String,
        config: ModelConfig,
        registry: &CapabilityRegistry,
    ) -> Result<Self, SafarError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SafarError::Gateway(e.to_string()))?;

        let declarations = registry.declarations();
        let tools = if declarations.is_empty() {
            None
        } else {
            Some(vec![Tool {
                function_declarations: declarations,
            }])
        };

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            config,
            tools,
        })
    }

    /// Point the gateway at a different endpoint, for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.config.model, self.api_key
        )
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn start_session(
        &self,
        system_instruction: &str,
    ) -> Result<SessionHandle, AssistantError> {
        tracing::debug!(model = %self.config.model, "Opening Gemini session");
        Ok(Box::new(GeminiSession {
            client: self.client.clone(),
            endpoint: self.endpoint(),
            system_instruction: Content::system(system_instruction),
            tools: self.tools.clone(),
            max_output_tokens: self.config.max_output_tokens,
            history: Vec::new(),
        }))
    }
}

/// One conversation, held client-side as replayed content history.
pub struct GeminiSession {
    client: reqwest::Client,
    endpoint: String,
    system_instruction: Content,
    tools: Option<Vec<Tool>>,
    max_output_tokens: u32,
    history: Vec<Content>,
}

#[async_trait]
impl ModelSession for GeminiSession {
    async fn send_turn(&mut self, content: TurnContent) -> Result<ModelTurn, AssistantError> {
        self.history.push(Content::user(turn_parts(&content)));

        let request = GenerateContentRequest {
            system_instruction: Some(self.system_instruction.clone()),
            contents: self.history.clone(),
            tools: self.tools.clone(),
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            },
        };

        match self.call(&request).await {
            Ok(reply) => {
                let turn = model_turn_from(&reply);
                self.history.push(reply);
                Ok(turn)
            }
            Err(e) => {
                // Drop the unanswered entry so a retry replays a
                // well-formed history.
                self.history.pop();
                Err(e)
            }
        }
    }
}

impl GeminiSession {
    async fn call(&self, request: &GenerateContentRequest) -> Result<Content, AssistantError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::warn!(status = %status, "generateContent returned an error");
            return Err(AssistantError::Gateway(format!(
                "generateContent failed with {}: {}",
                status, message
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Gateway(e.to_string()))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Gateway("response carried no candidates".to_string()))?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                tracing::warn!(finish_reason = %reason, "Generation stopped early");
            }
        }

        let mut content = candidate
            .content
            .ok_or_else(|| AssistantError::Gateway("candidate carried no content".to_string()))?;
        if content.role.is_empty() {
            content.role = "model".to_string();
        }
        Ok(content)
    }
}

/// Render turn content as request parts.
fn turn_parts(content: &TurnContent) -> Vec<Part> {
    match content {
        TurnContent::User { message, audio } => {
            let mut parts = vec![Part::text(message.clone())];
            if let Some(clip) = audio {
                parts.push(Part::inline_data(
                    clip.mime_type.clone(),
                    STANDARD.encode(&clip.data),
                ));
            }
            parts
        }
        TurnContent::FunctionResults(outcomes) => outcomes
            .iter()
            .map(|outcome| {
                Part::function_response(
                    outcome.name.clone(),
                    json!({
                        "name": outcome.name,
                        "response": outcome.response_value(),
                    }),
                )
            })
            .collect(),
    }
}

/// Split a model content into narration text and requested calls.
fn model_turn_from(content: &Content) -> ModelTurn {
    let mut text = String::new();
    let mut function_calls = Vec::new();

    for part in &content.parts {
        if let Some(t) = &part.text {
            text.push_str(t);
        }
        if let Some(call) = &part.function_call {
            function_calls.push(FunctionCallRequest {
                name: call.name.clone(),
                args: call.args.clone(),
            });
        }
    }

    ModelTurn {
        text,
        function_calls,
    }
}
