//! Request and response shapes for the `generateContent` endpoint.
//!
//! Field names follow the REST API's camelCase convention. A `Part` is
//! modeled as a bag of optional fields rather than an enum because the
//! API mixes part kinds freely within one content and ignores absent
//! fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use safar_capability::FunctionDeclaration;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
}

/// One conversation entry: `user` or `model`, with one or more parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Content {
            role: "user".to_string(),
            parts,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Content {
            role: "system".to_string(),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part {
            text: Some(text.into()),
            ..Part::default()
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Part {
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: base64_data.into(),
            }),
            ..Part::default()
        }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Part {
            function_response: Some(FunctionResponse {
                name: name.into(),
                response,
            }),
            ..Part::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

/// Error envelope the API returns on non-2xx status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::system("be brief")),
            contents: vec![Content::user(vec![Part::text("hello")])],
            tools: Some(vec![Tool {
                function_declarations: vec![FunctionDeclaration {
                    name: "check_available_buses".to_string(),
                    description: "List departures".to_string(),
                    parameters: json!({"type": "object"}),
                }],
            }]),
            generation_config: GenerationConfig {
                max_output_tokens: 2048,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("systemInstruction").is_some());
        assert_eq!(value["generationConfig"]["maxOutputTokens"], json!(2048));
        assert_eq!(
            value["tools"][0]["functionDeclarations"][0]["name"],
            json!("check_available_buses")
        );
        assert_eq!(value["contents"][0]["parts"][0]["text"], json!("hello"));
    }

    #[test]
    fn test_part_skips_absent_fields() {
        let value = serde_json::to_value(Part::text("x")).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("text"));
    }

    #[test]
    fn test_inline_data_wire_names() {
        let value = serde_json::to_value(Part::inline_data("audio/webm", "AAAA")).unwrap();
        assert_eq!(value["inlineData"]["mimeType"], json!("audio/webm"));
        assert_eq!(value["inlineData"]["data"], json!("AAAA"));
    }

    #[test]
    fn test_response_with_function_call_parses() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Checking now."},
                        {"functionCall": {"name": "check_available_seats", "args": {"date": "2025-03-20"}}}
                    ]
                },
                "finishReason": "STOP"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
        let content = response.candidates[0].content.as_ref().unwrap();
        assert_eq!(content.parts[0].text.as_deref(), Some("Checking now."));
        let call = content.parts[1].function_call.as_ref().unwrap();
        assert_eq!(call.name, "check_available_seats");
        assert_eq!(call.args["date"], json!("2025-03-20"));
    }

    #[test]
    fn test_truncated_candidate_carries_finish_reason() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "partial"}]},
                "finishReason": "MAX_TOKENS"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(
            response.candidates[0].finish_reason.as_deref(),
            Some("MAX_TOKENS")
        );
    }

    #[test]
    fn test_response_without_candidates_parses_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn test_function_call_args_default_empty() {
        let call: FunctionCall =
            serde_json::from_value(json!({"name": "make_reservation"})).unwrap();
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_error_envelope_parses() {
        let raw = json!({
            "error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}
        });
        let parsed: ApiErrorResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.error.code, 429);
        assert_eq!(parsed.error.status, "RESOURCE_EXHAUSTED");
    }
}
