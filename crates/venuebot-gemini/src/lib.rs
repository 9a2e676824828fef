// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for venuebot.
//!
//! Implements [`ChatProvider`] on top of the `generateContent` REST endpoint
//! with function calling. One call returns either text or the function calls
//! the model wants executed; the message handler drives the loop.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{debug, info};

use venuebot_config::model::GeminiConfig;
use venuebot_core::chat::{ChatPart, ChatRequest, ChatResponse, FunctionCall, Role};
use venuebot_core::traits::{ChatProvider, PluginAdapter};
use venuebot_core::types::{AdapterType, HealthStatus};
use venuebot_core::VenueError;

use crate::client::GeminiClient;
use crate::types::{
    Content, FunctionCallPart, FunctionDeclarationWire, FunctionResponsePart, GenerateRequest,
    GenerateResponse, Part, ToolSet,
};

/// Environment variable consulted when `gemini.api_key` is unset.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini provider implementing [`ChatProvider`].
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a provider from configuration.
    ///
    /// The API key comes from `config.api_key`, then `env_key` (the value of
    /// [`API_KEY_ENV`], read by the caller).
    pub fn new(config: &GeminiConfig, env_key: Option<&str>) -> Result<Self, VenueError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), env_key)?;
        let client = GeminiClient::new(
            &api_key,
            &config.base_url,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(model = %config.model, "Gemini provider initialized");
        Ok(Self { client })
    }

    /// The model every request is sent to.
    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, VenueError> {
        // No probe call: every request is billed.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, VenueError> {
        let api_request = to_generate_request(&request);
        let response = self.client.generate_content(&api_request).await?;
        from_generate_response(response)
    }
}

fn resolve_api_key(
    config_key: Option<&str>,
    env_key: Option<&str>,
) -> Result<SecretString, VenueError> {
    config_key
        .filter(|k| !k.is_empty())
        .or(env_key.filter(|k| !k.is_empty()))
        .map(|k| SecretString::from(k.to_string()))
        .ok_or_else(|| {
            VenueError::Config(format!(
                "Gemini API key not found. Set gemini.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}

/// Maps a provider-neutral request onto the Gemini wire format.
///
/// Tool results travel in `user` turns; Gemini has no separate tool role.
pub fn to_generate_request(request: &ChatRequest) -> GenerateRequest {
    let system_instruction = (!request.system_instruction.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part::text(request.system_instruction.clone())],
    });

    let contents = request
        .turns
        .iter()
        .map(|turn| Content {
            role: Some(
                match turn.role {
                    Role::User | Role::Tool => "user",
                    Role::Model => "model",
                }
                .to_string(),
            ),
            parts: turn.parts.iter().map(to_part).collect(),
        })
        .collect();

    let tools = if request.functions.is_empty() {
        Vec::new()
    } else {
        vec![ToolSet {
            function_declarations: request
                .functions
                .iter()
                .map(|f| FunctionDeclarationWire {
                    name: f.name.clone(),
                    description: f.description.clone(),
                    parameters: f.parameters.clone(),
                })
                .collect(),
        }]
    };

    GenerateRequest {
        system_instruction,
        contents,
        tools,
    }
}

fn to_part(part: &ChatPart) -> Part {
    match part {
        ChatPart::Text(text) => Part::text(text.clone()),
        ChatPart::FunctionCall { name, args } => Part {
            function_call: Some(FunctionCallPart {
                name: name.clone(),
                args: args.clone(),
            }),
            ..Part::default()
        },
        ChatPart::FunctionResponse { name, response } => Part {
            function_response: Some(FunctionResponsePart {
                name: name.clone(),
                response: if response.is_object() {
                    response.clone()
                } else {
                    serde_json::json!({ "result": response })
                },
            }),
            ..Part::default()
        },
    }
}

/// Extracts text and function calls from the first candidate.
pub fn from_generate_response(response: GenerateResponse) -> Result<ChatResponse, VenueError> {
    if let Some(usage) = &response.usage_metadata {
        debug!(
            prompt_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            "Gemini usage"
        );
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(VenueError::provider(format!("Gemini returned no answer: {reason}")));
    };

    let mut text = String::new();
    let mut function_calls = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(call) = part.function_call {
            function_calls.push(FunctionCall {
                name: call.name,
                args: call.args,
            });
        } else if let Some(t) = part.text {
            text.push_str(&t);
        }
    }

    if text.is_empty() && function_calls.is_empty() {
        debug!(finish_reason = ?candidate.finish_reason, "candidate carried no content");
    }

    Ok(ChatResponse {
        text,
        function_calls,
    })
}
