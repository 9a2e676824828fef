// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider-neutral conversation types exchanged with the language model.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user.
    User,
    /// The assistant model.
    Model,
    /// Results of tool invocations fed back to the model.
    Tool,
}

/// A single part of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatPart {
    /// Plain text.
    Text(String),
    /// The model asks for a tool to be invoked.
    FunctionCall {
        name: String,
        args: serde_json::Value,
    },
    /// The result of a tool invocation.
    FunctionResponse {
        name: String,
        response: serde_json::Value,
    },
}

/// One turn of the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub parts: Vec<ChatPart>,
}

impl ChatTurn {
    /// A user turn carrying a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![ChatPart::Text(text.into())],
        }
    }

    /// A model turn carrying a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![ChatPart::Text(text.into())],
        }
    }

    /// Concatenated text parts of the turn.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ChatPart::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A function the model is allowed to call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// A request to the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Persona/instruction text, seeded once per conversation.
    pub system_instruction: String,
    /// Conversation history, oldest first.
    pub turns: Vec<ChatTurn>,
    /// Tools the model may call.
    pub functions: Vec<FunctionDeclaration>,
}

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: serde_json::Value,
}

/// The model's answer to a [`ChatRequest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    /// Text produced by the model (may be empty when only calls are returned).
    pub text: String,
    /// Tool calls the model wants executed before it answers.
    pub function_calls: Vec<FunctionCall>,
}

impl ChatResponse {
    /// A text-only response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            function_calls: Vec::new(),
        }
    }

    /// A response requesting a single tool call.
    pub fn call(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            text: String::new(),
            function_calls: vec![FunctionCall {
                name: name.into(),
                args,
            }],
        }
    }

    /// The model turn to append to history for this response.
    pub fn to_turn(&self) -> ChatTurn {
        let mut parts = Vec::new();
        if !self.text.is_empty() {
            parts.push(ChatPart::Text(self.text.clone()));
        }
        for call in &self.function_calls {
            parts.push(ChatPart::FunctionCall {
                name: call.name.clone(),
                args: call.args.clone(),
            });
        }
        ChatTurn {
            role: Role::Model,
            parts,
        }
    }
}
