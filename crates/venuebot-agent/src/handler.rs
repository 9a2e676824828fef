// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single entry point for inbound text: `handle(user_text, identity)`.
//!
//! Resolves or seeds the sender's conversation, runs the model/tool loop and
//! returns the reply. Any failure inside the loop evicts the conversation, so
//! the next message starts over with fresh knowledge.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use venuebot_config::model::AgentConfig;
use venuebot_core::chat::{ChatPart, ChatRequest, ChatTurn, FunctionCall, Role};
use venuebot_core::{ChatProvider, SessionId, VenueError};
use venuebot_knowledge::{Clock, KnowledgeCache};

use crate::persona::{InstructionTemplate, PersonaVars};
use crate::session::{Conversation, SessionStore, SharedConversation};
use crate::tool::{ToolOutput, ToolRegistry};

/// Fact consulted for `{admin_phone}`.
pub const ADMIN_PHONE_KEY: &str = "Admin_Phone";

/// Routes inbound messages through the model and the venue tools.
pub struct MessageHandler {
    provider: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    sessions: Arc<dyn SessionStore>,
    knowledge: Arc<KnowledgeCache>,
    clock: Arc<dyn Clock>,
    instruction: InstructionTemplate,
    agent_name: String,
    max_tool_iterations: usize,
    error_reply: String,
    startup_error_reply: String,
}

impl MessageHandler {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        tools: Arc<ToolRegistry>,
        sessions: Arc<dyn SessionStore>,
        knowledge: Arc<KnowledgeCache>,
        clock: Arc<dyn Clock>,
        instruction: InstructionTemplate,
        config: &AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            sessions,
            knowledge,
            clock,
            instruction,
            agent_name: config.name.clone(),
            max_tool_iterations: config.max_tool_iterations.max(1),
            error_reply: config.error_reply.clone(),
            startup_error_reply: config.startup_error_reply.clone(),
        }
    }

    /// Answers one message from `identity`. Never fails: errors become the
    /// configured apology.
    pub async fn handle(&self, user_text: &str, identity: &SessionId) -> String {
        let conversation = match self.conversation(identity).await {
            Ok(conversation) => conversation,
            Err(e) => {
                error!(session = %identity, error = %e, "could not start conversation");
                return self.startup_error_reply.clone();
            }
        };

        let mut conversation = conversation.lock().await;
        match self.exchange(&mut conversation, user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                drop(conversation);
                warn!(session = %identity, error = %e, "conversation failed, evicting session");
                if let Err(e) = self.sessions.evict(identity).await {
                    warn!(session = %identity, error = %e, "session eviction failed");
                }
                self.error_reply.clone()
            }
        }
    }

    /// The session store backing this handler.
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    async fn conversation(&self, identity: &SessionId) -> Result<SharedConversation, VenueError> {
        if let Some(existing) = self.sessions.get(identity).await? {
            return Ok(existing);
        }
        let seeded = self.seed(identity).await;
        info!(session = %identity, "conversation started");
        self.sessions.create(seeded).await
    }

    /// A fresh conversation carrying the current knowledge snapshot.
    pub async fn seed(&self, identity: &SessionId) -> Conversation {
        let knowledge_base = self.knowledge.render().await;
        let admin_phone = self.knowledge.fact(ADMIN_PHONE_KEY).await;
        let instruction = self.instruction.render(&PersonaVars {
            agent_name: &self.agent_name,
            today: self.clock.today(),
            knowledge_base: &knowledge_base,
            admin_phone: &admin_phone,
        });
        Conversation::new(identity.clone(), instruction, self.clock.now())
    }

    async fn exchange(
        &self,
        conversation: &mut Conversation,
        user_text: &str,
    ) -> Result<String, VenueError> {
        conversation.turns.push(ChatTurn::user(user_text));
        let functions = self.tools.function_declarations();

        for iteration in 0..self.max_tool_iterations {
            let request = ChatRequest {
                system_instruction: conversation.system_instruction.clone(),
                turns: conversation.turns.clone(),
                functions: functions.clone(),
            };
            let response = self.provider.generate(request).await?;

            let turn = response.to_turn();
            if !turn.parts.is_empty() {
                conversation.turns.push(turn);
            }

            if response.function_calls.is_empty() {
                let reply = response.text.trim();
                if reply.is_empty() {
                    return Err(VenueError::Session("model returned an empty reply".into()));
                }
                return Ok(reply.to_string());
            }

            debug!(
                session = %conversation.id,
                iteration,
                calls = response.function_calls.len(),
                "running tool calls"
            );
            let mut results = Vec::with_capacity(response.function_calls.len());
            for call in &response.function_calls {
                results.push(self.run_tool(call).await?);
            }
            conversation.turns.push(ChatTurn {
                role: Role::Tool,
                parts: results,
            });
        }

        Err(VenueError::Session(format!(
            "no reply after {} model calls",
            self.max_tool_iterations
        )))
    }

    async fn run_tool(&self, call: &FunctionCall) -> Result<ChatPart, VenueError> {
        let output = match self.tools.get(&call.name) {
            Some(tool) => tool.invoke(call.args.clone()).await?,
            None => ToolOutput::error(format!("unknown tool `{}`", call.name)),
        };
        info!(tool = %call.name, is_error = output.is_error, "tool invoked");

        let key = if output.is_error { "error" } else { "result" };
        let mut response = serde_json::Map::new();
        response.insert(key.to_string(), serde_json::Value::String(output.content));
        Ok(ChatPart::FunctionResponse {
            name: call.name.clone(),
            response: serde_json::Value::Object(response),
        })
    }
}
