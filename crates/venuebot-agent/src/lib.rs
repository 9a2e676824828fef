// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation handling for the venue assistant.
//!
//! The [`MessageHandler`] ties together the model provider, the venue
//! [`tools`], the instruction [`persona`] and the [`session`] store behind a
//! single `handle(user_text, identity) -> reply` call.

pub mod handler;
pub mod persona;
pub mod session;
pub mod tool;
pub mod tools;

pub use handler::{ADMIN_PHONE_KEY, MessageHandler};
pub use persona::{DEFAULT_INSTRUCTION, InstructionTemplate, PersonaVars};
pub use session::{Conversation, InMemorySessionStore, SessionStore, SharedConversation};
pub use tool::{Tool, ToolOutput, ToolRegistry};
pub use tools::venue_tools;
