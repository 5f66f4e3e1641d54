//! Conversational analytics agent for NYC 311 service requests.
//!
//! Turns a free-text question into a validated, read-only SQL query against
//! a local SQLite store and returns a structured answer plus an optional
//! chart descriptor. The language-model collaborators sit behind the
//! [`ChatModel`](llm::ChatModel) trait; everything else in the pipeline is
//! deterministic.

pub mod config;
pub mod db;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod safety;
pub mod utils;

pub use config::Config;
pub use db::Database;
pub use llm::{ChatModel, DeepSeekClient};
pub use pipeline::{Agent, AgentReply};
