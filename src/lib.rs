//! Deepself: persona-model tools for agent runtimes.
//!
//! Six tools (create, list, train, start/finalize training rooms, chat)
//! declared with flat parameter schemas, validated up front, executed with a
//! single authenticated HTTP call, and normalized into text or structured
//! results.

pub mod api;
pub mod config;
pub mod error;
pub mod plugin;
pub mod tools;
pub mod types;

pub use error::{Result, ToolError};
pub use plugin::{register, DeepselfPlugin, ToolHost};
