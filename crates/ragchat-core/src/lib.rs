//! ragchat-core - Core types and traits for the ragchat service
//!
//! This crate provides the foundational types, traits, error handling and
//! configuration used throughout the ragchat workspace.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{RagChatError, Result};
pub use traits::*;
pub use types::*;
