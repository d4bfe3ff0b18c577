//! ragchat-server - Ingestion and chat service
//!
//! This crate wires the chunker, the model client and the vector index into
//! one service, and exposes it over HTTP:
//!
//! - `POST /upload`: multipart document ingestion
//! - `POST /chat`: retrieval-augmented answering
//! - everything else: static front-end files
//!
//! Component handles are built once in [`connect`] and injected into the
//! service; request handlers never construct clients themselves.

mod http;
mod service;

pub use http::{router, serve, ChatRequest, UploadResponse};
pub use service::{connect, LiveService, RagChatService};
