// HTTP server modules
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;
pub mod state;

// Blog store client library
pub mod db;

// Credentials, posts, uploads
pub mod auth;
pub mod blog;
pub mod upload;

// LLM abstraction layer and chat relay
pub mod chat;
pub mod llm;
