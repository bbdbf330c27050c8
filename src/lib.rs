pub mod models;
pub mod views;
pub mod controllers;
pub mod cli;
pub mod error;

// Re-exports for convenience
pub use models::{Config, Forest, Identity, Post, PostStore, ReplyDraft};
pub use controllers::{execute, Session};
pub use error::NuumiError;
