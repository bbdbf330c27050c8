pub mod post;
pub mod locator;
pub mod mutator;
pub mod aggregate;
pub mod store;
pub mod config;
pub mod cache;

// Re-export important structs for convenience
pub use post::{Forest, Identity, Post, ReplyDraft};
pub use aggregate::{FlatReplies, ReplyOrder, ThreadEntry};
pub use store::{ForestObserver, PostStore};
pub use config::Config;
pub use cache::CacheMirror;
