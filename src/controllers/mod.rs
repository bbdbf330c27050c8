pub mod post_controller;

// Re-export key functions
pub use post_controller::{execute, Session};
