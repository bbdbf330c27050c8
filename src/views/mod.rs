pub mod thread;

pub use thread::{render_feed, render_thread, share_text};
