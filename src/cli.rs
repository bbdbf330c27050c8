use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compose a new root post
    Post {
        /// Post text; opens $EDITOR when omitted
        #[arg(long)]
        body: Option<String>,
        /// Attached image, video or audio reference
        #[arg(long)]
        media: Option<String>,
    },
    /// Reply to any post or reply
    Reply {
        id: String,
        #[arg(long)]
        body: Option<String>,
        /// Reuse an id so a retried reply is not added twice
        #[arg(long = "id")]
        reply_id: Option<String>,
        #[arg(long)]
        media: Option<String>,
    },
    /// Toggle the like on a post
    Like { id: String },
    /// Toggle the bookmark on a post
    Save { id: String },
    /// Toggle the repost of a post
    Repost { id: String },
    /// Count a share and print the share text
    Share { id: String },
    /// Show a post and its thread
    Show {
        id: String,
        /// Only include replies up to this depth
        #[arg(long)]
        depth: Option<usize>,
        /// List replies level by level instead of depth-first
        #[arg(long)]
        breadth_first: bool,
    },
    /// List root posts, newest first
    Feed,
}

#[derive(Parser, Debug)]
#[command(about = concat!(env!("CARGO_CRATE_NAME"), " - threaded posts from the command line"))]
pub struct Flags {
    /// Config file (defaults to ~/.config/nuumi/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Flags {
    /// Parse from `std::env::args_os()`, exit on error.
    pub fn from_args() -> Self {
        Self::parse()
    }
}
