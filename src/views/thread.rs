use chrono::{DateTime, Local, Utc};

use crate::models::aggregate::{flatten_replies, total_reply_count, ReplyOrder};
use crate::models::{Forest, Post};

const INDENT: &str = "  ";

pub fn format_datetime(created_at: &DateTime<Utc>) -> String {
    let local_time: DateTime<Local> = DateTime::from(*created_at);
    local_time.format("%H:%M %h-%d-%Y").to_string()
}

/// Header, body, media and counters of one post, indented by `depth`.
pub fn render_post(post: &Post, depth: usize) -> Vec<String> {
    let pad = INDENT.repeat(depth);

    let mut lines = vec![format!(
        "{}{} posted at {} [{}]",
        pad,
        post.author_username,
        format_datetime(&post.created_at),
        post.id
    )];
    lines.extend(post.body.lines().map(|line| format!("{}{}", pad, line)));
    if let Some(media) = &post.media_ref {
        lines.push(format!("{}[media] {}", pad, media));
    }

    let mut marks = Vec::new();
    if post.liked {
        marks.push("liked");
    }
    if post.reposted {
        marks.push("reposted");
    }
    if post.saved {
        marks.push("saved");
    }
    let mut counters = format!(
        "{}likes {}  reposts {}  shares {}  replies {}",
        pad,
        post.like_count,
        post.repost_count,
        post.share_count,
        total_reply_count(post)
    );
    if !marks.is_empty() {
        counters.push_str(&format!("  ({})", marks.join(", ")));
    }
    lines.push(counters);
    lines
}

/// The head post followed by its flattened replies.
pub fn render_thread(post: &Post, max_depth: Option<usize>, order: ReplyOrder) -> String {
    let mut lines = render_post(post, 0);
    for entry in flatten_replies(post, max_depth, order) {
        lines.push(String::new());
        lines.extend(render_post(entry.post, entry.depth));
    }
    lines.join("\n")
}

/// Root posts only, each with its total reply count.
pub fn render_feed(forest: &Forest) -> String {
    if forest.is_empty() {
        return "No posts yet".to_string();
    }
    forest
        .iter()
        .map(|post| render_post(post, 0).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn share_text(post: &Post) -> String {
    let mut text = format!("Check out this post by {}: {}", post.author_username, post.body);
    if let Some(media) = &post.media_ref {
        text.push('\n');
        text.push_str(media);
    }
    text
}
