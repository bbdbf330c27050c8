use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::post::Post;

/// Number of descendants at every depth. A leaf has none.
pub fn total_reply_count(post: &Post) -> usize {
    post.replies
        .iter()
        .map(|reply| 1 + total_reply_count(reply))
        .sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyOrder {
    /// Each reply followed by its own replies, before its next sibling.
    #[default]
    PreOrder,
    /// All direct replies first, then their replies, and so on.
    BreadthFirst,
}

/// A descendant together with its distance from the thread's head post.
#[derive(Debug, Clone, Copy)]
pub struct ThreadEntry<'a> {
    pub depth: usize,
    pub post: &'a Arc<Post>,
}

/// Lazily walks the replies below `post`. Direct replies are at depth 1,
/// and nothing deeper than `max_depth` is yielded when it is set.
pub fn flatten_replies(post: &Post, max_depth: Option<usize>, order: ReplyOrder) -> FlatReplies<'_> {
    let mut pending = VecDeque::new();
    if max_depth != Some(0) {
        pending.extend(post.replies.iter().map(|reply| ThreadEntry { depth: 1, post: reply }));
    }
    FlatReplies {
        pending,
        max_depth,
        order,
    }
}

#[derive(Debug, Clone)]
pub struct FlatReplies<'a> {
    pending: VecDeque<ThreadEntry<'a>>,
    max_depth: Option<usize>,
    order: ReplyOrder,
}

impl<'a> Iterator for FlatReplies<'a> {
    type Item = ThreadEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.pending.pop_front()?;
        let child_depth = entry.depth + 1;
        if self.max_depth.map_or(true, |max| child_depth <= max) {
            let children = entry
                .post
                .replies
                .iter()
                .map(|reply| ThreadEntry { depth: child_depth, post: reply });
            match self.order {
                ReplyOrder::PreOrder => {
                    for child in children.rev() {
                        self.pending.push_front(child);
                    }
                }
                ReplyOrder::BreadthFirst => self.pending.extend(children),
            }
        }
        Some(entry)
    }
}
