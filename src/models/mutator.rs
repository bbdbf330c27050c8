use std::sync::Arc;

use crate::models::post::{Forest, Post};

/// Replaces the node with `id` by `transform(node)`.
///
/// A transform returning `None` declines the change, which leaves the
/// forest untouched just like a missing id does.
pub fn update_node<F>(forest: &Forest, id: &str, transform: F) -> Forest
where
    F: FnOnce(&Post) -> Option<Post>,
{
    let mut transform = Some(transform);
    match rebuild(forest.roots(), id, &mut transform) {
        Some(roots) => Forest::from_roots(roots),
        None => forest.clone(),
    }
}

fn rebuild<F>(nodes: &[Arc<Post>], id: &str, transform: &mut Option<F>) -> Option<Vec<Arc<Post>>>
where
    F: FnOnce(&Post) -> Option<Post>,
{
    for (index, node) in nodes.iter().enumerate() {
        let replacement = if node.id == id {
            // Ids are unique, so a declined transform ends the search.
            let apply = transform.take()?;
            apply(node.as_ref())?
        } else {
            match rebuild(&node.replies, id, transform) {
                Some(replies) => Post {
                    replies,
                    ..Post::clone(node)
                },
                None if transform.is_none() => return None,
                None => continue,
            }
        };

        let mut updated = nodes.to_vec();
        updated[index] = Arc::new(replacement);
        return Some(updated);
    }
    None
}

pub fn toggle_like(post: &Post) -> Option<Post> {
    let liked = !post.liked;
    Some(Post {
        liked,
        like_count: step(post.like_count, liked),
        ..post.clone()
    })
}

pub fn toggle_save(post: &Post) -> Option<Post> {
    Some(Post {
        saved: !post.saved,
        ..post.clone()
    })
}

pub fn toggle_repost(post: &Post) -> Option<Post> {
    let reposted = !post.reposted;
    Some(Post {
        reposted,
        repost_count: step(post.repost_count, reposted),
        ..post.clone()
    })
}

pub fn record_share(post: &Post) -> Option<Post> {
    Some(Post {
        share_count: post.share_count.saturating_add(1),
        ..post.clone()
    })
}

/// Appends `reply` unless a direct child already carries its id.
pub fn append_reply(reply: Arc<Post>) -> impl FnOnce(&Post) -> Option<Post> {
    move |post| {
        if post.replies.iter().any(|existing| existing.id == reply.id) {
            return None;
        }
        let mut replies = post.replies.clone();
        replies.push(reply);
        Some(Post {
            replies,
            ..post.clone()
        })
    }
}

fn step(count: u32, up: bool) -> u32 {
    if up {
        count.saturating_add(1)
    } else {
        count.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::Identity;
    use pretty_assertions::assert_eq;

    fn post(id: &str, replies: Vec<Post>) -> Post {
        Post::new(id, &Identity::new("tester"), "").with_replies(replies)
    }

    fn reply(id: &str) -> Arc<Post> {
        Arc::new(post(id, vec![]))
    }

    #[test]
    fn like_toggles_flag_and_counter() {
        let forest = Forest::from(vec![post("1", vec![])]);

        let liked = update_node(&forest, "1", toggle_like);
        assert!(liked[0].liked);
        assert_eq!(liked[0].like_count, 1);

        let unliked = update_node(&liked, "1", toggle_like);
        assert_eq!(unliked, forest);
    }

    #[test]
    fn counters_never_drop_below_zero() {
        let inconsistent = Post {
            liked: true,
            reposted: true,
            ..post("1", vec![])
        };
        let forest = Forest::from(vec![inconsistent]);

        let forest = update_node(&forest, "1", toggle_like);
        let forest = update_node(&forest, "1", toggle_repost);
        assert_eq!(forest[0].like_count, 0);
        assert_eq!(forest[0].repost_count, 0);
        assert!(!forest[0].liked);
        assert!(!forest[0].reposted);
    }

    #[test]
    fn missing_id_returns_the_same_forest() {
        let forest = Forest::from(vec![post("1", vec![])]);
        let result = update_node(&forest, "999", toggle_like);
        assert!(result.ptr_eq(&forest));
    }

    #[test]
    fn untouched_subtrees_are_shared() {
        let forest = Forest::from(vec![
            post("1", vec![post("1-1", vec![post("1-1-1", vec![])]), post("1-2", vec![])]),
            post("2", vec![]),
        ]);

        let result = update_node(&forest, "1-1-1", toggle_save);

        assert!(result[0].replies[0].replies[0].saved);
        assert!(!Arc::ptr_eq(&result[0], &forest[0]));
        assert!(!Arc::ptr_eq(&result[0].replies[0], &forest[0].replies[0]));
        assert!(Arc::ptr_eq(&result[0].replies[1], &forest[0].replies[1]));
        assert!(Arc::ptr_eq(&result[1], &forest[1]));
    }

    #[test]
    fn append_reply_goes_to_the_end() {
        let forest = Forest::from(vec![post("1", vec![post("1-1", vec![])])]);
        let result = update_node(&forest, "1", append_reply(reply("1-2")));
        let ids: Vec<&str> = result[0].replies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1-1", "1-2"]);
    }

    #[test]
    fn duplicate_child_is_declined() {
        let forest = Forest::from(vec![post("1", vec![post("1-1", vec![])])]);
        let result = update_node(&forest, "1", append_reply(reply("1-1")));
        assert!(result.ptr_eq(&forest));
    }

    #[test]
    fn share_only_counts_up() {
        let forest = Forest::from(vec![post("1", vec![])]);
        let forest = update_node(&forest, "1", record_share);
        let forest = update_node(&forest, "1", record_share);
        assert_eq!(forest[0].share_count, 2);
    }
}
