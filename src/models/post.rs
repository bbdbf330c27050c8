use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is authoring a post or reply.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub avatar_ref: Option<String>,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar_ref: None,
        }
    }

    pub fn with_avatar(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = Some(avatar_ref.into());
        self
    }
}

/// A single node of the thread forest, either a root post or a reply.
///
/// Replies are held behind `Arc` so that two forest snapshots can share
/// every subtree a mutation did not touch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_username: String,
    #[serde(default)]
    pub author_avatar_ref: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub media_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub repost_count: u32,
    #[serde(default)]
    pub share_count: u32,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub reposted: bool,
    #[serde(default, alias = "comments")]
    pub replies: Vec<Arc<Post>>,
}

impl Post {
    pub fn new(id: impl Into<String>, author: &Identity, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author_username: author.username.clone(),
            author_avatar_ref: author.avatar_ref.clone(),
            body: body.into(),
            media_ref: None,
            created_at: Utc::now(),
            parent_id: None,
            like_count: 0,
            repost_count: 0,
            share_count: 0,
            liked: false,
            saved: false,
            reposted: false,
            replies: Vec::new(),
        }
    }

    /// Builds a fresh root post with a generated id.
    pub fn compose(author: &Identity, body: impl Into<String>, media_ref: Option<String>) -> Self {
        Self {
            media_ref,
            ..Self::new(new_post_id(), author, body)
        }
    }

    pub fn with_media(mut self, media_ref: impl Into<String>) -> Self {
        self.media_ref = Some(media_ref.into());
        self
    }

    pub fn with_replies(mut self, replies: Vec<Post>) -> Self {
        self.replies = replies.into_iter().map(Arc::new).collect();
        self
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }
}

/// Payload for a reply; `id` and `created_at` are stamped when it is inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDraft {
    /// Caller-chosen id, used to de-duplicate retried submissions.
    pub id: Option<String>,
    pub body: String,
    pub media_ref: Option<String>,
}

impl ReplyDraft {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_media(mut self, media_ref: impl Into<String>) -> Self {
        self.media_ref = Some(media_ref.into());
        self
    }

    pub(crate) fn into_post(self, author: &Identity, parent_id: &str) -> Post {
        let id = self.id.unwrap_or_else(new_post_id);
        Post {
            media_ref: self.media_ref,
            parent_id: Some(parent_id.to_string()),
            ..Post::new(id, author, self.body)
        }
    }
}

pub fn new_post_id() -> String {
    Uuid::new_v4().to_string()
}

/// The ordered sequence of root posts. Cloning is a reference-count bump.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Forest {
    roots: Arc<Vec<Arc<Post>>>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<Arc<Post>>) -> Self {
        Self {
            roots: Arc::new(roots),
        }
    }

    pub fn roots(&self) -> &[Arc<Post>] {
        &self.roots
    }

    /// True when both values are the same snapshot, not merely equal ones.
    pub fn ptr_eq(&self, other: &Forest) -> bool {
        Arc::ptr_eq(&self.roots, &other.roots)
    }
}

impl Deref for Forest {
    type Target = [Arc<Post>];

    fn deref(&self) -> &Self::Target {
        &self.roots
    }
}

impl From<Vec<Post>> for Forest {
    fn from(posts: Vec<Post>) -> Self {
        Self::from_roots(posts.into_iter().map(Arc::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_replies_and_counters_default_to_empty() {
        let json = r#"{
            "id": "1",
            "authorUsername": "john",
            "body": "breakfast",
            "createdAt": "2025-01-01T08:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.replies.is_empty());
        assert_eq!(post.like_count, 0);
        assert!(!post.liked);
        assert_eq!(post.parent_id, None);
    }

    #[test]
    fn legacy_comments_field_is_read_as_replies() {
        let json = r#"{
            "id": "1",
            "authorUsername": "john",
            "createdAt": "2025-01-01T08:00:00Z",
            "comments": [
                {"id": "1-1", "authorUsername": "emma", "createdAt": "2025-01-01T09:00:00Z"}
            ]
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.replies.len(), 1);
        assert_eq!(post.replies[0].id, "1-1");
    }

    #[test]
    fn drafts_without_an_id_get_a_fresh_one() {
        let me = Identity::new("you");
        let a = ReplyDraft::new("hi").into_post(&me, "1");
        let b = ReplyDraft::new("hi").into_post(&me, "1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.parent_id.as_deref(), Some("1"));
        assert!(a.replies.is_empty());
    }

    #[test]
    fn cloned_forest_shares_its_roots() {
        let forest = Forest::from(vec![Post::new("1", &Identity::new("john"), "")]);
        let copy = forest.clone();
        assert!(forest.ptr_eq(&copy));
        assert!(!forest.ptr_eq(&Forest::from(vec![])));
    }
}
