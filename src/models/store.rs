use std::sync::Arc;

use log::{debug, warn};

use crate::models::aggregate;
use crate::models::locator;
use crate::models::mutator;
use crate::models::post::{Forest, Identity, Post, ReplyDraft};

/// Notified after every operation that produced a new forest.
pub trait ForestObserver: Send + Sync {
    fn forest_changed(&self, forest: &Forest);
}

#[derive(Default)]
pub struct PostStore {
    forest: Forest,
    identity: Option<Identity>,
    observers: Vec<Box<dyn ForestObserver>>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_forest(forest: Forest) -> Self {
        Self {
            forest,
            ..Self::default()
        }
    }

    /// Author stamped on replies; falls back to an anonymous "you".
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn identity(&self) -> Identity {
        self.identity.clone().unwrap_or_else(|| Identity::new("you"))
    }

    pub fn subscribe(&mut self, observer: Box<dyn ForestObserver>) {
        self.observers.push(observer);
    }

    pub fn forest(&self) -> Forest {
        self.forest.clone()
    }

    /// Prepends a root post. Returns false if its id is already in use.
    pub fn add_post(&mut self, post: Post) -> bool {
        if locator::contains(&self.forest, &post.id) {
            warn!("Ignoring post {}: id already exists", post.id);
            return false;
        }
        debug!("Adding root post {}", post.id);

        let mut roots = Vec::with_capacity(self.forest.len() + 1);
        roots.push(Arc::new(post));
        roots.extend(self.forest.iter().cloned());
        self.commit(Forest::from_roots(roots));
        true
    }

    pub fn like(&mut self, id: &str) -> Forest {
        self.apply("like", id, mutator::toggle_like)
    }

    pub fn save(&mut self, id: &str) -> Forest {
        self.apply("save", id, mutator::toggle_save)
    }

    pub fn repost(&mut self, id: &str) -> Forest {
        self.apply("repost", id, mutator::toggle_repost)
    }

    pub fn share(&mut self, id: &str) -> Forest {
        self.apply("share", id, mutator::record_share)
    }

    /// Appends a reply under `id` and returns it.
    ///
    /// Resubmitting a draft whose id is already a child of `id` returns that
    /// existing child. `None` means the target is missing, or the draft's id
    /// is taken by some other node.
    pub fn add_reply(&mut self, id: &str, draft: ReplyDraft) -> Option<Arc<Post>> {
        let target = locator::find_node(&self.forest, id)?;

        if let Some(draft_id) = draft.id.as_deref() {
            if let Some(existing) = target.replies.iter().find(|r| r.id == draft_id) {
                debug!("Reply {} already under {}", draft_id, id);
                return Some(Arc::clone(existing));
            }
            if locator::contains(&self.forest, draft_id) {
                warn!("Ignoring reply {}: id already exists elsewhere", draft_id);
                return None;
            }
        }

        let reply = Arc::new(draft.into_post(&self.identity(), id));
        debug!("Adding reply {} under {}", reply.id, id);

        let forest = mutator::update_node(&self.forest, id, mutator::append_reply(Arc::clone(&reply)));
        self.commit(forest);
        Some(reply)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<Post>> {
        locator::find_node(&self.forest, id).cloned()
    }

    pub fn find_parent_of(&self, id: &str) -> Option<Arc<Post>> {
        locator::find_parent(&self.forest, id).cloned()
    }

    /// Root-to-target chain of ids.
    pub fn ancestry(&self, id: &str) -> Option<Vec<String>> {
        locator::path_to(&self.forest, id)
            .map(|path| path.into_iter().map(|post| post.id.clone()).collect())
    }

    pub fn total_replies(&self, id: &str) -> Option<usize> {
        locator::find_node(&self.forest, id).map(|post| aggregate::total_reply_count(post))
    }

    fn apply<F>(&mut self, action: &str, id: &str, transform: F) -> Forest
    where
        F: FnOnce(&Post) -> Option<Post>,
    {
        let forest = mutator::update_node(&self.forest, id, transform);
        if forest.ptr_eq(&self.forest) {
            debug!("{} {}: no such post", action, id);
        } else {
            debug!("{} {}", action, id);
            self.commit(forest);
        }
        self.forest()
    }

    fn commit(&mut self, forest: Forest) {
        self.forest = forest;
        for observer in &self.observers {
            observer.forest_changed(&self.forest);
        }
    }
}
