use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command as Process;
use std::sync::Arc;

use log::info;

use crate::cli::Command;
use crate::error::NuumiError;
use crate::models::{cache, CacheMirror, Config, Post, PostStore, ReplyDraft, ReplyOrder};
use crate::views;

/// A store loaded from the local mirror, with writes flowing back to it.
pub struct Session {
    pub store: PostStore,
    mirror: CacheMirror,
}

impl Session {
    /// Must be called from within a tokio runtime.
    pub fn open(config: &Config) -> Result<Self, NuumiError> {
        Self::open_at(config, config.collection_file()?)
    }

    pub fn open_at(config: &Config, path: PathBuf) -> Result<Self, NuumiError> {
        let forest = cache::load_forest(&path)?;
        let mirror = CacheMirror::spawn(path);

        let mut store = PostStore::from_forest(forest).with_identity(config.identity());
        store.subscribe(Box::new(mirror.clone()));
        Ok(Self { store, mirror })
    }

    /// Waits for pending mirror writes.
    pub async fn close(self) {
        self.mirror.flush().await;
    }
}

/// Runs one command against the session and returns what to print.
pub fn execute(session: &mut Session, command: Command) -> Result<String, NuumiError> {
    let store = &mut session.store;
    match command {
        Command::Post { body, media } => {
            let body = body_or_editor(body)?;
            let identity = store.identity();
            let post = Post::compose(&identity, body, media);
            let id = post.id.clone();
            if !store.add_post(post) {
                return Err(NuumiError::DuplicateId(id));
            }
            info!("Posted {}", id);
            Ok(id)
        }
        Command::Reply {
            id,
            body,
            reply_id,
            media,
        } => {
            require(store, &id)?;
            let mut draft = ReplyDraft::new(body_or_editor(body)?);
            draft.id = reply_id.clone();
            draft.media_ref = media;
            match store.add_reply(&id, draft) {
                Some(reply) => Ok(reply.id.clone()),
                None => Err(NuumiError::DuplicateId(reply_id.unwrap_or(id))),
            }
        }
        Command::Like { id } => {
            require(store, &id)?;
            store.like(&id);
            render_one(store, &id)
        }
        Command::Save { id } => {
            require(store, &id)?;
            store.save(&id);
            render_one(store, &id)
        }
        Command::Repost { id } => {
            require(store, &id)?;
            store.repost(&id);
            render_one(store, &id)
        }
        Command::Share { id } => {
            require(store, &id)?;
            store.share(&id);
            let post = require(store, &id)?;
            Ok(views::share_text(&post))
        }
        Command::Show {
            id,
            depth,
            breadth_first,
        } => {
            let post = require(store, &id)?;
            let order = if breadth_first {
                ReplyOrder::BreadthFirst
            } else {
                ReplyOrder::PreOrder
            };
            Ok(views::render_thread(&post, depth, order))
        }
        Command::Feed => Ok(views::render_feed(&store.forest())),
    }
}

fn require(store: &PostStore, id: &str) -> Result<Arc<Post>, NuumiError> {
    store
        .find_by_id(id)
        .ok_or_else(|| NuumiError::NotFound(id.to_string()))
}

fn render_one(store: &PostStore, id: &str) -> Result<String, NuumiError> {
    let post = require(store, id)?;
    Ok(views::thread::render_post(&post, 0).join("\n"))
}

fn body_or_editor(body: Option<String>) -> Result<String, NuumiError> {
    match body {
        Some(body) => Ok(body),
        None => create_post_via_editor(),
    }
}

pub fn create_post_via_editor() -> Result<String, NuumiError> {
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let temp_path = env::temp_dir().join(format!("nuumi-{}.txt", crate::models::post::new_post_id()));

    let status = Process::new(editor).arg(&temp_path).status()?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        return Err(NuumiError::Editor("Editor exited with non-zero status".to_string()));
    }

    let content = match fs::read_to_string(&temp_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    let _ = fs::remove_file(&temp_path);

    let content = content.trim_end().to_string();
    if content.trim().is_empty() {
        return Err(NuumiError::Editor("Empty post, nothing to publish".to_string()));
    }
    Ok(content)
}
