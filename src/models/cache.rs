use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};

use crate::error::NuumiError;
use crate::models::post::Forest;
use crate::models::store::ForestObserver;

pub const DEFAULT_COLLECTION: &str = "posts";

/// Directory holding the mirrored collections.
pub fn cache_dir(data_dir: Option<&Path>) -> Result<PathBuf, NuumiError> {
    let app_cache_dir = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            // Check the XDG_CACHE_HOME environment variable first
            let base_cache_dir = env::var_os("XDG_CACHE_HOME")
                .map(PathBuf::from)
                .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
                .ok_or_else(|| NuumiError::Cache("Could not find home directory".to_string()))?;
            base_cache_dir.join("nuumi")
        }
    };

    fs::create_dir_all(&app_cache_dir)
        .map_err(|e| NuumiError::Cache(format!("Failed to create cache directory: {}", e)))?;

    Ok(app_cache_dir)
}

pub fn collection_file(dir: &Path, collection: &str) -> PathBuf {
    dir.join(format!("{}.json", collection))
}

pub fn load_forest(path: &Path) -> Result<Forest, NuumiError> {
    match fs::read_to_string(path) {
        Ok(data) => {
            // Reply chains nest without bound, so grow the stack instead of capping depth
            let mut deserializer = serde_json::Deserializer::from_str(&data);
            deserializer.disable_recursion_limit();
            let forest = Forest::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
            deserializer.end()?;
            info!("Loaded {} posts from {}", forest.len(), path.display());
            Ok(forest)
        }
        // Nothing mirrored yet
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Forest::new()),
        Err(e) => Err(NuumiError::Cache(format!("Failed to read cache file: {}", e))),
    }
}

pub fn save_forest(path: &Path, forest: &Forest) -> Result<(), NuumiError> {
    let json = encode(forest)?;
    fs::write(path, json)
        .map_err(|e| NuumiError::Cache(format!("Failed to write cache file: {}", e)))?;
    info!("Saved {} posts to {}", forest.len(), path.display());
    Ok(())
}

fn encode(forest: &Forest) -> Result<Vec<u8>, NuumiError> {
    Ok(serde_json::to_vec_pretty(forest)?)
}

enum MirrorMessage {
    Write(Forest),
    Flush(oneshot::Sender<()>),
}

/// Writes every new forest to disk in the background, in the order the
/// store produced them. A failed write is logged and the in-memory forest
/// stays as it is.
#[derive(Clone)]
pub struct CacheMirror {
    tx: mpsc::UnboundedSender<MirrorMessage>,
}

impl CacheMirror {
    /// Must be called from within a tokio runtime.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(path, rx));
        Self { tx }
    }

    /// Waits until every forest handed over so far has been written.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(MirrorMessage::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}

impl ForestObserver for CacheMirror {
    fn forest_changed(&self, forest: &Forest) {
        if self.tx.send(MirrorMessage::Write(forest.clone())).is_err() {
            warn!("Cache writer has stopped, dropping update");
        }
    }
}

async fn write_loop(path: PathBuf, mut rx: mpsc::UnboundedReceiver<MirrorMessage>) {
    while let Some(message) = rx.recv().await {
        match message {
            MirrorMessage::Write(forest) => {
                if let Err(e) = write_forest(&path, &forest).await {
                    warn!("Failed to mirror posts to {}: {}", path.display(), e);
                }
            }
            MirrorMessage::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

async fn write_forest(path: &Path, forest: &Forest) -> Result<(), NuumiError> {
    let json = encode(forest)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::{Identity, Post};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_is_an_empty_forest() {
        let dir = tempfile::tempdir().unwrap();
        let forest = load_forest(&collection_file(dir.path(), "posts")).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = collection_file(dir.path(), "posts");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_forest(&path), Err(NuumiError::Json(_))));
    }

    #[test]
    fn saved_forest_loads_back_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = collection_file(dir.path(), "posts");
        let me = Identity::new("john");
        let forest = Forest::from(vec![
            Post::new("1", &me, "breakfast").with_replies(vec![Post::new("1-1", &me, "recipe?")]),
        ]);

        save_forest(&path, &forest).unwrap();
        assert_eq!(load_forest(&path).unwrap(), forest);
    }

    #[test]
    fn explicit_data_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        assert_eq!(cache_dir(Some(&nested)).unwrap(), nested);
        assert!(nested.is_dir());
    }
}
