use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use news_logging::{news_debug, news_warn};
use tokio::sync::Mutex;

use crate::{AtomicFileWriter, PersistError};

pub const STORE_FILENAME: &str = "headlines_store.ron";

/// Flat async string store, the on-disk counterpart of a mobile key-value
/// storage API.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// All keys live in one RON map file inside the data directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    writer: AtomicFileWriter,
    /// Serialises read-modify-write cycles on the map file.
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.join(STORE_FILENAME)),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }
}

async fn read_map(path: &Path) -> Result<BTreeMap<String, String>, PersistError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(err.into()),
    };
    ron::from_str(&content).map_err(|err| PersistError::Decode(err.to_string()))
}

#[async_trait::async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let _guard = self.lock.lock().await;
        let mut map = read_map(self.path()).await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let _guard = self.lock.lock().await;
        let mut map = match read_map(self.path()).await {
            Ok(map) => map,
            Err(PersistError::Decode(reason)) => {
                let backup = self.path().with_extension("ron.bak");
                news_warn!(
                    "Store file {:?} is unreadable ({}); moving it to {:?} and starting over",
                    self.path(),
                    reason,
                    backup
                );
                tokio::fs::rename(self.path(), &backup).await?;
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        map.insert(key.to_string(), value.to_string());

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&map, pretty)
            .map_err(|err| PersistError::Encode(err.to_string()))?;

        let writer = self.writer.clone();
        tokio::task::spawn_blocking(move || writer.replace(content.as_bytes()))
            .await
            .map_err(|err| PersistError::Io(io::Error::other(err)))??;
        news_debug!("Stored key {} in {:?}", key, self.path());
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
