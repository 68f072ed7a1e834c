use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use async_trait::async_trait;
use tokio::{fs, sync::Mutex};

use crate::domain::port::KeyValueStore;

/// Keeps every key in one JSON object on disk, rewritten whole on each `set`.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Can't read {}", self.path.display()))
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("Can't parse store file {}", self.path.display()))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        // an unreadable file is replaced rather than blocking every write
        let mut entries = self.read_entries().await.unwrap_or_default();
        entries.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&entries).context("Can't serialize store")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent).await?;
        }
        let temp = self.temp_path();
        fs::write(&temp, content)
            .await
            .with_context(|| format!("Can't write {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Can't move {} into place", temp.display()))
    }
}

async fn create_dir(path: &Path) -> Result<(), Error> {
    fs::create_dir_all(path)
        .await
        .with_context(|| format!("Can't create directory {}", path.display()))
}
