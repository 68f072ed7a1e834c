//! Loading and saving the container list through a [`KeyValueStore`].
//!
//! The stored value is the whole list serialized as a JSON array under one
//! key. A missing key, unparsable text and a non-array value all resolve to
//! the built-in default list.

use anyhow::{Context, Error};
use log::{debug, info, warn};
use serde_json::Value;

use super::model::{ContainerRecord, Status};
use super::port::KeyValueStore;

#[derive(Debug, PartialEq)]
pub enum Decoded {
    Stored(Vec<ContainerRecord>),
    UseDefaults,
}

pub fn decode(raw: Option<&str>) -> Decoded {
    let Some(raw) = raw else {
        return Decoded::UseDefaults;
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Array(_)) => match serde_json::from_value(value) {
            Ok(containers) => Decoded::Stored(containers),
            Err(e) => {
                debug!("Stored containers have an unexpected shape: {}", e);
                Decoded::UseDefaults
            }
        },
        Ok(_) => {
            debug!("Stored containers value is not an array");
            Decoded::UseDefaults
        }
        Err(e) => {
            debug!("Stored containers value is not valid JSON: {}", e);
            Decoded::UseDefaults
        }
    }
}

pub fn encode(containers: &[ContainerRecord]) -> Result<String, Error> {
    serde_json::to_string(containers).context("Can't serialize container list")
}

/// The two records a fresh panel starts with.
pub fn default_containers() -> Vec<ContainerRecord> {
    vec![
        ContainerRecord {
            id: "c-web".to_string(),
            name: "web-frontend".to_string(),
            description: "Public storefront".to_string(),
            image: "node:20-alpine".to_string(),
            status: Status::Running,
            cpu: 18.0,
            cores: 2,
            ram_limit: 2.0,
            ram_used: 0.6,
            disk_limit: 10.0,
            disk_used: 1.2,
            project_files: vec!["package.json".to_string(), "server.js".to_string()],
            build_command: "npm install".to_string(),
            run_command: "npm run start".to_string(),
            created_at: 1_700_000_000_000,
        },
        ContainerRecord {
            id: "c-db".to_string(),
            name: "postgres-db".to_string(),
            description: "Primary database".to_string(),
            image: "postgres:16".to_string(),
            status: Status::Stopped,
            cpu: 0.0,
            cores: 1,
            ram_limit: 4.0,
            ram_used: 0.0,
            disk_limit: 20.0,
            disk_used: 3.4,
            project_files: vec![],
            build_command: String::new(),
            run_command: String::new(),
            created_at: 1_700_000_000_000,
        },
    ]
}

pub struct ContainerRepository {
    store: Box<dyn KeyValueStore + Send + Sync>,
    key: String,
}

impl ContainerRepository {
    pub fn new(store: Box<dyn KeyValueStore + Send + Sync>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Never fails: unreadable or malformed state falls back to the defaults.
    pub async fn load(&self) -> Vec<ContainerRecord> {
        let raw = match self.store.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Can't read stored containers, using defaults: {:?}", e);
                None
            }
        };
        match decode(raw.as_deref()) {
            Decoded::Stored(containers) => {
                info!("Loaded {} stored containers", containers.len());
                containers
            }
            Decoded::UseDefaults => {
                info!("No usable stored containers, starting from defaults");
                default_containers()
            }
        }
    }

    /// Writes are not retried; a failure is logged and dropped.
    pub async fn save(&self, containers: &[ContainerRecord]) {
        let result = match encode(containers) {
            Ok(serialized) => self.store.set(&self.key, serialized).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("Can't persist containers under '{}': {:?}", self.key, e);
        }
    }
}
