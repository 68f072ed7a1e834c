use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Running,
    Stopped,
}

/// One simulated container. Only the usage fields (`cpu`, `ram_used`,
/// `disk_used`) and `status` change after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    pub status: Status,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default = "default_cores")]
    pub cores: u32,
    #[serde(default = "default_ram_limit")]
    pub ram_limit: f64,
    #[serde(default)]
    pub ram_used: f64,
    #[serde(default = "default_disk_limit")]
    pub disk_limit: f64,
    #[serde(default)]
    pub disk_used: f64,
    #[serde(default)]
    pub project_files: Vec<String>,
    #[serde(default)]
    pub build_command: String,
    #[serde(default)]
    pub run_command: String,
    #[serde(default)]
    pub created_at: u64,
}

pub const DEFAULT_CORES: u32 = 1;
pub const DEFAULT_RAM_LIMIT: f64 = 1.0;
pub const DEFAULT_DISK_LIMIT: f64 = 10.0;

fn default_cores() -> u32 {
    DEFAULT_CORES
}

fn default_ram_limit() -> f64 {
    DEFAULT_RAM_LIMIT
}

fn default_disk_limit() -> f64 {
    DEFAULT_DISK_LIMIT
}

impl ContainerRecord {
    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn cpu_percent(&self) -> f64 {
        percent(self.cpu)
    }

    pub fn ram_percent(&self) -> f64 {
        percent(self.ram_used / self.ram_limit.max(0.01) * 100.0)
    }

    pub fn disk_percent(&self) -> f64 {
        percent(self.disk_used / self.disk_limit.max(0.01) * 100.0)
    }
}

/// Caller supplied fields for a new record. Anything left out is filled in
/// when the record is created. Numeric fields accept numbers or numeric
/// strings; anything else reads as unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewContainer {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub cores: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub ram_limit: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub disk_limit: Option<f64>,
    pub project_files: Vec<String>,
    pub build_command: Option<String>,
    pub run_command: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    })
}

impl NewContainer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub cpu_percent: f64,
    pub ram_used_total: f64,
    pub ram_limit_total: f64,
    pub disk_used_total: f64,
    pub disk_limit_total: f64,
    pub total: usize,
    pub running: usize,
}

impl Totals {
    pub fn stopped(&self) -> usize {
        self.total.saturating_sub(self.running)
    }

    pub fn ram_percent(&self) -> f64 {
        percent(self.ram_used_total / self.ram_limit_total.max(1.0) * 100.0)
    }

    pub fn disk_percent(&self) -> f64 {
        percent(self.disk_used_total / self.disk_limit_total.max(1.0) * 100.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ImagePreset {
    pub label: &'static str,
    pub value: &'static str,
}

pub const IMAGE_PRESETS: [ImagePreset; 4] = [
    ImagePreset {
        label: "Ubuntu 22.04",
        value: "ubuntu:22.04",
    },
    ImagePreset {
        label: "Node.js 20",
        value: "node:20-alpine",
    },
    ImagePreset {
        label: "Python 3.11",
        value: "python:3.11-slim",
    },
    ImagePreset {
        label: "PostgreSQL 16",
        value: "postgres:16",
    },
];

/// Grid filters. `None` and the literal `all` both match everything.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContainerFilter {
    pub query: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

impl ContainerFilter {
    pub fn matches(&self, record: &ContainerRecord) -> bool {
        let query_match = self.query.as_deref().map_or(true, |query| {
            record
                .name
                .to_lowercase()
                .contains(&query.to_lowercase())
        });
        let image_match = match self.image.as_deref() {
            None | Some("all") => true,
            Some(image) => record.image == image,
        };
        let status_match = match self.status.as_deref() {
            None | Some("all") => true,
            Some("running") => record.status == Status::Running,
            Some("stopped") => record.status == Status::Stopped,
            Some(_) => false,
        };
        query_match && image_match && status_match
    }
}

fn percent(value: f64) -> f64 {
    value.max(0.0).min(100.0)
}
