use std::time::Duration;

use anyhow::{ensure, Context, Error};
use config::Config;

#[derive(Debug, serde_derive::Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub listen_address: String,
    pub state_file: String,
    pub ephemeral: bool,
    pub storage_key: String,
    pub tick_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:3000".to_string(),
            state_file: "dockyard-state.json".to_string(),
            ephemeral: false,
            storage_key: "containers".to_string(),
            tick_interval_ms: 1200,
        }
    }
}

impl AppConfig {
    /// A zero period would make the simulation interval panic.
    pub fn validate(self) -> Result<AppConfig, Error> {
        ensure!(
            self.tick_interval_ms > 0,
            "tick_interval_ms must be greater than zero"
        );
        Ok(self)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

pub fn load_config() -> Result<AppConfig, Error> {
    let config = Config::builder()
        .add_source(config::Environment::with_prefix("dockyard").try_parsing(true))
        .build()
        .context("Can't load configuration")?;
    app_config_from(config)
}

fn app_config_from(config: Config) -> Result<AppConfig, Error> {
    config
        .try_deserialize::<AppConfig>()
        .context("Can't deserialize AppConfig from loaded configuration")?
        .validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_panel_setup() {
        let config = AppConfig::default();
        assert_eq!(config.storage_key, "containers");
        assert_eq!(config.tick_interval(), Duration::from_millis(1200));
        assert!(!config.ephemeral);
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = Config::builder()
            .set_override("tick_interval_ms", 0)
            .unwrap()
            .build()
            .unwrap();
        let err = app_config_from(config).unwrap_err();
        assert!(err.to_string().contains("tick_interval_ms"));

        let zero = AppConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("tick_interval_ms", 250)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.listen_address, "0.0.0.0:3000");
        assert_eq!(config.state_file, "dockyard-state.json");
    }
}
