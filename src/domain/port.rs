use anyhow::Error;
use async_trait::async_trait;

/// Flat string store the container list is persisted into.
#[async_trait]
pub trait KeyValueStore {

    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set(&self, key: &str, value: String) -> Result<(), Error>;
}

/// Source of uniform samples in `[0, 1)` for the metrics simulation.
pub trait RandomSource {

    fn next_unit(&mut self) -> f64;

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }
}
