use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};
use model::{ContainerFilter, ContainerRecord, NewContainer, Totals};
use persistence::ContainerRepository;
use port::RandomSource;
use tokio::sync::Mutex;

pub mod aggregate;
pub mod model;
pub mod persistence;
pub mod port;
pub mod records;
pub mod simulation;
pub mod simulator;

#[cfg(test)]
pub mod testing;

struct PanelState {
    containers: Vec<ContainerRecord>,
    random: Box<dyn RandomSource + Send>,
}

/// Owns the container list. Every mutation swaps in a new list and persists
/// it while holding the state lock, so operations never interleave.
pub struct ControlPanel {
    state: Mutex<PanelState>,
    repository: ContainerRepository,
}

impl ControlPanel {
    pub async fn load(
        repository: ContainerRepository,
        random: Box<dyn RandomSource + Send>,
    ) -> ControlPanel {
        let containers = repository.load().await;
        ControlPanel {
            state: Mutex::new(PanelState { containers, random }),
            repository,
        }
    }

    pub async fn containers(&self) -> Vec<ContainerRecord> {
        self.state.lock().await.containers.clone()
    }

    pub async fn filtered(&self, filter: &ContainerFilter) -> Vec<ContainerRecord> {
        aggregate::filter(&self.state.lock().await.containers, filter)
    }

    pub async fn totals(&self) -> Totals {
        aggregate::totals(&self.state.lock().await.containers)
    }

    pub async fn images_in_use(&self) -> Vec<String> {
        aggregate::images_in_use(&self.state.lock().await.containers)
    }

    pub async fn create_container(&self, fields: NewContainer) -> Vec<ContainerRecord> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let next = records::create(&state.containers, fields, state.random.as_mut(), now_millis());
        if next.len() == state.containers.len() {
            debug!("Ignoring container creation with a blank name");
            return next;
        }
        info!("Container {} ({}) created", next[0].name, next[0].id);
        self.replace(state, next).await
    }

    pub async fn run_container(&self, id: &str) -> Vec<ContainerRecord> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let next = records::run(&state.containers, id, state.random.as_mut());
        self.log_transition(&next, id, "started");
        self.replace(state, next).await
    }

    pub async fn stop_container(&self, id: &str) -> Vec<ContainerRecord> {
        let mut state = self.state.lock().await;
        let next = records::stop(&state.containers, id);
        self.log_transition(&next, id, "stopped");
        self.replace(&mut state, next).await
    }

    pub async fn delete_container(&self, id: &str) -> Vec<ContainerRecord> {
        let mut state = self.state.lock().await;
        let next = records::delete(&state.containers, id);
        if next.len() == state.containers.len() {
            debug!("Ignoring delete of unknown container {}", id);
        } else {
            info!("Container {} deleted", id);
        }
        self.replace(&mut state, next).await
    }

    /// Advances the usage metrics of every container by one step.
    pub async fn tick(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let next = simulator::tick(&state.containers, state.random.as_mut());
        self.replace(state, next).await;
    }

    fn log_transition(&self, containers: &[ContainerRecord], id: &str, action: &str) {
        if containers.iter().any(|c| c.id == id) {
            info!("Container {} {}", id, action);
        } else {
            debug!("Ignoring unknown container {}", id);
        }
    }

    async fn replace(
        &self,
        state: &mut PanelState,
        next: Vec<ContainerRecord>,
    ) -> Vec<ContainerRecord> {
        self.repository.save(&next).await;
        state.containers = next;
        state.containers.clone()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
