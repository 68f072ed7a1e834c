use std::{sync::Arc, time::Duration};

use log::{info, warn};
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::ControlPanel;

struct Running {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Handle on the periodic metrics task. The task only lives between
/// [`Simulation::start`] and [`Simulation::stop`]; dropping the handle stops it.
/// Stopping never interrupts a tick: the task exits at the next tick boundary.
pub struct Simulation {
    panel: Arc<ControlPanel>,
    period: Duration,
    running: Option<Running>,
}

impl Simulation {
    pub fn new(panel: Arc<ControlPanel>, period: Duration) -> Self {
        Self {
            panel,
            period,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let panel = Arc::clone(&self.panel);
        let period = self.period;
        let (shutdown, mut shutdown_requested) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            // a tick that overruns pushes the next one back instead of bursting
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_requested => break,
                    _ = interval.tick() => panel.tick().await,
                }
            }
        });
        self.running = Some(Running { shutdown, handle });
        info!("Metrics simulation started, ticking every {:?}", period);
    }

    /// Asks the task to exit without waiting for it.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown.send(());
            info!("Metrics simulation stopping");
        }
    }

    /// Stops the task and waits until any in-flight tick has finished.
    pub async fn shutdown(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown.send(());
            if let Err(e) = running.handle.await {
                warn!("Metrics simulation task ended abnormally: {:?}", e);
            }
            info!("Metrics simulation stopped");
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}
