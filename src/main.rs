use std::{error::Error, sync::Arc};

use anyhow::Context;
use domain::{
    persistence::ContainerRepository, port::KeyValueStore, simulation::Simulation, ControlPanel,
};
use infra::{file_store::FileStore, memory::MemoryStore, random::RngSource, web::router};
use log::info;
use settings::load_config;
use tokio::net::TcpListener;

mod domain;
mod infra;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Start Dockyard - a simulated container control panel");

    let config = load_config()?;
    info!("Loaded config {:?}", config);

    let store: Box<dyn KeyValueStore + Send + Sync> = if config.ephemeral {
        Box::new(MemoryStore::default())
    } else {
        Box::new(FileStore::new(&config.state_file))
    };
    let repository = ContainerRepository::new(store, config.storage_key.clone());
    let panel = Arc::new(
        ControlPanel::load(repository, Box::new(RngSource::from_entropy())).await,
    );

    let mut simulation = Simulation::new(Arc::clone(&panel), config.tick_interval());
    simulation.start();

    let listener = TcpListener::bind(&config.listen_address)
        .await
        .with_context(|| format!("Can't bind {}", config.listen_address))?;
    info!("Listening on {}", config.listen_address);
    axum::serve(listener, router(panel))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    simulation.shutdown().await;
    info!("Dockyard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Can't listen for shutdown signal: {:?}", e);
        futures::future::pending::<()>().await;
    }
}
