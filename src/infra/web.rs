use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use log::debug;
use serde::Serialize;

use crate::domain::{
    model::{ContainerFilter, ContainerRecord, NewContainer, Totals, IMAGE_PRESETS},
    ControlPanel,
};

pub fn router(panel: Arc<ControlPanel>) -> Router {
    Router::new()
        .route("/containers", get(list_containers).post(create_container))
        .route("/containers/:id", delete(delete_container))
        .route("/containers/:id/run", post(run_container))
        .route("/containers/:id/stop", post(stop_container))
        .route("/totals", get(totals))
        .route("/images", get(images_in_use))
        .route("/images/presets", get(image_presets))
        .with_state(panel)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerView {
    #[serde(flatten)]
    record: ContainerRecord,
    cpu_percent: f64,
    ram_percent: f64,
    disk_percent: f64,
}

impl From<ContainerRecord> for ContainerView {
    fn from(record: ContainerRecord) -> Self {
        Self {
            cpu_percent: record.cpu_percent(),
            ram_percent: record.ram_percent(),
            disk_percent: record.disk_percent(),
            record,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalsView {
    #[serde(flatten)]
    totals: Totals,
    stopped: usize,
    ram_percent: f64,
    disk_percent: f64,
}

fn views(containers: Vec<ContainerRecord>) -> Json<Vec<ContainerView>> {
    Json(containers.into_iter().map(ContainerView::from).collect())
}

async fn list_containers(
    State(panel): State<Arc<ControlPanel>>,
    Query(filter): Query<ContainerFilter>,
) -> impl IntoResponse {
    views(panel.filtered(&filter).await)
}

async fn create_container(
    State(panel): State<Arc<ControlPanel>>,
    Json(payload): Json<NewContainer>,
) -> impl IntoResponse {
    debug!("Create container request for '{}'", payload.name);
    views(panel.create_container(payload).await)
}

async fn run_container(
    State(panel): State<Arc<ControlPanel>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    views(panel.run_container(&id).await)
}

async fn stop_container(
    State(panel): State<Arc<ControlPanel>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    views(panel.stop_container(&id).await)
}

async fn delete_container(
    State(panel): State<Arc<ControlPanel>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    views(panel.delete_container(&id).await)
}

async fn totals(State(panel): State<Arc<ControlPanel>>) -> impl IntoResponse {
    let totals = panel.totals().await;
    Json(TotalsView {
        stopped: totals.stopped(),
        ram_percent: totals.ram_percent(),
        disk_percent: totals.disk_percent(),
        totals,
    })
}

async fn images_in_use(State(panel): State<Arc<ControlPanel>>) -> impl IntoResponse {
    Json(panel.images_in_use().await)
}

async fn image_presets() -> impl IntoResponse {
    Json(IMAGE_PRESETS)
}
