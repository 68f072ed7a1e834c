use itertools::Itertools;

use super::model::{ContainerFilter, ContainerRecord, Totals};

/// Fleet totals. CPU is the mean over running records only, everything else
/// is summed over the whole list.
pub fn totals(containers: &[ContainerRecord]) -> Totals {
    let running: Vec<&ContainerRecord> = containers.iter().filter(|c| c.is_running()).collect();
    let cpu_percent = if running.is_empty() {
        0.0
    } else {
        running.iter().map(|c| c.cpu).sum::<f64>() / running.len() as f64
    };
    Totals {
        cpu_percent,
        ram_used_total: containers.iter().map(|c| c.ram_used).sum(),
        ram_limit_total: containers.iter().map(|c| c.ram_limit).sum(),
        disk_used_total: containers.iter().map(|c| c.disk_used).sum(),
        disk_limit_total: containers.iter().map(|c| c.disk_limit).sum(),
        total: containers.len(),
        running: running.len(),
    }
}

pub fn filter(containers: &[ContainerRecord], filter: &ContainerFilter) -> Vec<ContainerRecord> {
    containers
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Distinct image tags in first-seen order.
pub fn images_in_use(containers: &[ContainerRecord]) -> Vec<String> {
    containers
        .iter()
        .map(|record| record.image.clone())
        .unique()
        .collect()
}
