//! One tick of the metrics simulation.

use super::model::{ContainerRecord, Status};
use super::port::RandomSource;

const RAM_DECAY: f64 = 0.98;
const CPU_DRIFT: (f64, f64) = (-8.0, 10.0);
const CPU_FLOOR: f64 = 3.0;
const CPU_CEILING: f64 = 100.0;
const RAM_DRIFT: (f64, f64) = (-0.05, 0.08);
const RAM_FLOOR: f64 = 0.1;
const DISK_DRIFT: (f64, f64) = (0.0, 0.05);

/// Returns the list with every record's usage fields advanced by one tick.
/// Records are independent of each other and keep their order.
pub fn tick(
    containers: &[ContainerRecord],
    random: &mut (impl RandomSource + ?Sized),
) -> Vec<ContainerRecord> {
    containers
        .iter()
        .map(|record| advance(record, &mut *random))
        .collect()
}

fn advance(record: &ContainerRecord, random: &mut (impl RandomSource + ?Sized)) -> ContainerRecord {
    match record.status {
        Status::Stopped => ContainerRecord {
            cpu: 0.0,
            ram_used: bounded(record.ram_used * RAM_DECAY, 0.0, record.ram_limit),
            disk_used: bounded(record.disk_used, 0.0, record.disk_limit),
            ..record.clone()
        },
        Status::Running => {
            let cpu = bounded(
                record.cpu + random.uniform(CPU_DRIFT.0, CPU_DRIFT.1),
                CPU_FLOOR,
                CPU_CEILING,
            );
            let ram_used = bounded(
                record.ram_used + random.uniform(RAM_DRIFT.0, RAM_DRIFT.1),
                RAM_FLOOR,
                record.ram_limit,
            );
            let disk_used = bounded(
                record.disk_used + random.uniform(DISK_DRIFT.0, DISK_DRIFT.1),
                record.disk_used.max(0.0),
                record.disk_limit,
            );
            ContainerRecord {
                cpu,
                ram_used,
                disk_used,
                ..record.clone()
            }
        }
    }
}

/// Upper bound wins when the bounds cross, so a record whose limit sits below
/// the floor settles on its limit.
fn bounded(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}
