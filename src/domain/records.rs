//! Create / run / stop / delete over the container list.
//!
//! Every operation takes the current list and hands back a new one. Unknown
//! ids and blank names leave the list as it was.

use uuid::Uuid;

use super::model::{
    ContainerRecord, NewContainer, Status, DEFAULT_CORES, DEFAULT_DISK_LIMIT, DEFAULT_RAM_LIMIT,
    IMAGE_PRESETS,
};
use super::port::RandomSource;

const MIN_RAM_LIMIT: f64 = 0.25;
const MIN_DISK_LIMIT: f64 = 1.0;
const RUNNING_RAM_FLOOR: f64 = 0.2;

/// Builds a stopped record from the caller's fields, or `None` when the name
/// is blank once trimmed.
pub fn new_record(
    fields: NewContainer,
    random: &mut (impl RandomSource + ?Sized),
    created_at: u64,
) -> Option<ContainerRecord> {
    let name = fields.name.trim();
    if name.is_empty() {
        return None;
    }
    let image = fields
        .image
        .map(|image| image.trim().to_string())
        .filter(|image| !image.is_empty())
        .unwrap_or_else(|| IMAGE_PRESETS[0].value.to_string());

    Some(ContainerRecord {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: trimmed(fields.description),
        image,
        status: Status::Stopped,
        cpu: 0.0,
        cores: positive(fields.cores)
            .map_or(DEFAULT_CORES, |cores| (cores.trunc() as u32).max(DEFAULT_CORES)),
        ram_limit: positive(fields.ram_limit)
            .map_or(DEFAULT_RAM_LIMIT, |limit| limit.max(MIN_RAM_LIMIT)),
        ram_used: 0.0,
        disk_limit: positive(fields.disk_limit)
            .map_or(DEFAULT_DISK_LIMIT, |limit| limit.max(MIN_DISK_LIMIT)),
        // existing image footprint
        disk_used: random.uniform(0.2, 0.8),
        project_files: fields
            .project_files
            .into_iter()
            .map(|file| file.trim().to_string())
            .filter(|file| !file.is_empty())
            .collect(),
        build_command: trimmed(fields.build_command),
        run_command: trimmed(fields.run_command),
        created_at,
    })
}

/// Prepends the new record, newest first.
pub fn create(
    containers: &[ContainerRecord],
    fields: NewContainer,
    random: &mut (impl RandomSource + ?Sized),
    created_at: u64,
) -> Vec<ContainerRecord> {
    match new_record(fields, random, created_at) {
        Some(record) => std::iter::once(record)
            .chain(containers.iter().cloned())
            .collect(),
        None => containers.to_vec(),
    }
}

pub fn run(
    containers: &[ContainerRecord],
    id: &str,
    random: &mut (impl RandomSource + ?Sized),
) -> Vec<ContainerRecord> {
    containers
        .iter()
        .map(|record| {
            if record.id != id {
                return record.clone();
            }
            ContainerRecord {
                status: Status::Running,
                cpu: random.uniform(5.0, 20.0),
                ram_used: record.ram_used.max(RUNNING_RAM_FLOOR),
                ..record.clone()
            }
        })
        .collect()
}

pub fn stop(containers: &[ContainerRecord], id: &str) -> Vec<ContainerRecord> {
    containers
        .iter()
        .map(|record| {
            if record.id != id {
                return record.clone();
            }
            ContainerRecord {
                status: Status::Stopped,
                cpu: 0.0,
                ..record.clone()
            }
        })
        .collect()
}

pub fn delete(containers: &[ContainerRecord], id: &str) -> Vec<ContainerRecord> {
    containers
        .iter()
        .filter(|record| record.id != id)
        .cloned()
        .collect()
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::ScriptedRandom;

    fn seeded(names: &[&str]) -> Vec<ContainerRecord> {
        let mut random = ScriptedRandom::new(vec![0.5]);
        names.iter().rev().fold(Vec::new(), |list, name| {
            create(&list, NewContainer::named(*name), &mut random, 0)
        })
    }

    #[test]
    fn create_fills_defaults() {
        let mut random = ScriptedRandom::new(vec![0.5]);
        let list = create(&[], NewContainer::named("api"), &mut random, 42);
        assert_eq!(list.len(), 1);
        let api = &list[0];
        assert_eq!(api.name, "api");
        assert_eq!(api.ram_limit, 1.0);
        assert_eq!(api.disk_limit, 10.0);
        assert_eq!(api.cores, 1);
        assert_eq!(api.status, Status::Stopped);
        assert_eq!(api.cpu, 0.0);
        assert_eq!(api.ram_used, 0.0);
        assert_eq!(api.image, "ubuntu:22.04");
        assert_eq!(api.created_at, 42);
        assert!((api.disk_used - 0.5).abs() < 1e-12);
    }

    #[test]
    fn create_seeds_disk_within_footprint_range() {
        let mut random = ScriptedRandom::new(vec![0.0, 0.999_999]);
        let list = create(&[], NewContainer::named("a"), &mut random, 0);
        let list = create(&list, NewContainer::named("b"), &mut random, 0);
        assert_eq!(list[1].disk_used, 0.2);
        assert!(list[0].disk_used < 0.8 && list[0].disk_used > 0.79);
    }

    #[test]
    fn create_with_blank_name_is_a_no_op() {
        let existing = seeded(&["web", "db"]);
        let mut random = ScriptedRandom::new(vec![0.5]);
        let list = create(&existing, NewContainer::named("  "), &mut random, 0);
        assert_eq!(list, existing);
    }

    #[test]
    fn create_prepends_and_trims() {
        let existing = seeded(&["web"]);
        let mut random = ScriptedRandom::new(vec![0.5]);
        let fields = NewContainer {
            name: "  worker ".to_string(),
            description: Some(" queue consumer ".to_string()),
            image: Some("python:3.11-slim".to_string()),
            cores: Some(4.0),
            ram_limit: Some(0.1),
            disk_limit: Some(f64::NAN),
            project_files: vec!["main.py".to_string(), " ".to_string()],
            build_command: Some(" pip install -r requirements.txt ".to_string()),
            run_command: None,
        };
        let list = create(&existing, fields, &mut random, 0);
        assert_eq!(list.len(), 2);
        let worker = &list[0];
        assert_eq!(worker.name, "worker");
        assert_eq!(worker.description, "queue consumer");
        assert_eq!(worker.cores, 4);
        assert_eq!(worker.ram_limit, 0.25);
        assert_eq!(worker.disk_limit, 10.0);
        assert_eq!(worker.project_files, vec!["main.py".to_string()]);
        assert_eq!(worker.build_command, "pip install -r requirements.txt");
        assert_eq!(worker.run_command, "");
        assert_eq!(list[1], existing[0]);
    }

    #[test]
    fn create_treats_bad_numbers_as_defaults() {
        let mut random = ScriptedRandom::new(vec![0.5]);
        let fields = NewContainer {
            cores: Some(-1.0),
            ram_limit: Some(-2.0),
            disk_limit: Some(0.0),
            ..NewContainer::named("api")
        };
        let list = create(&[], fields, &mut random, 0);
        assert_eq!(list[0].cores, 1);
        assert_eq!(list[0].ram_limit, 1.0);
        assert_eq!(list[0].disk_limit, 10.0);
    }

    #[test]
    fn create_truncates_fractional_cores() {
        let mut random = ScriptedRandom::new(vec![0.5]);
        let fractional = |name: &str, cores: f64| NewContainer {
            cores: Some(cores),
            ..NewContainer::named(name)
        };
        let list = create(&[], fractional("a", 2.5), &mut random, 0);
        let list = create(&list, fractional("b", 0.5), &mut random, 0);
        assert_eq!(list[1].cores, 2);
        assert_eq!(list[0].cores, 1);
    }

    #[test]
    fn run_seeds_cpu_and_memory_floor() {
        let list = seeded(&["web"]);
        let id = list[0].id.clone();
        let mut random = ScriptedRandom::new(vec![0.0]);
        let list = run(&list, &id, &mut random);
        assert_eq!(list[0].status, Status::Running);
        assert_eq!(list[0].cpu, 5.0);
        assert_eq!(list[0].ram_used, 0.2);
    }

    #[test]
    fn run_then_stop_resets_cpu() {
        let list = seeded(&["web", "db"]);
        let id = list[1].id.clone();
        let mut random = ScriptedRandom::new(vec![0.7]);
        let running = run(&list, &id, &mut random);
        assert!(running[1].cpu > 0.0);
        let stopped = stop(&running, &id);
        assert_eq!(stopped[1].cpu, 0.0);
        assert_eq!(stopped[1].status, Status::Stopped);
        assert_eq!(stopped[0], list[0]);
    }

    #[test]
    fn unknown_ids_leave_the_list_untouched() {
        let list = seeded(&["web", "db", "cache"]);
        let mut random = ScriptedRandom::new(vec![0.5]);
        assert_eq!(run(&list, "missing", &mut random), list);
        assert_eq!(stop(&list, "missing"), list);
        assert_eq!(delete(&list, "missing"), list);
    }

    #[test]
    fn delete_removes_only_the_match() {
        let list = seeded(&["web", "db", "cache"]);
        let remaining = delete(&list, &list[1].id);
        let names: Vec<&str> = remaining.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["web", "cache"]);
    }
}
