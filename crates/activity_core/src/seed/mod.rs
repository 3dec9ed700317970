use crate::error::AppError;
use crate::model::{Activity, Employee, Equipment};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

mod mock;

pub const SEED_SCHEMA_VERSION: u32 = 1;
const SEED_ENV_VAR: &str = "ACTIVITYAPP_SEED_PATH";

/// Seed activities plus the directories used to resolve their references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    schema_version: u32,
    #[serde(flatten)]
    directory: Directory,
}

/// Seed file location: the env var wins over the configured path.
pub fn seed_path(configured: Option<&Path>) -> Option<PathBuf> {
    if let Ok(path) = std::env::var(SEED_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    configured.map(Path::to_path_buf)
}

pub fn builtin() -> Directory {
    mock::directory()
}

pub fn load_directory(path: Option<&Path>) -> Result<Directory, AppError> {
    match path {
        Some(path) => load_seed_file(path),
        None => {
            debug!("no seed file configured, using built-in data");
            Ok(builtin())
        }
    }
}

pub fn load_seed_file(path: &Path) -> Result<Directory, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let seed: SeedFile = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid seed in {}: {}", path.display(), err))
    })?;

    if !(1..=SEED_SCHEMA_VERSION).contains(&seed.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    let mut seen = HashSet::new();
    for activity in &seed.directory.activities {
        if !seen.insert(activity.id.as_str()) {
            return Err(AppError::invalid_data(format!(
                "duplicate activity id: {}",
                activity.id
            )));
        }
    }

    debug!(
        path = %path.display(),
        activities = seed.directory.activities.len(),
        employees = seed.directory.employees.len(),
        equipment = seed.directory.equipment.len(),
        "loaded seed file"
    );
    Ok(seed.directory)
}
