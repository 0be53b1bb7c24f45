use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::flags::FlagSet;
use crate::install::ResolvedTarget;

#[derive(thiserror::Error, Debug)]
pub enum ApplyError {
    #[error("Failed to create settings directory {0}: {1}")]
    CreateDir(PathBuf, io::Error),
    #[error("Failed to write settings file {0}: {1}")]
    WriteSettings(PathBuf, io::Error),
}

pub struct TargetOutcome {
    pub target: ResolvedTarget,
    pub result: Result<(), ApplyError>,
}

pub struct ApplyReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl ApplyReport {
    /// The apply counts as successful when at least one target took the
    /// overlay; stale version folders must not block the live one.
    pub fn any_succeeded(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.result.is_ok())
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

fn backup_path(settings_path: &Path) -> PathBuf {
    let mut backup = settings_path.as_os_str().to_os_string();
    backup.push(".bak");
    PathBuf::from(backup)
}

fn write_target(flags_json: &str, target: &ResolvedTarget) -> Result<(), ApplyError> {
    fs::create_dir_all(&target.settings_dir)
        .map_err(|err| ApplyError::CreateDir(target.settings_dir.clone(), err))?;

    if target.settings_path.exists() {
        // losing the backup must not block the overlay itself
        if let Err(err) = fs::rename(&target.settings_path, backup_path(&target.settings_path)) {
            debug!("Could not back up {:?}: {}", target.settings_path, err);
        }
    }

    fs::write(&target.settings_path, flags_json)
        .map_err(|err| ApplyError::WriteSettings(target.settings_path.clone(), err))
}

/// Write the overlay as the entire settings file of every target. Targets
/// are independent; one failing never stops the rest.
pub fn apply_flags(flags: &FlagSet, targets: &[ResolvedTarget]) -> ApplyReport {
    let flags_json = serde_json::to_string_pretty(flags).expect("Failed to serialize FastFlags");

    let outcomes = targets
        .iter()
        .map(|target| TargetOutcome {
            target: target.clone(),
            result: write_target(&flags_json, target),
        })
        .collect();

    ApplyReport { outcomes }
}
