use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

pub const FASTFLAGS_FILENAME: &str = "fastFlags.json";

/// One FastFlag value. Untagged so the overlay file reads and writes as
/// plain JSON scalars.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FlagValue {
    /// Detect the scalar type of raw editor input. Integer parsing runs
    /// before float so "10" stays an integer.
    pub fn infer(raw: &str) -> FlagValue {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            return FlagValue::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return FlagValue::Bool(false);
        }
        let looks_float = raw.contains('.') || raw.contains(|c| c == 'e' || c == 'E');
        if !looks_float {
            if let Ok(value) = raw.parse::<i64>() {
                return FlagValue::Int(value);
            }
        }
        match raw.parse::<f64>() {
            // "inf" and "nan" have no JSON form, keep them as text
            Ok(value) if value.is_finite() => FlagValue::Float(value),
            _ => FlagValue::Str(raw.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FlagValue::Bool(_) => "bool",
            FlagValue::Int(_) => "int",
            FlagValue::Float(_) => "float",
            FlagValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(value) => write!(f, "{}", value),
            FlagValue::Int(value) => write!(f, "{}", value),
            FlagValue::Float(value) => write!(f, "{}", value),
            FlagValue::Str(value) => write!(f, "{}", value),
        }
    }
}

/// The overlay document. Keys are unique; insertion order is kept so
/// listings show flags in the order they were added.
pub type FlagSet = IndexMap<String, FlagValue>;

/// Right-biased merge: incoming keys overwrite matching keys in `base`,
/// everything else in `base` stays.
pub fn merge(base: &mut FlagSet, incoming: FlagSet) {
    base.extend(incoming);
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("FastFlags file {0} does not exist")]
    Missing(PathBuf),
    #[error("Failed to read FastFlags file {0}: {1}")]
    Read(PathBuf, io::Error),
    #[error("FastFlags file {0} is not a JSON object of scalars: {1}")]
    Parse(PathBuf, serde_json::Error),
    #[error("Failed to write FastFlags file {0}: {1}")]
    Write(PathBuf, io::Error),
}

/// The launcher-side FastFlag overlay file.
pub struct FlagStore {
    path: PathBuf,
}

impl FlagStore {
    pub fn new(path: impl Into<PathBuf>) -> FlagStore {
        FlagStore { path: path.into() }
    }

    /// Store next to the launcher, in the working directory.
    pub fn at_default_location() -> FlagStore {
        FlagStore::new(FASTFLAGS_FILENAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read, for callers that need to know why loading failed.
    pub fn read(&self) -> Result<FlagSet, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Missing(self.path.clone()));
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|err| StoreError::Read(self.path.clone(), err))?;
        serde_json::from_str(&content).map_err(|err| StoreError::Parse(self.path.clone(), err))
    }

    /// Degrading load: a missing store is created empty, an unreadable or
    /// corrupt one is reported and treated as empty.
    pub fn load(&self) -> FlagSet {
        match self.read() {
            Ok(flags) => flags,
            Err(StoreError::Missing(_)) => {
                let flags = FlagSet::new();
                if let Err(err) = self.save(&flags) {
                    warn!("{}", err);
                }
                flags
            }
            Err(err) => {
                warn!("{}", err);
                FlagSet::new()
            }
        }
    }

    /// Write the whole document with two-space indentation so the file
    /// stays hand-editable.
    pub fn save(&self, flags: &FlagSet) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(flags).expect("Failed to serialize FastFlags");
        fs::write(&self.path, content).map_err(|err| StoreError::Write(self.path.clone(), err))
    }
}
