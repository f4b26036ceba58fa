use crate::config::atomic_rename;
use crate::error::StorageError;
use crate::model::{Need, Stats};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// On-disk shape: `{"stats": {...}}`. Every field is optional on read so a
/// partial record overlays the defaults; unknown keys are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(default)]
    pub stats: StatsRecord,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunger: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tick: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_sec: Option<f64>,
}

impl From<&Stats> for StatsRecord {
    fn from(s: &Stats) -> Self {
        Self {
            hunger: Some(f64::from(s.hunger())),
            fun: Some(f64::from(s.fun())),
            clean: Some(f64::from(s.clean())),
            last_tick: Some(s.last_decay_at),
            lifetime_sec: Some(s.lifetime_secs),
        }
    }
}

impl StatsRecord {
    /// Copy present fields onto `stats`; needs still pass through the clamp.
    pub fn overlay(&self, stats: &mut Stats) {
        let needs = [
            (Need::Hunger, self.hunger),
            (Need::Fun, self.fun),
            (Need::Clean, self.clean),
        ];
        for (need, value) in needs {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                stats.clamp_and_set(need, v.round() as i32);
            }
        }
        if let Some(t) = self.last_tick.filter(|v| v.is_finite()) {
            stats.last_decay_at = t;
        }
        if let Some(l) = self.lifetime_sec.filter(|v| v.is_finite() && *v >= 0.0) {
            stats.lifetime_secs = l;
        }
    }
}

/// Derived struct deserializers also take sequences and fill fields by
/// position, so both levels are checked to be objects first.
fn parse_save(text: &str) -> Result<SaveFile, StorageError> {
    let value: Value = serde_json::from_str(text)?;
    let root = value.as_object().ok_or(StorageError::Shape("save root"))?;
    if root.get("stats").is_some_and(|s| !s.is_object()) {
        return Err(StorageError::Shape("stats"));
    }
    Ok(serde_json::from_value(value)?)
}

/// Durable home for the pet record.
pub trait SnapshotStore {
    fn save(&self, stats: &Stats) -> Result<(), StorageError>;
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SaveFile>, StorageError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, stats: &Stats) -> Result<(), StorageError> {
        let save = SaveFile {
            stats: StatsRecord::from(stats),
        };
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&save)?;
        fs::write(&tmp, data)?;
        atomic_rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveFile>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)?;
        parse_save(&s).map(Some)
    }
}

/// Keeps the serialized text in memory; handy for tests and headless runs.
#[derive(Default)]
pub struct MemoryStore {
    text: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(Some(text.into())),
        }
    }

    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, stats: &Stats) -> Result<(), StorageError> {
        let save = SaveFile {
            stats: StatsRecord::from(stats),
        };
        *self.text.borrow_mut() = Some(serde_json::to_string(&save)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveFile>, StorageError> {
        match self.text.borrow().as_deref() {
            None => Ok(None),
            Some(s) => parse_save(s).map(Some),
        }
    }
}

/// Defaults overlaid with whatever the store holds. Missing or unreadable
/// records leave the defaults untouched.
pub fn load_or_default(store: &dyn SnapshotStore, defaults: Stats) -> Stats {
    match store.load() {
        Ok(Some(save)) => {
            let mut stats = defaults;
            save.stats.overlay(&mut stats);
            info!(
                hunger = stats.hunger(),
                fun = stats.fun(),
                clean = stats.clean(),
                "save loaded"
            );
            stats
        }
        Ok(None) => {
            info!("no save found, starting fresh");
            defaults
        }
        Err(err) => {
            warn!(%err, "ignoring unreadable save");
            defaults
        }
    }
}

/// One-shot save. Failures are logged and dropped; memory stays authoritative.
pub fn persist(store: &dyn SnapshotStore, stats: &Stats) {
    if let Err(err) = store.save(stats) {
        warn!(%err, "save failed");
    }
}
