use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Driver cadence.
    pub tick_ms: u64,
    pub enable_color: bool,
    /// Fixed seed for the mess roller; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            enable_color: true,
            seed: None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "yurupet", about = "A tiny virtual pet for your terminal")]
pub struct Args {
    /// save file location (defaults to the platform data dir)
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// milliseconds between simulation cycles
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// seed for mess placement
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub no_color: bool,

    /// log file location
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ms) = self.tick_ms {
            settings.tick_ms = ms;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.no_color {
            settings.enable_color = false;
        }
    }
}

pub struct Paths {
    pub save_path: PathBuf,
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "yurupet", "Yurupet")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        save_path: dir.join("save.json"),
        settings_path: dir.join("settings.json"),
        log_path: dir.join("yurupet.log"),
    })
}

pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

/// Replace `to` with `from` in one step. `to` is untouched if the rename fails.
pub fn atomic_rename(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::rename(from, to)
}
