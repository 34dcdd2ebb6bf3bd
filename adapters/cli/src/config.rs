//! Command-line arguments layered over an optional TOML settings file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use scrollmap_core::{CellCoord, LevelId};
use scrollmap_system_pathfinding::PathfinderConfig;
use scrollmap_world::SessionConfig;
use serde::Deserialize;

/// Arguments accepted by the `scrollmap` binary.
#[derive(Debug, Default, Parser)]
#[command(name = "scrollmap", about = "Replays an input script against a Scrollmap session")]
pub struct Args {
    /// Directory containing `level<N>.json` files.
    #[arg(long, value_name = "DIR")]
    pub levels: Option<PathBuf>,
    /// TOML settings file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Input script to replay; stdin when omitted.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
    /// Level to start on.
    #[arg(long)]
    pub level: Option<u32>,
    /// Starting column.
    #[arg(long, requires = "start_y")]
    pub start_x: Option<u32>,
    /// Starting row.
    #[arg(long, requires = "start_x")]
    pub start_y: Option<u32>,
    /// Movement tick period in milliseconds.
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Node expansions per search slice.
    #[arg(long)]
    pub budget: Option<u32>,
    /// Allow diagonal steps in computed paths.
    #[arg(long)]
    pub diagonal: bool,
    /// Draw a frame after every movement tick.
    #[arg(long)]
    pub frames: bool,
}

/// Starting cell as written in the settings file.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StartSettings {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

/// Resolved session settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory containing `level<N>.json` files.
    pub levels: PathBuf,
    /// Level to start on.
    pub level: u32,
    /// Starting cell, if the player should be placed explicitly.
    pub start: Option<StartSettings>,
    /// Movement tick period in milliseconds.
    pub tick_ms: u64,
    /// Search slice period in milliseconds.
    pub slice_ms: u64,
    /// Node expansions per search slice.
    pub budget: u32,
    /// Allow diagonal steps in computed paths.
    pub diagonal: bool,
    /// Cell edge length used for scroll offsets.
    pub cell_size: f32,
    /// Draw a frame after every movement tick.
    pub frames: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            levels: PathBuf::from("levels"),
            level: 1,
            start: Some(StartSettings { x: 5, y: 4 }),
            tick_ms: 100,
            slice_ms: 20,
            budget: 64,
            diagonal: false,
            cell_size: 32.0,
            frames: false,
        }
    }
}

impl Settings {
    /// Parses settings from TOML, filling omitted keys with defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }

    /// Reads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Resolves the settings for the provided arguments.
    ///
    /// Defaults are overridden by the settings file, which is in turn
    /// overridden by explicit arguments.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(levels) = &args.levels {
            settings.levels = levels.clone();
        }
        if let Some(level) = args.level {
            settings.level = level;
        }
        if let (Some(x), Some(y)) = (args.start_x, args.start_y) {
            settings.start = Some(StartSettings { x, y });
        }
        if let Some(tick_ms) = args.tick_ms {
            settings.tick_ms = tick_ms;
        }
        if let Some(budget) = args.budget {
            settings.budget = budget;
        }
        settings.diagonal |= args.diagonal;
        settings.frames |= args.frames;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            bail!("tick_ms must be positive");
        }
        if self.slice_ms == 0 {
            bail!("slice_ms must be positive");
        }
        if self.budget == 0 {
            bail!("budget must be positive");
        }
        Ok(())
    }

    /// Level the session starts on.
    #[must_use]
    pub fn start_level(&self) -> LevelId {
        LevelId::new(self.level)
    }

    /// Cell the player starts on, if configured.
    #[must_use]
    pub fn start_cell(&self) -> Option<CellCoord> {
        self.start.map(|start| CellCoord::new(start.x, start.y))
    }

    /// Movement tick period.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Search slice period.
    #[must_use]
    pub fn slice_period(&self) -> Duration {
        Duration::from_millis(self.slice_ms)
    }

    /// World configuration derived from the settings.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            tick_period: self.tick_period(),
        }
    }

    /// Pathfinder configuration derived from the settings.
    #[must_use]
    pub fn pathfinder_config(&self) -> PathfinderConfig {
        PathfinderConfig {
            budget: self.budget,
            allow_diagonal: self.diagonal,
        }
    }
}
