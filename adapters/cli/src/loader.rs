//! Level Loader collaborators.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use scrollmap_core::{LevelData, LevelId};

/// Source of level documents.
///
/// Loaders only fetch and parse; structural validation happens in the world
/// when the data is applied.
pub trait LevelLoader {
    /// Fetches the level with the provided identifier.
    fn load(&mut self, level: LevelId) -> Result<LevelData>;
}

/// Reads `level<N>.json` files from a directory.
#[derive(Clone, Debug)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Creates a loader rooted at the provided directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path the loader reads for the provided level.
    #[must_use]
    pub fn path_for(&self, level: LevelId) -> PathBuf {
        self.root.join(format!("level{level}.json"))
    }
}

impl LevelLoader for DirectoryLoader {
    fn load(&mut self, level: LevelId) -> Result<LevelData> {
        let path = self.path_for(level);
        parse_level_file(&path)
    }
}

/// Parses a level document from disk.
pub fn parse_level_file(path: &Path) -> Result<LevelData> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse level json at {}", path.display()))
}

/// Serves levels held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    levels: HashMap<LevelId, LevelData>,
    requests: Vec<LevelId>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a level, replacing any previous data for the identifier.
    #[must_use]
    pub fn with_level(mut self, level: LevelId, data: LevelData) -> Self {
        let _ = self.levels.insert(level, data);
        self
    }

    /// Levels requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> &[LevelId] {
        &self.requests
    }
}

impl LevelLoader for MemoryLoader {
    fn load(&mut self, level: LevelId) -> Result<LevelData> {
        self.requests.push(level);
        self.levels
            .get(&level)
            .cloned()
            .with_context(|| format!("level {level} does not exist"))
    }
}
