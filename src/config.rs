use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::search::alphabeta::SearchParams;

/// Engine settings shared by the binaries. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hash_mb: usize,
    /// 0 means one worker per core.
    pub threads: usize,
    pub depth: u32,
    pub movetime_ms: Option<u64>,
    pub aspiration_window_cp: i32,
    pub use_aspiration: bool,
    pub use_nullmove: bool,
    pub use_lmr: bool,
    pub use_killers: bool,
    pub use_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let p = SearchParams::default();
        Self {
            hash_mb: 64,
            threads: p.threads,
            depth: p.depth,
            movetime_ms: None,
            aspiration_window_cp: p.aspiration_window_cp,
            use_aspiration: p.use_aspiration,
            use_nullmove: p.use_nullmove,
            use_lmr: p.use_lmr,
            use_killers: p.use_killers,
            use_history: p.use_history,
        }
    }
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            depth: self.depth,
            threads: self.threads,
            use_aspiration: self.use_aspiration,
            aspiration_window_cp: self.aspiration_window_cp,
            use_nullmove: self.use_nullmove,
            use_lmr: self.use_lmr,
            use_killers: self.use_killers,
            use_history: self.use_history,
            movetime: self.movetime_ms.map(Duration::from_millis),
        }
    }
}

impl From<&EngineConfig> for SearchParams {
    fn from(c: &EngineConfig) -> Self { c.search_params() }
}
