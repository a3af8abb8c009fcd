//! Configuration for tree generation and batch runs.
//!
//! Load order: `.gast/config.toml` → environment variables → defaults.
//! Command-line flags are applied on top by the binary.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How much native detail survives normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Native kind names, 1:1 structure.
    Verbatim,
    /// Canonical names, operator identity kept, light grouping.
    #[default]
    Fine,
    /// Canonical names, generic operators, placeholder conditions.
    Coarse,
}

impl Granularity {
    pub const ALL: [Self; 3] = [Self::Verbatim, Self::Fine, Self::Coarse];

    pub fn name(self) -> &'static str {
        match self {
            Self::Verbatim => "verbatim",
            Self::Fine => "fine",
            Self::Coarse => "coarse",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbatim" | "raw" => Ok(Self::Verbatim),
            "fine" => Ok(Self::Fine),
            "coarse" => Ok(Self::Coarse),
            other => Err(format!(
                "unknown granularity '{other}' (expected verbatim, fine or coarse)"
            )),
        }
    }
}

/// Top-level gast configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GastConfig {
    pub generate: GenerateConfig,
    pub batch: BatchConfig,
}

/// Per-file generation options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub granularity: Granularity,
    /// Run the language-specific simplification pass before normalizing.
    pub normalize: bool,
    /// Advisory lower bound on table size. Logged, never enforced.
    pub min_nodes: Option<usize>,
    /// Advisory upper bound on table size. Logged, never enforced.
    pub max_nodes: Option<usize>,
}

/// Worker pool and writer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads. 0 picks the available parallelism.
    pub workers: usize,
    /// Capacity of the bounded result channel.
    pub channel_capacity: usize,
    /// Log a progress line every N written results.
    pub progress_every: usize,
    /// Worker thread stack size in MiB. Deeply nested sources recurse deeply.
    pub stack_size_mb: usize,
    /// Show a terminal progress bar.
    pub progress_bar: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            channel_capacity: 100,
            progress_every: 1000,
            stack_size_mb: 32,
            progress_bar: false,
        }
    }
}

impl BatchConfig {
    /// Resolved worker count.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        }
    }
}

impl GenerateConfig {
    /// True when `len` falls inside the advisory node bounds.
    pub fn within_bounds(&self, len: usize) -> bool {
        self.min_nodes.is_none_or(|min| len >= min) && self.max_nodes.is_none_or(|max| len <= max)
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

fn env_override_opt<T: FromStr>(var: &str, target: &mut Option<T>) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = Some(n);
    }
}

impl GastConfig {
    /// Load config from `.gast/config.toml` under `root`, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(".gast").join("config.toml");

        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("GAST_GRANULARITY", &mut config.generate.granularity);
        env_override("GAST_NORMALIZE", &mut config.generate.normalize);
        env_override_opt("GAST_MIN_NODES", &mut config.generate.min_nodes);
        env_override_opt("GAST_MAX_NODES", &mut config.generate.max_nodes);
        env_override("GAST_WORKERS", &mut config.batch.workers);
        env_override("GAST_CHANNEL_CAPACITY", &mut config.batch.channel_capacity);
        env_override("GAST_PROGRESS_EVERY", &mut config.batch.progress_every);
        env_override("GAST_STACK_SIZE_MB", &mut config.batch.stack_size_mb);

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.generate.min_nodes, self.generate.max_nodes)
            && min > max
        {
            bail!("min_nodes ({min}) is greater than max_nodes ({max})");
        }
        if self.batch.channel_capacity == 0 {
            bail!("batch.channel_capacity must be at least 1");
        }
        if self.batch.progress_every == 0 {
            bail!("batch.progress_every must be at least 1");
        }
        if self.batch.stack_size_mb == 0 {
            bail!("batch.stack_size_mb must be at least 1");
        }
        Ok(())
    }
}
