use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use logharbor_types::{FilterCriteria, LevelFilter};
use logharbor_view::DEFAULT_CAPACITY;

use crate::Args;

const DEFAULT_ENDPOINT: &str = "127.0.0.1:8082";
const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Optional settings read from a TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    capacity: Option<usize>,
    level: Option<String>,
    search: Option<String>,
    interval_ms: Option<u64>,
}

impl FileConfig {
    fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config file")
    }
}

/// Resolved runtime configuration: defaults, overridden by the config file,
/// overridden by CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub capacity: usize,
    pub criteria: FilterCriteria,
    pub interval: Duration,
}

impl Config {
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                FileConfig::parse(&text)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    fn resolve(args: &Args, file: FileConfig) -> Result<Self> {
        let endpoint = args
            .endpoint
            .clone()
            .or(file.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let capacity = args.capacity.or(file.capacity).unwrap_or(DEFAULT_CAPACITY);

        let level = match args.level.as_deref().or(file.level.as_deref()) {
            Some(selector) => selector
                .parse::<LevelFilter>()
                .context("invalid --level value")?,
            None => LevelFilter::All,
        };

        let search_term = args
            .search
            .clone()
            .or(file.search)
            .unwrap_or_default();

        let interval = Duration::from_millis(
            args.interval
                .or(file.interval_ms)
                .unwrap_or(DEFAULT_INTERVAL_MS),
        );

        Ok(Self {
            endpoint,
            capacity,
            criteria: FilterCriteria { search_term, level },
            interval,
        })
    }
}
