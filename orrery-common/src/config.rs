//! Configuration loading and resolution
//!
//! Each recognized option resolves with the priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Recognized options: upstream base URL, upstream page size, listening port.
//! No other options are recognized.

use crate::{Error, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default upstream registry base URL
pub const DEFAULT_UPSTREAM_BASE: &str = "https://swapi.dev/api";

/// Default upstream page size (fixed by the upstream API, not discovered)
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Command-line arguments (environment variables act as fallbacks, per clap)
#[derive(Parser, Debug, Default)]
#[command(name = "orrery-gw", about = "Registry aggregation gateway")]
pub struct Args {
    /// Upstream registry base URL
    #[arg(long, env = "ORRERY_UPSTREAM_BASE")]
    pub upstream_base: Option<String>,

    /// Upstream page size (items per upstream page)
    #[arg(long, env = "ORRERY_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Listening port
    #[arg(long, env = "ORRERY_PORT")]
    pub port: Option<u16>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// TOML config file contents (all keys optional)
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    upstream_base: Option<String>,
    page_size: Option<u32>,
    port: Option<u16>,
}

/// Resolved gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_base: String,
    pub page_size: u32,
    pub port: u16,
}

impl Config {
    /// Resolve configuration from arguments, config file, and defaults
    pub fn resolve(args: &Args) -> Result<Config> {
        let file = match &args.config {
            Some(path) => load_config_file(path)?,
            None => FileConfig::default(),
        };

        let upstream_base = args
            .upstream_base
            .clone()
            .or(file.upstream_base)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE.to_string());

        let page_size = args.page_size.or(file.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }

        let port = args.port.or(file.port).unwrap_or(DEFAULT_PORT);

        Ok(Config {
            // Trailing slash would double up when joining resource paths
            upstream_base: upstream_base.trim_end_matches('/').to_string(),
            page_size,
            port,
        })
    }
}

/// Load and parse a TOML config file
fn load_config_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read config file {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Cannot parse config file {}: {}", path.display(), e)))
}
