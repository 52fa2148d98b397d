//! Hyper-parameter configuration, optionally loaded from a TOML file
//! (§6 `<config-path>`).

use serde::Deserialize;

use crate::{err_at, error::Result};

/// Runtime configuration, with every field defaulted/auto-computed when
/// not supplied.
#[derive(Clone, Default)]
pub struct Config {
    pub bucket_size: Option<usize>,
    pub aggregate_size: usize,
    pub nf_weights_path: Option<String>,
    pub nf_batch_size: usize,
}

const DEFAULT_NF_BATCH_SIZE: usize = 4096;

#[derive(Clone, Default, Deserialize)]
pub struct TomlConfig {
    bucket_size: Option<usize>,
    aggregate_size: Option<usize>,
    nf_weights_path: Option<String>,
    nf_batch_size: Option<usize>,
}

impl From<TomlConfig> for Config {
    fn from(cfg: TomlConfig) -> Config {
        Config {
            bucket_size: cfg.bucket_size,
            aggregate_size: cfg.aggregate_size.unwrap_or(0),
            nf_weights_path: cfg.nf_weights_path,
            nf_batch_size: cfg.nf_batch_size.unwrap_or(DEFAULT_NF_BATCH_SIZE),
        }
    }
}

impl Config {
    pub fn load(path: &std::path::Path) -> Result<Config> {
        let text = err_at!(IOError, std::fs::read_to_string(path))?;
        let toml_cfg: TomlConfig = err_at!(InvalidFormat, toml::from_str(&text))?;
        Ok(toml_cfg.into())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
