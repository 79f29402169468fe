use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::resolve::SearchPath;

/// Startup settings taken from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub search_path: SearchPath,
    pub home: PathBuf,
    pub start_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let search_path = env::var_os("PATH")
            .map(|value| SearchPath::parse(&value))
            .unwrap_or_default();
        let home = env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map_or_else(|| PathBuf::from("/"), PathBuf::from);
        let start_dir = env::current_dir().context("cannot determine the starting directory")?;

        Ok(Self {
            search_path,
            home,
            start_dir,
        })
    }
}
