//! Configuration Management
//!
//! Handles persistent configuration storage for apiprofile.

use crate::profile::DEFAULT_PROFILE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the profile to use
pub const PROFILE_ENV: &str = "AZURE_API_PROFILE";

/// How command output is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default)]
    pub default_profile: Option<String>,
    /// Preferred output format
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("apiprofile").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, defaulting on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective profile (CLI > env > config > built-in default)
    pub fn effective_profile(&self, cli: Option<&str>) -> String {
        let env = std::env::var(PROFILE_ENV).ok().filter(|s| !s.is_empty());
        self.resolve_profile(cli, env)
    }

    fn resolve_profile(&self, cli: Option<&str>, env: Option<String>) -> String {
        cli.map(str::to_string)
            .or(env)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    /// Get effective output format (CLI > config > text)
    pub fn effective_output(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.output).unwrap_or_default()
    }

    /// Set default profile and save
    pub fn set_profile(&mut self, profile: &str) -> Result<()> {
        self.default_profile = Some(profile.to_string());
        self.save()
    }
}
