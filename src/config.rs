//! Conversion settings.
//!
//! Settings come from an optional YAML file found at the root of the input
//! folder. Every field has a default, so the file only needs what differs.

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::docstring::Tags;

/// Config file names searched for in the input folder, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["xvert.yaml", ".xvert.yaml"];

/// Settings for discovery and conversion.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Source file extension, without the dot.
    pub extension: String,
    /// Appended to an input path to form its output path. Files already
    /// ending with it are never picked up.
    pub converted_suffix: String,
    /// Tag starting a parameter entry (also the discovery marker).
    pub param_tag: String,
    /// Tag starting a return entry.
    pub return_tag: String,
    /// Do not descend into directories whose name starts with a dot.
    pub skip_hidden: bool,
    /// Glob patterns for paths to leave alone (e.g., "**/vendor/**")
    pub excluded_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            converted_suffix: "_xverted.py".to_string(),
            param_tag: ":param".to_string(),
            return_tag: ":return".to_string(),
            skip_hidden: true,
            excluded_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Find a config file directly inside `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the config for an input folder, falling back to defaults.
    pub fn load_for(dir: &Path) -> anyhow::Result<Self> {
        let config = match Self::discover(dir) {
            Some(path) => {
                tracing::info!(path = %path.display(), "using config file");
                Self::parse_file(&path)?
            }
            None => Self::default(),
        };
        validate(&config)?;
        Ok(config)
    }

    /// Tags handed to the scanner.
    pub fn tags(&self) -> Tags {
        Tags {
            param: self.param_tag.clone(),
            ret: self.return_tag.clone(),
        }
    }

    /// Compile `excluded_paths` into one matcher.
    pub fn excluded_set(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Whether a file name is a candidate source file.
    pub fn is_source_name(&self, name: &str) -> bool {
        name.ends_with(&format!(".{}", self.extension)) && !name.ends_with(&self.converted_suffix)
    }

    /// Output path for a converted input file.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let mut s = input.as_os_str().to_owned();
        s.push(&self.converted_suffix);
        PathBuf::from(s)
    }
}

/// Validate a config.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.extension.trim().is_empty() {
        anyhow::bail!("extension must not be empty");
    }
    if config.converted_suffix.trim().is_empty() {
        anyhow::bail!("converted_suffix must not be empty");
    }
    if config.param_tag.trim().is_empty() || config.return_tag.trim().is_empty() {
        anyhow::bail!("param_tag and return_tag must not be empty");
    }
    if config.param_tag == config.return_tag {
        anyhow::bail!("param_tag and return_tag must differ");
    }

    config.excluded_set()?;

    Ok(())
}
