//! Layered runtime configuration.
//!
//! Settings come from `distill.toml` in the project directory, overlaid
//! by environment variables (`DISTILL_BASE_URL`, `DISTILL_MODEL`) and
//! finally by CLI flags. The resolved [`Config`] is plain data passed by
//! reference into the pipeline; there is no process-global state.
//!
//! # Configuration file format
//!
//! ```toml
//! [server]
//! base_url = "http://127.0.0.1:11434"
//! model = "gemma3:12b"
//!
//! [discovery]
//! folders = ["docs", "research/papers"]
//! output_dir = "summaries"
//!
//! [hosted]
//! api_base = "https://docs.googleapis.com/v1"
//! token_url = "https://oauth2.googleapis.com/token"
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the project directory.
pub const CONFIG_FILE: &str = "distill.toml";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MODEL: &str = "gemma3:12b";
const DEFAULT_OUTPUT_DIR: &str = "summaries";
const DEFAULT_HOSTED_API_BASE: &str = "https://docs.googleapis.com/v1";
const DEFAULT_HOSTED_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// On-disk shape of `distill.toml`. All fields optional; unset values
/// fall through to environment variables and built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub discovery: DiscoverySection,
    pub hosted: HostedSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Folders (relative to the project dir) to restrict discovery to.
    /// Empty means the whole project dir.
    pub folders: Vec<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedSection {
    pub api_base: Option<String>,
    pub token_url: Option<String>,
    pub credentials_file: Option<String>,
    pub token_file: Option<String>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub base_url: String,
    pub model: String,
    pub folders: Vec<String>,
    pub output_dir: PathBuf,
    pub hosted_api_base: String,
    pub hosted_token_url: String,
    pub credentials_file: PathBuf,
    pub token_file: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Resolve configuration for `project_dir`, layering
    /// file → environment → CLI overrides.
    pub fn load(
        project_dir: PathBuf,
        config_path: Option<&Path>,
        base_url_override: Option<&str>,
        model_override: Option<&str>,
        verbose: bool,
    ) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;

        let file = Self::read_file(&project_dir, config_path)?;

        let base_url = base_url_override
            .map(String::from)
            .or_else(|| std::env::var("DISTILL_BASE_URL").ok())
            .or(file.server.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = model_override
            .map(String::from)
            .or_else(|| std::env::var("DISTILL_MODEL").ok())
            .or(file.server.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let output_dir = project_dir.join(
            file.discovery
                .output_dir
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_DIR),
        );

        let credentials_file = project_dir.join(
            file.hosted
                .credentials_file
                .as_deref()
                .unwrap_or("credentials.json"),
        );
        let token_file =
            project_dir.join(file.hosted.token_file.as_deref().unwrap_or("token.json"));

        Ok(Self {
            project_dir,
            base_url,
            model,
            folders: file.discovery.folders,
            output_dir,
            hosted_api_base: file
                .hosted
                .api_base
                .unwrap_or_else(|| DEFAULT_HOSTED_API_BASE.to_string()),
            hosted_token_url: file
                .hosted
                .token_url
                .unwrap_or_else(|| DEFAULT_HOSTED_TOKEN_URL.to_string()),
            credentials_file,
            token_file,
            verbose,
        })
    }

    fn read_file(project_dir: &Path, config_path: Option<&Path>) -> Result<FileConfig> {
        let path = match config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    bail!("Config file not found: {}", explicit.display());
                }
                explicit.to_path_buf()
            }
            None => {
                let default = project_dir.join(CONFIG_FILE);
                if !default.exists() {
                    return Ok(FileConfig::default());
                }
                default
            }
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Write a default `distill.toml` into `project_dir`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn init_file(project_dir: &Path) -> Result<PathBuf> {
        let path = project_dir.join(CONFIG_FILE);
        if path.exists() {
            bail!("{} already exists", path.display());
        }

        let template = format!(
            "[server]\n\
             base_url = \"{DEFAULT_BASE_URL}\"\n\
             model = \"{DEFAULT_MODEL}\"\n\
             \n\
             [discovery]\n\
             # Folders to scan, relative to the project dir. Empty = everything.\n\
             folders = []\n\
             output_dir = \"{DEFAULT_OUTPUT_DIR}\"\n"
        );
        std::fs::write(&path, template)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
