use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    comments::{CommandGenerator, CommentBackend, EmptyGenerator, TemplateGenerator},
    pipeline::{DEFAULT_CONCURRENCY, DEFAULT_MAX_LINE_WIDTH, DEFAULT_TIMEOUT_MS, PipelineOptions},
    registry::{Registry, RegistryEntry},
    rewrite::{Layout, WrapperSyntax},
};

pub const CONFIG_FILE_NAME: &str = ".locwraprc.json";

/// Where comments come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommentSource {
    /// Built from the context tag and the file name.
    #[default]
    Template,
    /// Always an empty comment.
    Empty,
    /// Ask the program configured in `commentCommand`.
    Command,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    #[serde(default)]
    pub comment_source: CommentSource,
    #[serde(default)]
    pub comment_command: Vec<String>,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default = "default_max_line_width")]
    pub max_line_width: usize,
    #[serde(default)]
    pub wrapper: WrapperSyntax,
    /// Extra registry entries, tried before the built-in SwiftUI table.
    #[serde(default)]
    pub constructs: Vec<RegistryEntry>,
    /// Write rewritten files under this directory instead of in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

fn default_includes() -> Vec<String> {
    vec![".".to_string()]
}

fn default_ignores() -> Vec<String> {
    ["**/Pods/**", "**/.build/**", "**/DerivedData/**"]
        .map(String::from)
        .to_vec()
}

fn default_extensions() -> Vec<String> {
    vec!["swift".to_string()]
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_line_width() -> usize {
    DEFAULT_MAX_LINE_WIDTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: default_ignores(),
            extensions: default_extensions(),
            ignore_texts: Vec::new(),
            comment_source: CommentSource::default(),
            comment_command: Vec::new(),
            concurrency: default_concurrency(),
            timeout_ms: default_timeout_ms(),
            layout: Layout::default(),
            max_line_width: default_max_line_width(),
            wrapper: WrapperSyntax::default(),
            constructs: Vec::new(),
            output: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns, a zero concurrency, or a
    /// `command` comment source without a command.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.concurrency == 0 {
            bail!("'concurrency' must be at least 1");
        }
        if self.comment_source == CommentSource::Command && self.comment_command.is_empty() {
            bail!("'commentSource' is \"command\" but 'commentCommand' is empty");
        }
        if let Some(output) = &self.output
            && Path::new(output).exists()
            && !Path::new(output).is_dir()
        {
            bail!("'output' must be a directory: \"{}\"", output);
        }

        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            registry: Registry::with_extra(&self.constructs),
            wrapper: self.wrapper.clone(),
            layout: self.layout,
            max_line_width: self.max_line_width,
            ignore_texts: self.ignore_texts.iter().cloned().collect::<HashSet<_>>(),
            concurrency: self.concurrency,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    pub fn comment_backend(&self) -> Result<CommentBackend> {
        Ok(match self.comment_source {
            CommentSource::Template => TemplateGenerator.into(),
            CommentSource::Empty => EmptyGenerator.into(),
            CommentSource::Command => CommandGenerator::new(&self.comment_command)
                .context("'commentCommand' is empty")?
                .into(),
        })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
