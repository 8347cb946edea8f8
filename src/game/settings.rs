use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use super::board_generator::{
    GenerateRequest, ShuffleMode, DEFAULT_HEIGHT, DEFAULT_MAX_ATTEMPTS, DEFAULT_WIDTH,
};
use super::rng::Seed;
use crate::model::LayoutCode;
use crate::solver::{SearchLimits, DEFAULT_MAX_PATHS};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default = "default_width")]
    pub width: usize,

    #[serde(default = "default_height")]
    pub height: usize,

    #[serde(default)]
    pub mode: ShuffleMode,

    #[serde(default)]
    pub exclude_singleton_pairs: bool,

    #[serde(default)]
    pub seed: Option<Seed>,

    #[serde(default)]
    pub layout_code: Option<LayoutCode>,

    #[serde(default = "default_max_attempts")]
    pub max_generation_attempts: u32,

    #[serde(default = "default_max_search_paths")]
    pub max_search_paths: usize,
}

// Helper functions for default values
fn default_version() -> u32 {
    1
}
fn default_width() -> usize {
    DEFAULT_WIDTH
}
fn default_height() -> usize {
    DEFAULT_HEIGHT
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_max_search_paths() -> usize {
    DEFAULT_MAX_PATHS
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            version: 1,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mode: ShuffleMode::default(),
            exclude_singleton_pairs: false,
            seed: None,
            layout_code: None,
            max_generation_attempts: DEFAULT_MAX_ATTEMPTS,
            max_search_paths: DEFAULT_MAX_PATHS,
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings = serde_json::from_str::<EngineSettings>(json)?;
        settings.migrate();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Defaults overridden by `SEED`, `WIDTH`, `HEIGHT`, `LAYOUT`, `TRUE_SHUFFLE`
    /// and `NO_SINGLE_PAIRS`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = EngineSettings::default();
        if let Some(seed) = parsed_var::<Seed>(&var, "SEED") {
            settings.seed = Some(seed);
        }
        if let Some(width) = parsed_var::<usize>(&var, "WIDTH") {
            settings.width = width;
        }
        if let Some(height) = parsed_var::<usize>(&var, "HEIGHT") {
            settings.height = height;
        }
        if let Some(code) = parsed_var::<LayoutCode>(&var, "LAYOUT") {
            settings.layout_code = Some(code);
        }
        if flag_var(&var, "TRUE_SHUFFLE") {
            settings.mode = ShuffleMode::Simple;
        }
        if flag_var(&var, "NO_SINGLE_PAIRS") {
            settings.exclude_singleton_pairs = true;
        }
        settings
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = 1;
            }
            _ => (),
        }
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_paths: self.max_search_paths,
        }
    }

    pub fn request(&self) -> GenerateRequest {
        GenerateRequest {
            seed: self.seed,
            width: self.width,
            height: self.height,
            mode: self.mode,
            exclude_singleton_pairs: self.exclude_singleton_pairs,
            layout: self.layout_code.clone(),
            max_attempts: self.max_generation_attempts,
            limits: self.search_limits(),
        }
    }
}

fn parsed_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = var(name)?;
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(target: "settings", "Ignoring {}={:?}: {}", name, value, err);
            None
        }
    }
}

fn flag_var(var: &impl Fn(&str) -> Option<String>, name: &str) -> bool {
    var(name).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
