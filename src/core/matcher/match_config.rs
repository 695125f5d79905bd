use std::path::Path;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::constants::{DEFAULT_MATCH_LIMIT, MATCH_CONFIG_FILE};
use crate::common::errors::{ConfigError, FileOperationError};
use crate::common::file_operations::{atomic_save_json, read_json};

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Default, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Top `limit` documents by weight, pruned with `w_min`.
    #[default]
    #[serde(rename = "ranked")]
    Ranked,

    /// Every matching docid, no weights.
    #[serde(rename = "boolean")]
    Boolean,
}

#[derive(Serialize, Deserialize, TypedBuilder, Debug, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub struct MatchConfig {
    #[serde(default)]
    #[builder(default)]
    pub mode: MatchMode,

    /// Hits to return, `0` means unlimited in boolean mode.
    #[serde(default = "default_limit")]
    #[builder(default = DEFAULT_MATCH_LIMIT)]
    pub limit: usize,

    /// Raise `w_min` to the current top threshold and stop once the tree
    /// can't beat it.
    #[serde(default = "default_early_termination")]
    #[builder(default = true)]
    pub early_termination: bool,
}

fn default_limit() -> usize {
    DEFAULT_MATCH_LIMIT
}

fn default_early_termination() -> bool {
    true
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig::builder().build()
    }
}

impl MatchConfig {
    pub fn ranked(limit: usize) -> Self {
        MatchConfig::builder().limit(limit).build()
    }

    pub fn boolean(limit: usize) -> Self {
        MatchConfig::builder().mode(MatchMode::Boolean).limit(limit).build()
    }

    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let file_path = config_dir.join(MATCH_CONFIG_FILE);
        let config: MatchConfig = read_json(&file_path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let file_path = config_dir.join(MATCH_CONFIG_FILE);
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir).map_err(FileOperationError::IoError)?;
        }
        Ok(atomic_save_json(&file_path, self)?)
    }
}

impl Validate for MatchConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.mode == MatchMode::Ranked && self.limit == 0 {
            errors.add("limit", ValidationError::new("must be at least 1 in ranked mode"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
