use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::errors::ConfigError;

///
/// Parameters of one integron search. Every field has a default, so a TOML
/// file only needs to list what it changes:
///
/// ```toml
/// distance_threshold = 3000
/// local_max = true
/// attc_model = "data/Models/attc_4.cm"
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IntegronConfig {
    pub distance_threshold: u32,
    pub max_attc_size: u32,
    pub min_attc_size: u32,
    pub evalue_attc: f64,
    pub keep_palindromes: bool,
    pub union_integrases: bool,
    pub local_max: bool,
    pub integrase_model: String,
    pub recombinase_model: String,
    pub cmsearch: PathBuf,
    pub attc_model: Option<PathBuf>,
    pub cpu: usize,
}

impl Default for IntegronConfig {
    fn default() -> Self {
        IntegronConfig {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            max_attc_size: DEFAULT_MAX_ATTC_SIZE,
            min_attc_size: DEFAULT_MIN_ATTC_SIZE,
            evalue_attc: DEFAULT_EVALUE_ATTC,
            keep_palindromes: false,
            union_integrases: false,
            local_max: false,
            integrase_model: DEFAULT_INTEGRASE_MODEL.to_string(),
            recombinase_model: DEFAULT_RECOMBINASE_MODEL.to_string(),
            cmsearch: PathBuf::from(DEFAULT_CMSEARCH_BIN),
            attc_model: None,
            cpu: 1,
        }
    }
}

impl IntegronConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_attc_size >= self.max_attc_size {
            return Err(ConfigError::InvalidValue(format!(
                "min_attc_size ({}) must be smaller than max_attc_size ({})",
                self.min_attc_size, self.max_attc_size
            )));
        }
        if self.evalue_attc.is_nan() || self.evalue_attc <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "evalue_attc must be positive, got {}",
                self.evalue_attc
            )));
        }
        if self.cpu == 0 {
            return Err(ConfigError::InvalidValue("cpu must be at least 1".to_string()));
        }
        if self.local_max && self.attc_model.is_none() {
            return Err(ConfigError::InvalidValue(
                "local_max requires an attc_model".to_string(),
            ));
        }
        Ok(())
    }
}

impl TryFrom<&Path> for IntegronConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: IntegronConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
