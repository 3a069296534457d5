//! Profile configuration
//!
//! [`PedestrianDefaults`] carries the generic pedestrian access vocabulary the
//! wheelchair rules build on. [`WheelchairConfig`] holds the tunables and can
//! be loaded from TOML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::tables::TagCategorySet;

/// Profile-specific access key.
pub const KEY_WHEELCHAIR: &str = "wheelchair";
/// Generic pedestrian access key.
pub const KEY_FOOT: &str = "foot";

/// Generic pedestrian access values shared with the foot profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedestrianDefaults {
    /// Access keys checked for restrictions, least specific last
    pub restriction_keys: Vec<String>,
    /// no, private, ...
    pub restricted_values: TagCategorySet,
    /// yes, designated, official, permissive, ...
    pub intended_values: TagCategorySet,
    /// sidewalk=<value> meaning a sidewalk can be used
    pub usable_sidewalk_values: TagCategorySet,
    /// sidewalk=<value> meaning there is no sidewalk on the way itself
    pub no_sidewalk_values: TagCategorySet,
}

impl PedestrianDefaults {
    /// Plain foot profile vocabulary.
    pub fn foot() -> Self {
        Self {
            restriction_keys: vec![KEY_FOOT.to_string(), "access".to_string()],
            restricted_values: TagCategorySet::from_values(&[
                "private",
                "no",
                "restricted",
                "military",
                "emergency",
            ]),
            intended_values: TagCategorySet::from_values(&[
                "yes",
                "designated",
                "official",
                "permissive",
            ]),
            usable_sidewalk_values: TagCategorySet::from_values(&["yes", "both", "left", "right"]),
            no_sidewalk_values: TagCategorySet::from_values(&["no", "none", "separate"]),
        }
    }

    /// Foot vocabulary extended with the wheelchair key and `limited`.
    pub fn wheelchair() -> Self {
        let mut defaults = Self::foot();
        defaults.restriction_keys.push(KEY_WHEELCHAIR.to_string());
        defaults.intended_values = defaults
            .intended_values
            .iter()
            .map(str::to_string)
            .chain(std::iter::once("limited".to_string()))
            .collect();
        defaults
    }
}

impl Default for PedestrianDefaults {
    fn default() -> Self {
        Self::wheelchair()
    }
}

/// Settings for the default duration-based ferry speed lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FerryConfig {
    /// Speed used when a ferry carries no usable duration/distance
    pub unknown_speed: f64,
}

impl Default for FerryConfig {
    fn default() -> Self {
        Self { unknown_speed: 5.0 }
    }
}

/// Wheelchair profile configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelchairConfig {
    /// Exclude fords from routing unless explicitly marked accessible
    pub block_fords: bool,
    /// Base speed every adjustment multiplies onto
    pub mean_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Bonus recorded for ways in hiking/foot/bicycle/inline_skates routes
    pub relation_prefer_bonus: i32,
    /// Bonus recorded for ways in ferry routes
    pub relation_ferry_bonus: i32,
    pub ferry: FerryConfig,
    pub pedestrian: PedestrianDefaults,
}

impl Default for WheelchairConfig {
    fn default() -> Self {
        Self {
            block_fords: true,
            mean_speed: 4.0,
            min_speed: 1.0,
            max_speed: 10.0,
            relation_prefer_bonus: 5,
            relation_ferry_bonus: -5,
            ferry: FerryConfig::default(),
            pedestrian: PedestrianDefaults::default(),
        }
    }
}

impl WheelchairConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            block_fords = config.block_fords,
            mean_speed = config.mean_speed,
            "loaded wheelchair profile config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("mean_speed", self.mean_speed),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("ferry.unknown_speed", self.ferry.unknown_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }

        if self.min_speed > self.max_speed {
            return Err(Error::InvalidConfig(format!(
                "min_speed ({}) exceeds max_speed ({})",
                self.min_speed, self.max_speed
            )));
        }

        if !(self.min_speed..=self.max_speed).contains(&self.mean_speed) {
            return Err(Error::InvalidConfig(format!(
                "mean_speed ({}) outside [{}, {}]",
                self.mean_speed, self.min_speed, self.max_speed
            )));
        }

        if self.pedestrian.restriction_keys.is_empty() {
            return Err(Error::InvalidConfig(
                "pedestrian.restriction_keys must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
