//! Report configuration.
//!
//! Both configs implement `Default` with the values the benchmark scripts were run with, so a
//! YAML file only needs to list the fields that differ.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::compare;

/// Policy of converting nanosecond timings to seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitMode {
    /// Divide every timing column by 10^9.
    Force,
    /// Divide a column by 10^9 only if its median looks like nanoseconds (> 10^6).
    AutoDetect,
    /// Leave values as they are.
    #[default]
    None,
}

/// Treatment of missing timing values during aggregation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// Exclude missing values from every mean, zero-fill only the final result.
    #[default]
    Skip,
    /// Zero-fill missing means after each aggregation stage.
    Zero,
}

/// Config of the single-source breakdown report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Main chart title, drawn above the per-partition caption.
    pub title: Option<String>,
    pub unit_mode: UnitMode,
    pub missing_policy: MissingPolicy,
    /// Unit shown on the y axis.
    pub time_unit: String,
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("10_nocache.csv"),
            output_dir: PathBuf::from("charts"),
            title: None,
            unit_mode: UnitMode::None,
            missing_policy: MissingPolicy::Skip,
            time_unit: "s".to_string(),
        }
    }
}

/// Config of the dual-source RPC vs baseline report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Directory holding both logs.
    pub log_dir: PathBuf,
    pub baseline_file: String,
    pub rpc_file: String,
    pub output_dir: PathBuf,
    pub title: Option<String>,
    pub unit_mode: UnitMode,
    pub missing_policy: MissingPolicy,
    pub time_unit: String,
    /// Components whose values are printed inside their segments.
    pub labeled_components: Vec<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            baseline_file: "baseline.log".to_string(),
            rpc_file: "rpc.log".to_string(),
            output_dir: PathBuf::from("./outputs"),
            title: Some("Finegrained Read Performance (per copy)".to_string()),
            unit_mode: UnitMode::None,
            missing_policy: MissingPolicy::Zero,
            time_unit: "μs".to_string(),
            labeled_components: compare::LABELED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CompareConfig {
    pub fn baseline_path(&self) -> PathBuf {
        self.log_dir.join(&self.baseline_file)
    }

    pub fn rpc_path(&self) -> PathBuf {
        self.log_dir.join(&self.rpc_file)
    }
}

/// Loads a config from a YAML file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => Error::MissingInput(path.to_path_buf()),
        _ => Error::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    serde_yaml::from_reader(file).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}
