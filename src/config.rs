use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::select::{DEFAULT_METRICS, DEFAULT_SEGMENTS};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "PERF_DASHBOARD_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Read-only settings for a session. Every field falls back to its default,
/// so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Metric columns selected on load when present.
    pub metric_candidates: Vec<String>,
    /// Segment columns selected on load when present.
    pub segment_candidates: Vec<String>,
    /// Column holding the employee name used for bar charts and feedback.
    pub label_column: String,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
    pub max_histogram_bins: usize,
    pub kde_points: usize,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            metric_candidates: DEFAULT_METRICS.iter().map(|s| s.to_string()).collect(),
            segment_candidates: DEFAULT_SEGMENTS.iter().map(|s| s.to_string()).collect(),
            label_column: "Employee".to_string(),
            preview_rows: 5,
            max_histogram_bins: 50,
            kde_points: 200,
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing dashboard config")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Config from the file named by `PERF_DASHBOARD_CONFIG`, or defaults.
    /// A broken file is logged and ignored.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_path(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Falling back to default config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{ "preview_rows": 10 }"#).unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.label_column, "Employee");
        assert_eq!(config.metric_candidates.len(), 4);
    }

    #[test]
    fn candidate_lists_can_be_overridden() {
        let config =
            DashboardConfig::from_json(r#"{ "segment_candidates": ["Region"] }"#).unwrap();
        assert_eq!(config.segment_candidates, vec!["Region"]);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(DashboardConfig::from_path(file.path()).is_err());
        assert!(DashboardConfig::from_path(Path::new("/nonexistent/dash.json")).is_err());
    }
}
