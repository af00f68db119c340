use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the two advisory endpoints live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    pub recommend_url: String,
    pub clinical_report_url: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            recommend_url: "http://127.0.0.1:5000/api/recommend".to_string(),
            clinical_report_url: "http://127.0.0.1:5000/api/clinical_report".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    /// Synthetic model-fit delay in milliseconds.
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,
}

fn default_analysis_delay_ms() -> u64 {
    3_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advisory: AdvisoryConfig::default(),
            analysis_delay_ms: default_analysis_delay_ms(),
        }
    }
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            recommend_url = %self.advisory.recommend_url,
            clinical_report_url = %self.advisory.clinical_report_url,
            analysis_delay_ms = self.analysis_delay_ms,
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
