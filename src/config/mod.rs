use serde::Deserialize;

use crate::category::CategoryConfig;
use crate::scene::SceneOrder;

// Re-export per-module config types
pub use crate::backend::BackendConfig;
pub use crate::poller::PollConfig;

/// Complete domo configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DomoConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub poll: PollConfig,
    /// Pollable categories; defaults to scenes/switches/lights/states
    #[serde(default = "CategoryConfig::default_set")]
    pub categories: Vec<CategoryConfig>,
    /// Scene display priority
    #[serde(default)]
    pub scene_order: SceneOrder,
}

impl Default for DomoConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poll: PollConfig::default(),
            categories: CategoryConfig::default_set(),
            scene_order: SceneOrder::default(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<DomoConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: DomoConfig = toml::from_str(&contents)?;
    Ok(config)
}
