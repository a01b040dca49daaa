use cinegen_core::{DEFAULT_SCENE_COUNT, MAX_SCENE_COUNT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub wizard: WizardConfig,
}

/// Where the generation services live and how long to wait for them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Base URL serving `/generate_*` and `/api/movies`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. Video composition is slow, so this
    /// is generous by default.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout() -> u64 {
    600
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Scene count pre-selected at step 5
    #[serde(default = "default_scene_count")]
    pub default_scene_count: u32,

    #[serde(default = "default_max_scene_count")]
    pub max_scene_count: u32,
}

fn default_scene_count() -> u32 {
    DEFAULT_SCENE_COUNT
}
fn default_max_scene_count() -> u32 {
    MAX_SCENE_COUNT
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            default_scene_count: default_scene_count(),
            max_scene_count: default_max_scene_count(),
        }
    }
}
