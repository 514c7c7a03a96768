//! Editor and generation configuration.
//!
//! # Responsibility
//! - Hold timing, placeholder and endpoint settings used by the engine.
//! - Load partial overrides from JSON with every field defaulted.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_DETAIL_DEBOUNCE_MS: u64 = 500;
const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 1000;
const DEFAULT_COMPLETION_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_PLACEHOLDER: &str = " Generating...";
const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/gemini/completion";
const DEFAULT_VARIATION_LABEL: &str = "Variation";

/// Runtime settings for the editor engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before a detail annotation edit is committed.
    pub detail_debounce_ms: u64,
    /// Delay between a title change and the scheduled save.
    pub save_debounce_ms: u64,
    /// Transient marker inserted at the cursor while a completion is pending.
    pub completion_placeholder: String,
    pub completion_endpoint: String,
    pub completion_timeout_ms: u64,
    /// Header label used when promotion finds no emphasized run.
    pub default_variation_label: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            detail_debounce_ms: DEFAULT_DETAIL_DEBOUNCE_MS,
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            completion_placeholder: DEFAULT_PLACEHOLDER.to_string(),
            completion_endpoint: DEFAULT_ENDPOINT.to_string(),
            completion_timeout_ms: DEFAULT_COMPLETION_TIMEOUT_MS,
            default_variation_label: DEFAULT_VARIATION_LABEL.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parses overrides; absent fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn detail_debounce(&self) -> Duration {
        Duration::from_millis(self.detail_debounce_ms)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }
}

/// Sampling parameters for model-backed completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Training examples are cut to this many characters before prompting.
    pub training_prefix_chars: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.8,
            max_output_tokens: 100,
            training_prefix_chars: 1000,
        }
    }
}
