//! Names of the user parameters each tool reads and the prefixes of generated names.

use serde::{Deserialize, Serialize};

/// Parameter names and naming prefix for the numbered sequence tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequenceConfig {
    pub count: String,
    pub pitch: String,
    pub start: String,
    pub direction: String,
    pub cut_depth: String,
    pub body_prefix: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            count: "patternCount".to_string(),
            pitch: "patternPitch".to_string(),
            start: "patternStart".to_string(),
            direction: "patternDirection".to_string(),
            cut_depth: "patternCutDepth".to_string(),
            body_prefix: "num#".to_string(),
        }
    }
}

/// Parameter names and naming prefix for the honeycomb tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoneycombConfig {
    pub columns: String,
    pub margin: String,
    pub pointy_top: String,
    pub body_prefix: String,
}

impl Default for HoneycombConfig {
    fn default() -> Self {
        Self {
            columns: "hexNumX".to_string(),
            margin: "hexMargin".to_string(),
            pointy_top: "hexPointyTop".to_string(),
            body_prefix: "hex#".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub sequence: SequenceConfig,
    pub honeycomb: HoneycombConfig,
}

impl ToolConfig {
    /// Load from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
