use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
/// Algorithm parameters for the lifecycle inductive miner
pub struct LifecycleMinerConfig {
    /// Try the interleaving cut (between the sequence and parallel cut)
    pub detect_interleaving: bool,
    /// Apply silent-step reductions to the synthesized net
    pub reduce_net: bool,
}

impl Default for LifecycleMinerConfig {
    fn default() -> Self {
        Self {
            detect_interleaving: true,
            reduce_net: true,
        }
    }
}

impl LifecycleMinerConfig {
    /// Serialize parameters to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
    /// Deserialize parameters from JSON string
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
