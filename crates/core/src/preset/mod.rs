use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::routes::ModRoute;

/// Serializable snapshot of a route table.
///
/// The JSON shape is consumed by the host's preset files:
/// `{ "routes": [ { "paramId", "source", "amount", "curve" }, ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePreset {
    #[serde(default)]
    pub routes: Vec<ModRoute>,
}

impl RoutePreset {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<RoutePreset> {
        Ok(serde_json::from_str(json)?)
    }
}
