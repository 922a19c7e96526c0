//! Replayable host input scripts.
//!
//! A script is a JSON document with an optional `canvas` override and a list
//! of [`HostInput`] events:
//!
//! ```json
//! {
//!   "canvas": { "width": 1280, "height": 720 },
//!   "inputs": [
//!     { "type": "addVisual", "kind": "line" },
//!     { "type": "pointerDown", "target": { "on": "header", "panel": 1 }, "x": 60, "y": 50 },
//!     { "type": "pointerMove", "x": 2060, "y": 50 },
//!     { "type": "pointerUp" }
//!   ]
//! }
//! ```
//!
//! A bare JSON array of inputs is accepted as well.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::change::Change;
use crate::config::{CanvasConfig, CanvasSize};
use crate::dashboard::{Dashboard, HostInput};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub canvas: Option<CanvasConfig>,
    pub inputs: Vec<HostInput>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptDoc {
    // Must precede `Full`: a struct also deserializes from a JSON array.
    Inputs(Vec<HostInput>),
    Full(Script),
}

impl Script {
    /// Parse a script from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: ScriptDoc = serde_json::from_str(text)?;
        Ok(match doc {
            ScriptDoc::Inputs(inputs) => Script { canvas: None, inputs },
            ScriptDoc::Full(script) => script,
        })
    }

    /// The script's canvas section (or the defaults), with `size` taking
    /// precedence for the canvas dimensions.
    pub fn config(&self, size: Option<CanvasSize>) -> CanvasConfig {
        let mut config = self.canvas.unwrap_or_default();
        if let Some(size) = size {
            config.width = size.width;
            config.height = size.height;
        }
        config
    }

    /// Build a dashboard and feed it every input in order.
    pub fn replay(&self, size: Option<CanvasSize>) -> Result<(Dashboard, Change)> {
        let config = self.config(size);
        let mut dash = Dashboard::new(config)?;
        let mut total = Change::none();
        for (i, input) in self.inputs.iter().enumerate() {
            let change = dash.handle(input.clone());
            debug!(step = i, ?change, "replayed input");
            total = total.merge(change);
        }
        Ok((dash, total))
    }
}
