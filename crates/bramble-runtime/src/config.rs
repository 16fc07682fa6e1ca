// Copyright 2025 the bramble developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration, loadable from a RON file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine startup options.
///
/// Every field has a default, so a config file only needs to name what it
/// changes. Rendering fields (viewport, clear color) are carried for the
/// host's renderer; the core never interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum logic update rate in Hz; the step is `floor(1000 / rate)` ms.
    pub max_update_rate: u32,
    /// Maximum render rate in Hz; 0 means unthrottled.
    pub max_render_rate: u32,
    /// Length of the fps sampling window in milliseconds.
    pub fps_sample_window_ms: f64,
    /// Directory asset paths are resolved under.
    pub asset_root: PathBuf,
    /// Viewport size in pixels, for the host's renderer.
    pub viewport_width: u32,
    /// Viewport size in pixels, for the host's renderer.
    pub viewport_height: u32,
    /// RGBA clear color, each channel in `[0, 1]`.
    pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_update_rate: 60,
            max_render_rate: 0,
            fps_sample_window_ms: 1000.0,
            asset_root: PathBuf::from("assets"),
            viewport_width: 800,
            viewport_height: 600,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl EngineConfig {
    /// Loads a configuration from a RON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = ron::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
