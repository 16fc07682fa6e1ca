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

//! Engine-ready asset value types and the request primitive the lanes queue.

use super::Asset;
use std::path::PathBuf;

/// A `(key, path)` pair queued for loading.
///
/// The key is the name the asset is stored under once loaded; the path is
/// where the bytes come from, interpreted by the configured [`AssetSource`].
///
/// [`AssetSource`]: super::AssetSource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// The lookup key the loaded asset will be stored under.
    pub key: String,
    /// The source path the asset bytes are fetched from.
    pub path: PathBuf,
}

impl AssetRequest {
    /// Creates a new request from anything string-like.
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// A decoded image, stored as tightly packed RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major RGBA8.
    pub pixels: Vec<u8>,
}

impl Asset for ImageAsset {}

/// A decoded audio clip, normalized to interleaved `f32` PCM.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Samples per second.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
}

impl AudioClip {
    /// Duration of the clip in seconds, derived from the sample count.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }
}

impl Asset for AudioClip {}
