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

//! Per-type decode lanes: raw bytes in, engine-ready asset values out.

use anyhow::{anyhow, Context};
use bramble_core::asset::{
    Asset, AudioClip, ImageAsset, SpritesheetDescriptor, TilemapDescriptor,
};
use std::{error::Error, io::Cursor};

/// A trait for types that can decode a specific kind of asset from a byte slice.
///
/// Implementors are responsible for the potentially CPU-intensive work of
/// parsing raw file data into a usable asset type; the pipeline always calls
/// them off the main thread. Each `DecodeLane` is specialized for a single
/// asset type `A`.
pub trait DecodeLane<A: Asset> {
    /// Parses a byte slice into an instance of the asset `A`.
    ///
    /// # Returns
    /// The decoded asset on success, or a boxed dynamic error on failure.
    /// The error must be thread-safe.
    fn decode(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;
}

/// Decodes image files into RGBA8 pixel data.
#[derive(Default)]
pub struct ImageDecodeLane;

impl DecodeLane<ImageAsset> for ImageDecodeLane {
    fn decode(&self, bytes: &[u8]) -> Result<ImageAsset, Box<dyn Error + Send + Sync>> {
        let img = image::load_from_memory(bytes).context("Failed to decode image from memory")?;

        // Convert to RGBA8 regardless of the on-disk representation.
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(ImageAsset {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

/// Decodes WAV files into normalized `f32` PCM clips.
#[derive(Default)]
pub struct AudioDecodeLane;

impl DecodeLane<AudioClip> for AudioDecodeLane {
    fn decode(&self, bytes: &[u8]) -> Result<AudioClip, Box<dyn Error + Send + Sync>> {
        let cursor = Cursor::new(bytes);
        let mut reader = hound::WavReader::new(cursor)?;
        let spec = reader.spec();

        let samples: Result<Vec<f32>, _> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect(),
            hound::SampleFormat::Int => {
                let max_value = (1 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / max_value))
                    .collect()
            }
        };
        let samples = samples.map_err(|e| anyhow!("Failed to parse WAV samples: {}", e))?;

        Ok(AudioClip {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

/// Parses tilemap descriptor JSON.
#[derive(Default)]
pub struct TilemapDecodeLane;

impl DecodeLane<TilemapDescriptor> for TilemapDecodeLane {
    fn decode(&self, bytes: &[u8]) -> Result<TilemapDescriptor, Box<dyn Error + Send + Sync>> {
        let descriptor =
            serde_json::from_slice(bytes).context("Failed to parse tilemap descriptor JSON")?;
        Ok(descriptor)
    }
}

/// Parses spritesheet descriptor JSON.
#[derive(Default)]
pub struct SpritesheetDecodeLane;

impl DecodeLane<SpritesheetDescriptor> for SpritesheetDecodeLane {
    fn decode(&self, bytes: &[u8]) -> Result<SpritesheetDescriptor, Box<dyn Error + Send + Sync>> {
        let descriptor =
            serde_json::from_slice(bytes).context("Failed to parse spritesheet descriptor JSON")?;
        Ok(descriptor)
    }
}
