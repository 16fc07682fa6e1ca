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

//! Descriptor data models for the two structured asset types.
//!
//! A descriptor is a JSON manifest that, besides its own payload, *names
//! further images* the loading pipeline must fetch before the descriptor is
//! usable. Instead of scanning free-form fields at load time, each descriptor
//! type exposes a typed [`referenced_images`](TilemapDescriptor::referenced_images)
//! enumeration, so the pipeline's lane-advancement logic stays decoupled from
//! schema details.

use super::{Asset, AssetRequest};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A Tiled-style tilemap manifest.
///
/// Layer payloads are kept as raw JSON: parsing them is the scene graph's
/// concern and is much cheaper than the load itself, so the pipeline only
/// models the fields it needs to discover dependent images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilemapDescriptor {
    /// Map width in tiles.
    #[serde(default)]
    pub width: u32,
    /// Map height in tiles.
    #[serde(default)]
    pub height: u32,
    /// Tile width in pixels.
    #[serde(default)]
    pub tilewidth: u32,
    /// Tile height in pixels.
    #[serde(default)]
    pub tileheight: u32,
    /// The tilesets this map draws from; each names one or more images.
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
    /// Layer payloads, deferred to the consumer.
    #[serde(default)]
    pub layers: Vec<serde_json::Value>,
}

impl Asset for TilemapDescriptor {}

/// One tileset entry inside a [`TilemapDescriptor`].
///
/// Tiled emits either a single atlas `image`, or an image-per-tile
/// collection under `tiles`. Both shapes occur in the wild and both must be
/// walked when enumerating dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetRef {
    /// First global tile id covered by this tileset.
    #[serde(default)]
    pub firstgid: u32,
    /// Atlas image path, relative to the tilemap file.
    #[serde(default)]
    pub image: Option<String>,
    /// Image-per-tile collection, used when `image` is absent.
    #[serde(default)]
    pub tiles: Option<Vec<TilesetTile>>,
}

/// A single tile of an image-collection tileset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetTile {
    /// Local tile id within the tileset.
    #[serde(default)]
    pub id: u32,
    /// Image path for this tile, relative to the tilemap file.
    pub image: String,
}

impl TilemapDescriptor {
    /// Enumerates the images this tilemap depends on.
    ///
    /// Paths are resolved relative to `descriptor_path`, the location the
    /// tilemap itself was loaded from; keys follow the source convention of
    /// keying tileset images by their relative path string.
    pub fn referenced_images(&self, descriptor_path: &Path) -> Vec<AssetRequest> {
        let dir = parent_dir(descriptor_path);
        let mut refs = Vec::new();
        for tileset in &self.tilesets {
            if let Some(image) = &tileset.image {
                refs.push(AssetRequest::new(image.clone(), dir.join(image)));
            } else if let Some(tiles) = &tileset.tiles {
                for tile in tiles {
                    refs.push(AssetRequest::new(tile.image.clone(), dir.join(&tile.image)));
                }
            }
        }
        refs
    }
}

/// A spritesheet manifest: one backing image plus frame/animation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpritesheetDescriptor {
    /// The sheet's name; also the key its backing image is stored under.
    pub name: String,
    /// Path to the backing image, relative to the spritesheet file.
    pub sprite_sheet_image: String,
    /// Width of one sprite cell in pixels.
    #[serde(default)]
    pub sprite_width: u32,
    /// Height of one sprite cell in pixels.
    #[serde(default)]
    pub sprite_height: u32,
    /// Number of cell columns in the sheet.
    #[serde(default)]
    pub columns: u32,
    /// Number of cell rows in the sheet.
    #[serde(default)]
    pub rows: u32,
    /// Named animations defined over the sheet's cells.
    #[serde(default)]
    pub animations: Vec<AnimationData>,
}

impl Asset for SpritesheetDescriptor {}

/// A named animation: an ordered list of cells with per-frame durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationData {
    /// The animation's name, e.g. `"walk"`.
    pub name: String,
    /// Whether the animation loops when it reaches its last frame.
    #[serde(default)]
    pub repeat: bool,
    /// The frames, in playback order.
    #[serde(default)]
    pub frames: Vec<AnimationFrame>,
}

/// One frame of an [`AnimationData`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationFrame {
    /// Cell index into the sheet, row-major.
    pub index: u32,
    /// How many logic steps the frame is held for.
    #[serde(default = "default_frame_duration")]
    pub duration: u32,
}

fn default_frame_duration() -> u32 {
    1
}

impl SpritesheetDescriptor {
    /// Enumerates the single image this spritesheet depends on, keyed by the
    /// sheet's own name and resolved relative to `descriptor_path`.
    pub fn referenced_images(&self, descriptor_path: &Path) -> Vec<AssetRequest> {
        let dir = parent_dir(descriptor_path);
        vec![AssetRequest::new(
            self.name.clone(),
            dir.join(&self.sprite_sheet_image),
        )]
    }
}

fn parent_dir(path: &Path) -> std::path::PathBuf {
    path.parent().unwrap_or_else(|| Path::new("")).to_path_buf()
}
