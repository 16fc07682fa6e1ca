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

//! # Bramble Lanes
//!
//! The asynchronous, dependency-ordered asset loading pipeline.
//!
//! Assets are grouped into four *lanes* — tilemap descriptors, spritesheet
//! descriptors, images, audio clips — drained in that fixed priority order
//! because the descriptor lanes *discover* new image work while loading. A
//! load pass completes, exactly once, when every queued and every discovered
//! item of every lane has finished.

pub mod asset_lane;

pub use asset_lane::{AssetEvent, AssetPipeline, LaneKind, PassOutcome};
