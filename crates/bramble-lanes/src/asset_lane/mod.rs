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

//! The asset lanes: per-type queues, the pass barrier, and decode logic.

mod catalog;
mod decode;
mod pass;
mod pipeline;

pub use catalog::AssetStore;
pub use decode::{
    AudioDecodeLane, DecodeLane, ImageDecodeLane, SpritesheetDecodeLane, TilemapDecodeLane,
};
pub use pass::{LaneKind, PassOutcome};
pub use pipeline::{AssetEvent, AssetPipeline};
