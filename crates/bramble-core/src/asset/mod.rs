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

//! Provides the foundational traits and primitive types for bramble's asset system.
//!
//! This module defines the "common language" for all asset-related operations in
//! the engine. It contains the contracts that other crates implement or use, but
//! it has no knowledge of how assets are loaded or stored.
//!
//! The key components are:
//! - The [`Asset`] trait: a marker for all types that can be treated as assets.
//! - [`AssetHandle`]: shared, immutable ownership of a loaded asset value.
//! - The descriptor data models ([`TilemapDescriptor`], [`SpritesheetDescriptor`])
//!   and their typed referenced-image enumeration.
//! - [`AssetSource`]: the byte-fetch seam the loading pipeline reads through.

mod descriptor;
mod handle;
mod source;
mod types;

pub use descriptor::*;
pub use handle::*;
pub use source::*;
pub use types::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce critical safety guarantees:
/// - `Send` + `Sync`: the asset type can be safely shared and sent between
///   threads, which is essential for background loading.
/// - `'static`: the asset type does not contain any non-static references,
///   ensuring it can be stored for the lifetime of the application.
pub trait Asset: Send + Sync + 'static {}
