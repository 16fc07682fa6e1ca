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

//! A generic, type-safe store for loaded asset handles.

use bramble_core::asset::{Asset, AssetHandle};
use std::collections::HashMap;
use std::sync::RwLock;

/// A keyed, in-memory store for a specific asset type `A`.
///
/// Maps a string key to a shared [`AssetHandle<A>`]. Any given asset is
/// stored once; subsequent lookups receive a clone of the cached handle.
/// Worker threads insert while they complete items, readers look keys up at
/// any time, so the map sits behind a `RwLock`.
pub struct AssetStore<A: Asset> {
    storage: RwLock<HashMap<String, AssetHandle<A>>>,
}

impl<A: Asset> AssetStore<A> {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts an asset handle under `key`, replacing any previous entry.
    pub fn insert(&self, key: String, handle: AssetHandle<A>) {
        self.write_storage().insert(key, handle);
    }

    /// Retrieves a clone of the handle stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<AssetHandle<A>> {
        self.read_storage().get(key).cloned()
    }

    /// Whether an entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.read_storage().contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.read_storage().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read_storage().is_empty()
    }

    /// Drops every entry. Handles held by callers stay valid; only the
    /// store's own references are released.
    pub fn clear(&self) {
        self.write_storage().clear();
    }

    // The store is increment-only between clears, so a poisoned lock left by
    // a panicking worker still holds a consistent map; recover it.
    fn read_storage(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, AssetHandle<A>>> {
        self.storage.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_storage(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, AssetHandle<A>>> {
        self.storage.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<A: Asset> Default for AssetStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blob(u32);
    impl Asset for Blob {}

    #[test]
    fn insert_then_get_returns_the_same_value() {
        let store = AssetStore::<Blob>::new();
        store.insert("a".to_string(), AssetHandle::new(Blob(7)));

        let handle = store.get("a").expect("key present");
        assert_eq!((*handle).0, 7);
        assert!(store.contains("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_on_missing_key_is_none() {
        let store = AssetStore::<Blob>::new();
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn clear_keeps_outstanding_handles_valid() {
        let store = AssetStore::<Blob>::new();
        store.insert("a".to_string(), AssetHandle::new(Blob(1)));
        let held = store.get("a").expect("key present");

        store.clear();
        assert!(store.is_empty());
        assert_eq!((*held).0, 1);
    }
}
