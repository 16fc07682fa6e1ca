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

//! The byte-fetch seam between the loading pipeline and its backing storage.

use std::io;
use std::path::{Path, PathBuf};

/// Fetches raw asset bytes by path.
///
/// The loading pipeline never touches storage directly; everything goes
/// through an injected `AssetSource`. The filesystem implementation below is
/// the production source, while tests inject their own to control ordering
/// and to provoke failures.
///
/// Implementations must be callable from worker threads; a call is allowed
/// to block, the pipeline always invokes it off the main thread.
pub trait AssetSource: Send + Sync + 'static {
    /// Reads the full contents of the resource at `path`.
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// An [`AssetSource`] rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Creates a source resolving relative paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this source resolves against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FileSystemSource {
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }
}
