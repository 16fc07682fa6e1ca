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

//! The asset pipeline: enqueue requests, run a pass, look assets up.
//!
//! A pipeline owns four typed catalogs and a set of between-pass queues.
//! `enqueue_*` is always legal and never blocks; `load_queued` cuts the
//! queues over into a [`PassState`] and hands each request to the executor
//! as its lane opens. Loads are blocking I/O plus CPU-bound decoding, so
//! each one runs under `spawn_blocking` on the engine's runtime.
//!
//! Locking discipline: the pass lock is held only for bookkeeping. Every
//! decision the barrier makes (items to issue, the completion callback) is
//! carried out of the critical section and executed afterwards, so worker
//! completions never re-enter the lock through user code.

use super::catalog::AssetStore;
use super::decode::{
    AudioDecodeLane, DecodeLane, ImageDecodeLane, SpritesheetDecodeLane, TilemapDecodeLane,
};
use super::pass::{Advance, LaneKind, PassOutcome, PassState};
use bramble_core::asset::{
    AssetHandle, AssetRequest, AssetSource, AudioClip, ImageAsset, SpritesheetDescriptor,
    TilemapDescriptor,
};
use bramble_core::{AssetError, EventBus, LoadError};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;

/// Notifications the pipeline publishes on its event bus.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetEvent {
    /// Fraction of the in-flight pass that is done, in `[0, 1]`.
    LoadProgress(f32),
    /// The in-flight pass has finished; every getter for its items is live.
    LoadCompleted,
}

/// Queues and barrier state, guarded by one mutex.
struct PipelineState {
    /// Requests waiting for the next pass, indexed by [`LaneKind`].
    queued: [VecDeque<AssetRequest>; 4],
    /// The pass in flight, if any.
    pass: Option<PassState>,
    /// Whether at least one pass has run to completion since the last
    /// `unload_all`; drives the idle progress value.
    any_pass_completed: bool,
}

struct Shared {
    source: Arc<dyn AssetSource>,
    runtime: Handle,
    events: EventBus<AssetEvent>,
    state: Mutex<PipelineState>,
    tilemaps: AssetStore<TilemapDescriptor>,
    spritesheets: AssetStore<SpritesheetDescriptor>,
    images: AssetStore<ImageAsset>,
    audio: AssetStore<AudioClip>,
}

/// The engine's asset loading front end.
///
/// Cloning is cheap and shares all state, so a handle can live on the game
/// side while workers complete items on runtime threads.
#[derive(Clone)]
pub struct AssetPipeline {
    shared: Arc<Shared>,
}

impl AssetPipeline {
    /// Creates a pipeline reading from `source` and executing loads on the
    /// runtime behind `runtime`.
    pub fn new(source: Arc<dyn AssetSource>, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                runtime,
                events: EventBus::new(),
                state: Mutex::new(PipelineState {
                    queued: Default::default(),
                    pass: None,
                    any_pass_completed: false,
                }),
                tilemaps: AssetStore::new(),
                spritesheets: AssetStore::new(),
                images: AssetStore::new(),
                audio: AssetStore::new(),
            }),
        }
    }

    /// The bus [`AssetEvent`]s are published on.
    pub fn events(&self) -> &EventBus<AssetEvent> {
        &self.shared.events
    }

    /// Queues a tilemap descriptor for the next pass.
    pub fn enqueue_tilemap(&self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.enqueue(LaneKind::Tilemap, AssetRequest::new(key, path));
    }

    /// Queues a spritesheet descriptor for the next pass.
    pub fn enqueue_spritesheet(&self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.enqueue(LaneKind::Spritesheet, AssetRequest::new(key, path));
    }

    /// Queues an image for the next pass.
    pub fn enqueue_image(&self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.enqueue(LaneKind::Image, AssetRequest::new(key, path));
    }

    /// Queues an audio clip for the next pass.
    pub fn enqueue_audio(&self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.enqueue(LaneKind::Audio, AssetRequest::new(key, path));
    }

    /// Enqueueing is always legal. While a pass is in flight the request
    /// lands in the between-pass queue, untouched by the current pass, and
    /// is picked up by the next `load_queued`.
    fn enqueue(&self, kind: LaneKind, request: AssetRequest) {
        log::debug!(
            "enqueue {} \"{}\" from \"{}\"",
            kind.label(),
            request.key,
            request.path.display()
        );
        self.lock_state().queued[kind.index()].push_back(request);
    }

    /// Whether a pass is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.lock_state().pass.is_some()
    }

    /// Starts a pass over everything queued so far.
    ///
    /// The queues are cut over atomically: requests enqueued after this call
    /// belong to the next pass. `on_complete` fires exactly once, from a
    /// runtime thread, after the last lane closes; a pass with nothing
    /// queued completes before this method returns.
    pub fn load_queued(
        &self,
        on_complete: impl FnOnce(PassOutcome) + Send + 'static,
    ) -> Result<(), AssetError> {
        let advance = {
            let mut state = self.lock_state();
            if state.pass.is_some() {
                return Err(AssetError::PassAlreadyRunning);
            }
            let queues = std::mem::take(&mut state.queued);
            let mut pass = PassState::new(queues, Box::new(on_complete));
            let advance = pass.advance();
            if advance.finished.is_some() {
                state.any_pass_completed = true;
            } else {
                state.pass = Some(pass);
            }
            advance
        };
        self.execute(advance);
        Ok(())
    }

    /// Publishes a progress event if a pass is in flight. Intended to be
    /// called once per logic step by the frame driver.
    pub fn poll(&self) {
        let progress = {
            let state = self.lock_state();
            state.pass.as_ref().map(PassState::progress)
        };
        if let Some(progress) = progress {
            self.shared.events.publish(AssetEvent::LoadProgress(progress));
        }
    }

    /// Fraction of the current pass that is done.
    ///
    /// With no pass in flight this reports 1.0 once any pass has completed
    /// and 0.0 on a fresh (or fully unloaded) pipeline.
    pub fn progress(&self) -> f32 {
        let state = self.lock_state();
        match &state.pass {
            Some(pass) => pass.progress(),
            None if state.any_pass_completed => 1.0,
            None => 0.0,
        }
    }

    /// Looks up a loaded tilemap descriptor.
    pub fn tilemap(&self, key: &str) -> Result<AssetHandle<TilemapDescriptor>, AssetError> {
        self.shared.tilemaps.get(key).ok_or_else(|| not_found("tilemap", key))
    }

    /// Looks up a loaded spritesheet descriptor.
    pub fn spritesheet(&self, key: &str) -> Result<AssetHandle<SpritesheetDescriptor>, AssetError> {
        self.shared
            .spritesheets
            .get(key)
            .ok_or_else(|| not_found("spritesheet", key))
    }

    /// Looks up a loaded image.
    pub fn image(&self, key: &str) -> Result<AssetHandle<ImageAsset>, AssetError> {
        self.shared.images.get(key).ok_or_else(|| not_found("image", key))
    }

    /// Looks up a loaded audio clip.
    pub fn audio(&self, key: &str) -> Result<AssetHandle<AudioClip>, AssetError> {
        self.shared.audio.get(key).ok_or_else(|| not_found("audio", key))
    }

    /// Drops every loaded asset and every queued request, resetting the
    /// pipeline to its freshly constructed state.
    ///
    /// Refused while a pass is in flight: workers hold no store locks across
    /// await points, but letting a pass complete into emptied catalogs would
    /// leave its outcome lying about what is loaded.
    pub fn unload_all(&self) -> Result<(), AssetError> {
        let mut state = self.lock_state();
        if state.pass.is_some() {
            return Err(AssetError::PassInFlight);
        }
        state.queued = Default::default();
        state.any_pass_completed = false;
        drop(state);

        self.shared.tilemaps.clear();
        self.shared.spritesheets.clear();
        self.shared.images.clear();
        self.shared.audio.clear();
        log::info!("all assets unloaded");
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, PipelineState> {
        // A worker that panicked mid-bookkeeping leaves counters it never
        // got to touch; the pass may stall but lookups must keep working.
        self.shared.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Carries out a barrier decision outside the lock: spawns a worker per
    /// issued item and fires the completion callback if the pass finished.
    fn execute(&self, advance: Advance) {
        let Advance { to_issue, finished } = advance;
        for (kind, request) in to_issue {
            let pipeline = self.clone();
            self.shared.runtime.spawn_blocking(move || {
                let result = pipeline.load_one(kind, &request);
                pipeline.complete_item(kind, result);
            });
        }
        if let Some((callback, outcome)) = finished {
            log::info!(
                "load pass complete: {} loaded, {} failed",
                outcome.loaded,
                outcome.failed
            );
            self.shared.events.publish(AssetEvent::LoadProgress(1.0));
            self.shared.events.publish(AssetEvent::LoadCompleted);
            callback(outcome);
        }
    }

    /// Worker completion path: record the item, then act on whatever the
    /// barrier decided (newly issued items, or the end of the pass).
    fn complete_item(&self, kind: LaneKind, result: Result<Vec<AssetRequest>, LoadError>) {
        let advance = {
            let mut state = self.lock_state();
            let Some(pass) = state.pass.as_mut() else {
                log::error!("{} item completed with no pass in flight", kind.label());
                return;
            };
            let advance = pass.complete_item(kind, result);
            if advance.finished.is_some() {
                state.pass = None;
                state.any_pass_completed = true;
            }
            advance
        };
        self.execute(advance);
    }

    /// Fetches, decodes, and stores one item, returning the image requests
    /// it discovered (descriptor lanes only).
    fn load_one(
        &self,
        kind: LaneKind,
        request: &AssetRequest,
    ) -> Result<Vec<AssetRequest>, LoadError> {
        let bytes = self
            .shared
            .source
            .read_bytes(&request.path)
            .map_err(|source| LoadError::Fetch {
                path: request.path.clone(),
                source,
            })?;

        let decode_error = |e: Box<dyn std::error::Error + Send + Sync>| LoadError::Decode {
            path: request.path.clone(),
            message: e.to_string(),
        };

        let discovered = match kind {
            LaneKind::Tilemap => {
                let descriptor = TilemapDecodeLane.decode(&bytes).map_err(decode_error)?;
                let discovered = descriptor.referenced_images(&request.path);
                self.shared
                    .tilemaps
                    .insert(request.key.clone(), AssetHandle::new(descriptor));
                discovered
            }
            LaneKind::Spritesheet => {
                let descriptor = SpritesheetDecodeLane.decode(&bytes).map_err(decode_error)?;
                let discovered = descriptor.referenced_images(&request.path);
                self.shared
                    .spritesheets
                    .insert(request.key.clone(), AssetHandle::new(descriptor));
                discovered
            }
            LaneKind::Image => {
                let image = ImageDecodeLane.decode(&bytes).map_err(decode_error)?;
                self.shared
                    .images
                    .insert(request.key.clone(), AssetHandle::new(image));
                Vec::new()
            }
            LaneKind::Audio => {
                let clip = AudioDecodeLane.decode(&bytes).map_err(decode_error)?;
                self.shared
                    .audio
                    .insert(request.key.clone(), AssetHandle::new(clip));
                Vec::new()
            }
        };

        log::debug!("loaded {} \"{}\"", kind.label(), request.key);
        Ok(discovered)
    }
}

fn not_found(kind: &'static str, key: &str) -> AssetError {
    AssetError::NotFound {
        kind,
        key: key.to_string(),
    }
}
