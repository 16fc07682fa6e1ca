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

//! The pass barrier: pure bookkeeping for one execution of the pipeline.
//!
//! A pass is a countdown barrier composed four times, once per lane, in a
//! fixed priority list. Each lane counts issued against completed items and
//! closes only when nothing is outstanding *and* nothing is left pending —
//! re-checked on every completion, so work discovered after the lane's
//! initial snapshot is still drained before the lane closes. The whole pass
//! finishes, exactly once, when the last lane closes.
//!
//! This module is deliberately free of I/O and threads; the pipeline holds a
//! `PassState` behind a mutex and executes the decisions it returns.

use bramble_core::asset::AssetRequest;
use bramble_core::LoadError;
use std::collections::VecDeque;

/// The four asset lanes, in drain priority order.
///
/// Descriptor lanes come first because loading them *discovers* new image
/// work: when the image lane takes its snapshot, every dependency a
/// descriptor names has already been appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Tilemap descriptors; may discover images.
    Tilemap,
    /// Spritesheet descriptors; may discover images.
    Spritesheet,
    /// Plain images, including those discovered by descriptor lanes.
    Image,
    /// Audio clips; discovers nothing.
    Audio,
}

impl LaneKind {
    /// Every lane, in drain priority order.
    pub const ALL: [LaneKind; 4] = [
        LaneKind::Tilemap,
        LaneKind::Spritesheet,
        LaneKind::Image,
        LaneKind::Audio,
    ];

    /// Human-readable lane name for diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            LaneKind::Tilemap => "tilemap",
            LaneKind::Spritesheet => "spritesheet",
            LaneKind::Image => "image",
            LaneKind::Audio => "audio",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            LaneKind::Tilemap => 0,
            LaneKind::Spritesheet => 1,
            LaneKind::Image => 2,
            LaneKind::Audio => 3,
        }
    }
}

/// What one pass accomplished, delivered to the completion callback.
///
/// A failed item never blocks the barrier; it is counted and its error
/// collected here, so the caller decides whether a partial pass is fatal.
#[derive(Debug)]
pub struct PassOutcome {
    /// Items fetched, decoded, and stored successfully.
    pub loaded: usize,
    /// Items that failed to fetch or decode.
    pub failed: usize,
    /// One entry per failed item.
    pub errors: Vec<LoadError>,
}

impl PassOutcome {
    /// Whether every single item loaded cleanly.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The completion callback type for a pass.
pub(crate) type OnComplete = Box<dyn FnOnce(PassOutcome) + Send + 'static>;

/// Per-lane counters for the pass in flight.
#[derive(Debug, Default)]
struct LaneState {
    pending: VecDeque<AssetRequest>,
    /// Queue length at the moment the lane opened; progress denominator.
    queued_at_start: usize,
    issued: usize,
    completed: usize,
    opened: bool,
    closed: bool,
}

impl LaneState {
    /// Fraction of this lane's work done, in `[0, 1]`.
    ///
    /// An untouched lane reports 0; a lane that opened with (and discovered)
    /// no work reports 1, so an all-empty pass still converges to full
    /// progress by the time it completes.
    fn ratio(&self) -> f32 {
        if !self.opened {
            return 0.0;
        }
        // Discovered work can push `issued` past the opening snapshot; use
        // whichever is larger so the ratio never exceeds 1.
        let denominator = self.queued_at_start.max(self.issued);
        if denominator == 0 {
            1.0
        } else {
            self.completed as f32 / denominator as f32
        }
    }
}

/// Decisions produced while holding the pass lock, executed after releasing
/// it: items to hand to the executor, and the completion callback once the
/// final lane closes.
pub(crate) struct Advance {
    pub to_issue: Vec<(LaneKind, AssetRequest)>,
    pub finished: Option<(OnComplete, PassOutcome)>,
}

/// One execution of the loading pipeline, from enqueue-cutoff to completion.
pub(crate) struct PassState {
    lanes: [LaneState; 4],
    errors: Vec<LoadError>,
    on_complete: Option<OnComplete>,
}

impl PassState {
    /// Builds a pass over the queues captured at start time.
    pub fn new(queues: [VecDeque<AssetRequest>; 4], on_complete: OnComplete) -> Self {
        let lanes = queues.map(|pending| LaneState {
            pending,
            ..LaneState::default()
        });
        Self {
            lanes,
            errors: Vec::new(),
            on_complete: Some(on_complete),
        }
    }

    /// Moves the pass forward as far as possible without waiting.
    ///
    /// Walks the priority list: opens the frontier lane (snapshotting its
    /// queue), drains its pending items for issuance, and closes it when
    /// nothing is outstanding. Empty lanes close immediately, so a pass with
    /// no work at all finishes on the first call.
    pub fn advance(&mut self) -> Advance {
        let mut to_issue = Vec::new();

        for kind in LaneKind::ALL {
            let lane = &mut self.lanes[kind.index()];
            if lane.closed {
                continue;
            }

            if !lane.opened {
                lane.opened = true;
                lane.queued_at_start = lane.pending.len();
                log::debug!(
                    "{} lane opened with {} queued item(s)",
                    kind.label(),
                    lane.queued_at_start
                );
            }

            // Issue everything pending, including items appended after the
            // snapshot by descriptor completions.
            while let Some(request) = lane.pending.pop_front() {
                lane.issued += 1;
                to_issue.push((kind, request));
            }

            if lane.issued == lane.completed {
                lane.closed = true;
                log::debug!(
                    "{} lane closed ({} item(s) completed)",
                    kind.label(),
                    lane.completed
                );
                continue;
            }

            // Outstanding work: wait for completions before touching any
            // downstream lane.
            return Advance {
                to_issue,
                finished: None,
            };
        }

        Advance {
            to_issue,
            finished: self.finish(),
        }
    }

    /// Records one item completion and re-evaluates the barrier.
    ///
    /// `discovered` holds image requests the item named (descriptor lanes
    /// only); they are appended to the image lane, which is by construction
    /// not yet closed because the completing lane precedes it.
    pub fn complete_item(
        &mut self,
        kind: LaneKind,
        result: Result<Vec<AssetRequest>, LoadError>,
    ) -> Advance {
        match result {
            Ok(discovered) => {
                for request in discovered {
                    let image_lane = &mut self.lanes[LaneKind::Image.index()];
                    if image_lane.closed {
                        // Unreachable under the full-completion ordering;
                        // surfaced loudly rather than dropped silently.
                        log::error!(
                            "image \"{}\" discovered after the image lane closed; dropping it",
                            request.key
                        );
                    } else {
                        image_lane.pending.push_back(request);
                    }
                }
            }
            Err(error) => {
                log::warn!("{} item failed: {error}", kind.label());
                self.errors.push(error);
            }
        }

        self.lanes[kind.index()].completed += 1;
        self.advance()
    }

    /// Average completion ratio across the fixed four lane types.
    pub fn progress(&self) -> f32 {
        let sum: f32 = self.lanes.iter().map(LaneState::ratio).sum();
        sum / LaneKind::ALL.len() as f32
    }

    fn finish(&mut self) -> Option<(OnComplete, PassOutcome)> {
        let callback = self.on_complete.take()?;
        let completed: usize = self.lanes.iter().map(|l| l.completed).sum();
        let failed = self.errors.len();
        let outcome = PassOutcome {
            loaded: completed - failed,
            failed,
            errors: std::mem::take(&mut self.errors),
        };
        Some((callback, outcome))
    }
}
