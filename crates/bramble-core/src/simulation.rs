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

//! The narrow frame contract between the scheduler and everything it drives.

/// The per-frame interface to all out-of-scope collaborators: scene graph,
/// input, audio, rendering.
///
/// The frame scheduler is the only caller. Within one frame, `update` runs
/// zero or more times — once per fixed logic step, each call seeing the
/// effects of the previous one — strictly before the single `render` call.
pub trait Simulation {
    /// One fixed logic step. `dt` is the step duration in seconds and is the
    /// same for every call; it never reflects the wall-clock frame gap.
    fn update(&mut self, dt: f32);

    /// Draws the current state. Called exactly once per rendered frame,
    /// regardless of how many (including zero) logic steps ran.
    fn render(&mut self);
}
