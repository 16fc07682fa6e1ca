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

//! The fixed-timestep frame scheduler.
//!
//! The host delivers irregular frame timestamps; the scheduler turns them
//! into a regular sequence of fixed-size logic steps plus exactly one render
//! per frame. Logic therefore runs at a stable rate suitable for physics
//! while render follows the host's refresh. A bounded catch-up drain keeps a
//! long stall (the process being suspended, say) from forcing thousands of
//! steps in one frame: past the cap the remaining simulated time is dropped
//! on the floor once, loudly, instead of spiraling.

use bramble_core::Simulation;

/// Catch-up steps allowed in a single frame before simulated time is
/// discarded.
pub const MAX_STEPS_PER_FRAME: u32 = 100;

const DEFAULT_UPDATE_RATE_HZ: u32 = 60;
const DEFAULT_FPS_WINDOW_MS: f64 = 1000.0;

/// Scheduler lifecycle. The overrun condition is transient within one frame
/// and deliberately not a state here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    /// Constructed; `start` has not been called.
    Uninitialized,
    /// Started; waiting for the first frame timestamp to seed the clock.
    Started,
    /// Steady state.
    Running,
}

/// What one `tick` invocation did, for the driver and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Whether this frame rendered. False only for throttle skips and ticks
    /// before `start`.
    pub rendered: bool,
    /// Fixed logic steps executed this frame.
    pub steps_run: u32,
    /// Whether the catch-up cap was hit this frame.
    pub overrun: bool,
    /// Simulated milliseconds discarded by an overrun; 0 otherwise.
    pub discarded_ms: f64,
}

/// Converts host frame timestamps into fixed logic steps plus one render.
///
/// Owns all clock bookkeeping exclusively; it is never shared. Timestamps
/// must come from a monotonic source such as [`Stopwatch`].
///
/// [`Stopwatch`]: crate::clock::Stopwatch
#[derive(Debug)]
pub struct FrameScheduler {
    step_ms: f64,
    accumulated_ms: f64,
    last_frame_ms: f64,
    min_render_interval_ms: f64,
    fps: f64,
    fps_window_ms: f64,
    frames_in_window: u32,
    window_start_ms: f64,
    frame_index: u64,
    state: SchedulerState,
}

impl FrameScheduler {
    /// Creates a scheduler at the default 60 Hz update rate, unthrottled
    /// render, and a one-second fps sampling window.
    pub fn new() -> Self {
        Self {
            step_ms: step_ms_for(DEFAULT_UPDATE_RATE_HZ),
            accumulated_ms: 0.0,
            last_frame_ms: 0.0,
            min_render_interval_ms: 0.0,
            fps: 0.0,
            fps_window_ms: DEFAULT_FPS_WINDOW_MS,
            frames_in_window: 0,
            window_start_ms: 0.0,
            frame_index: 0,
            state: SchedulerState::Uninitialized,
        }
    }

    /// Sets the maximum logic rate; the step becomes `floor(1000 / hz)` ms.
    ///
    /// Legal mid-run, but the new step size applies going forward only, so
    /// call it before steady state for predictable behavior.
    pub fn set_max_update_rate(&mut self, hz: u32) {
        if hz == 0 {
            log::warn!("ignoring max update rate of 0 Hz");
            return;
        }
        self.step_ms = step_ms_for(hz);
    }

    /// Caps the render rate at `hz` frames per second; 0 means unthrottled.
    ///
    /// A throttled-away frame callback is skipped entirely, with no
    /// accumulation and no fps sample, so simulation rate is unaffected.
    pub fn set_max_render_rate(&mut self, hz: u32) {
        self.min_render_interval_ms = if hz == 0 { 0.0 } else { 1000.0 / hz as f64 };
    }

    /// Overrides the fps sampling window length.
    pub fn set_fps_sample_window_ms(&mut self, window_ms: f64) {
        if window_ms > 0.0 {
            self.fps_window_ms = window_ms;
        }
    }

    /// Starts the scheduler. Idempotent; calling it again has no effect.
    pub fn start(&mut self) {
        if self.state != SchedulerState::Uninitialized {
            return;
        }
        self.state = SchedulerState::Started;
        log::info!(
            "frame scheduler started, {} ms logic step",
            self.step_ms
        );
    }

    /// The host frame callback: drives logic steps and render for one frame.
    ///
    /// The first timestamp after `start` seeds the clock and renders once.
    /// In steady state the wall-clock gap accrues into the step accumulator,
    /// which is drained one fixed step at a time up to
    /// [`MAX_STEPS_PER_FRAME`]; past the cap the frame is flagged as an
    /// overrun and the residue is discarded, never carried. Render runs
    /// exactly once per non-skipped frame, after all steps.
    pub fn tick(&mut self, now_ms: f64, sim: &mut impl Simulation) -> FrameReport {
        match self.state {
            SchedulerState::Uninitialized => {
                log::warn!("tick before start; ignoring frame");
                FrameReport::default()
            }
            SchedulerState::Started => {
                self.last_frame_ms = now_ms;
                self.window_start_ms = now_ms;
                self.accumulated_ms = 0.0;
                self.frames_in_window = 0;
                self.state = SchedulerState::Running;
                sim.render();
                FrameReport {
                    rendered: true,
                    ..FrameReport::default()
                }
            }
            SchedulerState::Running => self.run_frame(now_ms, sim),
        }
    }

    fn run_frame(&mut self, now_ms: f64, sim: &mut impl Simulation) -> FrameReport {
        if self.min_render_interval_ms > 0.0
            && now_ms < self.last_frame_ms + self.min_render_interval_ms
        {
            return FrameReport::default();
        }

        self.accumulated_ms += now_ms - self.last_frame_ms;
        self.last_frame_ms = now_ms;

        let window_elapsed = now_ms - self.window_start_ms;
        if window_elapsed >= self.fps_window_ms {
            let instantaneous = self.frames_in_window as f64 * 1000.0 / window_elapsed;
            self.fps = 0.9 * instantaneous + 0.1 * self.fps;
            self.frames_in_window = 0;
            self.window_start_ms = now_ms;
        }

        self.frame_index += 1;
        self.frames_in_window += 1;

        let dt = (self.step_ms / 1000.0) as f32;
        let mut steps_run = 0;
        let mut overrun = false;
        while self.accumulated_ms >= self.step_ms {
            if steps_run >= MAX_STEPS_PER_FRAME {
                overrun = true;
                break;
            }
            sim.update(dt);
            self.accumulated_ms -= self.step_ms;
            steps_run += 1;
        }

        sim.render();

        let mut discarded_ms = 0.0;
        if overrun {
            discarded_ms = self.accumulated_ms;
            self.accumulated_ms = 0.0;
            log::warn!(
                "simulation fell behind: dropped {discarded_ms:.0} ms of simulated time \
                 after {MAX_STEPS_PER_FRAME} catch-up steps"
            );
        }

        FrameReport {
            rendered: true,
            steps_run,
            overrun,
            discarded_ms,
        }
    }

    /// Duration of one logic step in milliseconds.
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    /// The exponentially smoothed measured frame rate.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Count of rendered frames since steady state began.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Whether `start` has been called.
    pub fn is_started(&self) -> bool {
        self.state != SchedulerState::Uninitialized
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn step_ms_for(hz: u32) -> f64 {
    (1000 / hz) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSim {
        updates: Vec<f32>,
        renders: u32,
    }

    impl Simulation for RecordingSim {
        fn update(&mut self, dt: f32) {
            self.updates.push(dt);
        }

        fn render(&mut self) {
            self.renders += 1;
        }
    }

    fn running_scheduler(sim: &mut RecordingSim) -> FrameScheduler {
        let mut scheduler = FrameScheduler::new();
        scheduler.start();
        // First frame seeds the clock at t=0 and renders once.
        let report = scheduler.tick(0.0, sim);
        assert!(report.rendered);
        assert_eq!(report.steps_run, 0);
        scheduler
    }

    #[test]
    fn default_step_is_sixteen_ms() {
        assert_eq!(FrameScheduler::new().step_ms(), 16.0);
    }

    #[test]
    fn one_second_gap_runs_sixty_two_steps_and_keeps_the_remainder() {
        let mut sim = RecordingSim::default();
        let mut scheduler = running_scheduler(&mut sim);

        let report = scheduler.tick(1000.0, &mut sim);
        assert_eq!(report.steps_run, 62);
        assert!(!report.overrun);
        assert_eq!(sim.updates.len(), 62);
        assert_eq!(sim.renders, 2);

        // 1000 - 62 * 16 = 8 ms remain accumulated; 8 more ms buys exactly
        // one further step.
        let report = scheduler.tick(1008.0, &mut sim);
        assert_eq!(report.steps_run, 1);
    }

    #[test]
    fn every_step_sees_the_fixed_dt() {
        let mut sim = RecordingSim::default();
        let mut scheduler = running_scheduler(&mut sim);

        scheduler.tick(100.0, &mut sim);
        assert!(sim.updates.iter().all(|&dt| dt == 0.016));
    }

    #[test]
    fn three_second_stall_caps_at_one_hundred_steps_and_discards_the_rest() {
        let mut sim = RecordingSim::default();
        let mut scheduler = running_scheduler(&mut sim);

        let report = scheduler.tick(3000.0, &mut sim);
        assert_eq!(report.steps_run, 100);
        assert!(report.overrun);
        // 3000 - 100 * 16 = 1400 ms of simulated time dropped.
        assert_eq!(report.discarded_ms, 1400.0);
        assert_eq!(sim.renders, 2, "overrun frames still render once");

        // The residue was zeroed, not carried: one step of wall time buys
        // exactly one step.
        let report = scheduler.tick(3016.0, &mut sim);
        assert_eq!(report.steps_run, 1);
        assert!(!report.overrun);
    }

    #[test]
    fn render_throttle_skips_the_callback_entirely() {
        let mut sim = RecordingSim::default();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_max_render_rate(30);
        scheduler.start();
        scheduler.tick(0.0, &mut sim);

        // 10 ms after the last frame is inside the ~33 ms window: no render,
        // no accumulation, no step.
        let report = scheduler.tick(10.0, &mut sim);
        assert_eq!(report, FrameReport::default());
        assert_eq!(sim.renders, 1);

        // The skipped timestamp left no trace: accumulation at t=40 covers
        // the full 40 ms since the last rendered frame.
        let report = scheduler.tick(40.0, &mut sim);
        assert!(report.rendered);
        assert_eq!(report.steps_run, 2);
    }

    #[test]
    fn update_rate_changes_apply_going_forward() {
        let mut sim = RecordingSim::default();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_max_update_rate(100);
        assert_eq!(scheduler.step_ms(), 10.0);
        scheduler.start();
        scheduler.tick(0.0, &mut sim);

        let report = scheduler.tick(100.0, &mut sim);
        assert_eq!(report.steps_run, 10);
        assert!(sim.updates.iter().all(|&dt| dt == 0.01));
    }

    #[test]
    fn zero_update_rate_is_ignored() {
        let mut scheduler = FrameScheduler::new();
        scheduler.set_max_update_rate(0);
        assert_eq!(scheduler.step_ms(), 16.0);
    }

    #[test]
    fn fps_is_smoothed_over_the_sampling_window() {
        let mut sim = RecordingSim::default();
        let mut scheduler = running_scheduler(&mut sim);
        assert_eq!(scheduler.fps(), 0.0);

        // Ten frames delivered 100 ms apart. The tick at t=1000 sees a full
        // window containing the nine previous frames.
        for i in 1..=10 {
            scheduler.tick(i as f64 * 100.0, &mut sim);
        }
        let expected = 0.9 * 9.0 + 0.1 * 0.0;
        assert!((scheduler.fps() - expected).abs() < 1e-9);
    }

    #[test]
    fn start_is_idempotent() {
        let mut sim = RecordingSim::default();
        let mut scheduler = running_scheduler(&mut sim);

        // A second start must not rewind to the clock-seeding state.
        scheduler.start();
        let report = scheduler.tick(1000.0, &mut sim);
        assert_eq!(report.steps_run, 62);
    }

    #[test]
    fn tick_before_start_does_nothing() {
        let mut sim = RecordingSim::default();
        let mut scheduler = FrameScheduler::new();
        let report = scheduler.tick(100.0, &mut sim);
        assert_eq!(report, FrameReport::default());
        assert_eq!(sim.renders, 0);
        assert!(sim.updates.is_empty());
    }

    #[test]
    fn frame_index_counts_rendered_frames_only() {
        let mut sim = RecordingSim::default();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_max_render_rate(30);
        scheduler.start();
        scheduler.tick(0.0, &mut sim);
        assert_eq!(scheduler.frame_index(), 0);

        scheduler.tick(10.0, &mut sim); // skipped
        scheduler.tick(40.0, &mut sim);
        scheduler.tick(80.0, &mut sim);
        assert_eq!(scheduler.frame_index(), 2);
    }
}
