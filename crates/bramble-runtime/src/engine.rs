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

//! The engine driver: composes the scheduler, the event bus, the asset
//! pipeline, and the user's application into a running frame loop.
//!
//! Within each fixed logic step the order is: event delivery, application
//! update, asset-pipeline progress poll. The poll makes loading state
//! visible to the application once per step (for progress UI); the
//! pipeline's own completion logic never depends on it.

use crate::clock::Stopwatch;
use crate::config::EngineConfig;
use crate::scheduler::FrameScheduler;
use bramble_core::asset::FileSystemSource;
use bramble_core::{EventBus, Simulation};
use bramble_lanes::{AssetEvent, AssetPipeline};
use std::sync::Arc;
use std::time::Duration;

/// Events delivered to the application at the top of each logic step.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Forwarded from the asset pipeline.
    Asset(AssetEvent),
    /// Ends the frame loop; `Engine::run` returns after the current frame.
    Shutdown,
}

/// The user-facing application contract.
///
/// Extends [`Simulation`] with event delivery; the default `handle_event`
/// ignores everything, so an application only overrides it when it cares.
pub trait Application: Simulation {
    /// Called once per event at the top of each logic step, before `update`.
    fn handle_event(&mut self, _event: &EngineEvent) {}
}

/// Owns the engine's services and drives the frame loop.
///
/// Subsystems are explicit constructor-built instances rather than process
/// globals, so tests can run independent engines side by side.
pub struct Engine {
    config: EngineConfig,
    events: EventBus<EngineEvent>,
    pipeline: AssetPipeline,
    scheduler: FrameScheduler,
    clock: Stopwatch,
    // Keeps the pipeline's worker threads alive for the engine's lifetime.
    _runtime: tokio::runtime::Runtime,
}

impl Engine {
    /// Builds an engine from a configuration.
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("bramble-loader")
            .build()?;
        let source = Arc::new(FileSystemSource::new(&config.asset_root));
        let pipeline = AssetPipeline::new(source, runtime.handle().clone());

        let mut scheduler = FrameScheduler::new();
        scheduler.set_max_update_rate(config.max_update_rate);
        scheduler.set_max_render_rate(config.max_render_rate);
        scheduler.set_fps_sample_window_ms(config.fps_sample_window_ms);

        log::info!(
            "engine ready: {} Hz logic, assets under \"{}\"",
            config.max_update_rate,
            config.asset_root.display()
        );

        Ok(Self {
            config,
            events: EventBus::new(),
            pipeline,
            scheduler,
            clock: Stopwatch::new(),
            _runtime: runtime,
        })
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The asset pipeline, for enqueueing and lookups.
    pub fn pipeline(&self) -> &AssetPipeline {
        &self.pipeline
    }

    /// The engine event bus. Publish [`EngineEvent::Shutdown`] here (from
    /// any thread, via [`EventBus::sender`]) to end the frame loop.
    pub fn events(&self) -> &EventBus<EngineEvent> {
        &self.events
    }

    /// The scheduler's measured frame rate.
    pub fn fps(&self) -> f64 {
        self.scheduler.fps()
    }

    /// Runs the frame loop until a shutdown event arrives.
    ///
    /// Each iteration reads the monotonic clock and feeds the timestamp to
    /// the scheduler, then yields briefly so a render-throttled loop does
    /// not spin hot. Shutdown is observed during event delivery, so the
    /// loop ends after the frame that saw the event.
    pub fn run<A: Application>(&mut self, app: &mut A) -> anyhow::Result<()> {
        self.scheduler.start();
        let mut shutdown = false;
        while !shutdown {
            let now_ms = self.clock.elapsed_ms();
            let mut frame = FrameStep {
                app,
                pipeline: &self.pipeline,
                events: &self.events,
                shutdown: &mut shutdown,
            };
            self.scheduler.tick(now_ms, &mut frame);
            std::thread::sleep(Duration::from_millis(1));
        }
        log::info!("engine shut down after {} frames", self.scheduler.frame_index());
        Ok(())
    }
}

/// Adapter giving the scheduler the engine's fixed per-step order.
struct FrameStep<'a, A: Application> {
    app: &'a mut A,
    pipeline: &'a AssetPipeline,
    events: &'a EventBus<EngineEvent>,
    shutdown: &'a mut bool,
}

impl<A: Application> Simulation for FrameStep<'_, A> {
    fn update(&mut self, dt: f32) {
        for event in self.events.drain() {
            if event == EngineEvent::Shutdown {
                *self.shutdown = true;
            }
            self.app.handle_event(&event);
        }
        for asset_event in self.pipeline.events().drain() {
            self.app.handle_event(&EngineEvent::Asset(asset_event));
        }
        self.app.update(dt);
        self.pipeline.poll();
    }

    fn render(&mut self) {
        self.app.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct CountingApp {
        updates: u32,
        renders: u32,
        events_seen: Vec<EngineEvent>,
        stop_after_updates: u32,
        stop: flume::Sender<EngineEvent>,
    }

    impl Simulation for CountingApp {
        fn update(&mut self, _dt: f32) {
            self.updates += 1;
            if self.updates == self.stop_after_updates {
                self.stop
                    .send(EngineEvent::Shutdown)
                    .expect("engine bus alive");
            }
        }

        fn render(&mut self) {
            self.renders += 1;
        }
    }

    impl Application for CountingApp {
        fn handle_event(&mut self, event: &EngineEvent) {
            self.events_seen.push(event.clone());
        }
    }

    fn test_config(asset_root: PathBuf) -> EngineConfig {
        EngineConfig {
            max_update_rate: 250,
            asset_root,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn run_updates_renders_and_honors_shutdown() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut engine = Engine::new(test_config(dir.path().into())).expect("engine builds");

        let mut app = CountingApp {
            updates: 0,
            renders: 0,
            events_seen: Vec::new(),
            stop_after_updates: 3,
            stop: engine.events().sender(),
        };
        engine.run(&mut app).expect("loop exits cleanly");

        assert!(app.updates >= 3);
        assert!(app.renders >= 1);
        assert!(app.events_seen.contains(&EngineEvent::Shutdown));
    }

    #[test]
    fn asset_events_reach_the_application() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut engine = Engine::new(test_config(dir.path().into())).expect("engine builds");

        // An empty pass completes immediately and leaves a completion event
        // on the pipeline bus for the loop to forward.
        engine
            .pipeline()
            .load_queued(|_| {})
            .expect("no pass running");

        let mut app = CountingApp {
            updates: 0,
            renders: 0,
            events_seen: Vec::new(),
            stop_after_updates: 2,
            stop: engine.events().sender(),
        };
        engine.run(&mut app).expect("loop exits cleanly");

        assert!(app
            .events_seen
            .contains(&EngineEvent::Asset(AssetEvent::LoadCompleted)));
    }
}
