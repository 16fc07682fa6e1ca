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

//! The engine runtime: fixed-timestep frame scheduling, configuration, and
//! the driver loop composing the scheduler with the asset pipeline.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod engine;
pub mod scheduler;

pub use clock::Stopwatch;
pub use config::EngineConfig;
pub use engine::{Application, Engine, EngineEvent};
pub use scheduler::{FrameReport, FrameScheduler, MAX_STEPS_PER_FRAME};

/// Initializes `env_logger` from the environment, defaulting to `info`.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
