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

use std::time::{Duration, Instant};

/// A monotonic stopwatch, the engine's source of frame timestamps.
///
/// The scheduler wants fractional milliseconds since an arbitrary origin;
/// `Instant` guarantees monotonicity, which the scheduler's accumulation
/// arithmetic depends on.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    origin: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch whose origin is now.
    #[inline]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Elapsed time since the origin.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Elapsed time since the origin in fractional milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Moves the origin to now, so subsequent readings start from zero.
    #[inline]
    pub fn restart(&mut self) {
        self.origin = Instant::now();
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
