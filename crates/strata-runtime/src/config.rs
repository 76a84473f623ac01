// Copyright 2025 eraflo
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

use std::time::Duration;

/// Configuration for a [`Looper`](crate::Looper).
#[derive(Debug, Clone)]
pub struct LooperConfig {
    /// Name of the looper, used for the thread name and in logs.
    pub name: String,
    /// How long an idle threaded looper waits for a message before checking
    /// whether it should stop.
    pub idle_timeout_ms: u64,
}

impl LooperConfig {
    /// Creates a configuration with the given name and default timings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The idle timeout as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            name: "render".to_string(),
            idle_timeout_ms: 20,
        }
    }
}
