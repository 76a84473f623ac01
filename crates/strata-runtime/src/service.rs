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

//! Dedicated thread for a [`Looper`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use strata_core::event::Router;

use crate::Looper;

/// A [`Looper`] running on its own named thread.
///
/// Stopping the thread (explicitly or on drop) delivers `Destroy` to every
/// hosted unit on that thread before it exits.
pub struct LooperThread {
    name: String,
    router: Router,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl LooperThread {
    /// Moves `looper` onto a new thread named after its configuration.
    pub fn spawn(mut looper: Looper) -> Result<Self> {
        let name = looper.config().name.clone();
        let router = looper.router().clone();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || looper.run(&flag))
            .with_context(|| format!("Failed to spawn looper thread '{name}'"))?;

        Ok(Self {
            name,
            router,
            running,
            handle: Some(handle),
        })
    }

    /// The router shared by the hosted units.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns `true` until [`LooperThread::stop`] has been called.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops the looper and waits for its thread to finish.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Looper thread '{}' panicked.", self.name);
            }
        }
    }
}

impl Drop for LooperThread {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for LooperThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LooperThread")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}
