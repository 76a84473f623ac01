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

use std::sync::Arc;

use strata_core::event::{EventId, Message, RenderTask, RouteError, Router};
use strata_core::renderer::RenderDevice;

/// Submits closures to the thread owning the rendering context.
///
/// Tasks travel as [`EventId::CameraRun`] messages to a unit that executes
/// them in order with its looper's device.
#[derive(Debug, Clone)]
pub struct RenderThread {
    router: Router,
    target: Arc<str>,
}

impl RenderThread {
    /// Creates a handle submitting to the unit registered as `target`.
    pub fn new(router: Router, target: &str) -> Self {
        Self {
            router,
            target: Arc::from(target),
        }
    }

    /// Queues `task` behind the messages already pending for the target.
    pub fn submit(
        &self,
        task: impl FnOnce(&dyn RenderDevice) + Send + 'static,
    ) -> Result<(), RouteError> {
        self.router.post_message(
            &self.target,
            Message::new(EventId::CameraRun).with_owned(RenderTask::new(task)),
        )
    }
}
