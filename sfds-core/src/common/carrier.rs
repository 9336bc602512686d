/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fmt::Debug;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::trace;

/// A unit of work handed to a [`Carrier`].
pub type CarrierTask = BoxFuture<'static, ()>;

/// The scheduler every publish and listen task runs on.
///
/// SFDS never creates threads or runtimes of its own; it launches its tasks
/// on whatever carrier the host supplies. [`TokioCarrier`] covers the usual
/// case. Tests can supply carriers that hold or count tasks.
#[async_trait]
pub trait Carrier: Debug + Send + Sync + 'static {
    /// Schedules `task` to run concurrently. Must not block.
    fn launch(&self, task: CarrierTask);

    /// Waits until launched tasks have finished. Called during shutdown,
    /// after every session has been cancelled.
    async fn drain(&self) {}
}

/// A [`Carrier`] backed by a tokio runtime.
///
/// Tasks are tracked with a [`TaskTracker`] so that [`Carrier::drain`] can
/// wait for every listener and transmitter to unwind.
#[derive(Debug, Clone)]
pub struct TokioCarrier {
    handle: Handle,
    tracker: TaskTracker,
}

impl TokioCarrier {
    /// Launches tasks on the runtime behind `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tracker: TaskTracker::new(),
        }
    }

    /// Launches tasks on the runtime the caller is running in, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Number of launched tasks still running.
    pub fn active_tasks(&self) -> usize {
        self.tracker.len()
    }
}

#[async_trait]
impl Carrier for TokioCarrier {
    fn launch(&self, task: CarrierTask) {
        trace!(active = self.tracker.len(), "Launching task on tokio carrier");
        drop(self.tracker.spawn_on(task, &self.handle));
    }

    async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        trace!("Tokio carrier drained");
    }
}
