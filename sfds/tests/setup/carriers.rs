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
#![allow(unused)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use sfds::prelude::*;

/// Keeps launched tasks parked until [`HeldCarrier::release`] spawns them.
#[derive(Default, Clone)]
pub struct HeldCarrier {
    held: Arc<Mutex<Vec<CarrierTask>>>,
    launched: Arc<AtomicUsize>,
}

impl HeldCarrier {
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn held(&self) -> usize {
        self.held.lock().len()
    }

    /// Spawns every parked task on the current tokio runtime.
    pub fn release(&self) {
        let tasks: Vec<CarrierTask> = self.held.lock().drain(..).collect();
        for task in tasks {
            tokio::spawn(task);
        }
    }
}

impl fmt::Debug for HeldCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeldCarrier")
            .field("held", &self.held())
            .field("launched", &self.launched())
            .finish()
    }
}

#[async_trait]
impl Carrier for HeldCarrier {
    fn launch(&self, task: CarrierTask) {
        self.launched.fetch_add(1, Ordering::SeqCst);
        self.held.lock().push(task);
    }
}
