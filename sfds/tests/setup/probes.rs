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

use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::mpsc;

use crate::setup::signals::{stardate, Transmission};

/// How long a probe waits for something that should arrive.
pub const PATIENCE: Duration = Duration::from_secs(2);

/// How long a probe waits before concluding nothing will arrive.
pub const QUIET: Duration = Duration::from_millis(150);

/// Forwards the stardates of every observed batch to the returned queue.
pub fn batch_probe() -> (
    impl FnMut(&[Transmission]) + Send + 'static,
    mpsc::UnboundedReceiver<Vec<u32>>,
) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let probe = move |batch: &[Transmission]| {
        let _ = sender.send(batch.iter().map(stardate).collect());
    };
    (probe, receiver)
}

/// Forwards the stardate of every observed signal to the returned queue.
pub fn signal_probe() -> (
    impl FnMut(&Transmission) + Send + 'static,
    mpsc::UnboundedReceiver<u32>,
) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let probe = move |signal: &Transmission| {
        let _ = sender.send(stardate(signal));
    };
    (probe, receiver)
}

/// Waits for the next observation.
pub async fn next<V>(observed: &mut mpsc::UnboundedReceiver<V>) -> anyhow::Result<V> {
    tokio::time::timeout(PATIENCE, observed.recv())
        .await?
        .ok_or_else(|| anyhow!("probe dropped before observing anything"))
}

/// `true` when nothing is observed for a short while.
pub async fn stays_quiet<V>(observed: &mut mpsc::UnboundedReceiver<V>) -> bool {
    tokio::time::timeout(QUIET, observed.recv()).await.is_err()
}
