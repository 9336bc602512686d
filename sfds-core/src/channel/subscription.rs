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
use std::fmt;

use tokio::sync::{mpsc, watch};

/// How a subscriber consumes a channel when batches arrive faster than it
/// processes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeliveryMode {
    /// Every published batch is queued for the subscriber, in publish order.
    /// Nothing is skipped, at the cost of the subscriber falling behind.
    #[default]
    Queued,
    /// Only the newest batch is kept. A busy subscriber sees a strict
    /// subsequence of the published batches, never out of order.
    Latest,
}

/// The publishing end a channel keeps for each subscriber.
pub(crate) enum Tap<B> {
    Queued(mpsc::UnboundedSender<B>),
    Latest(watch::Sender<Option<B>>),
}

impl<B: Clone> Tap<B> {
    /// Hands `batch` to the subscriber. Returns `false` once the subscriber is gone.
    pub(crate) fn deliver(&self, batch: &B) -> bool {
        match self {
            Self::Queued(sender) => sender.send(batch.clone()).is_ok(),
            Self::Latest(sender) => {
                if sender.receiver_count() == 0 {
                    return false;
                }
                sender.send_replace(Some(batch.clone()));
                true
            }
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        match self {
            Self::Queued(sender) => sender.is_closed(),
            Self::Latest(sender) => sender.receiver_count() == 0,
        }
    }
}

/// The consuming end of a channel subscription.
///
/// Dropping a subscription detaches it; the channel prunes the matching tap
/// on its next publish.
pub enum Subscription<B> {
    /// Unbounded in-order queue.
    Queued(mpsc::UnboundedReceiver<B>),
    /// Single overwrite-on-publish slot.
    Latest(watch::Receiver<Option<B>>),
}

impl<B: Clone> Subscription<B> {
    pub(crate) fn open(mode: DeliveryMode) -> (Tap<B>, Self) {
        match mode {
            DeliveryMode::Queued => {
                let (sender, receiver) = mpsc::unbounded_channel();
                (Tap::Queued(sender), Self::Queued(receiver))
            }
            DeliveryMode::Latest => {
                // The initial `None` is already marked as seen by the receiver.
                let (sender, receiver) = watch::channel(None);
                (Tap::Latest(sender), Self::Latest(receiver))
            }
        }
    }

    /// The delivery mode this subscription was opened with.
    pub const fn mode(&self) -> DeliveryMode {
        match self {
            Self::Queued(_) => DeliveryMode::Queued,
            Self::Latest(_) => DeliveryMode::Latest,
        }
    }

    /// Waits for the next batch.
    ///
    /// In queued mode this is the oldest undelivered batch; in latest mode it
    /// is the newest batch published since the previous call. Returns `None`
    /// once the channel side has been dropped.
    pub async fn next(&mut self) -> Option<B> {
        match self {
            Self::Queued(receiver) => receiver.recv().await,
            Self::Latest(receiver) => loop {
                if receiver.changed().await.is_err() {
                    return None;
                }
                if let Some(batch) = receiver.borrow_and_update().clone() {
                    return Some(batch);
                }
            },
        }
    }
}

impl<B> fmt::Debug for Subscription<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::Queued(_) => "Queued",
            Self::Latest(_) => "Latest",
        };
        f.debug_tuple("Subscription").field(&mode).finish()
    }
}

