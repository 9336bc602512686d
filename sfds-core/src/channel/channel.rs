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
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::trace;
use uuid::Uuid;

use crate::channel::{DeliveryMode, Subscription, Tap};
use crate::common::Batch;
use crate::message::Communicator;

/// A broadcast stream of signal batches with fixed membership.
///
/// A channel has an optional owner and an ordered list of registered users,
/// both settled when the topology is built and never changed afterwards. It
/// keeps no history: a published batch reaches only the subscriptions that
/// are attached at that moment.
///
/// Publishing goes through a single append point. The batch is handed to
/// every tap while the tap list is locked, so concurrent publishers are
/// serialized and all queued subscribers observe the same order.
pub struct Channel<S, T, A, P> {
    id: String,
    owner: Option<Communicator>,
    registered_users: Vec<Communicator>,
    /// Recorded for callers; no registration path consults it.
    registration_cap: usize,
    taps: Mutex<Vec<Tap<Batch<S, T, A, P>>>>,
    published: AtomicU64,
}

impl<S, T, A, P> Channel<S, T, A, P> {
    /// Creates a channel with a freshly generated unique id.
    ///
    /// The owner is stored in its `Owner` role and every user in its `User`
    /// role, whatever role they were supplied with.
    pub fn new(
        owner: Option<&Communicator>,
        registered_users: impl IntoIterator<Item = Communicator>,
        registration_cap: usize,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4().to_string(),
            owner,
            registered_users,
            registration_cap,
        )
    }

    /// Creates a channel under a caller-chosen id.
    pub fn with_id(
        id: impl Into<String>,
        owner: Option<&Communicator>,
        registered_users: impl IntoIterator<Item = Communicator>,
        registration_cap: usize,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.map(Communicator::as_owner),
            registered_users: registered_users
                .into_iter()
                .map(|user| user.as_user())
                .collect(),
            registration_cap,
            taps: Mutex::new(Vec::new()),
            published: AtomicU64::new(0),
        }
    }

    /// The channel id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The owning communicator, if any.
    pub const fn owner(&self) -> Option<&Communicator> {
        self.owner.as_ref()
    }

    /// Registered users, in registration order.
    pub fn registered_users(&self) -> &[Communicator] {
        &self.registered_users
    }

    /// Registration cap; `0` means unlimited.
    pub const fn registration_cap(&self) -> usize {
        self.registration_cap
    }

    /// `true` if `communicator_id` is the owner or a registered user.
    pub fn is_member(&self, communicator_id: &str) -> bool {
        self.owner
            .iter()
            .chain(self.registered_users.iter())
            .any(|member| member.id() == communicator_id)
    }

    /// Number of batches published so far.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl<S, T, A, P> Channel<S, T, A, P> {
    /// Attaches a new subscriber using the given delivery mode.
    ///
    /// Batches published after this call returns are observed by the
    /// subscription; earlier ones are not.
    pub fn subscribe(&self, mode: DeliveryMode) -> Subscription<Batch<S, T, A, P>> {
        let (tap, subscription) = Subscription::open(mode);
        self.taps.lock().push(tap);
        trace!(channel = %self.id, ?mode, "Subscriber attached");
        subscription
    }

    /// Delivers `batch` to every attached subscriber as one unit.
    ///
    /// Returns the number of subscribers that received it. With no
    /// subscribers the publish still succeeds and nobody observes it.
    pub fn publish(&self, batch: Batch<S, T, A, P>) -> usize {
        let mut taps = self.taps.lock();
        taps.retain(|tap| tap.deliver(&batch));
        self.published.fetch_add(1, Ordering::Relaxed);
        trace!(
            channel = %self.id,
            signals = batch.len(),
            subscribers = taps.len(),
            "Batch published"
        );
        taps.len()
    }

    /// Number of subscribers still attached.
    pub fn subscriber_count(&self) -> usize {
        self.taps.lock().iter().filter(|tap| !tap.is_closed()).count()
    }
}

impl<S, T, A, P> fmt::Debug for Channel<S, T, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("registered_users", &self.registered_users)
            .field("registration_cap", &self.registration_cap)
            .field("taps", &self.taps.lock().len())
            .field("published", &self.published_count())
            .finish()
    }
}
