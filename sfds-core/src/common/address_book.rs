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

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{error, trace, warn};

use crate::channel::Channel;

/// Registry mapping channel ids to channels.
///
/// Populated exactly once when the system is built and read-only afterwards,
/// so lookups need no locking. Insertion order is kept: a blank id resolves
/// to the first channel, which is the natural default for single-channel
/// topologies.
pub struct AddressBook<S, T, A, P> {
    channels: Vec<Arc<Channel<S, T, A, P>>>,
    index: HashMap<String, usize>,
}

impl<S, T, A, P> AddressBook<S, T, A, P> {
    /// Loads channels in order. A channel whose id is already present is
    /// skipped with a warning.
    pub(crate) fn from_channels(channels: impl IntoIterator<Item = Channel<S, T, A, P>>) -> Self {
        let mut book = Self {
            channels: Vec::new(),
            index: HashMap::new(),
        };
        for channel in channels {
            if book.index.contains_key(channel.id()) {
                warn!(channel = channel.id(), "Duplicate channel id; keeping the first entry");
                continue;
            }
            book.index.insert(channel.id().to_owned(), book.channels.len());
            book.channels.push(Arc::new(channel));
        }
        trace!(channels = book.channels.len(), "Address book populated");
        book
    }

    /// Resolves a channel for a send or receive request.
    ///
    /// A blank `channel_id` (empty or whitespace only) selects the first
    /// channel in insertion order; anything else must match exactly. When
    /// nothing matches an error diagnostic is emitted and `None` returned.
    pub fn find(&self, channel_id: &str) -> Option<Arc<Channel<S, T, A, P>>> {
        let channel = if channel_id.trim().is_empty() {
            self.channels.first().cloned()
        } else {
            self.get(channel_id)
        };

        if channel.is_none() {
            error!(channel = channel_id, "Channel not present in the address book");
        }
        channel
    }

    /// Exact lookup without diagnostics.
    pub fn get(&self, channel_id: &str) -> Option<Arc<Channel<S, T, A, P>>> {
        self.index
            .get(channel_id)
            .map(|&position| Arc::clone(&self.channels[position]))
    }

    /// All channels in insertion order.
    pub fn channels(&self) -> impl Iterator<Item = &Arc<Channel<S, T, A, P>>> {
        self.channels.iter()
    }

    /// All channel ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|channel| channel.id())
    }

    /// Channels owned by `communicator_id`.
    pub fn owned_by<'a>(
        &'a self,
        communicator_id: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Channel<S, T, A, P>>> + 'a {
        self.channels.iter().filter(move |channel| {
            channel
                .owner()
                .is_some_and(|owner| owner.id() == communicator_id)
        })
    }

    /// Channels `communicator_id` belongs to, as owner or user.
    pub fn channels_for<'a>(
        &'a self,
        communicator_id: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Channel<S, T, A, P>>> + 'a {
        self.channels
            .iter()
            .filter(move |channel| channel.is_member(communicator_id))
    }

    /// The first channel both communicators belong to.
    pub fn between(&self, first: &str, second: &str) -> Option<Arc<Channel<S, T, A, P>>> {
        self.channels
            .iter()
            .find(|channel| channel.is_member(first) && channel.is_member(second))
            .cloned()
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// `true` when the topology produced no channel.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<S, T, A, P> fmt::Debug for AddressBook<S, T, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.channels.iter()).finish()
    }
}
