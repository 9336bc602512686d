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
use tracing::{debug, error, instrument, warn};

use crate::channel::Channel;
use crate::message::Communicator;
use crate::topology::{ConnectionType, Topology, TransmissionBehavior};

/// Channels computed from a topology, ready to be loaded into an address book.
#[derive(Debug)]
pub(crate) struct TopologyPlan<S, T, A, P> {
    pub(crate) channels: Vec<Channel<S, T, A, P>>,
    pub(crate) shared_transmission: bool,
}

/// Turns a [`Topology`] and a communicator list into channels.
///
/// The builder runs once per system. Output order follows the communicator
/// list, so the same input always produces the same membership (channel ids
/// are freshly generated each time).
#[derive(Debug)]
pub(crate) struct TopologyBuilder<'a> {
    topology: &'a Topology,
    communicators: &'a [Communicator],
    registration_cap: usize,
}

impl<'a> TopologyBuilder<'a> {
    pub(crate) const fn new(
        topology: &'a Topology,
        communicators: &'a [Communicator],
        registration_cap: usize,
    ) -> Self {
        Self {
            topology,
            communicators,
            registration_cap,
        }
    }

    #[instrument(skip(self), fields(topology = %self.topology, communicators = self.communicators.len()))]
    pub(crate) fn build<S, T, A, P>(&self) -> TopologyPlan<S, T, A, P> {
        use ConnectionType::{Broadcast, Multicast, Unicast};
        use TransmissionBehavior::{ClientServer, FullDuplex, Shared};

        let channels = match (
            self.topology.connection_type,
            self.topology.transmission_behavior,
        ) {
            (Broadcast, Shared) => vec![self.channel(None, self.communicators.iter())],
            (Broadcast, FullDuplex) => self.full_duplex_broadcast(),
            (Broadcast, ClientServer) => self.client_server_broadcast().into_iter().collect(),
            (Multicast, Shared) => self.shared_multicast(),
            (Unicast, Shared) => self.shared_unicast(),
            (Multicast | Unicast, FullDuplex | ClientServer) => {
                warn!(
                    topology = %self.topology,
                    "No membership rule exists for this topology; no channel has been created"
                );
                Vec::new()
            }
        };

        debug!(channels = channels.len(), "Topology built");
        TopologyPlan {
            channels,
            shared_transmission: self.topology.is_shared_transmission(),
        }
    }

    fn channel<'c, S, T, A, P>(
        &self,
        owner: Option<&Communicator>,
        users: impl Iterator<Item = &'c Communicator>,
    ) -> Channel<S, T, A, P> {
        Channel::new(owner, users.cloned(), self.registration_cap)
    }

    /// Everyone else's line: one channel per communicator, owned by it.
    fn full_duplex_broadcast<S, T, A, P>(&self) -> Vec<Channel<S, T, A, P>> {
        self.communicators
            .iter()
            .map(|owner| {
                let others = self
                    .communicators
                    .iter()
                    .filter(|other| other.id() != owner.id());
                self.channel(Some(owner), others)
            })
            .collect()
    }

    fn client_server_broadcast<S, T, A, P>(&self) -> Option<Channel<S, T, A, P>> {
        let owners: Vec<&Communicator> = self
            .communicators
            .iter()
            .filter(|communicator| communicator.is_owner())
            .collect();

        let Some(owner) = owners.first().copied() else {
            error!("Client-server broadcast requires one owner among the communicators; no channel has been created");
            return None;
        };

        if owners.len() > 1 {
            let listed = owners
                .iter()
                .map(|owner| owner.id())
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                owners = %listed,
                chosen = owner.id(),
                "Communicators list for client-server broadcast contains multiple owners; only the first one is admitted"
            );
        }

        let users = self
            .communicators
            .iter()
            .filter(|communicator| communicator.id() != owner.id());
        Some(self.channel(Some(owner), users))
    }

    fn shared_multicast<S, T, A, P>(&self) -> Vec<Channel<S, T, A, P>> {
        if self.topology.multicast_groups.is_empty() {
            warn!("Multicast topology declares no groups; no channel has been created");
            return Vec::new();
        }

        self.topology
            .multicast_groups
            .iter()
            .map(|group| {
                let members = group.members.iter().filter_map(|member| {
                    let found = self.communicators.iter().find(|c| c.id() == member);
                    if found.is_none() {
                        warn!(group = %group.name, member = %member, "Multicast member is not a known communicator; skipped");
                    }
                    found
                });
                self.channel(None, members)
            })
            .collect()
    }

    fn shared_unicast<S, T, A, P>(&self) -> Vec<Channel<S, T, A, P>> {
        self.communicators
            .iter()
            .enumerate()
            .flat_map(|(index, first)| {
                self.communicators[index + 1..]
                    .iter()
                    .map(move |second| self.channel(None, [first, second].into_iter()))
            })
            .collect()
    }
}
