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

use serde::{Deserialize, Serialize};

/// How many communicators a channel links together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// One channel reaches every communicator.
    #[default]
    Broadcast,
    /// One channel per named group of communicators.
    Multicast,
    /// One point-to-point channel per pair of communicators.
    Unicast,
}

/// Who may talk on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransmissionBehavior {
    /// Ownerless channels shared by every member.
    #[default]
    Shared,
    /// Every communicator owns an outgoing line heard by the others.
    FullDuplex,
    /// A single owner transmits to every other communicator.
    ClientServer,
}

/// A named subset of communicators used by multicast topologies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticastGroup {
    /// Group name, for diagnostics.
    pub name: String,
    /// Ids of the communicators in the group.
    pub members: Vec<String>,
}

impl MulticastGroup {
    /// Creates a group from a name and member ids.
    pub fn new<I, M>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// The connection type × transmission behavior pair that decides which
/// channels exist and who belongs to them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Topology {
    /// Channel fan-out.
    pub connection_type: ConnectionType,
    /// Channel ownership rule.
    pub transmission_behavior: TransmissionBehavior,
    /// Groups consulted by [`ConnectionType::Multicast`].
    pub multicast_groups: Vec<MulticastGroup>,
}

impl Topology {
    /// Creates a topology without multicast groups.
    pub const fn new(
        connection_type: ConnectionType,
        transmission_behavior: TransmissionBehavior,
    ) -> Self {
        Self {
            connection_type,
            transmission_behavior,
            multicast_groups: Vec::new(),
        }
    }

    /// Broadcast × Shared.
    pub const fn shared_broadcast() -> Self {
        Self::new(ConnectionType::Broadcast, TransmissionBehavior::Shared)
    }

    /// Multicast × Shared.
    pub const fn shared_multicast() -> Self {
        Self::new(ConnectionType::Multicast, TransmissionBehavior::Shared)
    }

    /// Unicast × Shared.
    pub const fn shared_unicast() -> Self {
        Self::new(ConnectionType::Unicast, TransmissionBehavior::Shared)
    }

    /// Broadcast × FullDuplex.
    pub const fn full_duplex_broadcast() -> Self {
        Self::new(ConnectionType::Broadcast, TransmissionBehavior::FullDuplex)
    }

    /// Multicast × FullDuplex.
    pub const fn full_duplex_multicast() -> Self {
        Self::new(ConnectionType::Multicast, TransmissionBehavior::FullDuplex)
    }

    /// Unicast × FullDuplex.
    pub const fn full_duplex_unicast() -> Self {
        Self::new(ConnectionType::Unicast, TransmissionBehavior::FullDuplex)
    }

    /// Broadcast × ClientServer.
    pub const fn client_server_broadcast() -> Self {
        Self::new(ConnectionType::Broadcast, TransmissionBehavior::ClientServer)
    }

    /// Multicast × ClientServer.
    pub const fn client_server_multicast() -> Self {
        Self::new(ConnectionType::Multicast, TransmissionBehavior::ClientServer)
    }

    /// Unicast × ClientServer.
    pub const fn client_server_unicast() -> Self {
        Self::new(ConnectionType::Unicast, TransmissionBehavior::ClientServer)
    }

    /// Adds a multicast group.
    #[must_use]
    pub fn with_group(mut self, group: MulticastGroup) -> Self {
        self.multicast_groups.push(group);
        self
    }

    /// `true` when every channel of this topology is shared by its members.
    pub const fn is_shared_transmission(&self) -> bool {
        matches!(self.transmission_behavior, TransmissionBehavior::Shared)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.connection_type, self.transmission_behavior)
    }
}
