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
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::common::{AddressBook, Carrier, SfdsConfig};
use crate::message::Communicator;
use crate::topology::Topology;

/// Internal state shared by a system and every generator and receiver it hands out.
pub(crate) struct SfdsInner<S, T, A, P> {
    /// Channels computed from the topology. Read-only after construction.
    pub(crate) address_book: AddressBook<S, T, A, P>,

    /// Scheduler for transmitters and listeners.
    pub(crate) carrier: Arc<dyn Carrier>,

    /// Parent of every session token. Cancelling it tears the system down.
    pub(crate) cancellation_token: CancellationToken,

    /// Topology the address book was built from.
    pub(crate) topology: Topology,

    /// Communicators the address book was built from.
    pub(crate) communicators: Vec<Communicator>,

    /// Whether the topology produced shared (ownerless) channels.
    pub(crate) shared_transmission: bool,

    /// Configuration in effect when the system was built.
    pub(crate) config: SfdsConfig,
}

impl<S, T, A, P> SfdsInner<S, T, A, P> {
    pub(crate) fn is_shut_down(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}

impl<S, T, A, P> fmt::Debug for SfdsInner<S, T, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SfdsInner")
            .field("topology", &self.topology)
            .field("communicators", &self.communicators)
            .field("shared_transmission", &self.shared_transmission)
            .field("address_book", &self.address_book)
            .field("carrier", &self.carrier)
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}
