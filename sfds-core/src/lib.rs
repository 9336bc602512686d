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

#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! SFDS Core Library
//!
//! Signals From Deep Space is an in-process publish/subscribe layer. A
//! declared [`Topology`](crate::topology::Topology) and a list of
//! [`Communicator`](crate::message::Communicator)s are turned, once, into an
//! [`AddressBook`](crate::common::AddressBook) of channels. Producers publish
//! batches of [`Signal`](crate::message::Signal)s through a
//! [`Generator`](crate::session::Generator); consumers attach queued or
//! latest-only listeners through a [`Receiver`](crate::session::Receiver).
//! Every send and listen runs under a caller-named session; reusing a session
//! id cancels the previous task.

/// System entry point, configuration, address book and the scheduler seam.
pub(crate) mod common;

/// Channels and their subscriber taps.
pub(crate) mod channel;

/// Signals, communicators and errors.
pub(crate) mod message;

/// Connection types, transmission behaviors and the topology builder.
pub(crate) mod topology;

/// Session tables, generators and receivers.
pub(crate) mod session;

/// Prelude module for convenient imports.
///
/// Re-exports the types needed to build a system, publish and listen, plus
/// the `async_trait` macro for implementing [`Carrier`](crate::common::Carrier).
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::channel::{Channel, DeliveryMode, Subscription};
    pub use crate::common::config::CONFIG;
    pub use crate::common::{
        AddressBook, Batch, BehaviorConfig, Carrier, CarrierTask, DefaultsConfig, LimitsConfig,
        Sfds, SfdsBuilder, SfdsConfig, TokioCarrier,
    };
    pub use crate::message::{Communicator, SfdsError, Signal, SignalField, ValidatedSignal};
    pub use crate::session::{Generator, Receiver, SessionKind, SessionTable};
    pub use crate::topology::{ConnectionType, MulticastGroup, Topology, TransmissionBehavior};
}
