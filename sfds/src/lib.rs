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
#![forbid(missing_docs)]

//! # SFDS: Signals From Deep Space
//!
//! An in-process publish/subscribe layer. Communicators exchange typed
//! four-field signals over channels whose membership is derived once, at
//! construction, from a declared topology.
//!
//! ## Key Concepts
//!
//! - **Signals (`Signal`)**: sender, target, action and payload, each
//!   optional. `validate` yields a `ValidatedSignal` only when all four are set.
//! - **Topology (`Topology`)**: broadcast, multicast or unicast, shared,
//!   full-duplex or client-server. Decides which channels exist and who
//!   belongs to them.
//! - **Address book (`AddressBook`)**: channel lookup by id. A blank id
//!   means the first channel.
//! - **Generators (`Generator`)**: publish one or more signals as a batch
//!   under a session id. Reusing the id cancels the pending publish.
//! - **Receivers (`Receiver`)**: listen to every batch or only the latest
//!   one, optionally picking one signal out of each batch.
//! - **Carriers (`Carrier`)**: the scheduler every task runs on.
//!   `TokioCarrier` is the default.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sfds::prelude::*;
//!
//! let sfds: Sfds<String, String, String, String> = Sfds::builder()
//!     .topology(Topology::full_duplex_broadcast())
//!     .communicators([Communicator::user("kirk"), Communicator::user("uhura")])
//!     .build()?;
//!
//! let kirk_line = sfds.address_book().owned_by("kirk").next().cloned();
//! ```

/// Commonly used items.
///
/// Re-exports the whole public surface of `sfds-core` along with
/// [`async_trait`](https://docs.rs/async-trait/latest/async_trait/attr.async_trait.html),
/// which custom [`Carrier`](sfds_core::prelude::Carrier) implementations need.
pub mod prelude {
    pub use async_trait::async_trait;
    pub use sfds_core::prelude::*;
}
