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

//! System entry point and shared building blocks.
//!
//! *   [`Sfds`]: a constructed signal system, handing out generators and receivers.
//! *   [`SfdsBuilder`]: assembles topology, communicators, carrier and configuration.
//! *   [`AddressBook`]: the id → channel registry built once from the topology.
//! *   [`Carrier`]: the scheduler seam every publish and listen task runs on.
//! *   [`SfdsConfig`]: configuration loaded from XDG-compliant locations.

pub use address_book::AddressBook;
pub use carrier::{Carrier, CarrierTask, TokioCarrier};
pub use config::{BehaviorConfig, DefaultsConfig, LimitsConfig, SfdsConfig};
pub use sfds::{Sfds, SfdsBuilder};
pub(crate) use sfds_inner::SfdsInner;
pub use types::*;

/// Defines the channel registry.
mod address_book;
/// Defines the task-launching abstraction.
mod carrier;
/// Defines the configuration system.
pub mod config;
/// Defines the `Sfds` entry point and its builder.
mod sfds;
/// Defines the state shared by a system's generators and receivers.
mod sfds_inner;
/// Defines common type aliases.
mod types;
