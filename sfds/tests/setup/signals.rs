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

use sfds::prelude::*;

/// What a ship asks of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Hail,
    Engage,
    Report,
}

/// Signal used across the integration tests: sender and target are
/// communicator ids, the payload is a stardate.
pub type Transmission = Signal<String, String, Order, u32>;

pub type Deck = Sfds<String, String, Order, u32>;

pub fn transmission(sender: &str, target: &str, order: Order, stardate: u32) -> Transmission {
    Signal::complete(sender.to_owned(), target.to_owned(), order, stardate)
}

pub fn stardate(signal: &Transmission) -> u32 {
    signal.payload().copied().unwrap_or_default()
}

pub fn crew(ids: &[&str]) -> Vec<Communicator> {
    ids.iter().map(|&id| Communicator::user(id)).collect()
}

/// Builds a deck on the current runtime with default configuration.
pub fn deck(topology: Topology, communicators: Vec<Communicator>) -> anyhow::Result<Deck> {
    Ok(Sfds::builder()
        .config(SfdsConfig::default())
        .topology(topology)
        .communicators(communicators)
        .build()?)
}
