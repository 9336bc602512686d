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

use std::time::Duration;

use sfds::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// What one ship asks of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Hail,
    Engage,
    Report,
}

type Fleet = Sfds<String, String, Order, String>;
type Transmission = Signal<String, String, Order, String>;

fn transmission(sender: &str, target: &str, order: Order, text: &str) -> Transmission {
    Signal::complete(sender.to_owned(), target.to_owned(), order, text.to_owned())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sfds_core=info".parse()?))
        .compact()
        .init();

    // 1. Every ship owns an outgoing line that the others listen to.
    let fleet: Fleet = Sfds::builder()
        .topology(Topology::full_duplex_broadcast())
        .communicators([
            Communicator::user("enterprise"),
            Communicator::user("reliant"),
            Communicator::user("excelsior"),
        ])
        .build()?;

    // 2. Each ship listens on every line it is registered on.
    for ship in fleet.communicators() {
        let receiver = fleet.receiver();
        for line in fleet.address_book().channels_for(ship.id()) {
            let Some(owner) = line.owner().filter(|owner| owner.id() != ship.id()) else {
                continue;
            };
            let listener = ship.id().to_owned();
            let session_id = format!("{listener}<-{}", owner.id());
            receiver.receive_all(&session_id, line.id(), move |batch| {
                for signal in batch.iter().filter_map(Signal::validate) {
                    info!(
                        ship = %listener,
                        from = %signal.sender,
                        order = ?signal.action,
                        "{}",
                        signal.payload
                    );
                }
            })?;
        }
    }

    // 3. Latest-only viewscreen on the enterprise's own line.
    let enterprise_line = fleet
        .address_book()
        .owned_by("enterprise")
        .next()
        .map(|line| line.id().to_owned())
        .unwrap_or_default();
    fleet
        .receiver()
        .receive_latest_one("viewscreen", &enterprise_line, 0, |signal: &Transmission| {
            info!(payload = ?signal.payload(), "Viewscreen updated");
        })?;

    // 4. Transmit.
    let generator = fleet.generator();
    generator.send_one(
        "hail",
        &enterprise_line,
        transmission("enterprise", "reliant", Order::Hail, "This is the Enterprise"),
    )?;
    generator.send_some(
        "briefing",
        &enterprise_line,
        vec![
            transmission("enterprise", "excelsior", Order::Report, "Shields at 80%"),
            transmission("enterprise", "reliant", Order::Engage, "Lower your shields"),
        ],
    )?;
    if let Err(error) = generator.send_some("briefing", &enterprise_line, Vec::new()) {
        info!(%error, "Empty briefing refused");
    }

    tokio::time::sleep(Duration::from_millis(100)).await;

    // 5. Stand down.
    fleet.shutdown().await;
    Ok(())
}
