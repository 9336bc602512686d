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
use sfds::prelude::*;
use sfds_test::prelude::*;

use crate::setup::*;

mod setup;

const SHIPS: u32 = 4;
const REPORTS: u32 = 50;

fn log_number(ship: u32, report: u32) -> u32 {
    ship * 1000 + report
}

#[sfds_test]
async fn queued_listeners_agree_under_concurrent_generators() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = deck(
        Topology::shared_broadcast(),
        crew(&["enterprise", "reliant", "excelsior", "defiant"]),
    )?;
    let (first_probe, mut first) = signal_probe();
    let (second_probe, mut second) = signal_probe();
    sfds.receiver().receive_one("log", "", 0, first_probe)?;
    sfds.receiver().receive_one("log", "", 0, second_probe)?;

    let mut fleet = Vec::new();
    for ship in 0..SHIPS {
        let generator = sfds.generator();
        fleet.push(tokio::spawn(async move {
            for report in 0..REPORTS {
                let signal = transmission("ship", "fleet", Order::Report, log_number(ship, report));
                generator.send_one(&format!("{ship}-{report}"), "", signal)?;
                tokio::task::yield_now().await;
            }
            Ok::<_, SfdsError>(())
        }));
    }
    for ship in fleet {
        ship.await??;
    }

    let total = (SHIPS * REPORTS) as usize;
    let mut first_log = Vec::with_capacity(total);
    let mut second_log = Vec::with_capacity(total);
    for _ in 0..total {
        first_log.push(next(&mut first).await?);
        second_log.push(next(&mut second).await?);
    }

    assert_eq!(first_log, second_log, "every queued listener sees the same order");
    for ship in 0..SHIPS {
        let own: Vec<u32> = first_log
            .iter()
            .copied()
            .filter(|n| n / 1000 == ship)
            .collect();
        let expected: Vec<u32> = (0..REPORTS).map(|report| log_number(ship, report)).collect();
        assert_eq!(own, expected, "ship {ship} reports arrive in send order");
    }
    Ok(())
}

#[sfds_test]
async fn concurrent_claims_leave_one_live_session() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = deck(Topology::shared_broadcast(), crew(&["enterprise"]))?;
    let receiver = sfds.receiver();

    let mut claims = Vec::new();
    for _ in 0..8 {
        let receiver = receiver.clone();
        claims.push(tokio::spawn(async move {
            for _ in 0..25 {
                let (probe, _observed) = batch_probe();
                receiver.receive_all("viewscreen", "", probe)?;
            }
            Ok::<_, SfdsError>(())
        }));
    }
    for claim in claims {
        claim.await??;
    }

    assert_eq!(receiver.sessions().session_ids(), vec!["viewscreen".to_owned()]);
    assert!(receiver.sessions().is_active("viewscreen"));
    Ok(())
}
