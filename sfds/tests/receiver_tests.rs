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
use sfds_test::prelude::*;

use crate::setup::*;

mod setup;

fn bridge() -> anyhow::Result<Deck> {
    deck(Topology::shared_broadcast(), crew(&["enterprise", "reliant"]))
}

fn reports(stardates: impl IntoIterator<Item = u32>) -> Vec<Transmission> {
    stardates
        .into_iter()
        .map(|n| transmission("enterprise", "reliant", Order::Report, n))
        .collect()
}

#[sfds_test]
async fn queued_listener_sees_batches_in_publish_order() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let (probe, mut observed) = batch_probe();
    sfds.receiver().receive_all("log", "", probe)?;
    let generator = sfds.generator();

    generator.send_some("first", "", reports([1]))?;
    generator.send_some("second", "", reports([2]))?;

    assert_eq!(next(&mut observed).await?, vec![1]);
    assert_eq!(next(&mut observed).await?, vec![2]);
    assert!(stays_quiet(&mut observed).await);
    Ok(())
}

#[sfds_test]
async fn receive_one_picks_the_indexed_signal() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let (probe, mut observed) = signal_probe();
    sfds.receiver().receive_one("log", "", 1, probe)?;

    sfds.generator().send_some("report", "", reports([10, 20, 30]))?;

    assert_eq!(next(&mut observed).await?, 20);
    Ok(())
}

#[sfds_test]
async fn out_of_range_index_skips_only_that_batch() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let (probe, mut observed) = signal_probe();
    sfds.receiver().receive_one("log", "", 1, probe)?;
    let generator = sfds.generator();

    generator.send_some("a", "", reports([1, 2]))?;
    generator.send_some("b", "", reports([3]))?;
    generator.send_some("c", "", reports([4, 5]))?;

    assert_eq!(next(&mut observed).await?, 2);
    assert_eq!(next(&mut observed).await?, 5);
    assert!(stays_quiet(&mut observed).await);
    Ok(())
}

#[sfds_test]
async fn latest_listener_only_moves_forward() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let (mut probe, mut observed) = batch_probe();
    sfds.receiver().receive_latest_all("viewscreen", "", move |batch| {
        // Slow consumer: the channel keeps publishing while this sleeps.
        std::thread::sleep(Duration::from_millis(5));
        probe(batch);
    })?;
    let generator = sfds.generator();

    for n in 0..50 {
        generator.send_some("report", "", reports([n, n]))?;
    }

    let mut seen = Vec::new();
    loop {
        let batch = next(&mut observed).await?;
        assert_eq!(batch.len(), 2, "batches are never split");
        seen.push(batch[0]);
        if batch[0] == 49 {
            break;
        }
    }

    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]), "{seen:?}");
    assert!(seen.iter().all(|&n| n < 50));
    assert!(stays_quiet(&mut observed).await);
    Ok(())
}

#[sfds_test]
async fn latest_one_applies_the_index_check() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let (probe, mut observed) = signal_probe();
    sfds.receiver().receive_latest_one("viewscreen", "", 2, probe)?;
    let generator = sfds.generator();

    generator.send_some("report", "", reports([1, 2, 3]))?;
    assert_eq!(next(&mut observed).await?, 3);

    generator.send_some("report", "", reports([4]))?;
    assert!(stays_quiet(&mut observed).await);

    generator.send_some("report", "", reports([5, 6, 7]))?;
    assert_eq!(next(&mut observed).await?, 7);
    Ok(())
}

#[sfds_test]
async fn reused_session_id_replaces_the_listener() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let receiver = sfds.receiver();
    let (first_probe, mut first) = batch_probe();
    let (second_probe, mut second) = batch_probe();

    receiver.receive_all("bridge", "", first_probe)?;
    receiver.receive_all("bridge", "", second_probe)?;
    assert_eq!(receiver.sessions().len(), 1);

    sfds.generator().send_some("report", "", reports([1]))?;

    assert_eq!(next(&mut second).await?, vec![1]);
    let replaced = tokio::time::timeout(QUIET, first.recv()).await;
    assert!(matches!(replaced, Err(_) | Ok(None)), "replaced listener observed {replaced:?}");
    Ok(())
}

#[sfds_test]
async fn receivers_keep_separate_session_tables() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let (first_probe, mut first) = batch_probe();
    let (second_probe, mut second) = batch_probe();

    sfds.receiver().receive_all("bridge", "", first_probe)?;
    sfds.receiver().receive_all("bridge", "", second_probe)?;

    sfds.generator().send_some("report", "", reports([1]))?;

    assert_eq!(next(&mut first).await?, vec![1]);
    assert_eq!(next(&mut second).await?, vec![1]);
    Ok(())
}

#[sfds_test]
async fn late_listener_gets_no_history() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let generator = sfds.generator();
    let (early_probe, mut early) = batch_probe();
    sfds.receiver().receive_all("early", "", early_probe)?;

    generator.send_some("report", "", reports([1]))?;
    assert_eq!(next(&mut early).await?, vec![1]);

    let (late_probe, mut late) = batch_probe();
    sfds.receiver().receive_all("late", "", late_probe)?;
    assert!(stays_quiet(&mut late).await);

    generator.send_some("report", "", reports([2]))?;
    assert_eq!(next(&mut early).await?, vec![2]);
    assert_eq!(next(&mut late).await?, vec![2]);
    Ok(())
}

#[sfds_test]
async fn cancelled_listener_stops_observing() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let receiver = sfds.receiver();
    let (probe, mut observed) = batch_probe();
    receiver.receive_all("log", "", probe)?;

    assert!(receiver.cancel("log"));
    assert!(!receiver.sessions().contains("log"));
    sfds.generator().send_some("report", "", reports([1]))?;

    let after = tokio::time::timeout(QUIET, observed.recv()).await;
    assert!(matches!(after, Err(_) | Ok(None)), "cancelled listener observed {after:?}");
    Ok(())
}

#[sfds_test]
async fn unknown_channel_is_dropped_without_a_session() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let receiver = sfds.receiver();
    let (stray_probe, mut stray) = batch_probe();
    let (probe, mut observed) = batch_probe();

    receiver.receive_all("stray", "Q-continuum", stray_probe)?;
    assert!(receiver.sessions().is_empty());
    receiver.receive_all("log", "", probe)?;

    sfds.generator().send_some("report", "", reports([1]))?;

    assert_eq!(next(&mut observed).await?, vec![1]);
    assert!(stray.recv().await.is_none(), "the stray callback was never attached");
    assert_eq!(receiver.sessions().session_ids(), vec!["log".to_owned()]);
    Ok(())
}

#[sfds_test]
async fn incomplete_signals_are_left_to_the_callback() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let (sender, mut observed) = tokio::sync::mpsc::unbounded_channel();
    sfds.receiver().receive_all("log", "", move |batch| {
        let complete = batch.iter().filter_map(Signal::validate).count();
        let _ = sender.send((batch.len(), complete));
    })?;

    let partial = Transmission::default().with_action(Order::Hail);
    sfds.generator().send_some(
        "mixed",
        "",
        vec![partial, transmission("enterprise", "reliant", Order::Engage, 1)],
    )?;

    assert_eq!(next(&mut observed).await?, (2, 1));
    Ok(())
}

#[sfds_test]
async fn receives_after_shutdown_are_refused() -> anyhow::Result<()> {
    initialize_tracing();
    let sfds = bridge()?;
    let receiver = sfds.receiver();

    sfds.shutdown().await;

    let (probe, _observed) = batch_probe();
    assert!(matches!(receiver.receive(probe), Err(SfdsError::Shutdown)));
    Ok(())
}
