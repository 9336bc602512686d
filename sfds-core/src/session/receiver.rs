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

use static_assertions::assert_impl_all;
use tracing::{error, instrument, trace, warn};

use crate::channel::{DeliveryMode, Subscription};
use crate::common::{Batch, SfdsInner};
use crate::message::{SfdsError, Signal, SignalField};
use crate::session::{SessionKind, SessionTable};

/// Attaches listeners to channels.
///
/// Each `receive_*` call resolves the channel, subscribes to it before
/// returning, and launches a long-running listener under `session_id` in this
/// receiver's [`SessionTable`]. Listening again under the same id replaces the
/// previous listener.
///
/// Queued listeners see every batch published after the call, in publish
/// order. Latest listeners skip batches they were too slow to take and only
/// ever see the newest one. Callbacks run on the listener task and should not
/// block.
pub struct Receiver<S, T, A, P> {
    inner: Arc<SfdsInner<S, T, A, P>>,
    sessions: Arc<SessionTable>,
}

impl<S, T, A, P> Clone for Receiver<S, T, A, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<S, T, A, P> fmt::Debug for Receiver<S, T, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl<S, T, A, P> Receiver<S, T, A, P>
where
    S: SignalField,
    T: SignalField,
    A: SignalField,
    P: SignalField,
{
    pub(crate) fn new(inner: Arc<SfdsInner<S, T, A, P>>) -> Self {
        let sessions = Arc::new(SessionTable::new(
            SessionKind::Receive,
            inner.cancellation_token.clone(),
            inner.config.behavior.log_supersession,
        ));
        Self { inner, sessions }
    }

    /// Calls `on_signal` with the signal at `signal_index` of every batch.
    ///
    /// A batch too short for the index is reported and skipped; the listener
    /// keeps going. A channel id that does not resolve is reported and the
    /// request dropped without recording a session.
    ///
    /// # Errors
    ///
    /// [`SfdsError::Shutdown`] after shutdown. The session table is untouched.
    pub fn receive_one<F>(
        &self,
        session_id: &str,
        channel_id: &str,
        signal_index: usize,
        mut on_signal: F,
    ) -> Result<(), SfdsError>
    where
        F: FnMut(&Signal<S, T, A, P>) + Send + 'static,
    {
        self.listen(session_id, channel_id, DeliveryMode::Queued, move |batch| {
            analyze_signal(&batch[..], signal_index, &mut on_signal);
        })
    }

    /// Calls `on_batch` with every batch in full.
    ///
    /// # Errors
    ///
    /// Same as [`Receiver::receive_one`].
    pub fn receive_all<F>(
        &self,
        session_id: &str,
        channel_id: &str,
        mut on_batch: F,
    ) -> Result<(), SfdsError>
    where
        F: FnMut(&[Signal<S, T, A, P>]) + Send + 'static,
    {
        self.listen(session_id, channel_id, DeliveryMode::Queued, move |batch| {
            on_batch(&batch[..]);
        })
    }

    /// Latest-only variant of [`Receiver::receive_one`].
    ///
    /// # Errors
    ///
    /// Same as [`Receiver::receive_one`].
    pub fn receive_latest_one<F>(
        &self,
        session_id: &str,
        channel_id: &str,
        signal_index: usize,
        mut on_signal: F,
    ) -> Result<(), SfdsError>
    where
        F: FnMut(&Signal<S, T, A, P>) + Send + 'static,
    {
        self.listen(session_id, channel_id, DeliveryMode::Latest, move |batch| {
            analyze_signal(&batch[..], signal_index, &mut on_signal);
        })
    }

    /// Latest-only variant of [`Receiver::receive_all`].
    ///
    /// # Errors
    ///
    /// Same as [`Receiver::receive_one`].
    pub fn receive_latest_all<F>(
        &self,
        session_id: &str,
        channel_id: &str,
        mut on_batch: F,
    ) -> Result<(), SfdsError>
    where
        F: FnMut(&[Signal<S, T, A, P>]) + Send + 'static,
    {
        self.listen(session_id, channel_id, DeliveryMode::Latest, move |batch| {
            on_batch(&batch[..]);
        })
    }

    /// [`Receiver::receive_all`] with the configured default session and channel ids.
    ///
    /// # Errors
    ///
    /// Same as [`Receiver::receive_one`].
    pub fn receive<F>(&self, on_batch: F) -> Result<(), SfdsError>
    where
        F: FnMut(&[Signal<S, T, A, P>]) + Send + 'static,
    {
        let defaults = &self.inner.config.defaults;
        self.receive_all(&defaults.session_id, &defaults.channel_id, on_batch)
    }

    #[instrument(skip(self, analyze))]
    fn listen<F>(
        &self,
        session_id: &str,
        channel_id: &str,
        mode: DeliveryMode,
        mut analyze: F,
    ) -> Result<(), SfdsError>
    where
        F: FnMut(Batch<S, T, A, P>) + Send + 'static,
    {
        if self.inner.is_shut_down() {
            warn!("Signal system is shut down; receive dropped");
            return Err(SfdsError::Shutdown);
        }
        let Some(channel) = self.inner.address_book.find(channel_id) else {
            return Ok(());
        };
        let mut subscription: Subscription<Batch<S, T, A, P>> = channel.subscribe(mode);
        let channel_id = channel.id().to_owned();

        self.sessions
            .start(self.inner.carrier.as_ref(), session_id, move |token| async move {
                loop {
                    tokio::select! {
                        biased;
                        () = token.cancelled() => {
                            trace!(channel = %channel_id, "Listener cancelled");
                            break;
                        }
                        batch = subscription.next() => {
                            let Some(batch) = batch else {
                                trace!(channel = %channel_id, "Channel closed; listener stopped");
                                break;
                            };
                            analyze(batch);
                        }
                    }
                }
            });
        Ok(())
    }
}

impl<S, T, A, P> Receiver<S, T, A, P> {
    /// Stops the listener recorded under `session_id`.
    pub fn cancel(&self, session_id: &str) -> bool {
        self.sessions.cancel(session_id)
    }

    /// This receiver's listen-session table.
    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }
}

fn analyze_signal<S, T, A, P, F>(batch: &[Signal<S, T, A, P>], signal_index: usize, on_signal: &mut F)
where
    F: FnMut(&Signal<S, T, A, P>),
{
    match batch.get(signal_index) {
        Some(signal) => on_signal(signal),
        None => error!(
            signal_index,
            signals = batch.len(),
            "Index {signal_index} is out of the indexes present in the retrieved list of signals"
        ),
    }
}

assert_impl_all!(Receiver<String, String, String, String>: Send, Sync, Clone);
