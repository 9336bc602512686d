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

use derive_new::new;
use static_assertions::assert_impl_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

use crate::common::{AddressBook, Batch, SfdsInner};
use crate::message::{SfdsError, Signal, SignalField};
use crate::session::{SessionKind, SessionTable};

/// A publish request waiting in a generator's outbox.
#[derive(new)]
struct Dispatch<S, T, A, P> {
    session_id: String,
    channel_id: String,
    batch: Batch<S, T, A, P>,
    generation: u64,
    token: CancellationToken,
}

impl<S, T, A, P> Dispatch<S, T, A, P> {
    fn deliver(&self, address_book: &AddressBook<S, T, A, P>, sessions: &SessionTable) {
        if self.token.is_cancelled() {
            debug!(
                session = %self.session_id,
                "Publish cancelled before reaching its channel"
            );
        } else {
            self.publish(address_book);
        }
        sessions.finish(&self.session_id, self.generation);
    }

    fn publish(&self, address_book: &AddressBook<S, T, A, P>) {
        let Some(channel) = address_book.find(&self.channel_id) else {
            return;
        };
        let signals = self.batch.len();
        let subscribers = channel.publish(Arc::clone(&self.batch));
        trace!(
            session = %self.session_id,
            channel = channel.id(),
            signals,
            subscribers,
            "Signals transmitted"
        );
    }
}

/// Publishes signals onto channels.
///
/// Every send is recorded under a caller-chosen session id in this
/// generator's own [`SessionTable`]. Sending again under the same id cancels
/// the earlier send if it has not reached its channel yet.
///
/// Sends return as soon as the request is queued. A single transmitter task
/// per generator, launched on the system's carrier, drains the queue in call
/// order, resolving the channel and publishing each batch as one unit. Once a
/// send has been handled its session is forgotten. Clones share the
/// transmitter and the session table.
pub struct Generator<S, T, A, P> {
    inner: Arc<SfdsInner<S, T, A, P>>,
    sessions: Arc<SessionTable>,
    outbox: mpsc::UnboundedSender<Dispatch<S, T, A, P>>,
}

impl<S, T, A, P> Clone for Generator<S, T, A, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            sessions: Arc::clone(&self.sessions),
            outbox: self.outbox.clone(),
        }
    }
}

impl<S, T, A, P> fmt::Debug for Generator<S, T, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl<S, T, A, P> Generator<S, T, A, P>
where
    S: SignalField,
    T: SignalField,
    A: SignalField,
    P: SignalField,
{
    pub(crate) fn new(inner: Arc<SfdsInner<S, T, A, P>>) -> Self {
        let sessions = Arc::new(SessionTable::new(
            SessionKind::Send,
            inner.cancellation_token.clone(),
            inner.config.behavior.log_supersession,
        ));
        let (outbox, inbox) = mpsc::unbounded_channel();
        inner.carrier.launch(Box::pin(Self::transmit(
            Arc::clone(&inner),
            Arc::clone(&sessions),
            inbox,
        )));
        Self {
            inner,
            sessions,
            outbox,
        }
    }

    async fn transmit(
        inner: Arc<SfdsInner<S, T, A, P>>,
        sessions: Arc<SessionTable>,
        mut inbox: mpsc::UnboundedReceiver<Dispatch<S, T, A, P>>,
    ) {
        let shutdown = inner.cancellation_token.clone();
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    trace!("Transmitter stopped by shutdown");
                    break;
                }
                dispatch = inbox.recv() => {
                    let Some(dispatch) = dispatch else {
                        trace!("Every generator handle dropped; transmitter stopped");
                        break;
                    };
                    dispatch.deliver(&inner.address_book, &sessions);
                }
            }
        }
    }

    /// Publishes a single signal as a one-element batch.
    ///
    /// A blank `channel_id` targets the first channel of the address book. An
    /// unknown channel is reported when the transmitter reaches the request,
    /// and nothing is published.
    ///
    /// # Errors
    ///
    /// Returns [`SfdsError::Shutdown`] once the system has been shut down.
    pub fn send_one(
        &self,
        session_id: &str,
        channel_id: &str,
        signal: Signal<S, T, A, P>,
    ) -> Result<(), SfdsError> {
        self.dispatch(session_id, channel_id, Arc::from([signal]))
    }

    /// Publishes `signals` as one batch, observed together by every subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`SfdsError::EmptyBatch`] without recording a session when
    /// `signals` is empty, and [`SfdsError::Shutdown`] once the system has
    /// been shut down.
    pub fn send_some(
        &self,
        session_id: &str,
        channel_id: &str,
        signals: Vec<Signal<S, T, A, P>>,
    ) -> Result<(), SfdsError> {
        if signals.is_empty() {
            warn!(session = session_id, "List of signals to send is empty");
            return Err(SfdsError::EmptyBatch);
        }
        self.dispatch(session_id, channel_id, Arc::from(signals))
    }

    /// [`Generator::send_one`] with the configured default session and channel ids.
    ///
    /// # Errors
    ///
    /// Returns [`SfdsError::Shutdown`] once the system has been shut down.
    pub fn send(&self, signal: Signal<S, T, A, P>) -> Result<(), SfdsError> {
        let defaults = &self.inner.config.defaults;
        self.send_one(&defaults.session_id, &defaults.channel_id, signal)
    }

    #[instrument(skip(self, batch), fields(signals = batch.len()))]
    fn dispatch(
        &self,
        session_id: &str,
        channel_id: &str,
        batch: Batch<S, T, A, P>,
    ) -> Result<(), SfdsError> {
        if self.inner.is_shut_down() {
            warn!("Signal system is shut down; send dropped");
            return Err(SfdsError::Shutdown);
        }
        let claim = self.sessions.claim(session_id);
        self.outbox
            .send(Dispatch::new(
                session_id.to_owned(),
                channel_id.to_owned(),
                batch,
                claim.generation,
                claim.token,
            ))
            .map_err(|_| {
                warn!("Transmitter is gone; send dropped");
                SfdsError::Shutdown
            })
    }
}

impl<S, T, A, P> Generator<S, T, A, P> {
    /// Cancels the send recorded under `session_id`. Returns `false` once the
    /// transmitter has handled that send; a batch already published stays
    /// published.
    pub fn cancel(&self, session_id: &str) -> bool {
        self.sessions.cancel(session_id)
    }

    /// This generator's send-session table.
    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }
}

assert_impl_all!(Generator<String, String, String, String>: Send, Sync, Clone);
