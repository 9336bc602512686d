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
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::common::Carrier;

/// Which side of the system a [`SessionTable`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Publish sessions owned by a generator.
    Send,
    /// Listen sessions owned by a receiver.
    Receive,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => f.write_str("send"),
            Self::Receive => f.write_str("receive"),
        }
    }
}

/// The token recorded for one claim of a session id, tagged with the claim
/// it came from.
#[derive(Debug, Clone)]
pub(crate) struct SessionClaim {
    pub(crate) generation: u64,
    pub(crate) token: CancellationToken,
}

/// Maps caller-chosen session ids to the cancellation token of the one task
/// running under that id.
///
/// Starting a session under an id already in use cancels the recorded task
/// and records the new one. The swap happens under the map's shard lock, so
/// interleaved calls on the same id always leave exactly one live token.
/// Cancellation is cooperative: the superseded task notices at its next
/// suspension point, and the caller never waits for it.
///
/// Every token is a child of the system token, so shutting the system down
/// cancels all sessions at once.
#[derive(Debug)]
pub struct SessionTable {
    kind: SessionKind,
    sessions: DashMap<String, SessionClaim>,
    generations: AtomicU64,
    parent: CancellationToken,
    log_supersession: bool,
}

impl SessionTable {
    pub(crate) fn new(kind: SessionKind, parent: CancellationToken, log_supersession: bool) -> Self {
        Self {
            kind,
            sessions: DashMap::new(),
            generations: AtomicU64::new(0),
            parent,
            log_supersession,
        }
    }

    /// Records a fresh token under `session_id`, cancelling whatever was there.
    pub(crate) fn claim(&self, session_id: &str) -> SessionClaim {
        let claim = SessionClaim {
            generation: self.generations.fetch_add(1, Ordering::Relaxed),
            token: self.parent.child_token(),
        };
        if let Some(previous) = self.sessions.insert(session_id.to_owned(), claim.clone()) {
            previous.token.cancel();
            if self.log_supersession {
                info!(
                    session = session_id,
                    kind = %self.kind,
                    "A pre-existent session has been cancelled to create this new one"
                );
            } else {
                trace!(session = session_id, kind = %self.kind, "Session superseded");
            }
        }
        claim
    }

    /// Forgets `session_id` if it still holds the claim tagged `generation`.
    ///
    /// A newer claim under the same id is left in place.
    pub(crate) fn finish(&self, session_id: &str, generation: u64) -> bool {
        let finished = self
            .sessions
            .remove_if(session_id, |_, claim| claim.generation == generation)
            .is_some();
        if finished {
            trace!(session = session_id, kind = %self.kind, "Session finished");
        }
        finished
    }

    /// Claims `session_id` and launches `work` on `carrier` with the new token.
    pub(crate) fn start<F, Fut>(&self, carrier: &dyn Carrier, session_id: &str, work: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let claim = self.claim(session_id);
        carrier.launch(Box::pin(work(claim.token)));
        trace!(session = session_id, kind = %self.kind, "Session started");
    }

    /// The side this table serves.
    pub const fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Cancels the task under `session_id` and forgets the id.
    ///
    /// Returns `false` when no such session is recorded.
    pub fn cancel(&self, session_id: &str) -> bool {
        let Some((_, claim)) = self.sessions.remove(session_id) else {
            return false;
        };
        claim.token.cancel();
        debug!(session = session_id, kind = %self.kind, "Session cancelled");
        true
    }

    /// Cancels and forgets every session.
    pub fn cancel_all(&self) {
        self.sessions.retain(|_, claim| {
            claim.token.cancel();
            false
        });
        debug!(kind = %self.kind, "All sessions cancelled");
    }

    /// `true` when `session_id` is recorded and its token has not been cancelled.
    pub fn is_active(&self, session_id: &str) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(|claim| !claim.token.is_cancelled())
    }

    /// `true` when `session_id` is recorded.
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Number of recorded sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// `true` when no session is recorded.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Recorded session ids, in no particular order.
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }
}
