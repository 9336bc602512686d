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
use std::marker::PhantomData;
use std::sync::Arc;

use static_assertions::assert_impl_all;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, trace};

use crate::channel::Channel;
use crate::common::config::CONFIG;
use crate::common::{AddressBook, Carrier, SfdsConfig, SfdsInner, TokioCarrier};
use crate::message::{Communicator, SfdsError, SignalField};
use crate::session::{Generator, Receiver};
use crate::topology::{Topology, TopologyBuilder};

/// A running signal system.
///
/// Construction runs the topology builder once and fills the
/// [`AddressBook`]. From then on the channel set never changes. Use
/// [`Sfds::generator`] to publish and [`Sfds::receiver`] to listen; both are
/// bound to this system and launch their tasks on its [`Carrier`].
///
/// `Sfds` is a cheap handle: clones share the same channels.
///
/// # Example
///
/// ```rust,ignore
/// use sfds::prelude::*;
///
/// let sfds: Sfds<String, String, String, String> = Sfds::builder()
///     .topology(Topology::shared_broadcast())
///     .communicators([Communicator::user("kirk"), Communicator::user("spock")])
///     .build()?;
///
/// sfds.receiver().receive_all("bridge", "", |batch| println!("{batch:?}"))?;
/// sfds.generator().send_one("hail", "", Signal::default())?;
/// ```
pub struct Sfds<S, T, A, P> {
    inner: Arc<SfdsInner<S, T, A, P>>,
}

impl<S, T, A, P> Clone for Sfds<S, T, A, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, T, A, P> fmt::Debug for Sfds<S, T, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sfds").field(&self.inner).finish()
    }
}

impl<S, T, A, P> Sfds<S, T, A, P>
where
    S: SignalField,
    T: SignalField,
    A: SignalField,
    P: SignalField,
{
    /// Starts a builder seeded with the global [`CONFIG`].
    pub fn builder() -> SfdsBuilder<S, T, A, P> {
        SfdsBuilder::new(CONFIG.clone())
    }

    /// Builds a system on an explicit carrier with default configuration.
    pub fn new(
        carrier: Arc<dyn Carrier>,
        topology: Topology,
        communicators: Vec<Communicator>,
    ) -> Self {
        Self::assemble(
            carrier,
            topology,
            communicators,
            Vec::new(),
            SfdsConfig::default(),
        )
    }

    /// Builds a system on the tokio runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`SfdsError::NoCarrier`] when called outside a tokio runtime.
    pub fn launch(topology: Topology, communicators: Vec<Communicator>) -> Result<Self, SfdsError> {
        let carrier = TokioCarrier::try_current().ok_or(SfdsError::NoCarrier)?;
        Ok(Self::new(Arc::new(carrier), topology, communicators))
    }

    #[instrument(skip_all, fields(topology = %topology, communicators = communicators.len()))]
    fn assemble(
        carrier: Arc<dyn Carrier>,
        topology: Topology,
        communicators: Vec<Communicator>,
        named_channels: Vec<String>,
        config: SfdsConfig,
    ) -> Self {
        let registration_cap = config.limits.registration_cap;
        let plan = TopologyBuilder::new(&topology, &communicators, registration_cap).build();
        let named = named_channels
            .into_iter()
            .map(|id| Channel::with_id(id, None, [], registration_cap));
        let address_book = AddressBook::from_channels(plan.channels.into_iter().chain(named));

        info!(
            channels = address_book.len(),
            shared_transmission = plan.shared_transmission,
            "Signal system assembled"
        );

        Self {
            inner: Arc::new(SfdsInner {
                address_book,
                carrier,
                cancellation_token: CancellationToken::new(),
                topology,
                communicators,
                shared_transmission: plan.shared_transmission,
                config,
            }),
        }
    }

    /// A new generator with its own send-session table.
    ///
    /// Each generator publishes in call order through its own transmitter
    /// task, launched here on the carrier.
    pub fn generator(&self) -> Generator<S, T, A, P> {
        Generator::new(Arc::clone(&self.inner))
    }

    /// A new receiver with its own receive-session table.
    pub fn receiver(&self) -> Receiver<S, T, A, P> {
        Receiver::new(Arc::clone(&self.inner))
    }
}

impl<S, T, A, P> Sfds<S, T, A, P> {
    /// The channel registry built from the topology.
    pub fn address_book(&self) -> &AddressBook<S, T, A, P> {
        &self.inner.address_book
    }

    /// Resolves a channel the same way generators and receivers do.
    pub fn find_channel(&self, channel_id: &str) -> Option<Arc<Channel<S, T, A, P>>> {
        self.inner.address_book.find(channel_id)
    }

    /// The topology the system was built from.
    pub fn topology(&self) -> &Topology {
        &self.inner.topology
    }

    /// The communicators the system was built from.
    pub fn communicators(&self) -> &[Communicator] {
        &self.inner.communicators
    }

    /// `true` when the topology produced shared, ownerless channels.
    pub fn is_shared_transmission(&self) -> bool {
        self.inner.shared_transmission
    }

    /// The configuration in effect.
    pub fn config(&self) -> &SfdsConfig {
        &self.inner.config
    }

    /// `true` once [`Sfds::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        self.inner.is_shut_down()
    }

    /// Cancels every session and transmitter, then waits for the carrier to drain.
    ///
    /// Further send and receive calls on any generator or receiver of this
    /// system return [`SfdsError::Shutdown`].
    pub async fn shutdown(&self) {
        trace!("Shutting down signal system");
        self.inner.cancellation_token.cancel();
        self.inner.carrier.drain().await;
        info!("Signal system shut down");
    }
}

/// Assembles an [`Sfds`].
///
/// Unset parts fall back to the configuration: the topology comes from
/// `[topology]`, and the carrier defaults to the current tokio runtime.
pub struct SfdsBuilder<S, T, A, P> {
    config: SfdsConfig,
    topology: Option<Topology>,
    communicators: Vec<Communicator>,
    carrier: Option<Arc<dyn Carrier>>,
    named_channels: Vec<String>,
    _signal: PhantomData<fn() -> (S, T, A, P)>,
}

impl<S, T, A, P> fmt::Debug for SfdsBuilder<S, T, A, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SfdsBuilder")
            .field("config", &self.config)
            .field("topology", &self.topology)
            .field("communicators", &self.communicators)
            .field("carrier", &self.carrier)
            .field("named_channels", &self.named_channels)
            .finish()
    }
}

impl<S, T, A, P> SfdsBuilder<S, T, A, P>
where
    S: SignalField,
    T: SignalField,
    A: SignalField,
    P: SignalField,
{
    /// Starts from an explicit configuration.
    pub fn new(config: SfdsConfig) -> Self {
        Self {
            config,
            topology: None,
            communicators: Vec::new(),
            carrier: None,
            named_channels: Vec::new(),
            _signal: PhantomData,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn config(mut self, config: SfdsConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the topology, overriding the configured one.
    #[must_use]
    pub fn topology(mut self, topology: Topology) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Adds one communicator.
    #[must_use]
    pub fn communicator(mut self, communicator: Communicator) -> Self {
        self.communicators.push(communicator);
        self
    }

    /// Adds communicators in order.
    #[must_use]
    pub fn communicators(mut self, communicators: impl IntoIterator<Item = Communicator>) -> Self {
        self.communicators.extend(communicators);
        self
    }

    /// Launches tasks on `carrier`.
    #[must_use]
    pub fn carrier(mut self, carrier: impl Carrier) -> Self {
        self.carrier = Some(Arc::new(carrier));
        self
    }

    /// Launches tasks on an already shared carrier.
    #[must_use]
    pub fn shared_carrier(mut self, carrier: Arc<dyn Carrier>) -> Self {
        self.carrier = Some(carrier);
        self
    }

    /// Adds an ownerless channel under a caller-chosen id, after the
    /// topology's own channels.
    #[must_use]
    pub fn named_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.named_channels.push(channel_id.into());
        self
    }

    /// Builds the system.
    ///
    /// # Errors
    ///
    /// Returns [`SfdsError::NoCarrier`] when no carrier was given and the
    /// caller is not inside a tokio runtime.
    pub fn build(self) -> Result<Sfds<S, T, A, P>, SfdsError> {
        let carrier: Arc<dyn Carrier> = match self.carrier {
            Some(carrier) => carrier,
            None => Arc::new(TokioCarrier::try_current().ok_or(SfdsError::NoCarrier)?),
        };
        let topology = self
            .topology
            .unwrap_or_else(|| self.config.topology.clone());
        Ok(Sfds::assemble(
            carrier,
            topology,
            self.communicators,
            self.named_channels,
            self.config,
        ))
    }
}

assert_impl_all!(Sfds<String, String, String, String>: Send, Sync, Clone);
