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
use std::fmt::Debug;

use static_assertions::assert_impl_all;

/// Marker trait for the four type parameters of a [`Signal`].
///
/// Batches are shared between every subscriber of a channel and cross task
/// boundaries, so each field type must be cheaply clonable, debuggable and
/// thread-safe. A blanket implementation covers every qualifying type.
pub trait SignalField: Clone + Debug + Send + Sync + 'static {}

impl<T> SignalField for T where T: Clone + Debug + Send + Sync + 'static {}

/// A message envelope carrying a sender, a target, an action and a payload.
///
/// Each field is independently optional. A signal is immutable once built:
/// the `with_*` methods consume it and return a new value. Use
/// [`Signal::validate`] to decide whether a received signal is usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signal<S, T, A, P> {
    sender: Option<S>,
    target: Option<T>,
    action: Option<A>,
    payload: Option<P>,
}

/// A [`Signal`] whose four fields are all present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedSignal<S, T, A, P> {
    /// Who emitted the signal.
    pub sender: S,
    /// Who the signal is meant for.
    pub target: T,
    /// What the target is asked to do.
    pub action: A,
    /// Data accompanying the action.
    pub payload: P,
}

impl<S, T, A, P> Default for Signal<S, T, A, P> {
    fn default() -> Self {
        Self {
            sender: None,
            target: None,
            action: None,
            payload: None,
        }
    }
}

impl<S, T, A, P> Signal<S, T, A, P> {
    /// Builds a signal from four optional fields.
    pub const fn new(
        sender: Option<S>,
        target: Option<T>,
        action: Option<A>,
        payload: Option<P>,
    ) -> Self {
        Self {
            sender,
            target,
            action,
            payload,
        }
    }

    /// Builds a signal with every field present.
    pub const fn complete(sender: S, target: T, action: A, payload: P) -> Self {
        Self::new(Some(sender), Some(target), Some(action), Some(payload))
    }

    /// Returns the sender, if present.
    pub const fn sender(&self) -> Option<&S> {
        self.sender.as_ref()
    }

    /// Returns the target, if present.
    pub const fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Returns the action, if present.
    pub const fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    /// Returns the payload, if present.
    pub const fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    /// Returns a copy of this signal with `sender` set.
    #[must_use]
    pub fn with_sender(self, sender: S) -> Self {
        Self {
            sender: Some(sender),
            ..self
        }
    }

    /// Returns a copy of this signal with `target` set.
    #[must_use]
    pub fn with_target(self, target: T) -> Self {
        Self {
            target: Some(target),
            ..self
        }
    }

    /// Returns a copy of this signal with `action` set.
    #[must_use]
    pub fn with_action(self, action: A) -> Self {
        Self {
            action: Some(action),
            ..self
        }
    }

    /// Returns a copy of this signal with `payload` set.
    #[must_use]
    pub fn with_payload(self, payload: P) -> Self {
        Self {
            payload: Some(payload),
            ..self
        }
    }

    /// `true` when sender, target, action and payload are all present.
    pub const fn is_complete(&self) -> bool {
        self.sender.is_some()
            && self.target.is_some()
            && self.action.is_some()
            && self.payload.is_some()
    }

    /// Consumes the signal, yielding its populated form only if no field is absent.
    pub fn into_validated(self) -> Option<ValidatedSignal<S, T, A, P>> {
        match (self.sender, self.target, self.action, self.payload) {
            (Some(sender), Some(target), Some(action), Some(payload)) => Some(ValidatedSignal {
                sender,
                target,
                action,
                payload,
            }),
            _ => None,
        }
    }
}

impl<S, T, A, P> Signal<S, T, A, P>
where
    S: Clone,
    T: Clone,
    A: Clone,
    P: Clone,
{
    /// Yields the populated form of this signal only if all four fields are present.
    ///
    /// This is the single point where a signal is judged usable. Receivers
    /// should ignore signals for which this returns `None`.
    pub fn validate(&self) -> Option<ValidatedSignal<S, T, A, P>> {
        self.clone().into_validated()
    }
}

impl<S, T, A, P> From<ValidatedSignal<S, T, A, P>> for Signal<S, T, A, P> {
    fn from(value: ValidatedSignal<S, T, A, P>) -> Self {
        Self::complete(value.sender, value.target, value.action, value.payload)
    }
}

assert_impl_all!(Signal<String, String, String, String>: Send, Sync, SignalField);
