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
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An identity taking part in a topology.
///
/// `Owner` and `User` differ only in the role they play in a channel's
/// membership. Equality and hashing look at the id alone, so
/// `Owner("a") == User("a")`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Communicator {
    /// A communicator that can own a channel.
    Owner(String),
    /// A communicator registered on channels as a listener.
    User(String),
}

impl Communicator {
    /// Creates an [`Communicator::Owner`].
    pub fn owner(id: impl Into<String>) -> Self {
        Self::Owner(id.into())
    }

    /// Creates a [`Communicator::User`].
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }

    /// The identity string.
    pub fn id(&self) -> &str {
        match self {
            Self::Owner(id) | Self::User(id) => id,
        }
    }

    /// `true` for the `Owner` role.
    pub const fn is_owner(&self) -> bool {
        matches!(self, Self::Owner(_))
    }

    /// The same identity in the `User` role.
    #[must_use]
    pub fn as_user(&self) -> Self {
        Self::User(self.id().to_owned())
    }

    /// The same identity in the `Owner` role.
    #[must_use]
    pub fn as_owner(&self) -> Self {
        Self::Owner(self.id().to_owned())
    }
}

impl PartialEq for Communicator {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Communicator {}

impl Hash for Communicator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Communicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner(id) => write!(f, "owner:{id}"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}
