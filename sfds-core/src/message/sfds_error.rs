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
/// Represents the non-fatal conditions reported by SFDS operations.
///
/// None of these terminate the host process or the carrier. They are
/// returned so callers can react, and every one of them is also emitted as a
/// `tracing` event at the point where it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SfdsError {
    /// A batch with no signals was handed to a generator.
    EmptyBatch,
    /// The system has been shut down.
    Shutdown,
    /// No carrier was supplied and no tokio runtime is active.
    NoCarrier,
    /// Configuration text could not be read or parsed.
    Config(String),
}

impl std::fmt::Display for SfdsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "List of signals to send is empty"),
            Self::Shutdown => write!(f, "The signal system has been shut down"),
            Self::NoCarrier => write!(
                f,
                "No carrier supplied and no tokio runtime is available to launch tasks"
            ),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SfdsError {}

impl From<toml::de::Error> for SfdsError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<std::io::Error> for SfdsError {
    fn from(error: std::io::Error) -> Self {
        Self::Config(error.to_string())
    }
}
