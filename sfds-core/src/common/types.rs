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

//! Type aliases shared across the crate.

use std::sync::Arc;

use crate::message::Signal;

/// An immutable group of signals delivered to subscribers as one unit.
///
/// Every subscriber of a channel receives a clone of the same `Arc`, so a
/// batch is never copied per subscriber.
pub type Batch<S, T, A, P> = Arc<[Signal<S, T, A, P>]>;
