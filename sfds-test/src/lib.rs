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

//! Testing utilities for SFDS.
//!
//! Use [`sfds_test`] on `async fn` tests that return a `Result`:
//!
//! ```rust,ignore
//! use sfds_test::prelude::*;
//!
//! #[sfds_test]
//! async fn publishes() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use sfds_test_macro::sfds_test;

/// Re-exports for test modules.
pub mod prelude {
    pub use sfds_test_macro::sfds_test;
}

/// Crates referenced by the code `#[sfds_test]` expands to. Not a public API.
#[doc(hidden)]
pub mod __private {
    pub use parking_lot;
    pub use tokio;
    pub use tracing;
}
