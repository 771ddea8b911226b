// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Orchestra integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - vault, registry and orchestrator wired to one local
//!   mock server, with a fixed master secret
//! - [`FlakyStore`] - `CredentialStore` wrapper with switchable faults

pub mod flaky_store;
pub mod harness;

pub use flaky_store::FlakyStore;
pub use harness::{TestHarness, TEST_MASTER_SECRET};
