// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation entry point for Orchestra.
//!
//! [`Orchestrator::generate`] resolves the provider, fetches the tenant's
//! credential fresh from the vault, and runs a one-shot adapter that is
//! dropped, secret included, as soon as the call returns.

pub mod orchestrator;

pub use orchestrator::{DispatchOutcome, Orchestrator};
