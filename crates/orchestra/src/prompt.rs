// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential acquisition via TTY prompt or `ORCHESTRA_CREDENTIAL`.

use std::io::IsTerminal;

use orchestra_core::{OrchestraError, ProviderKind};
use secrecy::SecretString;

/// Environment variable for supplying a credential non-interactively.
pub const CREDENTIAL_ENV_VAR: &str = "ORCHESTRA_CREDENTIAL";

/// Read the provider secret to store.
///
/// Priority:
/// 1. `ORCHESTRA_CREDENTIAL` (scripts, CI)
/// 2. Hidden interactive prompt
pub fn read_credential(provider: ProviderKind) -> Result<SecretString, OrchestraError> {
    if let Ok(value) = std::env::var(CREDENTIAL_ENV_VAR)
        && !value.trim().is_empty()
    {
        return Ok(SecretString::from(value.trim().to_string()));
    }

    if std::io::stdin().is_terminal() {
        eprint!("{} API key: ", provider.label());
        let value = rpassword::read_password()
            .map_err(|e| OrchestraError::Configuration(format!("failed to read credential: {e}")))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(OrchestraError::Configuration(
                "empty credential not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(value.to_string()));
    }

    Err(OrchestraError::Configuration(format!(
        "No credential provided. Set {CREDENTIAL_ENV_VAR} or run interactively."
    )))
}
