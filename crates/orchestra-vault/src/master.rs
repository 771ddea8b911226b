// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master secret acquisition from the host environment.

use orchestra_core::OrchestraError;
use secrecy::SecretString;

/// Default environment variable carrying the master secret.
pub const MASTER_SECRET_ENV_VAR: &str = "ORCHESTRA_MASTER_SECRET";

/// Read the master secret from the environment variable `var`.
///
/// A missing or empty value is a configuration error; callers resolve it once
/// at startup so the process fails fast rather than per request.
pub fn master_secret_from_env(var: &str) -> Result<SecretString, OrchestraError> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(SecretString::from(value)),
        Ok(_) => Err(OrchestraError::Configuration(format!(
            "{var} is set but empty; the credential vault needs a master secret"
        ))),
        Err(_) => Err(OrchestraError::Configuration(format!(
            "{var} is not set; the credential vault needs a master secret"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;
    use serial_test::serial;

    use super::*;

    const TEST_VAR: &str = "ORCHESTRA_TEST_MASTER_SECRET";

    #[test]
    #[serial]
    fn reads_secret_from_env() {
        unsafe { std::env::set_var(TEST_VAR, "from-env-secret") };
        let secret = master_secret_from_env(TEST_VAR).unwrap();
        assert_eq!(secret.expose_secret(), "from-env-secret");
        unsafe { std::env::remove_var(TEST_VAR) };
    }

    #[test]
    #[serial]
    fn missing_env_is_configuration_error() {
        unsafe { std::env::remove_var(TEST_VAR) };
        let err = master_secret_from_env(TEST_VAR).unwrap_err();
        assert!(matches!(err, OrchestraError::Configuration(_)));
        assert!(err.to_string().contains(TEST_VAR));
    }

    #[test]
    #[serial]
    fn empty_env_is_configuration_error() {
        unsafe { std::env::set_var(TEST_VAR, "") };
        let err = master_secret_from_env(TEST_VAR).unwrap_err();
        assert!(matches!(err, OrchestraError::Configuration(_)));
        unsafe { std::env::remove_var(TEST_VAR) };
    }
}
