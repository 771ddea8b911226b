// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for Orchestra.
//!
//! Compiled defaults, then `/etc/orchestra/orchestra.toml`, the user config
//! file and `./orchestra.toml`, then `ORCHESTRA_*` environment variables.
//! Unknown keys are rejected; every problem is reported as a
//! [`ConfigError`] diagnostic.
//!
//! ```no_run
//! match orchestra_config::load_and_validate() {
//!     Ok(config) => println!("database: {}", config.storage.database_path),
//!     Err(errors) => orchestra_config::render_errors(&errors),
//! }
//! ```

use std::path::{Path, PathBuf};

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::OrchestraConfig;

/// Load from the standard file hierarchy and validate.
pub fn load_and_validate() -> Result<OrchestraConfig, Vec<ConfigError>> {
    finish(loader::load_config(), standard_sources)
}

/// Load from `path` (plus environment overrides) and validate.
pub fn load_and_validate_path(path: &Path) -> Result<OrchestraConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources([path.to_path_buf()])
    })
}

/// Load from an in-memory TOML document and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<OrchestraConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a loaded config, or turn the load error into diagnostics.
///
/// Source files are only read back when there is an error to point into.
fn finish(
    loaded: Result<OrchestraConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<OrchestraConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Every file of the standard hierarchy that exists, as (path, content).
fn standard_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG_FILE));
    let candidates = [Some(local), loader::user_config_path(), Some(PathBuf::from(loader::SYSTEM_CONFIG_FILE))];
    read_sources(candidates.into_iter().flatten())
}

fn read_sources(paths: impl IntoIterator<Item = PathBuf>) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
