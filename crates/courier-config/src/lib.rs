// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Courier connector framework.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use courier_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("allowed hosts: {:?}", config.actions.allowed_hosts);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ActionsConfig, CourierConfig, ElasticsearchConfig, LoggingConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `CourierConfig` or every diagnostic collected
/// while loading or validating.
pub fn load_and_validate() -> Result<CourierConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from a specific file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<CourierConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<CourierConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<CourierConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<CourierConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![std::path::PathBuf::from(loader::LOCAL_CONFIG_FILE)];
    if let Some(user) = loader::user_config_path() {
        candidates.push(user);
    }
    candidates.push(std::path::PathBuf::from(loader::SYSTEM_CONFIG_PATH));

    candidates
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let display = std::fs::canonicalize(&path)
                .unwrap_or(path)
                .display()
                .to_string();
            Some((display, content))
        })
        .collect()
}
