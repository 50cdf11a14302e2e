// Copyright 2024-2026 CIVIC-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults, validate.
//!
//! These commands read configuration directly from environment variables
//! (or a TOML file) without building an engine.

use std::path::Path;

use crate::config::{self, EffectiveConfig, EngineConfig};

/// Resolve configuration: a TOML file when given, otherwise the environment.
pub fn resolve(config_path: Option<&Path>) -> Result<EngineConfig, crate::error::EngineError> {
    match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            EngineConfig::from_toml_str(&text)
        }
        None => Ok(config::load()),
    }
}

/// Print effective config as key-value pairs to stdout.
pub fn run_show(config_path: Option<&Path>) -> i32 {
    match resolve(config_path) {
        Ok(cfg) => {
            print_config(&cfg.effective());
            0
        }
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            2
        }
    }
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() {
    print_config(&EngineConfig::default().effective());
}

/// Validate configuration for settings that make the graph useless.
///
/// Returns 0 if valid, 1 if any warnings are found, 2 if it cannot be loaded.
pub fn run_validate(config_path: Option<&Path>) -> i32 {
    let cfg = match resolve(config_path) {
        Ok(cfg) => cfg.effective(),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return 2;
        }
    };
    let warnings = collect_warnings(&cfg);
    for warning in &warnings {
        eprintln!("WARNING: {}", warning);
    }
    if warnings.is_empty() {
        println!("Configuration is valid.");
        0
    } else {
        1
    }
}

fn collect_warnings(cfg: &EffectiveConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if cfg.edge_threshold <= 10 {
        warnings.push(format!(
            "CIVIC_CORE_EDGE_THRESHOLD ({}) links requests on priority similarity alone",
            cfg.edge_threshold
        ));
    }
    if cfg.proximity_km > 50.0 {
        warnings.push(format!(
            "CIVIC_CORE_PROXIMITY_KM ({}) treats most of a metro area as nearby",
            cfg.proximity_km
        ));
    }
    warnings
}

fn print_config(cfg: &EffectiveConfig) {
    println!("CIVIC_CORE_EDGE_THRESHOLD={}", cfg.edge_threshold);
    println!("CIVIC_CORE_PROXIMITY_KM={}", cfg.proximity_km);
    println!("CIVIC_CORE_TIME_WINDOW_HOURS={}", cfg.time_window_hours);
    println!("CIVIC_CORE_PRIORITY_TOLERANCE={}", cfg.priority_tolerance);
    println!("CIVIC_CORE_TRACK_PERFORMANCE={}", cfg.track_performance);
    println!("CIVIC_CORE_LOG_LEVEL={}", cfg.log_level);
    let format = match cfg.log_format {
        crate::telemetry::LogFormat::Json => "json",
        crate::telemetry::LogFormat::Pretty => "pretty",
    };
    println!("CIVIC_CORE_LOG_FORMAT={}", format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{clear_env_vars, ENV_LOCK};
    use std::io::Write;

    #[test]
    fn test_validate_passes_with_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        assert_eq!(run_validate(None), 0, "default config should pass validation");
    }

    #[test]
    fn test_validate_warns_on_low_threshold() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var("CIVIC_CORE_EDGE_THRESHOLD", "10");
        assert_eq!(run_validate(None), 1);
        clear_env_vars();
    }

    #[test]
    fn test_validate_reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scoring]\nproximity_km = 80.0").unwrap();
        assert_eq!(run_validate(Some(file.path())), 1);
        assert_eq!(run_show(Some(file.path())), 0);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let missing = Path::new("/nonexistent/civic-core.toml");
        assert_eq!(run_validate(Some(missing)), 2);
        assert_eq!(run_show(Some(missing)), 2);
    }

    #[test]
    fn test_defaults_smoke() {
        run_defaults();
    }
}
