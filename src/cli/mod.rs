// Copyright 2024-2026 CIVIC-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for CIVIC-CORE commands.
//!
//! The engine itself never touches the filesystem; these commands are the
//! thin I/O shell around it.
//!
//! ## Usage
//!
//! ```bash
//! civic-core-cli analyze requests.json --seed SR-1   # Graph report as JSON
//! civic-core-cli config show                         # Effective configuration
//! civic-core-cli config validate                     # Exit 1 on warnings
//! ```

pub mod analyze_cmd;
pub mod config_cmd;

use std::path::PathBuf;

pub use analyze_cmd::{run_analyze, AnalyzeOptions};

/// Get the config file path from the environment, if set.
pub fn get_config_path() -> Option<PathBuf> {
    std::env::var("CIVIC_CORE_CONFIG")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}

/// Value following `flag` in `args`, e.g. `--seed SR-1`.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_value_found() {
        let argv = args(&["analyze", "in.json", "--seed", "SR-1", "--mode", "dfs"]);
        assert_eq!(flag_value(&argv, "--seed"), Some("SR-1"));
        assert_eq!(flag_value(&argv, "--mode"), Some("dfs"));
    }

    #[test]
    fn test_flag_value_missing_or_trailing() {
        let argv = args(&["analyze", "in.json", "--seed"]);
        assert_eq!(flag_value(&argv, "--seed"), None);
        assert_eq!(flag_value(&argv, "--to"), None);
    }
}
