// Copyright 2024-2026 CIVIC-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! `analyze` subcommand: rehydrate an engine from a JSON export and report
//! the relationship graph.
//!
//! The input is a JSON array of request records, as written by the
//! persistence-sync layer. Records are replayed in submission order.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::graph::{Edge, ImpactCluster, TraversalMode};
use crate::record::RequestRecord;
use crate::telemetry::TimingSummary;
use crate::Engine;

/// Options for one `analyze` run.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Seed for the impact cluster and related-request listing.
    pub seed: Option<String>,
    pub mode: Option<TraversalMode>,
    /// Target for a shortest-path query from the seed.
    pub path_to: Option<String>,
}

/// Report printed as JSON on stdout.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub records: usize,
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
    pub components: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_cluster: Option<ImpactCluster>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
    pub timings: BTreeMap<String, TimingSummary>,
}

/// Parse records from a JSON array.
pub fn parse_records(text: &str) -> Result<Vec<RequestRecord>, EngineError> {
    Ok(serde_json::from_str(text)?)
}

/// Build the report for already-parsed records.
pub fn analyze(
    records: Vec<RequestRecord>,
    config: EngineConfig,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport, EngineError> {
    let mut engine = Engine::new(config);
    let inserted = engine.rehydrate(records)?;

    if let Some(seed) = options.seed.as_deref() {
        if engine.find(seed).is_none() {
            return Err(EngineError::NotFound(seed.to_string()));
        }
    }

    let components: Vec<Vec<String>> = engine
        .components()
        .into_values()
        .map(|members| members.into_iter().collect())
        .collect();
    let related = options
        .seed
        .as_deref()
        .map(|seed| engine.related(seed, options.mode.unwrap_or(TraversalMode::BreadthFirst)));
    let impact_cluster = options.seed.as_deref().map(|seed| engine.impact_cluster(seed));
    let path = match (options.seed.as_deref(), options.path_to.as_deref()) {
        (Some(seed), Some(target)) => Some(engine.shortest_path(seed, target)),
        _ => None,
    };

    let tracker = engine.tracker();
    let timings: BTreeMap<String, TimingSummary> = tracker
        .categories()
        .into_iter()
        .filter_map(|category| tracker.summary(&category).map(|s| (category, s)))
        .collect();

    Ok(AnalysisReport {
        records: inserted,
        nodes: engine.nodes().into_iter().map(str::to_string).collect(),
        edges: engine.edges(),
        components,
        related,
        impact_cluster,
        path,
        timings,
    })
}

/// Run `analyze` against a file. Returns the process exit code.
pub fn run_analyze(path: &Path, config: EngineConfig, options: &AnalyzeOptions) -> i32 {
    let report = std::fs::read_to_string(path)
        .map_err(EngineError::from)
        .and_then(|text| parse_records(&text))
        .and_then(|records| analyze(records, config, options));

    match report {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(e) => {
                eprintln!("Failed to encode report: {}", e);
                1
            }
        },
        Err(e) if e.is_caller_fault() || e.is_warning() => {
            eprintln!("Analyze failed: {}", e);
            2
        }
        Err(e) => {
            eprintln!("Analyze failed: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": "SR-3", "category": "Water", "location": "Oak Street", "priority": 4,
         "submitted_at": "2024-04-02T10:00:00Z"},
        {"id": "SR-1", "category": "Water", "location": "oak street", "priority": 5,
         "submitted_at": "2024-04-02T08:00:00Z"},
        {"id": "SR-2", "category": "Electricity", "location": "Harbour", "priority": 1,
         "submitted_at": "2024-04-20T08:00:00Z"}
    ]"#;

    #[test]
    fn test_analyze_reports_components_and_cluster() {
        let records = parse_records(SAMPLE).unwrap();
        let options = AnalyzeOptions {
            seed: Some("SR-1".to_string()),
            mode: None,
            path_to: Some("SR-3".to_string()),
        };
        let report = analyze(records, EngineConfig::default(), &options).unwrap();
        assert_eq!(report.records, 3);
        assert_eq!(report.nodes, vec!["SR-1", "SR-3", "SR-2"]);
        assert_eq!(report.edges.len(), 1);
        assert_eq!(report.components.len(), 2);
        assert_eq!(report.path, Some(vec!["SR-1".to_string(), "SR-3".to_string()]));
        let cluster = report.impact_cluster.unwrap();
        assert_eq!(cluster.members, vec!["SR-1", "SR-3"]);
        assert!(report.timings.contains_key("index"));
    }

    #[test]
    fn test_unknown_seed_is_not_found() {
        let records = parse_records(SAMPLE).unwrap();
        let options = AnalyzeOptions {
            seed: Some("SR-404".to_string()),
            ..AnalyzeOptions::default()
        };
        let err = analyze(records, EngineConfig::default(), &options).unwrap_err();
        assert_eq!(err, EngineError::NotFound("SR-404".to_string()));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(parse_records("[{"), Err(EngineError::Parse(_))));
    }
}
