//! CLI output: error mapping and tree/comparison formatting.

use crate::error::{ApiError, HashError};
use crate::snapshot::TreeComparison;
use crate::tree::builder::MerkleTree;
use chrono::SecondsFormat;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::IsTerminal;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Hash(HashError::DeadlineExceeded(timeout)) => format!(
            "Hashing timed out after {:?}; raise --timeout or hashing.timeout_secs",
            timeout
        ),
        ApiError::Hash(HashError::NoFiles) => "No files provided".to_string(),
        other => other.to_string(),
    }
}

pub fn format_tree_text(title: &str, tree: &MerkleTree) -> String {
    format!(
        "=== {} ===\nMerkle Tree Root Hash: {}\nFile Count: {}\nCreated At: {}",
        title,
        tree.root_hash(),
        tree.leaf_count(),
        tree.created_at().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

pub fn format_tree_json(tree: &MerkleTree) -> Result<String, ApiError> {
    let out = json!({
        "root_hash": tree.root_hash(),
        "file_count": tree.leaf_count(),
        "created_at": tree.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
        "algorithm": tree.algorithm(),
        "depth": tree.depth(),
    });
    serde_json::to_string_pretty(&out).map_err(|e| ApiError::SnapshotError(e.to_string()))
}

/// Comparison report, colored only when stdout is a terminal
pub fn format_comparison_text(comparison: &TreeComparison) -> String {
    render_comparison_text(comparison, std::io::stdout().is_terminal())
}

fn render_comparison_text(comparison: &TreeComparison, color: bool) -> String {
    let mut s = String::from("=== Merkle Tree Comparison ===\n");

    if comparison.identical {
        let verdict = "Trees are IDENTICAL";
        if color {
            s.push_str(&format!("{}\n", verdict.green().bold()));
        } else {
            s.push_str(&format!("{}\n", verdict));
        }
        s.push_str(&format!("Root Hash: {}", comparison.current_root_hash));
        return s;
    }

    let verdict = "Trees are DIFFERENT";
    if color {
        s.push_str(&format!("{}\n", verdict.red().bold()));
    } else {
        s.push_str(&format!("{}\n", verdict));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Root Hash", "Files"]);
    table.add_row(vec![
        "previous".to_string(),
        comparison.previous_root_hash.clone(),
        comparison.previous_file_count.to_string(),
    ]);
    table.add_row(vec![
        "current".to_string(),
        comparison.current_root_hash.clone(),
        comparison.current_file_count.to_string(),
    ]);
    s.push_str(&table.to_string());

    if comparison.file_count_changed() {
        s.push_str(&format!(
            "\nFile count changed: {} -> {}",
            comparison.previous_file_count, comparison.current_file_count
        ));
    }
    s
}

pub fn format_comparison_json(comparison: &TreeComparison) -> Result<String, ApiError> {
    serde_json::to_string_pretty(comparison).map_err(|e| ApiError::SnapshotError(e.to_string()))
}
