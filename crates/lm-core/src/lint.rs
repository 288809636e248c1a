//! Lint diagnostics for lore maps.
//!
//! Reports structural issues without modifying the map. Nothing here is
//! fatal: dangling references still render as "Unknown" and evaluate normally.

use crate::condition::ConditionKind;
use crate::id::NodeId;
use crate::model::{CharacterRegistry, LoreMap};
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Probably a mistake.
    Warning,
    /// Worth a look.
    Info,
}

/// A single lint diagnostic for an event node.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to.
    pub node_id: NodeId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "self-condition").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the map and return diagnostics.
#[must_use]
pub fn lint_map(map: &LoreMap, characters: &CharacterRegistry) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_condition_targets(map, characters, &mut diags);
    lint_duplicate_connections(map, &mut diags);
    lint_isolated_nodes(map, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Conditions pointing at missing events/characters, or at their own node.
fn lint_condition_targets(
    map: &LoreMap,
    characters: &CharacterRegistry,
    diags: &mut Vec<LintDiagnostic>,
) {
    for node in map.nodes() {
        for condition in &node.conditions {
            match &condition.kind {
                ConditionKind::EventCompleted(target) if *target == node.id => {
                    diags.push(LintDiagnostic {
                        node_id: node.id,
                        message: format!(
                            "\"{}\" has a condition on its own completion.",
                            node.title
                        ),
                        severity: LintSeverity::Warning,
                        rule: "self-condition",
                    });
                }
                ConditionKind::EventCompleted(target) if !map.contains(*target) => {
                    diags.push(dangling(node.id, &node.title, "event", target.as_str()));
                }
                ConditionKind::CharacterFreed(target) | ConditionKind::CharacterAlive(target)
                    if characters.get(*target).is_none() =>
                {
                    diags.push(dangling(node.id, &node.title, "character", target.as_str()));
                }
                _ => {}
            }
        }
    }
}

fn dangling(node_id: NodeId, title: &str, what: &str, target: &str) -> LintDiagnostic {
    LintDiagnostic {
        node_id,
        message: format!("\"{title}\" has a condition on unknown {what} `{target}`."),
        severity: LintSeverity::Warning,
        rule: "dangling-condition-target",
    }
}

/// More than one connection for the same ordered pair.
fn lint_duplicate_connections(map: &LoreMap, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for conn in map.connections() {
        if !seen.insert((conn.from, conn.to)) {
            diags.push(LintDiagnostic {
                node_id: conn.from,
                message: format!(
                    "Connection {} duplicates an existing {} → {} connection.",
                    conn.id, conn.from, conn.to
                ),
                severity: LintSeverity::Warning,
                rule: "duplicate-connection",
            });
        }
    }
}

/// Nodes nothing leads to or from, once the map has more than one node.
fn lint_isolated_nodes(map: &LoreMap, diags: &mut Vec<LintDiagnostic>) {
    if map.node_count() < 2 {
        return;
    }
    let connected: HashSet<NodeId> = map
        .connections()
        .flat_map(|c| [c.from, c.to])
        .collect();
    for node in map.nodes().filter(|n| !connected.contains(&n.id)) {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!("\"{}\" is not connected to any other event.", node.title),
            severity: LintSeverity::Info,
            rule: "isolated-node",
        });
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
