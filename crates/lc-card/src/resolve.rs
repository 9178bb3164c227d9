//! Template expansion and per-cell systematic resolution.
//!
//! Resolution is the two-level indirection at the heart of the card: a
//! *template* expands to one *name* per distinct decorrelation choice, and
//! each (name, cell) pair resolves to at most one value.

use crate::systematics::{Cell, SystValue, Systematic};

/// Substitute the cell's tokens into a template name.
pub fn expand_template(template: &str, cell: &Cell<'_>) -> String {
    template
        .replace("{process}", cell.process)
        .replace("{era}", cell.era)
        .replace("{analysis}", cell.analysis)
        .replace("{channel}", cell.channel)
}

/// Resolve the value `syst` assigns to `cell` under the expanded name
/// `target`.
///
/// Returns `None` when the declaration does not apply: either the template
/// expands to a different name for this cell, or no entry covers the cell.
/// When several entries cover the same cell the last one wins; the overlap
/// is surfaced as a warning since it usually means a double-declared
/// uncertainty.
pub fn resolve<'a>(
    syst: &'a Systematic,
    target: &str,
    cell: &Cell<'_>,
) -> Option<&'a SystValue> {
    if expand_template(&syst.template, cell) != target {
        return None;
    }
    let mut found: Option<(usize, &SystValue)> = None;
    for (idx, entry) in syst.entries.iter().enumerate() {
        if !entry.filter.covers(cell) {
            continue;
        }
        if let Some((prev, _)) = found {
            tracing::warn!(
                systematic = %target,
                process = %cell.process,
                era = %cell.era,
                analysis = %cell.analysis,
                channel = %cell.channel,
                "entries {} and {} both cover this cell; the later declaration wins",
                prev,
                idx
            );
        }
        found = Some((idx, &entry.value));
    }
    found.map(|(_, v)| v)
}
