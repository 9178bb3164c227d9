//! Card spec (JSON) parsing + session construction.
//!
//! A single JSON file declares the space, yields and systematics; the CLI
//! turns it into a [`CardBuilder`] session. Rejected declarations (unknown
//! tokens, duplicate names) are hard errors here: a driver spec with a typo
//! should fail loudly, not render a silently wrong card.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use lc_card::{CardBuilder, Entry, Mode, Payload};

/// Top-level card spec.
#[derive(Debug, Deserialize)]
pub struct CardSpec {
    /// Workspace name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Eras, in output order.
    pub eras: Vec<String>,
    /// Analyses, in output order.
    pub analyses: Vec<String>,
    /// Channels, in output order.
    pub channels: Vec<String>,
    /// Processes, in output order.
    pub processes: Vec<ProcessSpec>,
    /// Fit observable range, needed for parametric models.
    #[serde(default)]
    pub x: Option<[f64; 2]>,
    /// Mass variable range, needed for spline models.
    #[serde(default)]
    pub mh: Option<[f64; 2]>,
    /// Expected yields.
    #[serde(default)]
    pub expected: Vec<ExpectedSpec>,
    /// Observed yields.
    #[serde(default)]
    pub observed: Vec<ObservedSpec>,
    /// Systematic declarations.
    #[serde(default)]
    pub systematics: Vec<SystematicSpec>,
    /// Nuisance groups.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

fn default_name() -> String {
    "w".to_string()
}

/// A process declaration.
#[derive(Debug, Deserialize)]
pub struct ProcessSpec {
    /// Process name.
    pub name: String,
    /// Signal tag (default background).
    #[serde(default)]
    pub signal: bool,
}

/// An expected-yield cell.
#[derive(Debug, Deserialize)]
pub struct ExpectedSpec {
    /// Process name.
    pub process: String,
    /// Era name.
    pub era: String,
    /// Analysis name.
    pub analysis: String,
    /// Channel name.
    pub channel: String,
    /// Payload.
    pub value: Payload,
}

/// An observation cell.
#[derive(Debug, Deserialize)]
pub struct ObservedSpec {
    /// Era name.
    pub era: String,
    /// Analysis name.
    pub analysis: String,
    /// Channel name.
    pub channel: String,
    /// Payload.
    pub value: Payload,
}

/// A systematic declaration.
#[derive(Debug, Deserialize)]
pub struct SystematicSpec {
    /// Template name (may embed `{process}` etc.).
    pub name: String,
    /// Mode string (`lnN`, `gmN 104`, `shape`, ...).
    pub mode: Mode,
    /// Entries.
    pub entries: Vec<Entry>,
}

/// A nuisance group.
#[derive(Debug, Deserialize)]
pub struct GroupSpec {
    /// Group label.
    pub name: String,
    /// Member systematic names.
    pub systematics: Vec<String>,
}

/// Read and parse a card spec file.
pub fn read_card_spec(path: &Path) -> Result<CardSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let spec: CardSpec =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(spec)
}

/// Build a session from a parsed spec.
pub fn build_session(spec: &CardSpec) -> Result<CardBuilder> {
    let mut card = CardBuilder::new(&spec.name);

    if let Some([lo, hi]) = spec.x {
        card.add_x(lo, hi)?;
    }
    if let Some([lo, hi]) = spec.mh {
        card.add_mh(lo, hi)?;
    }

    for era in &spec.eras {
        card.add_era(era);
    }
    for analysis in &spec.analyses {
        card.add_analysis(analysis);
    }
    for channel in &spec.channels {
        card.add_channel(channel);
    }
    for process in &spec.processes {
        card.add_process(&process.name, process.signal);
    }

    for e in &spec.expected {
        if !card.set_expected(&e.process, &e.era, &e.analysis, &e.channel, e.value.clone()) {
            bail!(
                "expected yield for ({}, {}, {}, {}) rejected",
                e.process,
                e.era,
                e.analysis,
                e.channel
            );
        }
    }
    for o in &spec.observed {
        if !card.set_observed(&o.era, &o.analysis, &o.channel, o.value.clone()) {
            bail!("observation for ({}, {}, {}) rejected", o.era, o.analysis, o.channel);
        }
    }
    for s in &spec.systematics {
        if !card.add_systematic(&s.name, s.mode, s.entries.clone()) {
            bail!("systematic {} rejected", s.name);
        }
    }
    for g in &spec.groups {
        card.add_group(&g.name, &g.systematics);
    }

    Ok(card)
}
