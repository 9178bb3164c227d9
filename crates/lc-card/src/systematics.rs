//! Systematic uncertainty declarations.
//!
//! A systematic is declared once under a *template name* that may embed
//! `{process}`, `{era}`, `{analysis}` and `{channel}` placeholders.
//! Substituting a placeholder decorrelates the uncertainty across that
//! dimension: omitting `{process}` gives every process the same expanded
//! name (fully correlated), embedding it gives each process its own row.

use std::fmt;

use lc_core::{Error, Histogram, Histogram2};
use serde::{Deserialize, Serialize};

use crate::models::ModelSpec;
use crate::space::{covers, Dimension, SpaceRegistry};

/// Constraint mode of a systematic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// Log-normal rate uncertainty.
    LnN,
    /// Gamma-function uncertainty with a sideband count.
    GmN(u32),
    /// Histogram-valued shape uncertainty.
    Shape,
    /// Floating parameter (not rendered in the row table).
    Param,
    /// Flat floating parameter (not rendered in the row table).
    FlatParam,
}

impl Mode {
    /// Whether this mode contributes a row to the nuisance table.
    pub fn in_table(&self) -> bool {
        !matches!(self, Mode::Param | Mode::FlatParam)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::LnN => write!(f, "lnN"),
            Mode::GmN(n) => write!(f, "gmN {n}"),
            Mode::Shape => write!(f, "shape"),
            Mode::Param => write!(f, "param"),
            Mode::FlatParam => write!(f, "flatParam"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        match s {
            "lnN" => Ok(Mode::LnN),
            "shape" => Ok(Mode::Shape),
            "param" => Ok(Mode::Param),
            "flatParam" => Ok(Mode::FlatParam),
            _ => {
                if let Some(count) = s.strip_prefix("gmN") {
                    let n = count.trim().parse::<u32>().map_err(|_| {
                        Error::Validation(format!("bad gmN sideband count in {s:?}"))
                    })?;
                    Ok(Mode::GmN(n))
                } else {
                    Err(Error::Validation(format!("unknown systematic mode {s:?}")))
                }
            }
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Error> {
        s.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> String {
        mode.to_string()
    }
}

/// The value a systematic entry assigns to the cells it covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SystValue {
    /// Symmetric multiplicative factor (1.0 = no effect).
    Factor(f64),
    /// Asymmetric pair, rendered `down/up`.
    Asym {
        /// Down-shift factor.
        down: f64,
        /// Up-shift factor.
        up: f64,
    },
    /// Single shifted shape.
    Shape(Histogram),
    /// Up/down shape pair.
    ShapePair {
        /// +1σ template.
        up: Histogram,
        /// −1σ template.
        down: Histogram,
    },
    /// Single parametric model shift.
    Model(ModelSpec),
    /// Up/down parametric model pair.
    ModelPair {
        /// +1σ model.
        up: ModelSpec,
        /// −1σ model.
        down: ModelSpec,
    },
}

impl SystValue {
    /// Shape value from a 2D histogram, flattened immediately.
    pub fn shape2(hist: Histogram2) -> Self {
        SystValue::Shape(hist.flatten())
    }

    /// Shape pair from 2D histograms, flattened immediately.
    pub fn shape_pair2(up: Histogram2, down: Histogram2) -> Self {
        SystValue::ShapePair { up: up.flatten(), down: down.flatten() }
    }

    /// Whether this value has no effect (renders as `-`).
    pub fn is_neutral(&self) -> bool {
        matches!(self, SystValue::Factor(v) if *v == 1.0)
    }
}

fn all_subset() -> Vec<String> {
    vec![crate::space::WILDCARD.to_string()]
}

/// The 4-tuple of dimension subsets one entry covers. Each subset is a
/// list of tokens or the wildcard `["all"]` (the default).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimFilter {
    /// Covered processes.
    #[serde(default = "all_subset")]
    pub processes: Vec<String>,
    /// Covered eras.
    #[serde(default = "all_subset")]
    pub eras: Vec<String>,
    /// Covered analyses.
    #[serde(default = "all_subset")]
    pub analyses: Vec<String>,
    /// Covered channels.
    #[serde(default = "all_subset")]
    pub channels: Vec<String>,
}

impl Default for DimFilter {
    fn default() -> Self {
        Self {
            processes: all_subset(),
            eras: all_subset(),
            analyses: all_subset(),
            channels: all_subset(),
        }
    }
}

impl DimFilter {
    /// Filter covering the whole space.
    pub fn all() -> Self {
        Self::default()
    }

    /// All four dimension tests must pass.
    pub fn covers(&self, cell: &Cell<'_>) -> bool {
        covers(&self.processes, cell.process)
            && covers(&self.eras, cell.era)
            && covers(&self.analyses, cell.analysis)
            && covers(&self.channels, cell.channel)
    }
}

/// One concrete coordinate of the experiment space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    /// Process name.
    pub process: &'a str,
    /// Era name.
    pub era: &'a str,
    /// Analysis name.
    pub analysis: &'a str,
    /// Channel name.
    pub channel: &'a str,
}

/// One (filter, value) pair inside a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Covered subset of the space.
    #[serde(flatten)]
    pub filter: DimFilter,
    /// Assigned value.
    pub value: SystValue,
}

/// A full declaration: template name, mode, ordered entries.
#[derive(Debug, Clone)]
pub struct Systematic {
    /// Template name, possibly with placeholders.
    pub template: String,
    /// Constraint mode.
    pub mode: Mode,
    /// Entries in declaration order.
    pub entries: Vec<Entry>,
}

/// Registry of systematic declarations and group labels.
#[derive(Debug, Clone, Default)]
pub struct SystematicRegistry {
    systematics: Vec<Systematic>,
    groups: Vec<(String, Vec<String>)>,
}

impl SystematicRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration.
    ///
    /// Every token of every entry is validated against the registry;
    /// one invalid token rejects the whole declaration (nothing is
    /// partially stored). A duplicate template name warns and is ignored.
    /// Returns whether the declaration was stored.
    pub fn add_systematic(
        &mut self,
        space: &SpaceRegistry,
        template: &str,
        mode: Mode,
        entries: Vec<Entry>,
    ) -> bool {
        if self.systematics.iter().any(|s| s.template == template) {
            tracing::warn!("Systematic {} already added.", template);
            return false;
        }
        let mut good = true;
        for entry in &entries {
            good &= space.validate(Dimension::Process, &entry.filter.processes);
            good &= space.validate(Dimension::Era, &entry.filter.eras);
            good &= space.validate(Dimension::Analysis, &entry.filter.analyses);
            good &= space.validate(Dimension::Channel, &entry.filter.channels);
        }
        if !good {
            tracing::warn!("Systematic {} rejected: unrecognized tokens.", template);
            return false;
        }
        self.systematics.push(Systematic { template: template.to_string(), mode, entries });
        true
    }

    /// Record a group label for a list of systematic names.
    pub fn add_group(&mut self, group: &str, systnames: &[String]) {
        self.groups.push((group.to_string(), systnames.to_vec()));
    }

    /// Declarations, in declaration order.
    pub fn systematics(&self) -> &[Systematic] {
        &self.systematics
    }

    /// Group labels, in declaration order.
    pub fn groups(&self) -> &[(String, Vec<String>)] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> SpaceRegistry {
        let mut s = SpaceRegistry::new();
        s.add_era("13TeV");
        s.add_analysis("Hpp3l");
        s.add_channel("eee");
        s.add_process("hpp", true);
        s.add_process("datadriven", false);
        s
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("lnN".parse::<Mode>().unwrap(), Mode::LnN);
        assert_eq!("gmN 104".parse::<Mode>().unwrap(), Mode::GmN(104));
        assert_eq!("flatParam".parse::<Mode>().unwrap(), Mode::FlatParam);
        assert!("gmN x".parse::<Mode>().is_err());
        assert!("logN".parse::<Mode>().is_err());
        assert_eq!(Mode::GmN(104).to_string(), "gmN 104");
        assert!(!Mode::Param.in_table());
        assert!(Mode::Shape.in_table());
    }

    #[test]
    fn test_add_and_duplicate() {
        let space = space();
        let mut reg = SystematicRegistry::new();
        let entries =
            vec![Entry { filter: DimFilter::all(), value: SystValue::Factor(1.025) }];
        assert!(reg.add_systematic(&space, "lumi", Mode::LnN, entries.clone()));
        assert!(!reg.add_systematic(&space, "lumi", Mode::LnN, entries));
        assert_eq!(reg.systematics().len(), 1);
    }

    #[test]
    fn test_validation_atomicity() {
        let space = space();
        let mut reg = SystematicRegistry::new();
        let entries = vec![
            Entry { filter: DimFilter::all(), value: SystValue::Factor(1.1) },
            Entry {
                filter: DimFilter {
                    processes: vec!["nosuchproc".to_string()],
                    ..DimFilter::all()
                },
                value: SystValue::Factor(1.2),
            },
        ];
        // one bad token rejects the whole declaration
        assert!(!reg.add_systematic(&space, "fake", Mode::LnN, entries));
        assert!(reg.systematics().is_empty());
    }

    #[test]
    fn test_filter_covers() {
        let cell = Cell { process: "hpp", era: "13TeV", analysis: "Hpp3l", channel: "eee" };
        assert!(DimFilter::all().covers(&cell));
        let f = DimFilter { processes: vec!["datadriven".to_string()], ..DimFilter::all() };
        assert!(!f.covers(&cell));
    }

    #[test]
    fn test_neutral() {
        assert!(SystValue::Factor(1.0).is_neutral());
        assert!(!SystValue::Factor(1.025).is_neutral());
        assert!(!SystValue::Asym { down: 1.0, up: 1.0 }.is_neutral());
    }
}
