//! Shared statistical workspace for parametric models.
//!
//! A narrow, RooFit-like surface: ranged variables, factory expressions,
//! spline nodes interpolated in `MH`, and imported binned datasets. One
//! mutable workspace lives per card-assembly session; every parametric
//! build writes into it, and re-importing an existing label silently
//! overwrites (workspace-level de-duplication), so callers pre-compute
//! unique labels.

use std::collections::BTreeMap;

use lc_core::{Error, Histogram, Result};
use serde::Serialize;

/// A ranged workspace variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarSpec {
    /// Current value.
    pub value: f64,
    /// Lower bound.
    pub lo: f64,
    /// Upper bound.
    pub hi: f64,
}

/// A 1D spline node: parameter values interpolated against an observable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplineSpec {
    /// Variable the spline is evaluated against (`MH`).
    pub observable: String,
    /// Knot positions.
    pub knots: Vec<f64>,
    /// Values at each knot.
    pub values: Vec<f64>,
}

/// A declared pdf: shape kind plus named arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfSpec {
    /// Shape kind (Gaussian, Voigtian, BreitWigner, ...).
    pub kind: String,
    /// Observable name (first factory argument).
    pub observable: String,
    /// Parameter names (remaining factory arguments).
    pub parameters: Vec<String>,
}

/// The session workspace.
#[derive(Debug, Clone, Serialize)]
pub struct FitWorkspace {
    name: String,
    vars: BTreeMap<String, VarSpec>,
    splines: BTreeMap<String, SplineSpec>,
    pdfs: BTreeMap<String, PdfSpec>,
    data: BTreeMap<String, Histogram>,
}

impl FitWorkspace {
    /// New empty workspace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: BTreeMap::new(),
            splines: BTreeMap::new(),
            pdfs: BTreeMap::new(),
            data: BTreeMap::new(),
        }
    }

    /// Workspace name, used as the prefix in shape-locator lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a ranged variable. Re-declaring overwrites silently.
    pub fn declare_var(&mut self, name: &str, value: f64, lo: f64, hi: f64) {
        self.vars.insert(name.to_string(), VarSpec { value, lo, hi });
    }

    /// Process a factory expression.
    ///
    /// Two forms are understood:
    /// - `name[lo, hi]` or `name[init, lo, hi]` — declare a variable;
    /// - `Kind::name(obs, p1, ...)` — declare a pdf. Every argument must be
    ///   a declared variable or spline; a missing one is a fatal error.
    pub fn factory(&mut self, expr: &str) -> Result<()> {
        let expr = expr.trim();
        if let Some(open) = expr.find('[') {
            let name = expr[..open].trim();
            let close = expr
                .rfind(']')
                .ok_or_else(|| Error::Workspace(format!("unterminated range in {expr:?}")))?;
            let nums: Vec<f64> = expr[open + 1..close]
                .split(',')
                .map(|s| {
                    s.trim().parse::<f64>().map_err(|_| {
                        Error::Workspace(format!("bad number {:?} in {expr:?}", s.trim()))
                    })
                })
                .collect::<Result<_>>()?;
            let (value, lo, hi) = match nums[..] {
                [lo, hi] => ((lo + hi) / 2.0, lo, hi),
                [init, lo, hi] => (init, lo, hi),
                _ => {
                    return Err(Error::Workspace(format!(
                        "expected 2 or 3 numbers in {expr:?}"
                    )))
                }
            };
            self.declare_var(name, value, lo, hi);
            return Ok(());
        }

        let (kind, rest) = expr
            .split_once("::")
            .ok_or_else(|| Error::Workspace(format!("unrecognized factory expression {expr:?}")))?;
        let open = rest
            .find('(')
            .ok_or_else(|| Error::Workspace(format!("missing argument list in {expr:?}")))?;
        let close = rest
            .rfind(')')
            .ok_or_else(|| Error::Workspace(format!("unterminated argument list in {expr:?}")))?;
        let name = rest[..open].trim();
        let args: Vec<String> =
            rest[open + 1..close].split(',').map(|s| s.trim().to_string()).collect();
        if args.len() < 2 {
            return Err(Error::Workspace(format!("pdf {name} needs an observable and parameters")));
        }
        for arg in &args {
            if !self.vars.contains_key(arg) && !self.splines.contains_key(arg) {
                return Err(Error::Workspace(format!(
                    "variable {arg} not declared (building {name})"
                )));
            }
        }
        let spec = PdfSpec {
            kind: kind.trim().to_string(),
            observable: args[0].clone(),
            parameters: args[1..].to_vec(),
        };
        // same label: silently overwrite, matching workspace de-duplication
        self.pdfs.insert(name.to_string(), spec);
        Ok(())
    }

    /// Declare a spline node interpolating `values` over `knots` against
    /// the `MH` variable, which must already be declared.
    pub fn spline(&mut self, name: &str, knots: &[f64], values: &[f64]) -> Result<()> {
        if !self.vars.contains_key("MH") {
            return Err(Error::Workspace(format!(
                "variable MH not declared (building spline {name})"
            )));
        }
        if knots.len() != values.len() {
            return Err(Error::Workspace(format!(
                "spline {}: {} values for {} knots",
                name,
                values.len(),
                knots.len()
            )));
        }
        self.splines.insert(
            name.to_string(),
            SplineSpec { observable: "MH".to_string(), knots: knots.to_vec(), values: values.to_vec() },
        );
        Ok(())
    }

    /// Import a binned dataset under its histogram name, silently
    /// overwriting a previous import with the same name.
    pub fn import_data(&mut self, hist: Histogram) {
        self.data.insert(hist.name.clone(), hist);
    }

    /// Look up a variable by name.
    pub fn var(&self, name: &str) -> Option<&VarSpec> {
        self.vars.get(name)
    }

    /// Look up a pdf by name.
    pub fn pdf(&self, name: &str) -> Option<&PdfSpec> {
        self.pdfs.get(name)
    }

    /// Look up an imported dataset by name.
    pub fn data(&self, name: &str) -> Option<&Histogram> {
        self.data.get(name)
    }

    /// Whether anything has been built or imported.
    pub fn is_empty(&self) -> bool {
        self.pdfs.is_empty() && self.data.is_empty() && self.splines.is_empty()
    }

    /// Deterministic JSON snapshot of the workspace contents.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
