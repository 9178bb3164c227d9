//! Parametric model specifications.
//!
//! A model is a named, buildable analytic shape: building it declares its
//! parameter variables and pdf in the shared [`crate::FitWorkspace`] under
//! a caller-chosen label. Parameter values come from an external fitting
//! collaborator; this module only carries them.

use lc_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::workspace::FitWorkspace;

/// A ranged parameter: initial value plus allowed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Initial value.
    pub init: f64,
    /// Lower bound.
    pub lo: f64,
    /// Upper bound.
    pub hi: f64,
}

impl ParamRange {
    /// Convenience constructor.
    pub fn new(init: f64, lo: f64, hi: f64) -> Self {
        Self { init, lo, hi }
    }
}

/// Supported analytic shapes.
///
/// The spline variants interpolate their parameters against the workspace
/// `MH` variable, giving one continuous model across mass points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Gaussian(x; mean, sigma).
    Gaussian {
        /// Mean parameter range.
        mean: ParamRange,
        /// Sigma parameter range.
        sigma: ParamRange,
    },
    /// BreitWigner(x; mean, sigma).
    BreitWigner {
        /// Mean parameter range.
        mean: ParamRange,
        /// Width parameter range.
        sigma: ParamRange,
    },
    /// Voigtian(x; mean, width, sigma).
    Voigtian {
        /// Mean parameter range.
        mean: ParamRange,
        /// Breit-Wigner width parameter range.
        width: ParamRange,
        /// Gaussian sigma parameter range.
        sigma: ParamRange,
    },
    /// Exponential(x; lambda), falling for negative lambda.
    Exponential {
        /// Decay constant parameter range.
        lambda: ParamRange,
    },
    /// Gaussian with mean/sigma interpolated in MH.
    GaussianSpline {
        /// Mass knots.
        masses: Vec<f64>,
        /// Fitted means at each knot.
        means: Vec<f64>,
        /// Fitted sigmas at each knot.
        sigmas: Vec<f64>,
    },
    /// BreitWigner with mean/sigma interpolated in MH.
    BreitWignerSpline {
        /// Mass knots.
        masses: Vec<f64>,
        /// Fitted means at each knot.
        means: Vec<f64>,
        /// Fitted sigmas at each knot.
        sigmas: Vec<f64>,
    },
    /// Voigtian with mean/width/sigma interpolated in MH.
    VoigtianSpline {
        /// Mass knots.
        masses: Vec<f64>,
        /// Fitted means at each knot.
        means: Vec<f64>,
        /// Fitted widths at each knot.
        widths: Vec<f64>,
        /// Fitted sigmas at each knot.
        sigmas: Vec<f64>,
    },
}

/// A named parametric model plus its normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Model name.
    pub name: String,
    /// Analytic shape.
    pub kind: ModelKind,
    /// Normalization (events); defaults to 1.
    #[serde(default = "default_integral")]
    pub integral: f64,
}

fn default_integral() -> f64 {
    1.0
}

impl ModelSpec {
    /// New model with unit normalization.
    pub fn new(name: impl Into<String>, kind: ModelKind) -> Self {
        Self { name: name.into(), kind, integral: 1.0 }
    }

    /// Set the normalization.
    pub fn set_integral(&mut self, integral: f64) {
        self.integral = integral;
    }

    /// Normalization (events).
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Declare this model's parameters and pdf in `ws` under `label`.
    ///
    /// Errors propagate from the workspace (e.g. the observable `x`, or
    /// `MH` for spline variants, was never declared).
    pub fn build(&self, ws: &mut FitWorkspace, label: &str) -> Result<()> {
        let mean_name = format!("mean_{label}");
        let sigma_name = format!("sigma_{label}");
        let width_name = format!("width_{label}");
        match &self.kind {
            ModelKind::Gaussian { mean, sigma } => {
                ws.factory(&format!("{}[{}, {}, {}]", mean_name, mean.init, mean.lo, mean.hi))?;
                ws.factory(&format!(
                    "{}[{}, {}, {}]",
                    sigma_name, sigma.init, sigma.lo, sigma.hi
                ))?;
                ws.factory(&format!("Gaussian::{label}(x, {mean_name}, {sigma_name})"))
            }
            ModelKind::BreitWigner { mean, sigma } => {
                ws.factory(&format!("{}[{}, {}, {}]", mean_name, mean.init, mean.lo, mean.hi))?;
                ws.factory(&format!(
                    "{}[{}, {}, {}]",
                    sigma_name, sigma.init, sigma.lo, sigma.hi
                ))?;
                ws.factory(&format!("BreitWigner::{label}(x, {mean_name}, {sigma_name})"))
            }
            ModelKind::Voigtian { mean, width, sigma } => {
                ws.factory(&format!("{}[{}, {}, {}]", mean_name, mean.init, mean.lo, mean.hi))?;
                ws.factory(&format!(
                    "{}[{}, {}, {}]",
                    width_name, width.init, width.lo, width.hi
                ))?;
                ws.factory(&format!(
                    "{}[{}, {}, {}]",
                    sigma_name, sigma.init, sigma.lo, sigma.hi
                ))?;
                ws.factory(&format!(
                    "Voigtian::{label}(x, {mean_name}, {width_name}, {sigma_name})"
                ))
            }
            ModelKind::Exponential { lambda } => {
                let lambda_name = format!("lambda_{label}");
                ws.factory(&format!(
                    "{}[{}, {}, {}]",
                    lambda_name, lambda.init, lambda.lo, lambda.hi
                ))?;
                ws.factory(&format!("Exponential::{label}(x, {lambda_name})"))
            }
            ModelKind::GaussianSpline { masses, means, sigmas } => {
                Self::check_knots(&self.name, masses, &[means, sigmas])?;
                ws.spline(&mean_name, masses, means)?;
                ws.spline(&sigma_name, masses, sigmas)?;
                ws.factory(&format!("Gaussian::{label}(x, {mean_name}, {sigma_name})"))
            }
            ModelKind::BreitWignerSpline { masses, means, sigmas } => {
                Self::check_knots(&self.name, masses, &[means, sigmas])?;
                ws.spline(&mean_name, masses, means)?;
                ws.spline(&sigma_name, masses, sigmas)?;
                ws.factory(&format!("BreitWigner::{label}(x, {mean_name}, {sigma_name})"))
            }
            ModelKind::VoigtianSpline { masses, means, widths, sigmas } => {
                Self::check_knots(&self.name, masses, &[means, widths, sigmas])?;
                ws.spline(&mean_name, masses, means)?;
                ws.spline(&width_name, masses, widths)?;
                ws.spline(&sigma_name, masses, sigmas)?;
                ws.factory(&format!(
                    "Voigtian::{label}(x, {mean_name}, {width_name}, {sigma_name})"
                ))
            }
        }
    }

    fn check_knots(name: &str, masses: &[f64], values: &[&Vec<f64>]) -> Result<()> {
        for v in values {
            if v.len() != masses.len() {
                return Err(Error::Validation(format!(
                    "model {}: {} spline values for {} mass knots",
                    name,
                    v.len(),
                    masses.len()
                )));
            }
        }
        Ok(())
    }
}
