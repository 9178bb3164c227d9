//! Yield payloads: scalar rates, binned shapes, parametric models.

use lc_core::{Histogram, Histogram2};
use serde::{Deserialize, Serialize};

use crate::models::ModelSpec;

/// Floor substituted for absent or exactly-zero expected yields.
///
/// A literal zero rate makes the downstream likelihood degenerate, so
/// [`crate::yields::YieldStore::get_expected`] never returns one.
pub const YIELD_FLOOR: f64 = 1e-10;

/// The yield content of one cell: exactly one of a scalar rate, a binned
/// shape, or a parametric model handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// Scalar expected rate.
    Rate(f64),
    /// Binned shape; integral is the rate.
    Shape(Histogram),
    /// Parametric model, built lazily into the shared workspace.
    Model(ModelSpec),
}

impl Payload {
    /// Shape payload from a 2D histogram, flattened immediately so read
    /// paths never see dimensionality.
    pub fn shape2(hist: Histogram2) -> Self {
        Payload::Shape(hist.flatten())
    }

    /// Normalization carried by this payload.
    pub fn integral(&self) -> f64 {
        match self {
            Payload::Rate(v) => *v,
            Payload::Shape(h) => h.integral(),
            Payload::Model(m) => m.integral(),
        }
    }

    /// Whether this payload is the degenerate zero that must be floored.
    pub fn is_zero(&self) -> bool {
        matches!(self, Payload::Rate(v) if *v == 0.0)
    }
}
