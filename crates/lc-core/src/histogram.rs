//! Binned histogram payloads.
//!
//! Shape-valued yields and systematic shifts are carried as plain 1D
//! histograms. 2D inputs are flattened to an equivalent 1D histogram
//! (row-major) once, at construction time, so nothing downstream has to
//! care about dimensionality.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A 1D histogram: ordered bin contents plus optional per-bin errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    #[serde(default)]
    pub title: String,
    /// Bin edges (length = number of bins + 1).
    pub bin_edges: Vec<f64>,
    /// Bin contents.
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin, if tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sumw2: Option<Vec<f64>>,
}

impl Histogram {
    /// Create a histogram, checking that edges and contents are consistent.
    pub fn new(
        name: impl Into<String>,
        bin_edges: Vec<f64>,
        bin_content: Vec<f64>,
        sumw2: Option<Vec<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        if bin_edges.len() != bin_content.len() + 1 {
            return Err(Error::Validation(format!(
                "histogram {}: {} edges for {} bins",
                name,
                bin_edges.len(),
                bin_content.len()
            )));
        }
        if let Some(w2) = &sumw2 {
            if w2.len() != bin_content.len() {
                return Err(Error::Validation(format!(
                    "histogram {}: sumw2 length {} does not match {} bins",
                    name,
                    w2.len(),
                    bin_content.len()
                )));
            }
        }
        let title = name.clone();
        Ok(Self { name, title, bin_edges, bin_content, sumw2 })
    }

    /// Histogram over `[x_min, x_max)` with uniform bin widths.
    pub fn uniform(
        name: impl Into<String>,
        x_min: f64,
        x_max: f64,
        bin_content: Vec<f64>,
    ) -> Result<Self> {
        let n = bin_content.len();
        let width = (x_max - x_min) / n.max(1) as f64;
        let edges = (0..=n).map(|i| x_min + width * i as f64).collect();
        Self::new(name, edges, bin_content, None)
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    /// Sum of bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Error on bin `i`: sqrt(sumw2) when tracked, else sqrt(content).
    pub fn bin_error(&self, i: usize) -> f64 {
        match &self.sumw2 {
            Some(w2) => w2[i].max(0.0).sqrt(),
            None => self.bin_content[i].max(0.0).sqrt(),
        }
    }

    /// Clone with a new name and title.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut out = self.clone();
        out.title = name.clone();
        out.name = name;
        out
    }

    /// Shift every bin by `direction` times its error, flooring at zero.
    ///
    /// Used to synthesize statistical up/down templates; the shifted
    /// histogram carries no errors of its own.
    pub fn shifted(&self, direction: f64) -> Self {
        let content = self
            .bin_content
            .iter()
            .enumerate()
            .map(|(i, &v)| (v + direction * self.bin_error(i)).max(0.0))
            .collect();
        Self {
            name: self.name.clone(),
            title: self.title.clone(),
            bin_edges: self.bin_edges.clone(),
            bin_content: content,
            sumw2: Some(vec![0.0; self.bin_content.len()]),
        }
    }

    /// Truncate contents to non-negative integer counts and recompute
    /// Poisson errors. Blinded observations go through this.
    pub fn poissonized(&self) -> Self {
        let content: Vec<f64> =
            self.bin_content.iter().map(|&v| v.max(0.0).floor()).collect();
        let sumw2 = Some(content.clone());
        Self {
            name: self.name.clone(),
            title: self.title.clone(),
            bin_edges: self.bin_edges.clone(),
            bin_content: content,
            sumw2,
        }
    }

    /// Bin-wise sum of histograms with identical binning.
    pub fn sum(name: impl Into<String>, hists: &[&Histogram]) -> Result<Histogram> {
        let name = name.into();
        let first = hists
            .first()
            .ok_or_else(|| Error::Validation(format!("histogram {name}: empty sum")))?;
        let mut content = vec![0.0; first.n_bins()];
        let mut sumw2 = vec![0.0; first.n_bins()];
        for h in hists {
            if h.n_bins() != first.n_bins() {
                return Err(Error::Validation(format!(
                    "histogram {name}: cannot sum {} bins with {} bins",
                    first.n_bins(),
                    h.n_bins()
                )));
            }
            if h.bin_edges != first.bin_edges {
                return Err(Error::Validation(format!(
                    "histogram {name}: cannot sum {} and {} with different bin edges",
                    first.name, h.name
                )));
            }
            for i in 0..h.n_bins() {
                content[i] += h.bin_content[i];
                sumw2[i] += h.bin_error(i).powi(2);
            }
        }
        let mut out = Histogram::new(name, first.bin_edges.clone(), content, Some(sumw2))?;
        out.title = out.name.clone();
        Ok(out)
    }
}

/// A 2D histogram, kept only long enough to be flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram2 {
    /// Histogram name.
    pub name: String,
    /// X bin edges (length = nx + 1).
    pub x_edges: Vec<f64>,
    /// Y bin edges (length = ny + 1).
    pub y_edges: Vec<f64>,
    /// Bin contents, row-major: `content[iy * nx + ix]`.
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin, if tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sumw2: Option<Vec<f64>>,
}

impl Histogram2 {
    /// Create a 2D histogram, checking dimensions.
    pub fn new(
        name: impl Into<String>,
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
        bin_content: Vec<f64>,
        sumw2: Option<Vec<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        let nx = x_edges.len().saturating_sub(1);
        let ny = y_edges.len().saturating_sub(1);
        if bin_content.len() != nx * ny {
            return Err(Error::Validation(format!(
                "histogram {}: {} contents for {}x{} bins",
                name,
                bin_content.len(),
                nx,
                ny
            )));
        }
        Ok(Self { name, x_edges, y_edges, bin_content, sumw2 })
    }

    /// Flatten to an equivalent 1D histogram.
    ///
    /// Bins are laid out row-major (full x range for y row 0, then y row 1,
    /// ...) on a unit-width axis, so a flattened 2D shape lines up bin by
    /// bin with any other flattened shape of the same dimensions.
    pub fn flatten(&self) -> Histogram {
        let n = self.bin_content.len();
        let edges = (0..=n).map(|i| i as f64).collect();
        Histogram {
            name: self.name.clone(),
            title: self.name.clone(),
            bin_edges: edges,
            bin_content: self.bin_content.clone(),
            sumw2: self.sumw2.clone(),
        }
    }
}
