//! Expected and observed yield storage.

use std::collections::HashMap;

use lc_core::{Error, Histogram, Result};

use crate::payload::{Payload, YIELD_FLOOR};
use crate::space::{Dimension, SpaceRegistry};

type ExpectedKey = (String, String, String, String);
type ObservedKey = (String, String, String);

/// Sparse maps from cells to yield payloads.
///
/// Expected yields are keyed by (process, era, analysis, channel);
/// observations carry no process dimension. Setters validate every token
/// and reject the call on failure; a repeated set overwrites (last write
/// wins).
#[derive(Debug, Clone, Default)]
pub struct YieldStore {
    expected: HashMap<ExpectedKey, Payload>,
    observed: HashMap<ObservedKey, Payload>,
}

impl YieldStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an expected yield. Returns whether the payload was stored.
    pub fn set_expected(
        &mut self,
        space: &SpaceRegistry,
        process: &str,
        era: &str,
        analysis: &str,
        channel: &str,
        payload: Payload,
    ) -> bool {
        let mut good = true;
        good &= space.validate(Dimension::Process, std::slice::from_ref(&process.to_string()));
        good &= space.validate(Dimension::Era, std::slice::from_ref(&era.to_string()));
        good &= space.validate(Dimension::Analysis, std::slice::from_ref(&analysis.to_string()));
        good &= space.validate(Dimension::Channel, std::slice::from_ref(&channel.to_string()));
        if good {
            self.expected.insert(
                (process.to_string(), era.to_string(), analysis.to_string(), channel.to_string()),
                payload,
            );
        }
        good
    }

    /// Fetch an expected yield.
    ///
    /// Never returns a literal zero rate: a missing cell, or a stored
    /// exactly-zero rate, reads back as [`YIELD_FLOOR`]. Downstream code
    /// relies on this to avoid degenerate log-likelihoods.
    pub fn get_expected(
        &self,
        process: &str,
        era: &str,
        analysis: &str,
        channel: &str,
    ) -> Payload {
        let key = (process.to_string(), era.to_string(), analysis.to_string(), channel.to_string());
        match self.expected.get(&key) {
            Some(p) if !p.is_zero() => p.clone(),
            _ => Payload::Rate(YIELD_FLOOR),
        }
    }

    /// Store an observation. Returns whether the payload was stored.
    pub fn set_observed(
        &mut self,
        space: &SpaceRegistry,
        era: &str,
        analysis: &str,
        channel: &str,
        payload: Payload,
    ) -> bool {
        let mut good = true;
        good &= space.validate(Dimension::Era, std::slice::from_ref(&era.to_string()));
        good &= space.validate(Dimension::Analysis, std::slice::from_ref(&analysis.to_string()));
        good &= space.validate(Dimension::Channel, std::slice::from_ref(&channel.to_string()));
        if good {
            self.observed
                .insert((era.to_string(), analysis.to_string(), channel.to_string()), payload);
        }
        good
    }

    /// Fetch the observation for one bin.
    ///
    /// When `blind`, any stored value is ignored and the observation is
    /// synthesized as the sum of expected backgrounds (plus signals when
    /// `add_signal`): a plain sum for scalar yields, a bin-wise merge for
    /// shapes with contents floored at zero, truncated to integer counts
    /// and Poisson errors recomputed. Unblinded, the stored value or a
    /// scalar zero is returned.
    pub fn get_observed(
        &self,
        space: &SpaceRegistry,
        era: &str,
        analysis: &str,
        channel: &str,
        blind: bool,
        add_signal: bool,
    ) -> Result<Payload> {
        if !blind {
            let key = (era.to_string(), analysis.to_string(), channel.to_string());
            return Ok(self.observed.get(&key).cloned().unwrap_or(Payload::Rate(0.0)));
        }

        let mut procs: Vec<&str> = space.backgrounds().iter().map(|s| s.as_str()).collect();
        if add_signal {
            procs.extend(space.signals().iter().map(|s| s.as_str()));
        }
        let payloads: Vec<Payload> =
            procs.iter().map(|p| self.get_expected(p, era, analysis, channel)).collect();

        let any_shape = payloads.iter().any(|p| matches!(p, Payload::Shape(_)));
        if !any_shape {
            let mut total = 0.0;
            for (p, payload) in procs.iter().zip(&payloads) {
                match payload {
                    Payload::Rate(v) => total += v,
                    Payload::Model(_) => {
                        return Err(Error::Computation(format!(
                            "cannot blind-sum parametric model for process {p} \
                             (era {era}, analysis {analysis}, channel {channel})"
                        )))
                    }
                    Payload::Shape(_) => unreachable!(),
                }
            }
            return Ok(Payload::Rate(total));
        }

        let mut hists: Vec<&Histogram> = Vec::new();
        for (p, payload) in procs.iter().zip(&payloads) {
            match payload {
                Payload::Shape(h) => hists.push(h),
                // floored scalars stand in for processes with no template
                Payload::Rate(v) if *v <= YIELD_FLOOR => {}
                _ => {
                    return Err(Error::Computation(format!(
                        "mixed payload types in blinded observation for process {p} \
                         (era {era}, analysis {analysis}, channel {channel})"
                    )))
                }
            }
        }
        if hists.is_empty() {
            return Ok(Payload::Rate(0.0));
        }
        let merged = Histogram::sum("h_exp", &hists)?.poissonized();
        Ok(Payload::Shape(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> SpaceRegistry {
        let mut s = SpaceRegistry::new();
        s.add_era("2016");
        s.add_analysis("X");
        s.add_channel("c1");
        s.add_process("sig", true);
        s.add_process("bkg", false);
        s
    }

    #[test]
    fn test_zero_floor() {
        let space = space();
        let mut store = YieldStore::new();
        // missing cell
        assert_eq!(store.get_expected("bkg", "2016", "X", "c1").integral(), YIELD_FLOOR);
        // explicitly stored zero
        assert!(store.set_expected(&space, "bkg", "2016", "X", "c1", Payload::Rate(0.0)));
        assert_eq!(store.get_expected("bkg", "2016", "X", "c1").integral(), YIELD_FLOOR);
        // real value passes through
        assert!(store.set_expected(&space, "bkg", "2016", "X", "c1", Payload::Rate(10.0)));
        assert_eq!(store.get_expected("bkg", "2016", "X", "c1").integral(), 10.0);
    }

    #[test]
    fn test_set_rejects_unknown_tokens() {
        let space = space();
        let mut store = YieldStore::new();
        assert!(!store.set_expected(&space, "bkg", "2017", "X", "c1", Payload::Rate(1.0)));
        assert_eq!(store.get_expected("bkg", "2017", "X", "c1").integral(), YIELD_FLOOR);
        assert!(!store.set_observed(&space, "2016", "X", "c9", Payload::Rate(1.0)));
    }

    #[test]
    fn test_blinded_scalar_sum() {
        let space = space();
        let mut store = YieldStore::new();
        store.set_expected(&space, "bkg", "2016", "X", "c1", Payload::Rate(10.0));
        store.set_expected(&space, "sig", "2016", "X", "c1", Payload::Rate(2.0));
        let obs = store.get_observed(&space, "2016", "X", "c1", true, false).unwrap();
        assert_eq!(obs.integral(), 10.0);
        let obs = store.get_observed(&space, "2016", "X", "c1", true, true).unwrap();
        assert_eq!(obs.integral(), 12.0);
    }

    #[test]
    fn test_blinded_shape_merge() {
        let mut space = space();
        space.add_process("bkg2", false);
        let mut store = YieldStore::new();
        let h1 = Histogram::uniform("bkg", 0.0, 2.0, vec![3.2, -0.4]).unwrap();
        let h2 = Histogram::uniform("bkg2", 0.0, 2.0, vec![1.5, 2.5]).unwrap();
        store.set_expected(&space, "bkg", "2016", "X", "c1", Payload::Shape(h1));
        store.set_expected(&space, "bkg2", "2016", "X", "c1", Payload::Shape(h2));
        let obs = store.get_observed(&space, "2016", "X", "c1", true, false).unwrap();
        match obs {
            Payload::Shape(h) => {
                // 3.2+1.5 -> 4, -0.4+2.5 -> 2
                assert_eq!(h.bin_content, vec![4.0, 2.0]);
                assert_eq!(h.bin_error(0), 2.0);
            }
            _ => panic!("expected merged shape"),
        }
    }

    #[test]
    fn test_unblinded_stored_or_zero() {
        let space = space();
        let mut store = YieldStore::new();
        assert_eq!(
            store.get_observed(&space, "2016", "X", "c1", false, false).unwrap().integral(),
            0.0
        );
        store.set_observed(&space, "2016", "X", "c1", Payload::Rate(7.0));
        assert_eq!(
            store.get_observed(&space, "2016", "X", "c1", false, false).unwrap().integral(),
            7.0
        );
    }
}
