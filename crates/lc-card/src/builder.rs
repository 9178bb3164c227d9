//! Session-level facade over the whole engine.
//!
//! A [`CardBuilder`] owns the space, yields, systematics and the shared
//! workspace for one card-building session; everything is torn down when
//! it is dropped. The surface mirrors how driver scripts talk to the
//! engine: declare the space, fill yields, attach systematics, print.

use std::path::Path;

use lc_core::Result;

use crate::assemble::{AssembleOptions, CardTable, RowAssembler, Selection};
use crate::payload::Payload;
use crate::render;
use crate::space::SpaceRegistry;
use crate::systematics::{Entry, Mode, SystematicRegistry};
use crate::workspace::FitWorkspace;
use crate::yields::YieldStore;

/// One card-building session.
#[derive(Debug)]
pub struct CardBuilder {
    space: SpaceRegistry,
    yields: YieldStore,
    systematics: SystematicRegistry,
    workspace: FitWorkspace,
}

impl CardBuilder {
    /// New session; `name` becomes the shared workspace name.
    pub fn new(name: &str) -> Self {
        Self {
            space: SpaceRegistry::new(),
            yields: YieldStore::new(),
            systematics: SystematicRegistry::new(),
            workspace: FitWorkspace::new(name),
        }
    }

    /// Declare the mass variable `MH` over `[lo, hi]`.
    pub fn add_mh(&mut self, lo: f64, hi: f64) -> Result<()> {
        self.workspace.factory(&format!("MH[{lo}, {hi}]"))
    }

    /// Declare the fit observable `x` over `[lo, hi]`.
    pub fn add_x(&mut self, lo: f64, hi: f64) -> Result<()> {
        self.workspace.factory(&format!("x[{lo}, {hi}]"))
    }

    /// Add an era.
    pub fn add_era(&mut self, era: &str) {
        self.space.add_era(era);
    }

    /// Add an analysis.
    pub fn add_analysis(&mut self, analysis: &str) {
        self.space.add_analysis(analysis);
    }

    /// Add a channel.
    pub fn add_channel(&mut self, channel: &str) {
        self.space.add_channel(channel);
    }

    /// Add a process, tagged signal or background.
    pub fn add_process(&mut self, process: &str, signal: bool) {
        self.space.add_process(process, signal);
    }

    /// Store an expected yield. Returns whether the call validated.
    pub fn set_expected(
        &mut self,
        process: &str,
        era: &str,
        analysis: &str,
        channel: &str,
        payload: Payload,
    ) -> bool {
        self.yields.set_expected(&self.space, process, era, analysis, channel, payload)
    }

    /// Store an observation. Returns whether the call validated.
    pub fn set_observed(
        &mut self,
        era: &str,
        analysis: &str,
        channel: &str,
        payload: Payload,
    ) -> bool {
        self.yields.set_observed(&self.space, era, analysis, channel, payload)
    }

    /// Declare a systematic. Returns whether the declaration was stored.
    pub fn add_systematic(&mut self, template: &str, mode: Mode, entries: Vec<Entry>) -> bool {
        self.systematics.add_systematic(&self.space, template, mode, entries)
    }

    /// Record a group label.
    pub fn add_group(&mut self, group: &str, systnames: &[String]) {
        self.systematics.add_group(group, systnames);
    }

    /// The declared space.
    pub fn space(&self) -> &SpaceRegistry {
        &self.space
    }

    /// The shared workspace.
    pub fn workspace(&self) -> &FitWorkspace {
        &self.workspace
    }

    /// Assemble the resolved table for a selection.
    pub fn assemble(
        &mut self,
        selection: &Selection,
        opts: &AssembleOptions,
    ) -> Result<CardTable> {
        let assembler = RowAssembler::new(&self.space, &self.yields, &self.systematics);
        assembler.assemble(&mut self.workspace, selection, opts)
    }

    /// Assemble and write the card to `path`, plus companion artifacts.
    ///
    /// The card text references a `.root` shape file next to the card; the
    /// exported histogram list (and the workspace snapshot, when parametric
    /// models participated) are written as JSON for the external histogram
    /// writer.
    pub fn print_card(
        &mut self,
        path: &Path,
        selection: &Selection,
        opts: &AssembleOptions,
    ) -> Result<CardTable> {
        let table = self.assemble(selection, opts)?;

        let shape_file = path.with_extension("root");
        let shape_name = shape_file
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "card.root".to_string());

        tracing::info!("Writing {}", path.display());
        std::fs::write(path, render::render_card(&table, &shape_name))?;

        if !table.shapes.is_empty() {
            let artifact = path.with_extension("shapes.json");
            tracing::info!("Writing {}", artifact.display());
            std::fs::write(artifact, render::shape_artifact_json(&table)?)?;
        }
        if table.uses_workspace {
            let snapshot = path.with_extension("workspace.json");
            tracing::info!("Writing {}", snapshot.display());
            std::fs::write(snapshot, self.workspace.to_json()?)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systematics::{DimFilter, SystValue};

    #[test]
    fn test_builder_facade() {
        let mut card = CardBuilder::new("w");
        card.add_era("2016");
        card.add_analysis("X");
        card.add_channel("c1");
        card.add_process("sig", true);
        card.add_process("bkg", false);
        assert!(card.set_expected("bkg", "2016", "X", "c1", Payload::Rate(10.0)));
        assert!(!card.set_expected("bkg", "2016", "X", "nope", Payload::Rate(1.0)));
        assert!(card.add_systematic(
            "lumi",
            Mode::LnN,
            vec![Entry { filter: DimFilter::all(), value: SystValue::Factor(1.025) }],
        ));
        let table =
            card.assemble(&Selection::default(), &AssembleOptions::default()).unwrap();
        assert_eq!(table.bins.len(), 1);
        assert_eq!(table.rows.len(), 1);
    }
}
