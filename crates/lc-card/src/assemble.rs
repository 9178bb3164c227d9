//! Row assembly: from registries and yields to a flat, ordered table.
//!
//! The assembler iterates the requested cross-product of the space, builds
//! the bin/observation/rate columns, and resolves every systematic template
//! into one row per distinct expanded name. All ordering decisions live
//! here; the renderer only formats what this module produces.

use std::collections::BTreeMap;

use lc_core::{Error, Histogram, Result};

use crate::payload::Payload;
use crate::resolve::{expand_template, resolve};
use crate::space::{Dimension, SpaceRegistry, WILDCARD};
use crate::systematics::{Cell, DimFilter, Entry, Mode, SystValue, Systematic, SystematicRegistry};
use crate::workspace::FitWorkspace;
use crate::yields::YieldStore;

/// The subset of the space one card covers. Each dimension defaults to
/// `["all"]`, i.e. everything registered.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Selected eras.
    pub eras: Vec<String>,
    /// Selected analyses.
    pub analyses: Vec<String>,
    /// Selected channels.
    pub channels: Vec<String>,
    /// Selected processes.
    pub processes: Vec<String>,
}

impl Default for Selection {
    fn default() -> Self {
        let all = vec![WILDCARD.to_string()];
        Self { eras: all.clone(), analyses: all.clone(), channels: all.clone(), processes: all }
    }
}

/// Assembly switches, mirroring the driver-script flags.
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    /// Synthesize observations from expected backgrounds.
    pub blind: bool,
    /// Include signals in the blinded observation.
    pub add_signal: bool,
    /// Export shapes into the shared workspace instead of a flat file.
    pub save_workspace: bool,
    /// Derive per-process statistical shape systematics from bin errors.
    pub mc_stats: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self { blind: true, add_signal: false, save_workspace: false, mc_stats: false }
    }
}

/// One resolved nuisance cell, data only; formatting happens in the
/// renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    /// No effect, rendered `-`.
    Neutral,
    /// Symmetric factor.
    Factor(f64),
    /// Asymmetric pair, rendered `down/up`.
    Asym {
        /// Down-shift factor.
        down: f64,
        /// Up-shift factor.
        up: f64,
    },
    /// Shape templates were exported for this cell, rendered `1`.
    ShapeFlag,
}

/// One resolved nuisance row.
#[derive(Debug, Clone)]
pub struct SystRow {
    /// Expanded systematic name.
    pub name: String,
    /// Constraint mode.
    pub mode: Mode,
    /// One cell per (bin × process) column.
    pub cells: Vec<TableCell>,
}

/// A `rateParam` line contributed by a parametric-model yield.
#[derive(Debug, Clone)]
pub struct RateParam {
    /// Parameter name.
    pub name: String,
    /// Bin label.
    pub bin: String,
    /// Process name.
    pub process: String,
    /// Initial value (the model normalization).
    pub init: f64,
}

/// Everything the renderer needs, fully ordered and resolved.
#[derive(Debug, Clone)]
pub struct CardTable {
    /// Workspace name, used as prefix in workspace shape locators.
    pub workspace_name: String,
    /// Bin labels, era → analysis → channel order.
    pub bins: Vec<String>,
    /// Observation per bin (`-1` = look up in the workspace).
    pub observations: Vec<f64>,
    /// Bin label per (bin × process) column.
    pub column_bins: Vec<String>,
    /// Process name per column.
    pub column_processes: Vec<String>,
    /// Process index per column (signals ≤ 0, backgrounds ≥ 1).
    pub column_indices: Vec<i64>,
    /// Rate per column (`-1` = workspace shape, `1` = parametric model).
    pub rates: Vec<f64>,
    /// Nuisance rows, sorted by expanded name.
    pub rows: Vec<SystRow>,
    /// Rate parameters from parametric-model yields.
    pub rate_params: Vec<RateParam>,
    /// Group labels.
    pub groups: Vec<(String, Vec<String>)>,
    /// Exported shapes, in export order, already renamed.
    pub shapes: Vec<Histogram>,
    /// Whether any payload was built into the shared workspace.
    pub uses_workspace: bool,
    /// Templates with `param`/`flatParam` mode, excluded from the table.
    pub deferred: Vec<String>,
}

struct ColumnCoord {
    bin: String,
    era: String,
    analysis: String,
    channel: String,
    process: String,
}

struct RowBuild {
    mode: Mode,
    cells: Vec<Option<SystValue>>,
}

/// Drives resolution over the full requested cross-product.
pub struct RowAssembler<'a> {
    space: &'a SpaceRegistry,
    yields: &'a YieldStore,
    systematics: &'a SystematicRegistry,
}

impl<'a> RowAssembler<'a> {
    /// Assembler over the session's registries.
    pub fn new(
        space: &'a SpaceRegistry,
        yields: &'a YieldStore,
        systematics: &'a SystematicRegistry,
    ) -> Self {
        Self { space, yields, systematics }
    }

    /// Assemble the table for one selection.
    ///
    /// Any validation failure aborts the whole call; there is no partial
    /// card. Parametric payloads are built into `workspace` as they are
    /// encountered, in column order.
    pub fn assemble(
        &self,
        workspace: &mut FitWorkspace,
        selection: &Selection,
        opts: &AssembleOptions,
    ) -> Result<CardTable> {
        let mut good = true;
        good &= self.space.validate(Dimension::Era, &selection.eras);
        good &= self.space.validate(Dimension::Analysis, &selection.analyses);
        good &= self.space.validate(Dimension::Channel, &selection.channels);
        good &= self.space.validate(Dimension::Process, &selection.processes);
        if !good {
            return Err(Error::Validation(
                "card selection contains unrecognized tokens".to_string(),
            ));
        }

        let eras = expand(&selection.eras, self.space.eras());
        let analyses = expand(&selection.analyses, self.space.analyses());
        let channels = expand(&selection.channels, self.space.channels());
        let selected = expand(&selection.processes, self.space.processes());
        // signals first, both partitions in registration order
        let ordered: Vec<String> = self
            .space
            .signals()
            .iter()
            .chain(self.space.backgrounds())
            .filter(|p| selected.contains(*p))
            .cloned()
            .collect();
        let n_signals =
            ordered.iter().filter(|p| self.space.is_signal(p.as_str())).count() as i64;

        let mut table = CardTable {
            workspace_name: workspace.name().to_string(),
            bins: Vec::new(),
            observations: Vec::new(),
            column_bins: Vec::new(),
            column_processes: Vec::new(),
            column_indices: Vec::new(),
            rates: Vec::new(),
            rows: Vec::new(),
            rate_params: Vec::new(),
            groups: self.systematics.groups().to_vec(),
            shapes: Vec::new(),
            uses_workspace: false,
            deferred: Vec::new(),
        };

        // observations, one per bin
        for era in &eras {
            for analysis in &analyses {
                for channel in &channels {
                    let bin = format!("{era}_{analysis}_{channel}");
                    let obs = self.yields.get_observed(
                        self.space,
                        era,
                        analysis,
                        channel,
                        opts.blind,
                        opts.add_signal,
                    )?;
                    let label = format!("data_obs_{bin}");
                    let value = match obs {
                        Payload::Rate(v) => {
                            tracing::info!("{}: {}", label, v);
                            v
                        }
                        Payload::Shape(h) => {
                            tracing::info!("{}: {}", label, h.integral());
                            let renamed = h.renamed(&label);
                            let integral = renamed.integral();
                            table.shapes.push(renamed.clone());
                            if opts.save_workspace {
                                workspace.import_data(renamed);
                                table.uses_workspace = true;
                                -1.0
                            } else {
                                integral
                            }
                        }
                        Payload::Model(_) => {
                            return Err(Error::Computation(format!(
                                "unsupported observation payload type \
                                 (era {era}, analysis {analysis}, channel {channel})"
                            )))
                        }
                    };
                    table.bins.push(bin);
                    table.observations.push(value);
                }
            }
        }

        // rate columns, bin-major, signals then backgrounds
        let mut columns: Vec<ColumnCoord> = Vec::new();
        for era in &eras {
            for analysis in &analyses {
                for channel in &channels {
                    let bin = format!("{era}_{analysis}_{channel}");
                    for (i, process) in ordered.iter().enumerate() {
                        let label = format!("{process}_{bin}");
                        let exp = self.yields.get_expected(process, era, analysis, channel);
                        let rate = match exp {
                            Payload::Rate(v) => {
                                tracing::info!("{}: {}", label, v);
                                v
                            }
                            Payload::Shape(h) => {
                                tracing::info!("{}: {}", label, h.integral());
                                let renamed = h.renamed(&label);
                                let integral = renamed.integral();
                                table.shapes.push(renamed.clone());
                                if opts.save_workspace {
                                    workspace.import_data(renamed);
                                    table.uses_workspace = true;
                                    -1.0
                                } else {
                                    integral
                                }
                            }
                            Payload::Model(m) => {
                                m.build(workspace, &label)?;
                                table.uses_workspace = true;
                                table.rate_params.push(RateParam {
                                    name: format!("{label}_norm"),
                                    bin: bin.clone(),
                                    process: process.clone(),
                                    init: m.integral(),
                                });
                                1.0
                            }
                        };
                        table.column_bins.push(bin.clone());
                        table.column_processes.push(process.clone());
                        table.column_indices.push(i as i64 - n_signals + 1);
                        table.rates.push(rate);
                        columns.push(ColumnCoord {
                            bin: bin.clone(),
                            era: era.clone(),
                            analysis: analysis.clone(),
                            channel: channel.clone(),
                            process: process.clone(),
                        });
                    }
                }
            }
        }

        // statistical uncertainties are just more shape systematics
        let stat_systs =
            if opts.mc_stats { self.stat_systematics(&columns) } else { Vec::new() };

        // two-level resolution: template -> expanded name -> per-cell value
        let mut rows_map: BTreeMap<String, RowBuild> = BTreeMap::new();
        for syst in self.systematics.systematics().iter().chain(stat_systs.iter()) {
            if !syst.mode.in_table() {
                tracing::warn!(
                    "systematic {} has mode {}; param-style nuisances are not yet rendered",
                    syst.template,
                    syst.mode
                );
                table.deferred.push(syst.template.clone());
                continue;
            }
            for (col, coord) in columns.iter().enumerate() {
                let cell = Cell {
                    process: &coord.process,
                    era: &coord.era,
                    analysis: &coord.analysis,
                    channel: &coord.channel,
                };
                let name = expand_template(&syst.template, &cell);
                let row = rows_map.entry(name.clone()).or_insert_with(|| RowBuild {
                    mode: syst.mode,
                    cells: vec![None; columns.len()],
                });
                if row.mode != syst.mode {
                    tracing::warn!(
                        "systematic {} declared with modes {} and {}; keeping {}",
                        name,
                        row.mode,
                        syst.mode,
                        row.mode
                    );
                }
                if let Some(value) = resolve(syst, &name, &cell) {
                    if row.cells[col].is_some() {
                        tracing::warn!(
                            systematic = %name,
                            bin = %coord.bin,
                            process = %coord.process,
                            "cell already covered by an earlier declaration; \
                             overwriting (last write wins)"
                        );
                    }
                    row.cells[col] = Some(value.clone());
                }
            }
        }

        // BTreeMap iteration gives the lexicographic row order
        for (name, build) in rows_map {
            let mut cells = Vec::with_capacity(columns.len());
            for (col, value) in build.cells.into_iter().enumerate() {
                let coord = &columns[col];
                let cell = match value {
                    None => TableCell::Neutral,
                    Some(SystValue::Factor(v)) if v == 1.0 => TableCell::Neutral,
                    Some(SystValue::Factor(v)) => TableCell::Factor(v),
                    Some(SystValue::Asym { down, up }) => TableCell::Asym { down, up },
                    Some(SystValue::Shape(h)) => {
                        let label = format!("{}_{}_{}", coord.process, coord.bin, name);
                        self.export_shape(&mut table, workspace, h.renamed(label), opts);
                        TableCell::ShapeFlag
                    }
                    Some(SystValue::ShapePair { up, down }) => {
                        let label = format!("{}_{}_{}", coord.process, coord.bin, name);
                        self.export_shape(
                            &mut table,
                            workspace,
                            up.renamed(format!("{label}Up")),
                            opts,
                        );
                        self.export_shape(
                            &mut table,
                            workspace,
                            down.renamed(format!("{label}Down")),
                            opts,
                        );
                        TableCell::ShapeFlag
                    }
                    Some(SystValue::Model(m)) => {
                        let label = format!("{}_{}_{}", coord.process, coord.bin, name);
                        m.build(workspace, &label)?;
                        table.uses_workspace = true;
                        TableCell::ShapeFlag
                    }
                    Some(SystValue::ModelPair { up, down }) => {
                        let label = format!("{}_{}_{}", coord.process, coord.bin, name);
                        up.build(workspace, &format!("{label}Up"))?;
                        down.build(workspace, &format!("{label}Down"))?;
                        table.uses_workspace = true;
                        TableCell::ShapeFlag
                    }
                };
                cells.push(cell);
            }
            table.rows.push(SystRow { name, mode: build.mode, cells });
        }

        Ok(table)
    }

    fn export_shape(
        &self,
        table: &mut CardTable,
        workspace: &mut FitWorkspace,
        hist: Histogram,
        opts: &AssembleOptions,
    ) {
        table.shapes.push(hist.clone());
        if opts.save_workspace {
            workspace.import_data(hist);
            table.uses_workspace = true;
        }
    }

    /// One synthetic `stat_{process}` shape systematic per process with a
    /// shape-valued yield: each bin perturbed by ±1σ, floored at zero.
    fn stat_systematics(&self, columns: &[ColumnCoord]) -> Vec<Systematic> {
        let mut by_process: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
        for coord in columns {
            let exp = self.yields.get_expected(
                &coord.process,
                &coord.era,
                &coord.analysis,
                &coord.channel,
            );
            if let Payload::Shape(h) = exp {
                by_process.entry(coord.process.clone()).or_default().push(Entry {
                    filter: DimFilter {
                        processes: vec![coord.process.clone()],
                        eras: vec![coord.era.clone()],
                        analyses: vec![coord.analysis.clone()],
                        channels: vec![coord.channel.clone()],
                    },
                    value: SystValue::ShapePair {
                        up: h.shifted(1.0),
                        down: h.shifted(-1.0),
                    },
                });
            }
        }
        by_process
            .into_values()
            .map(|entries| Systematic {
                template: "stat_{process}".to_string(),
                mode: Mode::Shape,
                entries,
            })
            .collect()
    }
}

fn expand(selection: &[String], registered: &[String]) -> Vec<String> {
    if selection.iter().any(|t| t.as_str() == WILDCARD) {
        registered.to_vec()
    } else {
        selection.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systematics::{DimFilter, Entry};

    fn session() -> (SpaceRegistry, YieldStore, SystematicRegistry) {
        let mut space = SpaceRegistry::new();
        space.add_era("2016");
        space.add_analysis("X");
        space.add_channel("c1");
        space.add_channel("c2");
        space.add_process("sig", true);
        space.add_process("bkg", false);

        let mut yields = YieldStore::new();
        yields.set_expected(&space, "bkg", "2016", "X", "c1", Payload::Rate(10.0));
        yields.set_expected(&space, "sig", "2016", "X", "c1", Payload::Rate(2.0));
        yields.set_expected(&space, "bkg", "2016", "X", "c2", Payload::Rate(5.0));
        yields.set_expected(&space, "sig", "2016", "X", "c2", Payload::Rate(1.0));

        let mut systs = SystematicRegistry::new();
        systs.add_systematic(
            &space,
            "lumi",
            Mode::LnN,
            vec![Entry { filter: DimFilter::all(), value: SystValue::Factor(1.025) }],
        );
        (space, yields, systs)
    }

    #[test]
    fn test_end_to_end_example() {
        let (space, yields, systs) = session();
        let assembler = RowAssembler::new(&space, &yields, &systs);
        let mut ws = FitWorkspace::new("w");
        let table = assembler
            .assemble(&mut ws, &Selection::default(), &AssembleOptions::default())
            .unwrap();

        assert_eq!(table.bins, vec!["2016_X_c1".to_string(), "2016_X_c2".to_string()]);
        assert_eq!(table.observations, vec![10.0, 5.0]);
        assert_eq!(
            table.column_processes,
            vec!["sig".to_string(), "bkg".to_string(), "sig".to_string(), "bkg".to_string()]
        );
        assert_eq!(table.column_indices, vec![0, 1, 0, 1]);
        assert_eq!(table.rates, vec![2.0, 10.0, 1.0, 5.0]);

        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.name, "lumi");
        assert_eq!(row.mode, Mode::LnN);
        assert_eq!(
            row.cells,
            vec![
                TableCell::Factor(1.025),
                TableCell::Factor(1.025),
                TableCell::Factor(1.025),
                TableCell::Factor(1.025)
            ]
        );
        assert!(table.shapes.is_empty());
    }

    #[test]
    fn test_selection_validation_aborts() {
        let (space, yields, systs) = session();
        let assembler = RowAssembler::new(&space, &yields, &systs);
        let mut ws = FitWorkspace::new("w");
        let selection = Selection { eras: vec!["2017".to_string()], ..Selection::default() };
        assert!(assembler
            .assemble(&mut ws, &selection, &AssembleOptions::default())
            .is_err());
    }

    #[test]
    fn test_decorrelated_rows() {
        let (space, yields, mut systs) = session();
        systs.add_systematic(
            &space,
            "fake_{process}",
            Mode::LnN,
            vec![
                Entry {
                    filter: DimFilter {
                        processes: vec!["sig".to_string()],
                        ..DimFilter::all()
                    },
                    value: SystValue::Factor(1.1),
                },
                Entry {
                    filter: DimFilter {
                        processes: vec!["bkg".to_string()],
                        ..DimFilter::all()
                    },
                    value: SystValue::Factor(1.2),
                },
            ],
        );
        let assembler = RowAssembler::new(&space, &yields, &systs);
        let mut ws = FitWorkspace::new("w");
        let table = assembler
            .assemble(&mut ws, &Selection::default(), &AssembleOptions::default())
            .unwrap();

        // rows sorted lexicographically: fake_bkg, fake_sig, lumi
        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["fake_bkg", "fake_sig", "lumi"]);
        let fake_sig = &table.rows[1];
        // non-neutral only in its own process columns (sig = columns 0 and 2)
        assert_eq!(
            fake_sig.cells,
            vec![
                TableCell::Factor(1.1),
                TableCell::Neutral,
                TableCell::Factor(1.1),
                TableCell::Neutral
            ]
        );
    }

    #[test]
    fn test_colliding_templates_merge_last_write_wins() {
        let (space, yields, mut systs) = session();
        systs.add_systematic(
            &space,
            "fake_{process}",
            Mode::LnN,
            vec![Entry { filter: DimFilter::all(), value: SystValue::Factor(1.1) }],
        );
        // expands to the same row name as fake_{process} on sig columns
        systs.add_systematic(
            &space,
            "fake_sig",
            Mode::LnN,
            vec![Entry {
                filter: DimFilter { processes: vec!["sig".to_string()], ..DimFilter::all() },
                value: SystValue::Factor(1.4),
            }],
        );
        let assembler = RowAssembler::new(&space, &yields, &systs);
        let mut ws = FitWorkspace::new("w");
        let table = assembler
            .assemble(&mut ws, &Selection::default(), &AssembleOptions::default())
            .unwrap();

        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["fake_bkg", "fake_sig", "lumi"]);
        let fake_sig = &table.rows[1];
        // sig columns (0 and 2): the later literal declaration overwrites
        // the templated one; bkg columns stay untouched by it
        assert_eq!(
            fake_sig.cells,
            vec![
                TableCell::Factor(1.4),
                TableCell::Neutral,
                TableCell::Factor(1.4),
                TableCell::Neutral
            ]
        );
        let fake_bkg = &table.rows[0];
        assert_eq!(
            fake_bkg.cells,
            vec![
                TableCell::Neutral,
                TableCell::Factor(1.1),
                TableCell::Neutral,
                TableCell::Factor(1.1)
            ]
        );
    }

    #[test]
    fn test_param_modes_deferred() {
        let (space, yields, mut systs) = session();
        systs.add_systematic(
            &space,
            "alpha",
            Mode::FlatParam,
            vec![Entry { filter: DimFilter::all(), value: SystValue::Factor(1.0) }],
        );
        let assembler = RowAssembler::new(&space, &yields, &systs);
        let mut ws = FitWorkspace::new("w");
        let table = assembler
            .assemble(&mut ws, &Selection::default(), &AssembleOptions::default())
            .unwrap();
        assert_eq!(table.deferred, vec!["alpha".to_string()]);
        assert!(table.rows.iter().all(|r| r.name != "alpha"));
    }

    #[test]
    fn test_shape_yields_and_mc_stats() {
        let mut space = SpaceRegistry::new();
        space.add_era("2016");
        space.add_analysis("X");
        space.add_channel("c1");
        space.add_process("sig", true);
        space.add_process("bkg", false);

        let mut yields = YieldStore::new();
        let h_sig = Histogram::uniform("sig", 0.0, 2.0, vec![1.0, 1.0]).unwrap();
        let h_bkg = Histogram::uniform("bkg", 0.0, 2.0, vec![4.0, 9.0]).unwrap();
        yields.set_expected(&space, "sig", "2016", "X", "c1", Payload::Shape(h_sig));
        yields.set_expected(&space, "bkg", "2016", "X", "c1", Payload::Shape(h_bkg));

        let systs = SystematicRegistry::new();
        let assembler = RowAssembler::new(&space, &yields, &systs);
        let mut ws = FitWorkspace::new("w");
        let opts = AssembleOptions { mc_stats: true, ..AssembleOptions::default() };
        let table = assembler.assemble(&mut ws, &Selection::default(), &opts).unwrap();

        assert_eq!(table.rates, vec![2.0, 13.0]);
        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["stat_bkg", "stat_sig"]);
        assert_eq!(table.rows[0].cells, vec![TableCell::Neutral, TableCell::ShapeFlag]);

        // exported: data_obs + 2 nominals + 2x2 stat templates
        let shape_names: Vec<&str> = table.shapes.iter().map(|h| h.name.as_str()).collect();
        assert!(shape_names.contains(&"data_obs_2016_X_c1"));
        assert!(shape_names.contains(&"sig_2016_X_c1"));
        assert!(shape_names.contains(&"bkg_2016_X_c1_stat_bkgUp"));
        assert!(shape_names.contains(&"bkg_2016_X_c1_stat_bkgDown"));
        // stat up template: content + sqrt(content)
        let up = table
            .shapes
            .iter()
            .find(|h| h.name == "bkg_2016_X_c1_stat_bkgUp")
            .unwrap();
        assert_eq!(up.bin_content, vec![6.0, 12.0]);
    }

    #[test]
    fn test_parametric_rate_param() {
        use crate::models::{ModelKind, ModelSpec, ParamRange};

        let mut space = SpaceRegistry::new();
        space.add_era("2016");
        space.add_analysis("X");
        space.add_channel("c1");
        space.add_process("sig", true);
        space.add_process("bkg", false);

        let mut yields = YieldStore::new();
        let mut model = ModelSpec::new(
            "sig",
            ModelKind::Gaussian {
                mean: ParamRange::new(250.0, 0.0, 1000.0),
                sigma: ParamRange::new(25.0, 0.0, 100.0),
            },
        );
        model.set_integral(3.5);
        yields.set_expected(&space, "sig", "2016", "X", "c1", Payload::Model(model));
        yields.set_expected(&space, "bkg", "2016", "X", "c1", Payload::Rate(10.0));

        let systs = SystematicRegistry::new();
        let assembler = RowAssembler::new(&space, &yields, &systs);
        let mut ws = FitWorkspace::new("w");
        ws.factory("x[0, 1000]").unwrap();
        let table = assembler
            .assemble(&mut ws, &Selection::default(), &AssembleOptions::default())
            .unwrap();

        assert_eq!(table.rates, vec![1.0, 10.0]);
        assert!(table.uses_workspace);
        assert_eq!(table.rate_params.len(), 1);
        let rp = &table.rate_params[0];
        assert_eq!(rp.name, "sig_2016_X_c1_norm");
        assert_eq!(rp.init, 3.5);
        assert!(ws.pdf("sig_2016_X_c1").is_some());
    }
}
