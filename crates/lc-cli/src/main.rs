//! limitcard CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lc_card::{AssembleOptions, Selection};

mod card_spec;

#[derive(Parser)]
#[command(name = "limitcard")]
#[command(about = "limitcard - datacard assembly for limit setting")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a datacard from a card spec
    Render {
        /// Input card spec (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output datacard path
        #[arg(short, long)]
        output: PathBuf,

        /// Use the stored observation instead of the blinded background sum
        #[arg(long)]
        unblind: bool,

        /// Include signals in the blinded observation
        #[arg(long)]
        add_signal: bool,

        /// Export shapes into a saved workspace snapshot
        #[arg(long)]
        save_workspace: bool,

        /// Derive per-process statistical shape systematics
        #[arg(long)]
        mc_stats: bool,

        /// Restrict to an era (repeatable; default all)
        #[arg(long = "era")]
        eras: Vec<String>,

        /// Restrict to an analysis (repeatable; default all)
        #[arg(long = "analysis")]
        analyses: Vec<String>,

        /// Restrict to a channel (repeatable; default all)
        #[arg(long = "channel")]
        channels: Vec<String>,

        /// Restrict to a process (repeatable; default all)
        #[arg(long = "process")]
        processes: Vec<String>,
    },

    /// Validate a card spec and report its contents
    Check {
        /// Input card spec (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Render {
            input,
            output,
            unblind,
            add_signal,
            save_workspace,
            mc_stats,
            eras,
            analyses,
            channels,
            processes,
        } => cmd_render(
            &input,
            &output,
            unblind,
            add_signal,
            save_workspace,
            mc_stats,
            eras,
            analyses,
            channels,
            processes,
        ),
        Commands::Check { input } => cmd_check(&input),
    }
}

fn selection_dim(tokens: Vec<String>) -> Vec<String> {
    if tokens.is_empty() {
        vec![lc_card::WILDCARD.to_string()]
    } else {
        tokens
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_render(
    input: &PathBuf,
    output: &PathBuf,
    unblind: bool,
    add_signal: bool,
    save_workspace: bool,
    mc_stats: bool,
    eras: Vec<String>,
    analyses: Vec<String>,
    channels: Vec<String>,
    processes: Vec<String>,
) -> Result<()> {
    tracing::info!(path = %input.display(), "loading card spec");
    let spec = card_spec::read_card_spec(input)?;
    let mut card = card_spec::build_session(&spec)?;

    let selection = Selection {
        eras: selection_dim(eras),
        analyses: selection_dim(analyses),
        channels: selection_dim(channels),
        processes: selection_dim(processes),
    };
    let opts = AssembleOptions { blind: !unblind, add_signal, save_workspace, mc_stats };

    let table = card.print_card(output, &selection, &opts)?;
    tracing::info!(
        bins = table.bins.len(),
        nuisances = table.rows.len(),
        shapes = table.shapes.len(),
        "card written"
    );
    println!(
        "{}: {} bins, {} columns, {} nuisances",
        output.display(),
        table.bins.len(),
        table.rates.len(),
        table.rows.len()
    );
    if !table.deferred.is_empty() {
        println!("deferred (param-style, not rendered): {}", table.deferred.join(" "));
    }
    Ok(())
}

fn cmd_check(input: &PathBuf) -> Result<()> {
    let spec = card_spec::read_card_spec(input)?;
    let card = card_spec::build_session(&spec)?;
    println!(
        "{}: {} eras, {} analyses, {} channels, {} processes ({} signal), {} systematics",
        input.display(),
        card.space().eras().len(),
        card.space().analyses().len(),
        card.space().channels().len(),
        card.space().processes().len(),
        card.space().signals().len(),
        spec.systematics.len()
    );
    Ok(())
}
