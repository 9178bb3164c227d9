//! Fixed-width datacard serialization.
//!
//! Pure formatting over an assembled [`CardTable`]: first column 40
//! characters, every following column 30, truncated or padded, never
//! wrapped. Nothing is re-derived here.

use lc_core::Result;
use serde::Serialize;

use crate::assemble::{CardTable, TableCell};

const LINE_WIDTH: usize = 80;
const FIRST_WIDTH: usize = 40;
const REST_WIDTH: usize = 30;

/// `%.4g`-style number formatting: four significant digits, trailing
/// zeros trimmed, exponent notation outside `[1e-4, 1e4)`.
pub fn fmt_g(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return format!("{v}");
    }
    let exp = v.abs().log10().floor() as i32;
    if !(-4..4).contains(&exp) {
        let s = format!("{v:.3e}");
        let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
        let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
        format!("{mantissa}e{exponent}")
    } else {
        let prec = (3 - exp).max(0) as usize;
        let s = format!("{v:.prec$}");
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    }
}

fn pad(s: &str, width: usize) -> String {
    let truncated: String = s.chars().take(width).collect();
    format!("{truncated:<width$}")
}

fn line(cells: &[String]) -> String {
    let mut out = pad(&cells[0], FIRST_WIDTH);
    out.push(' ');
    for c in &cells[1..] {
        out.push_str(&pad(c, REST_WIDTH));
    }
    out.push('\n');
    out
}

fn rule() -> String {
    let mut s = "-".repeat(LINE_WIDTH);
    s.push('\n');
    s
}

fn render_cell(cell: &TableCell) -> String {
    match cell {
        TableCell::Neutral => "-".to_string(),
        TableCell::Factor(v) => fmt_g(*v),
        TableCell::Asym { down, up } => format!("{}/{}", fmt_g(*down), fmt_g(*up)),
        TableCell::ShapeFlag => "1".to_string(),
    }
}

/// Render the card text. `shape_file` is the path the shape-locator lines
/// point at (the external writer's `.root` companion).
pub fn render_card(table: &CardTable, shape_file: &str) -> String {
    let mut out = String::new();

    // header
    out.push_str(&format!("imax {} number of bins\n", table.bins.len()));
    out.push_str("jmax * number of processes\n");
    out.push_str("kmax * number of nuissances\n");
    out.push_str(&rule());

    // shape locators
    if table.shapes.is_empty() && !table.uses_workspace {
        out.push_str("shapes * * FAKE\n");
    } else {
        for bin in &table.bins {
            let mut proc = format!("$PROCESS_{bin}");
            if table.uses_workspace {
                proc = format!("{}:{}", table.workspace_name, proc);
            }
            out.push_str(&format!("shapes * {bin} {shape_file} {proc} {proc}_$SYSTEMATIC\n"));
        }
    }
    out.push_str(&rule());

    // observations
    let mut bins_row = vec!["bin".to_string()];
    bins_row.extend(table.bins.iter().cloned());
    out.push_str(&line(&bins_row));
    let mut obs_row = vec!["observation".to_string()];
    obs_row.extend(table.observations.iter().map(|v| fmt_g(*v)));
    out.push_str(&line(&obs_row));
    out.push_str(&rule());

    // process definition; the second cell is empty so the value columns
    // line up with the nuisance rows' mode column
    let blank = String::new();
    let mut bin_row = vec!["bin".to_string(), blank.clone()];
    bin_row.extend(table.column_bins.iter().cloned());
    out.push_str(&line(&bin_row));
    let mut name_row = vec!["process".to_string(), blank.clone()];
    name_row.extend(table.column_processes.iter().cloned());
    out.push_str(&line(&name_row));
    let mut index_row = vec!["process".to_string(), blank.clone()];
    index_row.extend(table.column_indices.iter().map(|i| i.to_string()));
    out.push_str(&line(&index_row));
    let mut rate_row = vec!["rate".to_string(), blank];
    rate_row.extend(table.rates.iter().map(|v| fmt_g(*v)));
    out.push_str(&line(&rate_row));
    out.push_str(&rule());

    // nuisances, already sorted by the assembler
    for row in &table.rows {
        let mut cells = vec![row.name.clone(), row.mode.to_string()];
        cells.extend(row.cells.iter().map(render_cell));
        out.push_str(&line(&cells));
    }
    out.push_str(&rule());

    // rate parameters
    for rp in &table.rate_params {
        out.push_str(&format!(
            "{} rateParam {} {} {}\n",
            rp.name,
            rp.bin,
            rp.process,
            fmt_g(rp.init)
        ));
    }

    // nuisance groups
    for (group, systs) in &table.groups {
        out.push_str(&format!("{} group = {}\n", group, systs.join(" ")));
    }

    out
}

/// Companion artifact: the exported shapes, serialized for the external
/// histogram writer.
#[derive(Debug, Serialize)]
struct ShapeArtifact<'a> {
    histograms: &'a [lc_core::Histogram],
}

/// JSON form of the shape-export list, in export order.
pub fn shape_artifact_json(table: &CardTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ShapeArtifact { histograms: &table.shapes })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::SystRow;
    use crate::systematics::Mode;

    fn table() -> CardTable {
        CardTable {
            workspace_name: "w".to_string(),
            bins: vec!["2016_X_c1".to_string()],
            observations: vec![10.0],
            column_bins: vec!["2016_X_c1".to_string(), "2016_X_c1".to_string()],
            column_processes: vec!["sig".to_string(), "bkg".to_string()],
            column_indices: vec![0, 1],
            rates: vec![2.0, 10.0],
            rows: vec![SystRow {
                name: "lumi".to_string(),
                mode: Mode::LnN,
                cells: vec![TableCell::Factor(1.025), TableCell::Factor(1.025)],
            }],
            rate_params: Vec::new(),
            groups: vec![("theory".to_string(), vec!["lumi".to_string()])],
            shapes: Vec::new(),
            uses_workspace: false,
            deferred: Vec::new(),
        }
    }

    #[test]
    fn test_fmt_g() {
        assert_eq!(fmt_g(0.0), "0");
        assert_eq!(fmt_g(10.0), "10");
        assert_eq!(fmt_g(1.025), "1.025");
        assert_eq!(fmt_g(-1.0), "-1");
        assert_eq!(fmt_g(0.1234), "0.1234"); // four significant digits
        assert_eq!(fmt_g(1e-10), "1e-10");
        assert_eq!(fmt_g(12345.678), "1.235e4");
    }

    #[test]
    fn test_fixed_width_columns() {
        let text = render_card(&table(), "card.root");
        let obs_line = text.lines().find(|l| l.starts_with("observation")).unwrap();
        // 40-char first column, a space, then a 30-char cell
        assert_eq!(&obs_line[..40], format!("{:<40}", "observation"));
        assert_eq!(obs_line.len(), 40 + 1 + 30);
        let rate_line = text.lines().find(|l| l.starts_with("rate")).unwrap();
        // empty alignment cell before the first value
        assert_eq!(rate_line.len(), 40 + 1 + 30 * 3);
        assert_eq!(rate_line[41..71].trim(), "");
        assert_eq!(rate_line[71..101].trim(), "2");
    }

    #[test]
    fn test_fake_shapes_line() {
        let text = render_card(&table(), "card.root");
        assert!(text.contains("shapes * * FAKE\n"));
        assert!(text.contains("kmax * number of nuissances\n"));
    }

    #[test]
    fn test_shape_locator_lines() {
        let mut t = table();
        t.shapes = vec![lc_core::Histogram::uniform("h", 0.0, 1.0, vec![1.0]).unwrap()];
        let text = render_card(&t, "card.root");
        assert!(text.contains(
            "shapes * 2016_X_c1 card.root $PROCESS_2016_X_c1 $PROCESS_2016_X_c1_$SYSTEMATIC\n"
        ));
        t.uses_workspace = true;
        let text = render_card(&t, "card.root");
        assert!(text.contains("w:$PROCESS_2016_X_c1 w:$PROCESS_2016_X_c1_$SYSTEMATIC\n"));
    }

    #[test]
    fn test_group_line() {
        let text = render_card(&table(), "card.root");
        assert!(text.ends_with("theory group = lumi\n"));
    }
}
