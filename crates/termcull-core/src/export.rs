//! Export serialization for accepted terms.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Candidate, CostPerConversion};

/// How accepted terms are rendered in the negative keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    /// One bare term per line.
    Plain,

    /// Bracket-wrapped exact-match syntax, `[term]`.
    #[default]
    Exact,
}

/// Render accepted terms one per line.
///
/// Pure function of its input. An empty list renders the empty string,
/// with no trailing newline.
pub fn render_terms(accepted: &[Candidate], style: ExportStyle) -> String {
    accepted
        .iter()
        .map(|candidate| match style {
            ExportStyle::Plain => candidate.term.clone(),
            ExportStyle::Exact => format!("[{}]", candidate.term),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the negative keyword list to a file.
pub fn write_terms(
    path: impl AsRef<Path>,
    accepted: &[Candidate],
    style: ExportStyle,
) -> io::Result<()> {
    fs::write(path, render_terms(accepted, style))
}

/// Write candidates as a CSV table, one row per candidate.
pub fn write_candidates_csv<W: io::Write>(
    writer: W,
    candidates: &[Candidate],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Search term", "Spend", "Impressions", "Clicks", "Cost / conv."])?;
    for candidate in candidates {
        csv_writer.write_record([
            candidate.term.clone(),
            format!("{:.2}", candidate.spend),
            candidate.impressions.to_string(),
            candidate.clicks.to_string(),
            cost_cell(candidate.cost_per_conversion),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn cost_cell(cost: CostPerConversion) -> String {
    match cost {
        CostPerConversion::Finite(value) => format!("{:.2}", value),
        CostPerConversion::Unbounded => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(term: &str) -> Candidate {
        Candidate {
            term: term.to_string(),
            spend: 12.5,
            impressions: 840,
            clicks: 31,
            cost_per_conversion: CostPerConversion::Unbounded,
        }
    }

    #[test]
    fn test_empty_list_renders_empty_string() {
        assert_eq!(render_terms(&[], ExportStyle::Plain), "");
        assert_eq!(render_terms(&[], ExportStyle::Exact), "");
    }

    #[test]
    fn test_exact_style_wraps_in_brackets() {
        let accepted = [candidate("free shoes"), candidate("cheap boots")];
        assert_eq!(
            render_terms(&accepted, ExportStyle::Exact),
            "[free shoes]\n[cheap boots]"
        );
    }

    #[test]
    fn test_plain_style_is_bare_terms() {
        let accepted = [candidate("free shoes")];
        assert_eq!(render_terms(&accepted, ExportStyle::Plain), "free shoes");
    }

    #[test]
    fn test_no_trailing_newline() {
        let accepted = [candidate("one")];
        assert!(!render_terms(&accepted, ExportStyle::Exact).ends_with('\n'));
    }

    #[test]
    fn test_candidates_csv() {
        let mut out = Vec::new();
        let mut with_finite = candidate("priced");
        with_finite.cost_per_conversion = CostPerConversion::Finite(4.0);

        write_candidates_csv(&mut out, &[with_finite, candidate("unbounded")]).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Search term,Spend,Impressions,Clicks,Cost / conv.")
        );
        assert_eq!(lines.next(), Some("priced,12.50,840,31,4.00"));
        assert_eq!(lines.next(), Some("unbounded,12.50,840,31,--"));
    }
}
