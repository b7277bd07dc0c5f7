//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use segue_domain::Triple;
use segue_extractor::{TransitionReport, TripleReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style, Width},
};

/// Items shown in a text preview.
pub const PREVIEW_LIMIT: usize = 10;

/// Widest a table cell gets before it is cut.
const CELL_WIDTH: usize = 48;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a transition-list report.
    pub fn format_transitions(&self, report: &TransitionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_transitions_json(report),
            OutputFormat::Text => Ok(self.format_transitions_text(report)),
        }
    }

    /// Format a triple report.
    pub fn format_triples(&self, report: &TripleReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_triples_json(report),
            OutputFormat::Text => Ok(self.format_triples_text(report)),
        }
    }

    fn format_transitions_json(&self, report: &TransitionReport) -> Result<String> {
        let duplicates: Vec<serde_json::Value> = report
            .duplicates
            .iter()
            .map(|d| serde_json::json!({ "text": d.text, "count": d.count }))
            .collect();

        let value = serde_json::json!({
            "paragraphs": report.paragraph_count,
            "captured": report.captured,
            "unique": report.unique,
            "duplicates": duplicates,
            "sampled": report.sampled,
            "transitions": report.validated,
            "oracle_calls": report.oracle_calls,
            "elapsed_ms": report.elapsed_ms,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_transitions_text(&self, report: &TransitionReport) -> String {
        if report.is_empty() {
            return self.warning("No transitions found.");
        }

        let mut out = format!(
            "{} transitions ({} unique, {} duplicated, {} sampled) from {} paragraphs\n",
            report.validated.len(),
            report.unique.len(),
            report.duplicates.len(),
            report.sampled.len(),
            report.paragraph_count
        );

        for (i, transition) in report.validated.iter().take(PREVIEW_LIMIT).enumerate() {
            out.push_str(&format!("{:>3}. {}\n", i + 1, transition));
        }
        out.push_str(&self.remainder(report.validated.len()));
        out.trim_end().to_string()
    }

    fn format_triples_json(&self, report: &TripleReport) -> Result<String> {
        let triples: Vec<serde_json::Value> = report
            .triples
            .iter()
            .map(|t| {
                serde_json::json!({
                    "paragraph_a": t.paragraph_a,
                    "transition": t.transition,
                    "paragraph_b": t.paragraph_b,
                })
            })
            .collect();

        let value = serde_json::json!({
            "strategy": report.strategy,
            "paragraphs": report.paragraph_count,
            "stats": report.stats,
            "triples": triples,
            "elapsed_ms": report.elapsed_ms,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_triples_text(&self, report: &TripleReport) -> String {
        if report.is_empty() {
            return self.warning("No triples found.");
        }

        let stats = &report.stats;
        let mut out = format!(
            "{} triples from {} paragraphs ({} considered, {} oracle calls)\n",
            report.triples.len(),
            report.paragraph_count,
            stats.considered,
            stats.oracle_calls
        );
        out.push_str(&self.triples_table(&report.triples));
        out.push('\n');
        out.push_str(&self.remainder(report.triples.len()));
        out.trim_end().to_string()
    }

    /// Preview table of the first triples.
    fn triples_table(&self, triples: &[Triple]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["#", "Paragraph A", "Transition", "Paragraph B"]);

        for (i, triple) in triples.iter().take(PREVIEW_LIMIT).enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                triple.paragraph_a.clone(),
                triple.transition.clone(),
                triple.paragraph_b.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Width::truncate(CELL_WIDTH).suffix("…"))
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn remainder(&self, total: usize) -> String {
        if total > PREVIEW_LIMIT {
            self.info(&format!("... and {} more", total - PREVIEW_LIMIT))
        } else {
            String::new()
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
