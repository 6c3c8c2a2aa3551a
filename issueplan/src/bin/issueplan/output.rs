use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;
use std::io::Write;

use crate::theme::{GLYPHS, PALETTE};

/// Output format for command results
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Pretty-printed JSON, suitable for piping into a workflow (default)
    #[default]
    Json,
    /// Formatted table output
    Table,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub debug: bool,
    pub no_color: bool,
}

/// Data that can be rendered as a table or a one-line summary
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Results go to stdout; status lines go to stderr so stdout stays machine-readable.
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Write command results to stdout in the configured format.
    ///
    /// Results are printed even in quiet mode; quiet only silences status lines.
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        let mut stdout = std::io::stdout().lock();
        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(stdout, "{json}")?;
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                writeln!(stdout, "{table}")?;
            }
            OutputFormat::Compact => {
                writeln!(stdout, "{}", data.to_compact())?;
            }
        }
        Ok(())
    }

    fn status(&self, icon: &str, color: colored::Color, message: &str) {
        if self.options.quiet {
            return;
        }
        let output = if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        };
        eprintln!("{output}");
    }

    pub fn success(&self, message: &str) {
        self.status(GLYPHS.ok, PALETTE.ok, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(GLYPHS.caution, PALETTE.caution, message);
    }

    pub fn info(&self, message: &str) {
        self.status(GLYPHS.note, PALETTE.note, message);
    }

    /// Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) {
        let output = if self.options.no_color {
            format!("{} {message}", GLYPHS.failure)
        } else {
            format!("{} {}", GLYPHS.failure.color(PALETTE.failure), message.color(PALETTE.failure))
        };
        eprintln!("{output}");
    }

    /// Only shown with --debug
    pub fn verbose(&self, message: &str) {
        if self.options.debug {
            self.status(GLYPHS.arrow, PALETTE.dim, message);
        }
    }

    pub fn bullet(&self, text: &str) {
        if self.options.quiet {
            return;
        }
        let output = if self.options.no_color {
            format!("  {} {text}", GLYPHS.bullet)
        } else {
            format!("  {} {text}", GLYPHS.bullet.color(PALETTE.dim))
        };
        eprintln!("{output}");
    }

    pub fn progress(&self, message: &str) {
        if self.options.quiet {
            return;
        }

        let output = if self.options.no_color {
            format!("{} {message}...", GLYPHS.pending)
        } else {
            format!(
                "{} {}...",
                GLYPHS.pending.color(PALETTE.heading).bold(),
                message.color(PALETTE.heading)
            )
        };

        eprint!("\r{output}");
        std::io::stderr().flush().ok();
    }

    /// Clear the current status line (after progress indicators)
    pub fn clear_line(&self) {
        if self.options.quiet {
            return;
        }

        eprint!("\r{}", " ".repeat(80));
        eprint!("\r");
        std::io::stderr().flush().ok();
    }
}

/// Empty table themed after the global options
pub fn themed_table(options: &GlobalOptions, headers: &[&str]) -> Table {
    let mut table = Table::new();

    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(header_cells);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct ProjectSummary {
        project_id: String,
        fields: usize,
    }

    impl TableDisplay for ProjectSummary {
        fn to_table(&self, options: &GlobalOptions) -> Table {
            let mut table = themed_table(options, &["Project", "Fields"]);
            table.add_row(vec![Cell::new(&self.project_id), Cell::new(self.fields)]);
            table
        }

        fn to_compact(&self) -> String {
            format!("{} ({} fields)", self.project_id, self.fields)
        }
    }

    #[test]
    fn json_is_the_default_format() {
        assert_eq!(GlobalOptions::default().output_format, OutputFormat::Json);
    }

    #[test]
    fn displays_summary_in_every_format() {
        let summary = ProjectSummary {
            project_id: "PVT_main".to_string(),
            fields: 4,
        };
        for output_format in [OutputFormat::Json, OutputFormat::Table, OutputFormat::Compact] {
            let manager = OutputManager::new(GlobalOptions {
                output_format,
                no_color: true,
                ..Default::default()
            });
            assert!(manager.display(&summary).is_ok());
        }
    }

    #[test]
    fn themed_table_has_header() {
        let table = themed_table(&GlobalOptions::default(), &["A", "B"]);
        assert!(table.header().is_some());
    }
}
