/// Write reports as terminal tables, markdown or wiki markup
use super::{UploadRow, UploaderReport};
use crate::config::OutputStyle;

use anyhow::Result;
use console::style;
use std::io::Write;
use tabled::{Alignment, Full, Modify, Style, Table};

pub fn render(reports: &[UploaderReport], output: OutputStyle, out: &mut dyn Write) -> Result<()> {
    for report in reports {
        match output {
            OutputStyle::Default => render_table(report, out)?,
            OutputStyle::Markdown => render_markdown(report, out)?,
            OutputStyle::Wiki => render_wiki(report, out)?,
        }
    }
    Ok(())
}

fn render_table(report: &UploaderReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", style(&report.uploader).bold())?;
    for section in &report.sections {
        writeln!(out, "{}:", style(&section.distribution).green().bold())?;
        let table = Table::new(&section.rows)
            .with(Modify::new(Full).with(Alignment::left()))
            .with(Modify::new(Full).with(|s: &str| format!(" {} ", s)))
            .with(Style::psql());
        writeln!(out, "{}", table)?;
    }
    writeln!(out)?;
    Ok(())
}

fn markdown_row(cells: &[&str]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| c.replace('|', "\\|")).collect();
    format!("| {} |", cells.join(" | "))
}

fn render_markdown(report: &UploaderReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "## {}\n", report.uploader)?;
    for section in &report.sections {
        writeln!(out, "### {}\n", section.distribution)?;
        writeln!(out, "{}", markdown_row(&UploadRow::HEADERS))?;
        writeln!(out, "{}", markdown_row(&["---"; 5]))?;
        for row in &section.rows {
            writeln!(out, "{}", markdown_row(&row.cells()))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

// MoinMoin syntax, as used by wiki.ubuntu.com
fn wiki_row(cells: &[&str]) -> String {
    format!("||{}||", cells.join("||"))
}

fn render_wiki(report: &UploaderReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "== {} ==\n", report.uploader)?;
    for section in &report.sections {
        writeln!(out, "=== {} ===\n", section.distribution)?;
        let headers: Vec<String> = UploadRow::HEADERS
            .iter()
            .map(|h| format!("'''{}'''", h))
            .collect();
        let headers: Vec<&str> = headers.iter().map(|h| h.as_str()).collect();
        writeln!(out, "{}", wiki_row(&headers))?;
        for row in &section.rows {
            writeln!(out, "{}", wiki_row(&row.cells()))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
