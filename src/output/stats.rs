//! Summaries and tables.

use console::{pad_str, style, Alignment};

use crate::download::models::FormatDescriptor;
use crate::download::BatchReport;

/// Number of formats shown by `--list-formats`.
pub const FORMAT_TABLE_LIMIT: usize = 15;

/// Print the result of a batch run.
pub fn print_batch_summary(report: &BatchReport) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Batch Summary:").bold());
    println!(
        "  Downloaded: {}/{}",
        style(report.successful).green(),
        report.total
    );
    if !report.failures.is_empty() {
        println!("  Failed:     {}", style(report.failed()).red());
        for failure in &report.failures {
            println!(
                "    line {}: {} ({})",
                failure.line,
                failure.url,
                style(&failure.reason).dim()
            );
        }
    }
    println!("{}", style("═".repeat(50)).dim());
}

fn cell(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, Some("…")).into_owned()
}

/// Render the first [`FORMAT_TABLE_LIMIT`] formats as table rows.
pub fn format_table_rows(formats: &[FormatDescriptor]) -> Vec<String> {
    let mut rows = vec![format!(
        "{} {} {} {} {}",
        cell("ID", 10),
        cell("Quality", 16),
        cell("Format", 8),
        cell("Size", 10),
        cell("Codec", 20)
    )];

    rows.extend(formats.iter().take(FORMAT_TABLE_LIMIT).map(|f| {
        format!(
            "{} {} {} {} {}",
            cell(&f.format_id, 10),
            cell(&f.format_note, 16),
            cell(&f.ext, 8),
            cell(&f.size_label(), 10),
            cell(f.codec_label(), 20)
        )
    }));

    rows
}

/// Print the available formats table.
pub fn print_format_table(title: &str, formats: &[FormatDescriptor]) {
    println!();
    println!("{}", style(format!("Available formats for {}:", title)).bold());
    for (i, row) in format_table_rows(formats).iter().enumerate() {
        if i == 0 {
            println!("  {}", style(row).cyan().bold());
        } else {
            println!("  {}", row);
        }
    }
    if formats.len() > FORMAT_TABLE_LIMIT {
        println!(
            "  {}",
            style(format!("... and {} more", formats.len() - FORMAT_TABLE_LIMIT)).dim()
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_table_is_capped() {
        let formats: Vec<FormatDescriptor> = (0..20)
            .map(|i| FormatDescriptor::from_metadata(&json!({"format_id": i, "ext": "mp4"})))
            .collect();

        let rows = format_table_rows(&formats);
        assert_eq!(rows.len(), FORMAT_TABLE_LIMIT + 1);
        assert!(rows[0].starts_with("ID"));
        assert!(rows[1].contains("unknown"));
    }
}
