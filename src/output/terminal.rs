// Colored terminal output for annotated containers, topic tables and
// batch results.

use colored::Colorize;

use super::truncate_chars;
use crate::mmif::Mmif;
use crate::pipeline::batch::BatchReport;

/// One line per view: `<View id=... annotations=... app=...>`.
pub fn display_views(mmif: &Mmif) {
    for view in &mmif.views {
        println!(
            "<View id={} annotations={} app={}>",
            view.id,
            view.annotations.len(),
            view.metadata.app
        );
    }
}

/// Every document with its id, type, location and a text preview.
pub fn display_documents(mmif: &Mmif) {
    if mmif.documents.is_empty() {
        println!("No documents.");
        return;
    }
    for doc in &mmif.documents {
        let text = doc
            .text_value()
            .map(|t| truncate_chars(t.trim(), 80))
            .unwrap_or_default();
        println!(
            "{} {} location={} text={}",
            doc.id().bold(),
            doc.at_type.dimmed(),
            doc.location().unwrap_or("-"),
            text
        );
    }
}

/// Topic index and label table, marking the skipped topic.
pub fn display_topics(labels: &[String], skipped: Option<usize>) {
    println!(
        "\n{}",
        format!("=== Topics ({} in model) ===", labels.len()).bold()
    );
    println!();

    for (i, label) in labels.iter().enumerate() {
        if Some(i) == skipped {
            println!("  {:>3}. {}  {}", i, label.dimmed(), "(skipped)".yellow());
        } else {
            println!("  {:>3}. {}", i, label);
        }
    }
    println!();
}

/// Summary of a batch run.
pub fn display_batch_report(report: &BatchReport) {
    println!(
        "\n{}",
        format!(
            "Batch complete: {} written, {} failed",
            report.written.len(),
            report.failed.len()
        )
        .bold()
    );
    for path in &report.written {
        println!("  {} {}", "✓".green(), path.display());
    }
    for (path, error) in &report.failed {
        println!("  {} {}: {}", "✗".red(), path.display(), error.red());
    }
}
