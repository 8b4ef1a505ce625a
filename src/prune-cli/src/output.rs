//! Rendering of a prune run for the terminal or as JSON.

use std::path::Path;

use prune_retention::PruneReport;
use prune_stats::Summary;
use serde::Serialize;

/// Shape of `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub report: &'a PruneReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<&'a Summary>,
}

pub fn render_json(report: &PruneReport, stats: Option<&Summary>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput { report, stats })
}

/// Progress text for a finished run.
///
/// Verbosity 0 prints nothing, 1 prints the counts and failed moves, 2 adds
/// every move, every skipped entry and names that are not valid dates.
pub fn render_human(report: &PruneReport, verbosity: u8) -> String {
    if verbosity == 0 {
        return String::new();
    }

    let c = &report.classification;
    let mut lines = vec![format!(
        "I found {} directories in {}",
        report.directories_found,
        report.root.display()
    )];

    if verbosity > 1 {
        for name in &c.ignored {
            lines.push(format!("Skipping {name} as it is not in date format."));
        }
        for name in &c.nonconforming {
            lines.push(format!(
                "Warning: {name} is not a valid date, its sort position may be wrong."
            ));
        }
    }

    if report.dry_run {
        lines.push(format!(
            "Dry run: I would move {} directories to {}",
            c.discard.len(),
            report.archive_dir.display()
        ));
        lines.extend(c.discard.iter().map(|name| format!(" - {name}")));
        return finish(lines);
    }

    for outcome in &report.outcomes {
        match (&outcome.error, verbosity > 1) {
            (None, true) => lines.push(format!(
                "Moving {} to {}... done.",
                outcome.from.display(),
                outcome.to.display()
            )),
            (Some(e), true) => lines.push(format!(
                "Moving {} to {}... {e}",
                outcome.from.display(),
                outcome.to.display()
            )),
            (Some(e), false) => lines.push(format!(
                "Error moving {} to {}: {e}",
                outcome.from.display(),
                outcome.to.display()
            )),
            (None, false) => {}
        }
    }

    lines.push(format!(
        "I moved {} directories to {}",
        report.moved,
        report.archive_dir.display()
    ));
    finish(lines)
}

/// Message for a failed archive directory creation. With verbosity above 0
/// it lists what would have been moved.
pub fn render_create_archive_error(
    path: &Path,
    source: &std::io::Error,
    scheduled: &[String],
    verbosity: u8,
) -> String {
    let mut message = format!("Error creating directory \"{}\": {source}", path.display());
    if verbosity > 0 {
        message.push_str("\nI would have moved the following directories there:\n");
        for name in scheduled {
            message.push_str(&format!(" - {name}\n"));
        }
    }
    message
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prune_retention::{Classification, MoveOutcome};
    use std::path::PathBuf;

    fn report(dry_run: bool) -> PruneReport {
        PruneReport {
            root: PathBuf::from("/b"),
            archive_dir: PathBuf::from("/b/to_delete"),
            dry_run,
            directories_found: 4,
            filter_count: 173,
            classification: Classification {
                keep: vec!["2024-06-17_09-49".into()],
                discard: vec!["2024-06-17_09-10".into(), "2024-06-16_01-00".into()],
                ignored: vec!["to_delete".into()],
                nonconforming: vec![],
            },
            outcomes: if dry_run {
                vec![]
            } else {
                vec![
                    MoveOutcome {
                        name: "2024-06-17_09-10".into(),
                        from: "/b/2024-06-17_09-10".into(),
                        to: "/b/to_delete/2024-06-17_09-10".into(),
                        error: None,
                    },
                    MoveOutcome {
                        name: "2024-06-16_01-00".into(),
                        from: "/b/2024-06-16_01-00".into(),
                        to: "/b/to_delete/2024-06-16_01-00".into(),
                        error: Some("Directory not empty (os error 39)".into()),
                    },
                ]
            },
            moved: if dry_run { 0 } else { 1 },
            failed: if dry_run { 0 } else { 1 },
        }
    }

    #[test]
    fn test_silent_at_verbosity_zero() {
        assert_eq!(render_human(&report(false), 0), "");
    }

    #[test]
    fn test_verbosity_one() {
        let expected = "\
I found 4 directories in /b
Error moving /b/2024-06-16_01-00 to /b/to_delete/2024-06-16_01-00: Directory not empty (os error 39)
I moved 1 directories to /b/to_delete
";
        assert_eq!(render_human(&report(false), 1), expected);
    }

    #[test]
    fn test_verbosity_two() {
        let expected = "\
I found 4 directories in /b
Skipping to_delete as it is not in date format.
Moving /b/2024-06-17_09-10 to /b/to_delete/2024-06-17_09-10... done.
Moving /b/2024-06-16_01-00 to /b/to_delete/2024-06-16_01-00... Directory not empty (os error 39)
I moved 1 directories to /b/to_delete
";
        assert_eq!(render_human(&report(false), 2), expected);
    }

    #[test]
    fn test_dry_run_lists_schedule() {
        let expected = "\
I found 4 directories in /b
Dry run: I would move 2 directories to /b/to_delete
 - 2024-06-17_09-10
 - 2024-06-16_01-00
";
        assert_eq!(render_human(&report(true), 1), expected);
    }

    #[test]
    fn test_json_output() {
        let json = render_json(&report(false), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"]["moved"], 1);
        assert_eq!(value["report"]["classification"]["ignored"][0], "to_delete");
        assert!(value.get("stats").is_none());

        let stats = Summary {
            unlinked_files: 3,
            ..Default::default()
        };
        let json = render_json(&report(false), Some(&stats)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["unlinked_files"], 3);
    }

    #[test]
    fn test_create_archive_error_message() {
        let source = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let scheduled = vec!["2024-01-01_00-00".to_string()];
        let quiet = render_create_archive_error(Path::new("/b/x"), &source, &scheduled, 0);
        assert!(quiet.starts_with("Error creating directory \"/b/x\": "));
        assert!(!quiet.contains("would have moved"));

        let loud = render_create_archive_error(Path::new("/b/x"), &source, &scheduled, 1);
        assert!(loud.ends_with(
            "I would have moved the following directories there:\n - 2024-01-01_00-00\n"
        ));
    }
}
