//! # Summary Subcommand
//!
//! One line per check, grouped by data level:
//!
//! ```text
//! raw_data (2 checks)
//!   Filename checked  pass   completed  42s
//!   Density Check     -      -
//! survey_products (0 checks)
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use qajson_core::{Check, Root};
use qajson_schema::{QajsonParser, SchemaValidator};

/// Arguments for the `qajson summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// QAJSON file to summarise.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

/// Execute the summary subcommand.
pub fn run_summary(args: &SummaryArgs, validator: &SchemaValidator) -> Result<u8> {
    let parsed = QajsonParser::open(&args.path, validator)
        .with_context(|| format!("failed to load {}", args.path.display()))?;
    let stdout = std::io::stdout();
    write_summary(parsed.root(), &mut stdout.lock())?;
    Ok(0)
}

fn write_summary(root: &Root, out: &mut impl Write) -> Result<()> {
    for (name, level) in root.qa.data_levels() {
        let noun = if level.checks.len() == 1 { "check" } else { "checks" };
        writeln!(out, "{name} ({} {noun})", level.checks.len())?;
        let width = level.checks.iter().map(|c| label(c).len()).max().unwrap_or(0);
        for check in &level.checks {
            writeln!(out, "  {}", check_line(check, width).trim_end())?;
        }
    }
    Ok(())
}

/// Display name of a check, falling back to its id.
fn label(check: &Check) -> &str {
    check.info.name.as_deref().unwrap_or(&check.info.id)
}

fn check_line(check: &Check, width: usize) -> String {
    let outputs = check.outputs.as_ref();
    let state = outputs
        .and_then(|o| o.check_state.as_deref())
        .unwrap_or("-");
    let status = outputs.map_or("-", |o| o.execution.status.as_str());

    // An unparsable timestamp only loses the duration column.
    let duration = match outputs.map(|o| o.execution.duration()) {
        Some(Ok(Some(d))) => format!("{}s", d.num_seconds()),
        Some(Err(e)) => {
            tracing::debug!(check = %check.info.id, error = %e, "cannot compute duration");
            String::new()
        }
        _ => String::new(),
    };

    format!("{:<width$}  {state:<5}  {status:<9}  {duration}", label(check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qajson_core::{DataLevelName, Execution, Info, Outputs};

    fn render(root: &Root) -> String {
        let mut out = Vec::new();
        write_summary(root, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_levels_listed() {
        assert_eq!(
            render(&Root::minimal("0.1.4")),
            "raw_data (0 checks)\nsurvey_products (0 checks)\n"
        );
    }

    #[test]
    fn checks_show_state_status_and_duration() {
        let mut root = Root::minimal("0.1.4");
        let mut info = Info::new("7761e08b");
        info.name = Some("Filename checked".to_string());
        let mut outputs = Outputs::new(Execution {
            start: Some("2020-03-02T04:00:00Z".to_string()),
            end: Some("2020-03-02T04:00:42Z".to_string()),
            ..Execution::new("completed")
        });
        outputs.check_state = Some("pass".to_string());
        let mut check = Check::new(info);
        check.outputs = Some(outputs);
        root.qa.raw_data.add_check(check);
        root.qa
            .get_or_add_data_level(DataLevelName::ChartAdequacy)
            .add_check(Check::new(Info::new("unrun")));

        let text = render(&root);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "raw_data (1 check)");
        assert_eq!(lines[1], "  Filename checked  pass   completed  42s");
        assert_eq!(lines[2], "survey_products (0 checks)");
        assert_eq!(lines[3], "chart_adequacy (1 check)");
        assert_eq!(lines[4], "  unrun  -      -");
    }

    #[test]
    fn bad_timestamp_drops_duration_only() {
        let mut check = Check::new(Info::new("x"));
        check.outputs = Some(Outputs::new(Execution {
            start: Some("yesterday".to_string()),
            end: Some("2020-03-02T04:00:42Z".to_string()),
            ..Execution::new("failed")
        }));
        assert_eq!(check_line(&check, 1).trim_end(), "x  -      failed");
    }

    #[test]
    fn run_summary_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = SummaryArgs {
            path: dir.path().join("absent.json"),
        };
        let err = run_summary(&args, &SchemaValidator::bundled()).unwrap_err();
        assert!(err.to_string().starts_with("failed to load"));
    }
}
