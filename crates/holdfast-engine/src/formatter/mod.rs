use crate::scenario::{ScenarioReport, StepStatus};
use holdfast_common::formatter::format_result;

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|l| format!("{}{}", prefix, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scenario header, one line per step, then the failure with its attempt log.
pub fn format_scenario_report(report: &ScenarioReport) -> String {
    let mut output = format!(
        "{} {} ({} ms)",
        if report.passed() { "PASSED" } else { "FAILED" },
        report.name,
        report.duration.as_millis()
    );

    for step in &report.steps {
        let marker = match step.status {
            StepStatus::Passed => "ok  ",
            StepStatus::Failed => "FAIL",
            StepStatus::Skipped => "skip",
        };
        output.push_str(&format!("\n  {} {}", marker, step.text));
        if step.status == StepStatus::Passed {
            for result in &step.results {
                output.push_str(&format!("\n{}", indent(&format_result(result), "         ")));
            }
        }
    }

    if let Some(result) = report.failed_intent() {
        output.push_str(&format!("\n  failed intent:\n{}", indent(&format_result(result), "    ")));
    } else if let Some(failure) = &report.failure {
        output.push_str(&format!("\n  error: {}", failure));
    }

    if let Some(path) = &report.artifact {
        output.push_str(&format!("\n  screenshot: {}", path.display()));
    }

    output
}

pub fn format_summary(reports: &[ScenarioReport]) -> String {
    let passed = reports.iter().filter(|r| r.passed()).count();
    format!(
        "{} scenario{} ({} passed, {} failed)",
        reports.len(),
        if reports.len() == 1 { "" } else { "s" },
        passed,
        reports.len() - passed
    )
}
