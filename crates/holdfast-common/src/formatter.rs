use crate::intent::{Intent, IntentKind};
use crate::result::ExecutionResult;

/// Field names whose payloads are masked in output.
const DEFAULT_SENSITIVE_FIELDS: &[&str] = &["password"];

/// Payloads longer than this are shortened in log lines (never in the page).
const MAX_DISPLAY_PAYLOAD: usize = 60;

pub fn mask_sensitive(value: &str, field_name: &str, sensitive_fields: &[String]) -> String {
    let lower_field = field_name.to_lowercase();

    let is_sensitive = sensitive_fields
        .iter()
        .any(|f| lower_field.contains(&f.to_lowercase()))
        || DEFAULT_SENSITIVE_FIELDS
            .iter()
            .any(|f| lower_field.contains(*f));

    if is_sensitive {
        "••••••••".to_string()
    } else {
        value.to_string()
    }
}

/// Payload as it should appear in logs: masked for sensitive fields,
/// shortened when long.
pub fn display_payload(intent: &Intent) -> Option<String> {
    let payload = intent.payload.as_deref()?;
    let masked = mask_sensitive(payload, intent.target.label(), &[]);
    let count = masked.chars().count();
    if count > MAX_DISPLAY_PAYLOAD {
        let head: String = masked.chars().take(MAX_DISPLAY_PAYLOAD).collect();
        Some(format!("{:?}… ({} chars)", head, count))
    } else {
        Some(format!("{:?}", masked))
    }
}

pub fn format_intent(intent: &Intent) -> String {
    match (intent.kind, display_payload(intent)) {
        (IntentKind::Fill, Some(payload)) => format!("{} {}", intent, payload),
        _ => intent.to_string(),
    }
}

/// One summary line, then one line per failed attempt.
pub fn format_result(result: &ExecutionResult) -> String {
    let mut output = String::new();

    if let Some(matched) = &result.matched {
        output.push_str(&format!(
            "ok {} via #{} {} (attempts: {})",
            format_intent(&result.intent),
            matched.index + 1,
            matched.candidate.describe(),
            result.attempts
        ));
        if let Some(label) = &result.rendered_label {
            output.push_str(&format!(" [label {:?}]", label));
        }
    } else {
        output.push_str(&format!(
            "FAILED {} (attempts: {})",
            format_intent(&result.intent),
            result.attempts
        ));
    }

    for record in &result.log {
        output.push_str(&format!(
            "\n  #{} {}: {}",
            record.index + 1,
            record.candidate.describe(),
            record.failure
        ));
    }

    if let Some(path) = &result.artifact {
        output.push_str(&format!("\n  artifact: {}", path.display()));
    }

    output
}
