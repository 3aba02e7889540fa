//! Text matching rules shared by the resolver and diagnostics.

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn exact_match(rendered: &str, wanted: &str) -> bool {
    let rendered = normalize_text(rendered);
    !rendered.is_empty() && rendered == normalize_text(wanted)
}

/// Exact, or either string contains the other.
///
/// Option lists truncate long names ("IIT Alumni Association of No...") or
/// decorate short ones ("TEST Org ✓"), so both directions are accepted.
/// Empty rendered text would be a substring of everything and never matches.
pub fn fuzzy_match(rendered: &str, wanted: &str) -> bool {
    let rendered = normalize_text(rendered);
    let wanted = normalize_text(wanted);
    if rendered.is_empty() || wanted.is_empty() {
        return false;
    }
    rendered == wanted || rendered.contains(&wanted) || wanted.contains(&rendered)
}

/// Case-insensitive containment, used for label lookup.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = normalize_text(needle).to_lowercase();
    !needle.is_empty() && normalize_text(haystack).to_lowercase().contains(&needle)
}

/// Rank rendered texts by similarity to `wanted`, best first.
///
/// Only used to make failure logs readable ("closest options were ...");
/// it never decides which element is acted on.
pub fn closest<'a>(
    wanted: &str,
    rendered: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<String> {
    let wanted = normalize_text(wanted).to_lowercase();
    let mut texts: Vec<String> = rendered
        .into_iter()
        .map(normalize_text)
        .filter(|t| !t.is_empty())
        .collect();
    texts.sort();
    texts.dedup();

    let mut scored: Vec<(f64, String)> = texts
        .into_iter()
        .map(|t| (strsim::jaro_winkler(&wanted, &t.to_lowercase()), t))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, t)| t).collect()
}
