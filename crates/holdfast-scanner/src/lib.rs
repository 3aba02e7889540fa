/// Page-side element registry and actions.
/// This string is injected into browser contexts by backends; it installs
/// `window.Holdfast` once per document.
pub const SCANNER_JS: &str = include_str!("scanner.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn it_works() {
        assert!(!SCANNER_JS.is_empty());
        assert!(SCANNER_JS.contains("window.Holdfast"));
    }

    #[test]
    fn test_exposes_backend_vocabulary() {
        for call in ["query(", "inspect(", "click(", "fill(", "check("] {
            assert!(SCANNER_JS.contains(call), "missing {}", call);
        }
    }
}
