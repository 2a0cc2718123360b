//! Text normalization: name/description cleaning, meaningfulness
//! heuristics, and edit-distance similarity.

/// Maximum length for cleaned names.
const MAX_NAME_LEN: usize = 200;

/// Maximum length for cleaned descriptions.
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Clean a candidate name.
///
/// Trims, collapses whitespace, strips a leading ordinal/number prefix
/// ("1. ", "2) ") and trailing parenthetical content, then truncates to
/// 200 characters.
pub fn clean_name(name: &str) -> String {
    let collapsed = collapse_whitespace(name);

    // Leading ordinal prefix: digits followed by a separator.
    let stripped = match collapsed.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) if idx > 0 => {
            let rest = &collapsed[idx..];
            if let Some(rest) = rest
                .strip_prefix('.')
                .or_else(|| rest.strip_prefix(')'))
                .or_else(|| rest.strip_prefix('-'))
            {
                rest.trim_start().to_string()
            } else {
                collapsed.clone()
            }
        }
        _ => collapsed.clone(),
    };

    // Trailing parenthetical content.
    let stripped = match stripped.rfind('(') {
        Some(idx) if stripped.trim_end().ends_with(')') => stripped[..idx].trim_end().to_string(),
        _ => stripped,
    };

    truncate_chars(&stripped, MAX_NAME_LEN)
}

/// Clean a candidate description.
///
/// Collapses horizontal whitespace per line, reduces runs of 3+ line
/// breaks to 2, and truncates to 1000 characters.
pub fn clean_description(description: &str) -> String {
    let mut out = String::with_capacity(description.len());
    let mut newline_run = 0usize;

    for line in description.lines() {
        let line = collapse_whitespace(line);
        if line.is_empty() {
            newline_run += 1;
            continue;
        }
        if !out.is_empty() {
            // A run of blank lines collapses to a single blank line.
            out.push('\n');
            if newline_run > 0 {
                out.push('\n');
            }
        }
        newline_run = 0;
        out.push_str(&line);
    }

    truncate_chars(out.trim(), MAX_DESCRIPTION_LEN)
}

/// Whether a name is meaningful enough to keep.
///
/// Rejects names shorter than 3 characters, purely numeric names, names
/// containing any denylisted generic term (case-insensitive substring),
/// and names with no alphabetic character.
pub fn is_meaningful_name(name: &str, generic_terms: &[String]) -> bool {
    let trimmed = name.trim();
    if trimmed.chars().count() < 3 {
        return false;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
        return false;
    }
    if !trimmed.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    let lower = trimmed.to_lowercase();
    !generic_terms
        .iter()
        .any(|term| !term.is_empty() && lower.contains(&term.to_lowercase()))
}

/// String similarity in [0.0, 1.0].
///
/// 1.0 for a case-insensitive exact match, 0.9 when either string contains
/// the other, otherwise `1 - levenshtein / max_len`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.9;
    }
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

/// Levenshtein edit distance over unicode scalar values.
///
/// Standard dynamic-programming recurrence, insertion/deletion/substitution
/// each cost 1, rolling single-row buffer.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (prev_diag + cost).min(row[j] + 1).min(row[j + 1] + 1);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Collapse runs of horizontal whitespace to single spaces and trim.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters (not bytes).
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn denylist() -> Vec<String> {
        vec!["water".to_string(), "street".to_string()]
    }

    #[test]
    fn test_clean_name_strips_ordinal_prefix() {
        assert_eq!(clean_name("1. Castello Brown"), "Castello Brown");
        assert_eq!(clean_name("12) Faro di Portofino"), "Faro di Portofino");
    }

    #[test]
    fn test_clean_name_strips_trailing_parenthetical() {
        assert_eq!(clean_name("Abbazia di San Fruttuoso (X secolo)"), "Abbazia di San Fruttuoso");
    }

    #[test]
    fn test_clean_name_collapses_whitespace() {
        assert_eq!(clean_name("  Castello   Brown \t "), "Castello Brown");
    }

    #[test]
    fn test_clean_name_truncates_to_200_chars() {
        let long = "a".repeat(300);
        assert_eq!(clean_name(&long).chars().count(), 200);
    }

    #[test]
    fn test_clean_description_collapses_blank_lines() {
        let text = "First paragraph.\n\n\n\nSecond paragraph.";
        assert_eq!(clean_description(text), "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_clean_description_truncates_to_1000_chars() {
        let long = "b".repeat(1500);
        assert_eq!(clean_description(&long).chars().count(), 1000);
    }

    #[test]
    fn test_meaningful_name_rejects_short_numeric_and_generic() {
        let terms = denylist();
        assert!(!is_meaningful_name("ab", &terms));
        assert!(!is_meaningful_name("12345", &terms));
        assert!(!is_meaningful_name("Water tower", &terms));
        assert!(!is_meaningful_name("---", &terms));
        assert!(is_meaningful_name("Castello Brown", &terms));
    }

    #[test]
    fn test_levenshtein_kitten_sitting() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_similarity_exact_and_substring() {
        assert_eq!(similarity("Castello", "castello"), 1.0);
        assert_eq!(similarity("Castello Brown", "Castello"), 0.9);
    }

    proptest! {
        #[test]
        fn prop_similarity_identity(s in "[a-zA-Z ]{1,30}") {
            prop_assert_eq!(similarity(&s, &s), 1.0);
        }

        #[test]
        fn prop_similarity_symmetric(a in "[a-z]{1,20}", b in "[a-z]{1,20}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        #[test]
        fn prop_levenshtein_bounded_by_longer(a in "[a-z]{0,15}", b in "[a-z]{0,15}") {
            prop_assert!(levenshtein(&a, &b) <= a.len().max(b.len()));
        }
    }
}
