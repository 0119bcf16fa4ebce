//! Pipe filter commands (grep, head, tail, wc).
//!
//! Filters operate on the output lines of the command before them:
//! `pip list | grep -v py | head -n 3`

use crate::config::pipe_filters;
use crate::models::{OutputLine, OutputLineData};

/// Apply a filter command to output lines.
///
/// # Supported filters
/// - `grep [-v] [-c] <pattern>`: keep (or with `-v`, drop) lines containing
///   the pattern, case-insensitively; `-c` prints the match count instead
/// - `head [-n N | -N]`: first N lines (default 10)
/// - `tail [-n N | -N]`: last N lines (default 10)
/// - `wc [-l]`: line, word and byte counts of the non-empty lines
pub fn apply_filter(cmd: &str, args: &[String], lines: Vec<OutputLine>) -> Vec<OutputLine> {
    match cmd.to_lowercase().as_str() {
        "grep" => filter_grep(args, lines),
        "head" => {
            let n = parse_count(args, pipe_filters::DEFAULT_HEAD_LINES);
            lines.into_iter().take(n).collect()
        }
        "tail" => {
            let n = parse_count(args, pipe_filters::DEFAULT_TAIL_LINES);
            let skip = lines.len().saturating_sub(n);
            lines.into_iter().skip(skip).collect()
        }
        "wc" => filter_wc(args, &lines),
        _ => vec![OutputLine::error(format!(
            "{}: cannot be used after a pipe. Supported filters: grep, head, tail, wc",
            cmd
        ))],
    }
}

fn filter_grep(args: &[String], lines: Vec<OutputLine>) -> Vec<OutputLine> {
    let invert = args.iter().any(|a| a == "-v");
    let count_only = args.iter().any(|a| a == "-c");
    let Some(pattern) = args.iter().find(|a| !a.starts_with('-')) else {
        return vec![OutputLine::error("grep: missing pattern")];
    };

    let pattern = pattern.to_lowercase();
    let matched: Vec<OutputLine> = lines
        .into_iter()
        .filter(|line| {
            let hit = searchable_text(&line.data)
                .is_some_and(|t| t.to_lowercase().contains(&pattern));
            hit != invert
        })
        .collect();

    if count_only {
        vec![OutputLine::text(matched.len().to_string())]
    } else {
        matched
    }
}

/// The text a filter looks at, `None` for blank lines.
fn searchable_text(data: &OutputLineData) -> Option<&str> {
    match data {
        OutputLineData::Text(s)
        | OutputLineData::Error(s)
        | OutputLineData::Success(s)
        | OutputLineData::Info(s) => Some(s),
        OutputLineData::ListEntry { name, .. } => Some(name),
        OutputLineData::Command { input, .. } => Some(input),
        OutputLineData::Empty => None,
    }
}

fn filter_wc(args: &[String], lines: &[OutputLine]) -> Vec<OutputLine> {
    let texts: Vec<String> = lines
        .iter()
        .filter(|l| !matches!(l.data, OutputLineData::Empty))
        .map(OutputLine::plain)
        .collect();

    if args.iter().any(|a| a == "-l") {
        return vec![OutputLine::text(texts.len().to_string())];
    }

    let words: usize = texts.iter().map(|t| t.split_whitespace().count()).sum();
    let bytes: usize = texts.iter().map(|t| t.len() + 1).sum();
    vec![OutputLine::text(format!(
        "{:>7} {:>7} {:>7}",
        texts.len(),
        words,
        bytes
    ))]
}

/// Parse `-n N`, `-N` or `N`.
fn parse_count(args: &[String], default: usize) -> usize {
    let value = match args.first().map(String::as_str) {
        Some("-n") => args.get(1).map(String::as_str),
        other => other,
    };
    value
        .and_then(|s| s.trim_start_matches('-').parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    fn packages() -> Vec<OutputLine> {
        vec![
            OutputLine::text("matplotlib 3.7.2"),
            OutputLine::text("numpy      1.24.3"),
            OutputLine::text("pandas     2.0.3"),
            OutputLine::empty(),
            OutputLine::text("scikit-learn 1.3.0"),
        ]
    }

    fn texts(lines: &[OutputLine]) -> Vec<String> {
        lines.iter().map(OutputLine::plain).collect()
    }

    #[test]
    fn test_grep_case_insensitive() {
        let result = apply_filter("grep", &args(&["NUMPY"]), packages());
        assert_eq!(texts(&result), vec!["numpy      1.24.3"]);
    }

    #[test]
    fn test_grep_invert_and_count() {
        let inverted = apply_filter("grep", &args(&["-v", "a"]), packages());
        // blank line has no text, so it never matches and survives -v
        assert_eq!(inverted.len(), 2);
        assert_eq!(inverted[0], OutputLine::text("numpy      1.24.3"));

        let counted = apply_filter("grep", &args(&["-c", "a"]), packages());
        assert_eq!(texts(&counted), vec!["3"]);
    }

    #[test]
    fn test_grep_missing_pattern() {
        let result = apply_filter("grep", &args(&["-v"]), packages());
        assert_eq!(result, vec![OutputLine::error("grep: missing pattern")]);
    }

    #[test]
    fn test_grep_list_entry_matches_name() {
        let lines = vec![OutputLine::dir_entry("notebooks"), OutputLine::dir_entry("scripts")];
        let result = apply_filter("grep", &args(&["note"]), lines);
        assert_eq!(result, vec![OutputLine::dir_entry("notebooks")]);
    }

    #[test]
    fn test_head_forms() {
        assert_eq!(apply_filter("head", &args(&["2"]), packages()).len(), 2);
        assert_eq!(apply_filter("head", &args(&["-3"]), packages()).len(), 3);
        assert_eq!(apply_filter("head", &args(&["-n", "1"]), packages()).len(), 1);
        // Default 10, but only 5 lines
        assert_eq!(apply_filter("head", &[], packages()).len(), 5);
    }

    #[test]
    fn test_tail() {
        let result = apply_filter("tail", &args(&["-n", "2"]), packages());
        assert_eq!(result[0], OutputLine::empty());
        assert_eq!(result[1], OutputLine::text("scikit-learn 1.3.0"));
    }

    #[test]
    fn test_wc_counts_non_empty() {
        let lines = apply_filter("wc", &args(&["-l"]), packages());
        assert_eq!(texts(&lines), vec!["4"]);

        let full = apply_filter("wc", &[], vec![OutputLine::text("a b"), OutputLine::text("c")]);
        assert_eq!(texts(&full), vec!["      2       3       6"]);
    }

    #[test]
    fn test_unknown_filter() {
        let result = apply_filter("sort", &[], packages());
        assert_eq!(result.len(), 1);
        assert!(matches!(&result[0].data, OutputLineData::Error(s) if s.starts_with("sort:")));
    }
}
