// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Bounding of per-test diagnostic text
//!
//! Failure output can be arbitrarily long. Consumers only need the most
//! actionable part of it, which is almost always a `file:line` reference, so
//! truncation keeps location lines in preference to whatever happens to come
//! first.

/// Phrase the Go race detector prints once per detected race
pub const RACE_MARKER: &str = "race detected during execution of test";

/// Output longer than this many characters is truncated
pub const MAX_LENGTH: usize = 500;

/// Maximum number of lines kept when truncating multi-line output
pub const MAX_LINES: usize = 5;

/// Characters given up to the truncation marker in short-line truncation
const MARKER_ALLOWANCE: usize = 50;

/// Bound diagnostic text for transport
///
/// Race detector output is summarized first; other text is returned unchanged
/// when it fits in [`MAX_LENGTH`] characters, otherwise truncated by
/// characters (few lines) or by lines (many lines).
///
/// ```
/// use verdict_gotest::bounding::bound_output;
///
/// assert_eq!(bound_output("short"), "short");
/// ```
#[must_use]
pub fn bound_output(output: &str) -> String {
    match output.matches(RACE_MARKER).count() {
        0 => {}
        1 => return summarize_single_race(output),
        races => {
            return format!(
                "Multiple race conditions detected - {RACE_MARKER} ({races} races found)"
            );
        }
    }

    let length = output.chars().count();
    if length <= MAX_LENGTH {
        return output.to_string();
    }

    let lines: Vec<&str> = output.split('\n').collect();
    if lines.len() <= MAX_LINES {
        let keep = MAX_LENGTH - MARKER_ALLOWANCE;
        let head: String = output.chars().take(keep).collect();
        return format!("{head} [truncated {} chars]", length - keep);
    }

    let selected = select_lines(&lines, MAX_LINES);
    format!(
        "{}\n[truncated {} more lines]",
        selected.join("\n"),
        lines.len() - selected.len()
    )
}

fn summarize_single_race(output: &str) -> String {
    let lines: Vec<&str> = output.split('\n').collect();

    if let Some(line) = lines
        .iter()
        .find(|line| line.contains(RACE_MARKER) && has_file_location(line))
    {
        return line.trim().to_string();
    }

    if let Some(line) = lines.iter().find(|line| has_file_location(line)) {
        let trimmed = line.trim();
        if trimmed.contains("race detected") {
            return trimmed.to_string();
        }
        return format!("{trimmed} [race detected]");
    }

    RACE_MARKER.to_string()
}

/// Pick up to `max_lines` lines, location lines first, then from the top
///
/// Selected lines keep the order in which they were picked.
#[must_use]
pub fn select_lines<'a>(lines: &[&'a str], max_lines: usize) -> Vec<&'a str> {
    if lines.len() <= max_lines {
        return lines.to_vec();
    }

    let mut used = vec![false; lines.len()];
    let mut selected = Vec::with_capacity(max_lines);

    for (idx, line) in lines.iter().enumerate() {
        if selected.len() >= max_lines {
            break;
        }
        if is_location_line(line) {
            selected.push(*line);
            used[idx] = true;
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        if selected.len() >= max_lines {
            break;
        }
        if !used[idx] {
            selected.push(*line);
            used[idx] = true;
        }
    }

    selected
}

/// A line worth keeping under truncation: a file location plus at least two
/// colon-delimited segments (`file.go:12: message`, `file.go:12:4: ...`)
#[must_use]
pub fn is_location_line(line: &str) -> bool {
    has_file_location(line) && line.matches(':').count() >= 2
}

/// Whether the line contains a `name.ext:<digit>` token
#[must_use]
pub fn has_file_location(line: &str) -> bool {
    line.match_indices(':').any(|(idx, _)| {
        let followed_by_digit = line[idx + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());
        followed_by_digit && ends_with_file_name(&line[..idx])
    })
}

fn ends_with_file_name(prefix: &str) -> bool {
    let token = prefix
        .rsplit(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'')
        .next()
        .unwrap_or_default();

    match token.rsplit_once('.') {
        Some((stem, extension)) => {
            !stem.is_empty()
                && !extension.is_empty()
                && extension.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}
