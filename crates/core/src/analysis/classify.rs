// Blank / comment / code classification of a single file's lines

use super::profile::{self, ExtensionProfile};
use crate::types::LineClassification;

/// Classify every line of `content` using the comment syntax of `extension`.
///
/// Lines follow `str::lines` semantics: a trailing newline does not produce an
/// extra empty line. There is no awareness of string literals, so a comment
/// token inside a string on a line that starts with it still counts as a
/// comment.
///
/// A line opening a block comment only self-closes when the end token appears
/// after the start token. `"""doc"""` closes on its own line, while `/*/`
/// opens a block even though the line contains `*/`.
pub fn classify(content: &str, extension: &str) -> LineClassification {
    let profile = profile::lookup(extension);
    let mut counts = LineClassification::default();
    let mut in_block = false;

    for line in content.lines() {
        counts.total += 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            counts.blank += 1;
            continue;
        }

        match classify_line(trimmed, profile, &mut in_block) {
            LineKind::Comment => counts.comment += 1,
            LineKind::Code => counts.code += 1,
        }
    }

    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Code,
    Comment,
}

fn classify_line(
    trimmed: &str,
    profile: Option<&ExtensionProfile>,
    in_block: &mut bool,
) -> LineKind {
    let Some(profile) = profile else {
        return LineKind::Code;
    };

    if let Some((start, end)) = profile.block_comment {
        if *in_block {
            if trimmed.contains(end) {
                *in_block = false;
            }
            return LineKind::Comment;
        }

        if let Some(rest) = trimmed.strip_prefix(start) {
            // The end token must follow the opener for the line to self-close
            *in_block = !rest.contains(end);
            return LineKind::Comment;
        }
    }

    match profile.line_comment {
        Some(token) if trimmed.starts_with(token) => LineKind::Comment,
        _ => LineKind::Code,
    }
}
