// Recursive line counting with per-extension aggregation

use super::classify::classify;
use super::{profile, WalkBudget, DEPENDENCY_CACHE_DIR};
use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{ExtensionStats, LineCountResult};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Options for [`count_lines`]
#[derive(Debug, Clone, Default)]
pub struct LineCountOptions {
    /// Only count files with these extensions (leading dots and case ignored).
    /// Empty means no caller filter.
    pub extensions: Vec<String>,
    pub budget: WalkBudget,
}

/// Count lines of every accepted file under `root`.
///
/// Never fails across the boundary: problems are reported through
/// `success`/`error` on the returned record.
pub fn count_lines(root: &Path, options: &LineCountOptions) -> LineCountResult {
    match walk(root, options) {
        Ok(totals) => totals.into_result(),
        Err(err) => {
            tracing::warn!(path = %root.display(), error = %err, "Line count failed");
            LineCountResult::failure(&err)
        }
    }
}

#[derive(Debug, Default)]
struct Totals {
    files: usize,
    lines: usize,
    code: usize,
    comment: usize,
    blank: usize,
    by_extension: BTreeMap<String, ExtensionStats>,
}

impl Totals {
    fn into_result(self) -> LineCountResult {
        LineCountResult {
            success: true,
            total_lines: Some(self.lines),
            total_files: Some(self.files),
            code_lines: Some(self.code),
            comment_lines: Some(self.comment),
            blank_lines: Some(self.blank),
            by_extension: Some(self.by_extension),
            error: None,
            error_kind: None,
        }
    }
}

fn walk(root: &Path, options: &LineCountOptions) -> AnalysisResult<Totals> {
    if !root.exists() {
        return Err(AnalysisError::NotFound(root.to_path_buf()));
    }

    let filter: Vec<String> = options
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let mut totals = Totals::default();
    let mut visited = 0usize;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_pruned_dir(entry));

    for entry in walker {
        let entry = entry?;
        visited += 1;
        options.budget.check(visited)?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(ext) = accepted_extension(&entry, &filter) else {
            continue;
        };

        let content = match std::fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(path = %entry.path().display(), error = %err, "Skipping unreadable file");
                continue;
            }
        };

        let lines = classify(&content, &ext);
        totals.files += 1;
        totals.lines += lines.total;
        totals.code += lines.code;
        totals.comment += lines.comment;
        totals.blank += lines.blank;
        totals.by_extension.entry(ext).or_default().record(&lines);
    }

    tracing::debug!(
        path = %root.display(),
        files = totals.files,
        lines = totals.lines,
        "Line count complete"
    );

    Ok(totals)
}

fn is_pruned_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == DEPENDENCY_CACHE_DIR
}

/// Lower-cased extension of an accepted file, or `None` when the file must be skipped
fn accepted_extension(entry: &DirEntry, filter: &[String]) -> Option<String> {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return None;
    }

    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();

    if !filter.is_empty() && !filter.contains(&ext) {
        return None;
    }
    if !profile::is_text_extension(&ext) {
        return None;
    }

    Some(ext)
}
