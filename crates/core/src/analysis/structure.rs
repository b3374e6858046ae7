// Indented directory tree rendering

use super::WalkBudget;
use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DirectoryStats, StructureResult};
use std::cmp::Ordering;
use std::path::Path;

const TEE: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Options for [`analyze_structure`]
#[derive(Debug, Clone, Default)]
pub struct StructureOptions {
    /// Number of levels to list; `Some(1)` lists only the root's children.
    /// `None` is unbounded.
    pub max_depth: Option<usize>,
    pub show_hidden: bool,
    pub budget: WalkBudget,
}

/// Render the directory tree under `root`
pub fn analyze_structure(root: &Path, options: &StructureOptions) -> StructureResult {
    let display_path = root.display().to_string();
    let mut builder = TreeBuilder::new(options);

    match builder.build(root) {
        Ok(()) => StructureResult {
            success: true,
            path: display_path,
            tree: Some(builder.tree),
            stats: Some(builder.stats),
            error: None,
            error_kind: None,
        },
        Err(err) => {
            tracing::warn!(path = %root.display(), error = %err, "Structure analysis failed");
            StructureResult::failure(display_path, &err)
        }
    }
}

struct Entry {
    name: String,
    is_dir: bool,
}

struct TreeBuilder<'a> {
    options: &'a StructureOptions,
    tree: String,
    stats: DirectoryStats,
    visited: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(options: &'a StructureOptions) -> Self {
        Self {
            options,
            tree: String::new(),
            stats: DirectoryStats::default(),
            visited: 0,
        }
    }

    fn build(&mut self, root: &Path) -> AnalysisResult<()> {
        if !root.exists() {
            return Err(AnalysisError::NotFound(root.to_path_buf()));
        }

        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        self.tree.push_str(&root_name);
        self.tree.push('\n');

        if root.is_dir() {
            self.render_dir(root, "", 0)?;
        }
        Ok(())
    }

    fn render_dir(&mut self, dir: &Path, prefix: &str, depth: usize) -> AnalysisResult<()> {
        let entries = self.read_entries(dir)?;
        let descend = self.options.max_depth.map_or(true, |max| depth + 1 < max);
        let count = entries.len();

        for (i, entry) in entries.into_iter().enumerate() {
            self.visited += 1;
            self.options.budget.check(self.visited)?;

            let is_last = i + 1 == count;
            let connector = if is_last { CORNER } else { TEE };
            let suffix = if entry.is_dir { "/" } else { "" };
            self.tree
                .push_str(&format!("{prefix}{connector}{}{suffix}\n", entry.name));

            if entry.is_dir {
                self.stats.total_dirs += 1;
                if descend {
                    let child_prefix = format!("{prefix}{}", if is_last { SPACE } else { PIPE });
                    self.render_dir(&dir.join(&entry.name), &child_prefix, depth + 1)?;
                }
            } else {
                self.stats.total_files += 1;
            }
        }

        Ok(())
    }

    /// Directory entries, hidden ones filtered, directories first then files
    fn read_entries(&self, dir: &Path) -> AnalysisResult<Vec<Entry>> {
        let read_dir = std::fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;
        let mut entries = Vec::new();

        for item in read_dir {
            let item = item.map_err(|e| AnalysisError::io(dir, e))?;
            let name = item.file_name().to_string_lossy().into_owned();
            if !self.options.show_hidden && name.starts_with('.') {
                continue;
            }
            // file_type does not follow symlinks, so linked directories are never descended
            let is_dir = item
                .file_type()
                .map_err(|e| AnalysisError::io(item.path(), e))?
                .is_dir();
            entries.push(Entry { name, is_dir });
        }

        entries.sort_by(compare_entries);
        Ok(entries)
    }
}

fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
