// Project analyzers: line counting, directory structure and dependency listing

pub mod classify;
pub mod dependencies;
pub mod lines;
pub mod profile;
pub mod structure;

pub use classify::classify;
pub use dependencies::{analyze_dependencies, DependencyOptions, MANIFEST_FILE};
pub use lines::{count_lines, LineCountOptions};
pub use profile::ExtensionProfile;
pub use structure::{analyze_structure, StructureOptions};

use crate::error::{AnalysisError, AnalysisResult};

/// Directory name that is always pruned from line counting
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

/// Upper bound on the number of filesystem entries a single traversal may visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkBudget {
    pub max_entries: usize,
}

impl WalkBudget {
    pub const DEFAULT_MAX_ENTRIES: usize = 100_000;

    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    pub(crate) fn check(&self, visited: usize) -> AnalysisResult<()> {
        if visited > self.max_entries {
            return Err(AnalysisError::Truncated {
                limit: self.max_entries,
            });
        }
        Ok(())
    }
}

impl Default for WalkBudget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTRIES)
    }
}
