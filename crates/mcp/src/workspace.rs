// Workspace root shared by the analysis tools, resources and prompts

use atelier_core::analysis::WalkBudget;
use atelier_core::paths::{resolve_within, PathError};
use std::path::{Path, PathBuf};

/// Directory that every user-supplied path is confined to
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    budget: WalkBudget,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            budget: WalkBudget::default(),
        }
    }

    pub fn with_budget(mut self, budget: WalkBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn budget(&self) -> WalkBudget {
        self.budget
    }

    /// Resolve a path argument, refusing anything outside the root
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, PathError> {
        resolve_within(&self.root, requested)
    }
}
