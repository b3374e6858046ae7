// Result records returned by the analyzers

use crate::error::{AnalysisError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-file line breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClassification {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

/// Totals accumulated for one file extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionStats {
    pub files: usize,
    pub lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
}

impl ExtensionStats {
    pub fn record(&mut self, lines: &LineClassification) {
        self.files += 1;
        self.lines += lines.total;
        self.code_lines += lines.code;
        self.comment_lines += lines.comment;
        self.blank_lines += lines.blank;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCountResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_extension: Option<BTreeMap<String, ExtensionStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl LineCountResult {
    pub fn failure(err: &AnalysisError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            ..Default::default()
        }
    }
}

/// Directory and file counts gathered during a structure traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub total_files: usize,
    pub total_dirs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureResult {
    pub success: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DirectoryStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl StructureResult {
    pub fn failure(path: impl Into<String>, err: &AnalysisError) -> Self {
        Self {
            success: false,
            path: path.into(),
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptInfo {
    pub name: String,
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always `Some` on success, empty when the manifest has no map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<DependencyInfo>>,
    /// `None` when excluded or absent from the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Vec<DependencyInfo>>,
    /// Always `Some` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<ScriptInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl DependencyResult {
    pub fn failure(err: &AnalysisError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            ..Default::default()
        }
    }
}
