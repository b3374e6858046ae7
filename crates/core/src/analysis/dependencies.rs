// package.json dependency and script extraction

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DependencyInfo, DependencyResult, ScriptInfo};
use serde_json::{Map, Value};
use std::path::Path;

/// Manifest file name looked up directly under the analyzed path
pub const MANIFEST_FILE: &str = "package.json";

/// Options for [`analyze_dependencies`]
#[derive(Debug, Clone)]
pub struct DependencyOptions {
    pub include_dev_deps: bool,
}

impl Default for DependencyOptions {
    fn default() -> Self {
        Self {
            include_dev_deps: true,
        }
    }
}

/// Project the manifest under `root` into dependency and script lists
pub fn analyze_dependencies(root: &Path, options: &DependencyOptions) -> DependencyResult {
    match extract(root, options) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(path = %root.display(), error = %err, "Dependency analysis failed");
            DependencyResult::failure(&err)
        }
    }
}

/// Read and parse the manifest, distinguishing a missing file from bad JSON
pub fn read_manifest(root: &Path) -> AnalysisResult<Map<String, Value>> {
    let manifest_path = root.join(MANIFEST_FILE);
    let content = match std::fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AnalysisError::ManifestMissing(manifest_path));
        }
        Err(err) => return Err(AnalysisError::io(manifest_path, err)),
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AnalysisError::ManifestInvalid(
            "top-level value is not an object".to_string(),
        )),
        Err(err) => Err(AnalysisError::ManifestInvalid(err.to_string())),
    }
}

fn extract(root: &Path, options: &DependencyOptions) -> AnalysisResult<DependencyResult> {
    let manifest = read_manifest(root)?;

    let dependencies = project(&manifest, "dependencies", |name, version| DependencyInfo {
        name,
        version,
    })
    .unwrap_or_default();
    let dev_dependencies = if options.include_dev_deps {
        project(&manifest, "devDependencies", |name, version| DependencyInfo {
            name,
            version,
        })
    } else {
        None
    };
    let scripts = project(&manifest, "scripts", |name, command| ScriptInfo {
        name,
        command,
    })
    .unwrap_or_default();

    Ok(DependencyResult {
        success: true,
        name: string_field(&manifest, "name"),
        version: string_field(&manifest, "version"),
        description: string_field(&manifest, "description"),
        dependencies: Some(dependencies),
        dev_dependencies,
        scripts: Some(scripts),
        error: None,
        error_kind: None,
    })
}

fn string_field(manifest: &Map<String, Value>, key: &str) -> Option<String> {
    manifest.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Map each `key: value` of an object field through `make`, keeping manifest order
fn project<T>(
    manifest: &Map<String, Value>,
    field: &str,
    make: impl Fn(String, String) -> T,
) -> Option<Vec<T>> {
    let map = manifest.get(field)?.as_object()?;
    Some(
        map.iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                make(key.clone(), text)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "name": "demo",
        "version": "1.2.3",
        "dependencies": { "zod": "^3.0.0", "axios": "1.0.0", "left-pad": "*" },
        "devDependencies": { "b": "2.0.0" },
        "scripts": { "build": "tsc", "test": "vitest run" }
    }"#;

    fn write_manifest(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), content).unwrap();
        dir
    }

    #[test]
    fn test_full_manifest() {
        let dir = write_manifest(MANIFEST);
        let result = analyze_dependencies(dir.path(), &DependencyOptions::default());

        assert!(result.success);
        assert_eq!(result.name.as_deref(), Some("demo"));
        assert_eq!(result.version.as_deref(), Some("1.2.3"));
        assert!(result.description.is_none());

        let names: Vec<_> = result
            .dependencies
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["zod", "axios", "left-pad"]);

        assert_eq!(result.dev_dependencies.unwrap().len(), 1);
        assert_eq!(
            result.scripts.unwrap()[1],
            ScriptInfo {
                name: "test".to_string(),
                command: "vitest run".to_string()
            }
        );
    }

    #[test]
    fn test_exclude_dev_dependencies() {
        let dir = write_manifest(
            r#"{"dependencies": {"a": "1.0.0"}, "devDependencies": {"b": "2.0.0"}}"#,
        );
        let options = DependencyOptions {
            include_dev_deps: false,
        };
        let result = analyze_dependencies(dir.path(), &options);

        assert_eq!(
            result.dependencies,
            Some(vec![DependencyInfo {
                name: "a".to_string(),
                version: "1.0.0".to_string()
            }])
        );
        assert!(result.dev_dependencies.is_none());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("devDependencies").is_none());
    }

    #[test]
    fn test_absent_maps_become_empty_lists() {
        let dir = write_manifest(r#"{"name": "bare"}"#);
        let result = analyze_dependencies(dir.path(), &DependencyOptions::default());
        assert!(result.success);
        assert_eq!(result.dependencies, Some(vec![]));
        assert_eq!(result.scripts, Some(vec![]));
        assert!(result.dev_dependencies.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["dependencies"], serde_json::json!([]));
        assert_eq!(json["scripts"], serde_json::json!([]));
        assert!(json.get("devDependencies").is_none());
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let result = analyze_dependencies(dir.path(), &DependencyOptions::default());
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::ManifestMissing));
        assert!(result.name.is_none());
    }

    #[test]
    fn test_invalid_manifest() {
        let dir = write_manifest("{ not json");
        let result = analyze_dependencies(dir.path(), &DependencyOptions::default());
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::ManifestInvalid));

        let dir = write_manifest("[1, 2]");
        let result = analyze_dependencies(dir.path(), &DependencyOptions::default());
        assert_eq!(result.error_kind, Some(ErrorKind::ManifestInvalid));
    }
}
