// Path guard that keeps user-supplied paths inside a workspace root

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Access denied: {0} resolves outside the workspace root")]
    Escapes(String),

    #[error("Invalid path: {0}")]
    Invalid(String),
}

/// Resolve `requested` against `base`, rejecting anything that leaves `base`.
///
/// Relative paths are joined onto `base`; absolute paths must already lie
/// under it. `..` is resolved lexically, and when the target exists its
/// canonical form is checked too so symlinks cannot point outside.
pub fn resolve_within(base: &Path, requested: &str) -> Result<PathBuf, PathError> {
    if requested.contains('\0') {
        return Err(PathError::Invalid(requested.replace('\0', "\\0")));
    }

    let base = normalize(base).ok_or_else(|| PathError::Invalid(base.display().to_string()))?;
    let requested_path = Path::new(requested);
    let joined = if requested_path.is_absolute() {
        requested_path.to_path_buf()
    } else {
        base.join(requested_path)
    };

    let resolved = normalize(&joined).ok_or_else(|| PathError::Escapes(requested.to_string()))?;
    if !resolved.starts_with(&base) {
        return Err(PathError::Escapes(requested.to_string()));
    }

    if let (Ok(canonical), Ok(canonical_base)) = (resolved.canonicalize(), base.canonicalize()) {
        if !canonical.starts_with(canonical_base) {
            tracing::warn!(path = requested, "Rejected symlink escaping workspace root");
            return Err(PathError::Escapes(requested.to_string()));
        }
    }

    Ok(resolved)
}

/// Lexically resolve `.` and `..`. Returns `None` when `..` climbs above the
/// first component.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_paths_resolve_under_base() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        assert_eq!(resolve_within(base, "src").unwrap(), base.join("src"));
        assert_eq!(resolve_within(base, "./a/../b").unwrap(), base.join("b"));
        assert_eq!(resolve_within(base, ".").unwrap(), base.to_path_buf());
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        assert!(matches!(
            resolve_within(base, "../etc/passwd"),
            Err(PathError::Escapes(_))
        ));
        assert!(matches!(
            resolve_within(base, "a/../../.."),
            Err(PathError::Escapes(_))
        ));
    }

    #[test]
    fn test_absolute_paths() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        let inside = base.join("inner");

        assert_eq!(
            resolve_within(base, inside.to_str().unwrap()).unwrap(),
            inside
        );
        assert!(resolve_within(base, "/definitely/elsewhere").is_err());
    }

    #[test]
    fn test_nul_byte_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_within(dir.path(), "a\0b"),
            Err(PathError::Invalid(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let outside = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        assert!(matches!(
            resolve_within(dir.path(), "link"),
            Err(PathError::Escapes(_))
        ));
    }
}
