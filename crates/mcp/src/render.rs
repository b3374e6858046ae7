// Human-readable rendering of analysis results

use atelier_core::{DependencyInfo, DependencyResult, LineCountResult, StructureResult};

/// Render a successful line count; failures render their error message
pub fn line_count(path: &str, result: &LineCountResult) -> String {
    if !result.success {
        return result.error.clone().unwrap_or_default();
    }

    let mut out = format!("Line count for {}\n\n", path);
    out.push_str(&format!("Files:         {}\n", result.total_files.unwrap_or(0)));
    out.push_str(&format!("Total lines:   {}\n", result.total_lines.unwrap_or(0)));
    out.push_str(&format!("Code lines:    {}\n", result.code_lines.unwrap_or(0)));
    out.push_str(&format!("Comment lines: {}\n", result.comment_lines.unwrap_or(0)));
    out.push_str(&format!("Blank lines:   {}\n", result.blank_lines.unwrap_or(0)));

    if let Some(by_extension) = result.by_extension.as_ref().filter(|m| !m.is_empty()) {
        out.push_str("\nBy extension:\n");
        for (ext, stats) in by_extension {
            out.push_str(&format!(
                "  .{}: {} files, {} lines ({} code, {} comment, {} blank)\n",
                ext,
                stats.files,
                stats.lines,
                stats.code_lines,
                stats.comment_lines,
                stats.blank_lines
            ));
        }
    }

    out
}

pub fn structure(result: &StructureResult) -> String {
    if !result.success {
        return result.error.clone().unwrap_or_default();
    }

    let mut out = result.tree.clone().unwrap_or_default();
    if let Some(stats) = result.stats {
        out.push_str(&format!(
            "\n{} directories, {} files\n",
            stats.total_dirs, stats.total_files
        ));
    }
    out
}

pub fn dependencies(result: &DependencyResult) -> String {
    if !result.success {
        return result.error.clone().unwrap_or_default();
    }

    let mut out = format!(
        "Package: {}\n",
        result.name.as_deref().unwrap_or("(unnamed)")
    );
    if let Some(version) = &result.version {
        out.push_str(&format!("Version: {}\n", version));
    }
    if let Some(description) = &result.description {
        out.push_str(&format!("Description: {}\n", description));
    }

    out.push_str(&dependency_list(
        "Dependencies",
        result.dependencies.as_deref().unwrap_or_default(),
    ));
    if let Some(dev) = &result.dev_dependencies {
        out.push_str(&dependency_list("Dev dependencies", dev));
    }

    if let Some(scripts) = result.scripts.as_ref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("\nScripts ({}):\n", scripts.len()));
        for script in scripts {
            out.push_str(&format!("  {}: {}\n", script.name, script.command));
        }
    }

    out
}

fn dependency_list(title: &str, deps: &[DependencyInfo]) -> String {
    let mut out = format!("\n{} ({}):\n", title, deps.len());
    if deps.is_empty() {
        out.push_str("  (none)\n");
    }
    for dep in deps {
        out.push_str(&format!("  {}@{}\n", dep.name, dep.version));
    }
    out
}
