// Comment delimiters per file extension

use std::collections::HashMap;
use std::sync::LazyLock;

/// Comment syntax recognised for one extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionProfile {
    pub extension: &'static str,
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
}

const C_STYLE: (Option<&str>, Option<(&str, &str)>) = (Some("//"), Some(("/*", "*/")));
const HASH: (Option<&str>, Option<(&str, &str)>) = (Some("#"), None);
const MARKUP: (Option<&str>, Option<(&str, &str)>) = (None, Some(("<!--", "-->")));
const CSS: (Option<&str>, Option<(&str, &str)>) = (None, Some(("/*", "*/")));

const PROFILE_TABLE: &[(&str, (Option<&str>, Option<(&str, &str)>))] = &[
    ("js", C_STYLE),
    ("jsx", C_STYLE),
    ("mjs", C_STYLE),
    ("cjs", C_STYLE),
    ("ts", C_STYLE),
    ("tsx", C_STYLE),
    ("rs", C_STYLE),
    ("go", C_STYLE),
    ("java", C_STYLE),
    ("kt", C_STYLE),
    ("scala", C_STYLE),
    ("swift", C_STYLE),
    ("c", C_STYLE),
    ("h", C_STYLE),
    ("cpp", C_STYLE),
    ("cc", C_STYLE),
    ("hpp", C_STYLE),
    ("cs", C_STYLE),
    ("php", C_STYLE),
    ("scss", C_STYLE),
    ("less", C_STYLE),
    ("css", CSS),
    ("py", (Some("#"), Some(("\"\"\"", "\"\"\"")))),
    ("rb", (Some("#"), Some(("=begin", "=end")))),
    ("sh", HASH),
    ("bash", HASH),
    ("zsh", HASH),
    ("yaml", HASH),
    ("yml", HASH),
    ("toml", HASH),
    ("html", MARKUP),
    ("htm", MARKUP),
    ("xml", MARKUP),
    ("vue", MARKUP),
    ("svelte", MARKUP),
    ("md", MARKUP),
    ("sql", (Some("--"), Some(("/*", "*/")))),
    ("lua", (Some("--"), Some(("--[[", "]]")))),
];

/// Extensions the line walker is willing to read. Anything else is treated as
/// binary or unknown and never opened.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "rs", "go", "java", "kt", "scala", "swift", "c",
    "h", "cpp", "cc", "hpp", "cs", "php", "py", "rb", "lua", "sh", "bash", "zsh", "sql", "css",
    "scss", "less", "html", "htm", "xml", "vue", "svelte", "json", "yaml", "yml", "toml", "ini",
    "cfg", "md", "txt", "rst",
];

static PROFILES: LazyLock<HashMap<&'static str, ExtensionProfile>> = LazyLock::new(|| {
    PROFILE_TABLE
        .iter()
        .map(|&(extension, (line_comment, block_comment))| {
            (
                extension,
                ExtensionProfile {
                    extension,
                    line_comment,
                    block_comment,
                },
            )
        })
        .collect()
});

/// Look up the comment profile for an extension (case-insensitive).
/// `None` means no comment syntax is recognised.
pub fn lookup(extension: &str) -> Option<&'static ExtensionProfile> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    PROFILES.get(ext.as_str())
}

/// Whether the walker should read files with this extension
pub fn is_text_extension(extension: &str) -> bool {
    let ext = extension.to_ascii_lowercase();
    TEXT_EXTENSIONS.contains(&ext.as_str())
}
