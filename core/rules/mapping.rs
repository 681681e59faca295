// src/rules/mapping.rs

// Extensions whose files are eligible for the combined document.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "txt", "md", "html", "css", "java", "cpp", "h", "c", "go",
    "rs", "rb", "php", "scala", "kt", "swift", "r", "sql",
];

// Extensions that are never combined, even when also allowed.
// Only the text after a file's last dot is compared, so dotted entries
// such as "min.js" never match a real file.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "tiff", "svg", "webp",
    // Videos
    "mp4", "avi", "mov", "mkv", "flv", "wmv",
    // Audio
    "mp3", "wav", "aac", "flac", "ogg",
    // Documents
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx",
    // Archives
    "jar", "zip", "tar", "gz", "rar", "7z",
    // Executables
    "exe", "dll", "bin", "sh", "bat", "cmd",
    // Settings and configs
    "ini", "cfg", "conf", "json", "yaml", "yml", "toml",
    // Other
    "log", "lock", "bak", "tmp", "swp", "swo", "DS_Store", ".DS_Store", "min.js", "min.css",
    "map",
];

// Directory names that exclude everything beneath them, at any depth.
pub const DEFAULT_EXCLUDED_DIRECTORIES: &[&str] = &[
    "node_modules",
    "__pycache__",
    ".git",
    ".svn",
    ".hg",
    ".idea",
    ".vscode",
    "build",
    "dist",
    "target",
];

// Maps a lowercase file extension to the tag written after the opening fence.
// Anything not listed here gets an untagged block.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "py" => Some("python"),
        "js" | "jsx" => Some("javascript"),
        "ts" | "tsx" => Some("typescript"),
        "html" => Some("html"),
        "css" => Some("css"),
        "java" => Some("java"),
        "cpp" | "h" => Some("cpp"),
        "c" => Some("c"),
        "go" => Some("go"),
        "rs" => Some("rust"),
        "rb" => Some("ruby"),
        "php" => Some("php"),
        "scala" => Some("scala"),
        "kt" => Some("kotlin"),
        "swift" => Some("swift"),
        "r" => Some("r"),
        "sql" => Some("sql"),
        _ => None,
    }
}
