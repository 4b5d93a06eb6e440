//! Path filter — decides which files a run may touch.
//!
//! Eligibility is purely path-string based: a fixed directory-name set and a
//! fixed binary/media extension set, both matched case-insensitively. File
//! content is never inspected here.

use std::path::{Path, PathBuf};

/// Directories to skip at any depth.
///
/// Covers VCS metadata, dependency/package directories, build output,
/// caches, editor config, coverage/log/temp directories, and the tool's
/// own backup root.
const SKIP_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "vendor",
    "bower_components",
    "build",
    "dist",
    "out",
    "target",
    "_site",
    ".cache",
    "cache",
    "__pycache__",
    ".sass-cache",
    ".idea",
    ".vscode",
    "coverage",
    "logs",
    "log",
    "tmp",
    "temp",
    ".backups",
];

/// Extensions of known binary/media formats (lowercase, no leading dot).
///
/// `.svg` is intentionally absent: it is a text format and frequently
/// carries absolute URLs that a migration must rewrite.
const SKIP_EXTENSIONS: &[&str] = &[
    // raster images
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "ico", "tiff",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // archives
    "zip", "gz", "tar", "rar", "7z",
    // audio/video
    "mp3", "wav", "ogg", "flac", "mp4", "webm", "avi", "mov", "mkv",
    // documents
    "pdf",
];

/// Whether a directory name belongs to the fixed skip set.
pub fn is_skipped_dir(name: &str) -> bool {
    let lower = name.to_lowercase();
    SKIP_DIRS.contains(&lower.as_str())
}

/// Whether a file's extension marks it as binary/media.
pub fn has_skipped_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SKIP_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Whether a file path is eligible for processing: no skipped directory in
/// any path segment, and no binary/media extension.
///
/// `path` is interpreted relative to the scan root; segments above the
/// root are not the filter's business.
pub fn is_eligible(path: &Path) -> bool {
    let dir_excluded = path
        .parent()
        .map(|parent| {
            parent.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .map(is_skipped_dir)
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false);

    !dir_excluded && !has_skipped_extension(path)
}

/// Recursively enumerate eligible files under `root`.
///
/// Enumeration order follows `read_dir` and is not guaranteed stable across
/// filesystems; callers must not rely on it.
pub fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_recursive(root, root, &mut files);
    files
}

fn walk_recursive(dir: &Path, root: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if is_skipped_dir(&name) {
                continue;
            }
            walk_recursive(&path, root, files);
        } else if is_eligible(path.strip_prefix(root).unwrap_or(&path)) {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn skip_dirs_match_case_insensitively() {
        assert!(is_skipped_dir(".git"));
        assert!(is_skipped_dir("NODE_MODULES"));
        assert!(is_skipped_dir("Vendor"));
        assert!(!is_skipped_dir("content"));
        assert!(!is_skipped_dir("gitlab"));
    }

    #[test]
    fn backup_root_is_skipped() {
        assert!(is_skipped_dir(".backups"));
    }

    #[test]
    fn binary_extensions_match_case_insensitively() {
        assert!(has_skipped_extension(Path::new("logo.png")));
        assert!(has_skipped_extension(Path::new("photo.JPG")));
        assert!(has_skipped_extension(Path::new("font.woff2")));
        assert!(!has_skipped_extension(Path::new("index.html")));
        assert!(!has_skipped_extension(Path::new("icon.svg")));
        assert!(!has_skipped_extension(Path::new("Makefile")));
    }

    #[test]
    fn eligibility_checks_every_segment() {
        assert!(is_eligible(Path::new("site/blog/post.html")));
        assert!(!is_eligible(Path::new("site/node_modules/pkg/index.js")));
        assert!(!is_eligible(Path::new("site/NODE_MODULES/pkg/index.js")));
        assert!(!is_eligible(Path::new("site/blog/photo.jpeg")));
    }

    #[test]
    fn root_inside_skip_named_directory_is_still_scanned() {
        // The skip set applies to segments under the root, not to the
        // root's own ancestors.
        let dir = tempdir().unwrap();
        let root = dir.path().join("tmp").join("site");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("index.html"), "x").unwrap();

        let files = walk_files(&root);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn walk_skips_excluded_dirs_at_any_depth() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        std::fs::create_dir_all(root.join("blog")).unwrap();
        std::fs::create_dir_all(root.join("blog").join("node_modules")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();

        std::fs::write(root.join("index.html"), "a").unwrap();
        std::fs::write(root.join("blog").join("post.html"), "b").unwrap();
        std::fs::write(root.join("blog").join("node_modules").join("x.js"), "c").unwrap();
        std::fs::write(root.join(".git").join("config"), "d").unwrap();
        std::fs::write(root.join("logo.png"), "e").unwrap();

        let mut files: Vec<String> = walk_files(root)
            .into_iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();

        assert_eq!(files, vec!["blog/post.html", "index.html"]);
    }
}
