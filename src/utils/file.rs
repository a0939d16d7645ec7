// Description file discovery

use std::path::{Path, PathBuf};

/// Default extension of backend description files
pub const DESC_EXTENSION: &str = "desc";

/// File utilities for locating description files
pub struct FileUtils;

impl FileUtils {
    /// Collect files with `extension` from a file or directory, sorted by path
    pub fn collect_desc_files(path: &Path, extension: &str) -> Vec<PathBuf> {
        let mut files = Vec::new();

        if path.is_file() {
            if Self::has_extension(path, extension) {
                files.push(path.to_path_buf());
            }
        } else if path.is_dir() {
            let walker = walkdir::WalkDir::new(path).into_iter().filter_entry(|e| {
                // Always include the root directory itself, even if it starts with '.'
                if e.depth() == 0 {
                    return true;
                }
                !e.file_name().to_string_lossy().starts_with('.')
            });

            for entry in walker.flatten() {
                if entry.file_type().is_file() && Self::has_extension(entry.path(), extension) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }

        files.sort();
        files
    }

    /// Collect from several roots; explicit file paths are kept whatever their extension
    pub fn collect_from_paths(paths: &[PathBuf], extension: &str) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_file() {
                files.push(path.clone());
            } else {
                files.extend(Self::collect_desc_files(path, extension));
            }
        }
        files
    }

    pub fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension().is_some_and(|e| e == extension)
    }

    /// Backend name for a description file (its stem)
    pub fn backend_name(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_desc_files_single() {
        let file = tempfile::Builder::new().suffix(".desc").tempfile().unwrap();
        let path = file.path();

        let files = FileUtils::collect_desc_files(path, DESC_EXTENSION);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0], path);
    }

    #[test]
    fn test_collect_desc_files_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zeta.desc"), ":backend \"zeta\"").unwrap();
        std::fs::write(dir.path().join("alpha.desc"), ":backend \"alpha\"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join(".hidden").join("h.desc"), "x").unwrap();

        let files = FileUtils::collect_desc_files(dir.path(), DESC_EXTENSION);
        assert_eq!(
            files,
            vec![dir.path().join("alpha.desc"), dir.path().join("zeta.desc")]
        );
    }

    #[test]
    fn test_collect_from_paths_keeps_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("odd.txt");
        std::fs::write(&odd, ":backend \"odd\"").unwrap();

        let files = FileUtils::collect_from_paths(std::slice::from_ref(&odd), DESC_EXTENSION);
        assert_eq!(files, vec![odd]);
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(FileUtils::backend_name(Path::new("/d/epson2.desc")), "epson2");
    }
}
