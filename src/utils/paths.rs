//! Path utilities

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Search `start` and its ancestors for a file called `name`
pub fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Total size in bytes of all files below `path`
///
/// Entries that cannot be read are skipped. Symbolic links are not followed,
/// including `path` itself.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_root_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}

/// Format a byte count, e.g. `1.50 KB`
pub fn format_size(size_bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a/b")).unwrap();
        std::fs::write(temp.path().join("top.txt"), vec![0u8; 10]).unwrap();
        std::fs::write(temp.path().join("a/b/deep.bin"), vec![0u8; 32]).unwrap();

        assert_eq!(dir_size(temp.path()), 42);
    }

    #[cfg(unix)]
    #[test]
    fn test_dir_size_of_symlink_is_zero() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("big.bin"), vec![0u8; 64]).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(dir_size(&link), 0);
        assert_eq!(dir_size(&target), 64);
    }

    #[test]
    fn test_find_upwards() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("x/y/z");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("x/cmtask.toml"), "").unwrap();

        let found = find_upwards(&nested, "cmtask.toml").unwrap();
        assert_eq!(found, temp.path().join("x/cmtask.toml"));
        assert!(find_upwards(&nested, "missing-file.toml").is_none());
    }
}
