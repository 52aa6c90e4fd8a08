use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;

pub fn timestamp() -> String {
    Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Where to write an output file.
///
/// Without a path, or with a directory, `filename` is used inside it. A path
/// ending with a separator is created as a directory, otherwise missing
/// parents of the file are created.
pub fn resolve_file_path(path: &Option<String>, filename: &str) -> Result<PathBuf> {
    let base_path = path.as_deref().unwrap_or(".");
    let path = Path::new(base_path);

    let output_path = if path.exists() {
        if path.is_dir() {
            path.join(filename)
        } else {
            path.to_path_buf()
        }
    } else if base_path.ends_with('/') || base_path.ends_with('\\') {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        path.join(filename)
    } else {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }
        path.to_path_buf()
    };
    Ok(output_path)
}

pub fn write_output(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REPORT: &str = "report_20251214-153045.html";

    #[test]
    fn test_resolve_file_path_no_argument_uses_current_dir() {
        let result = resolve_file_path(&None, REPORT).unwrap();
        assert_eq!(result.file_name().unwrap(), REPORT);
        assert!(result.starts_with("."));
    }

    #[test]
    fn test_resolve_file_path_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path_str = temp_dir.path().to_str().unwrap().to_string();

        let result = resolve_file_path(&Some(path_str), REPORT).unwrap();

        assert_eq!(result.file_name().unwrap(), REPORT);
        assert!(result.starts_with(temp_dir.path()));
    }

    #[test]
    fn test_resolve_file_path_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("existing.html");
        fs::write(&file_path, "old").unwrap();

        let path_str = file_path.to_str().unwrap().to_string();
        let result = resolve_file_path(&Some(path_str), REPORT).unwrap();

        assert_eq!(result, file_path);
    }

    #[test]
    fn test_resolve_file_path_nonexistent_dir_with_trailing_slash() {
        let temp_dir = TempDir::new().unwrap();
        let new_dir = temp_dir.path().join("reports/");
        let path_str = new_dir.to_str().unwrap().to_string();

        let result = resolve_file_path(&Some(path_str), REPORT).unwrap();

        assert!(new_dir.is_dir());
        assert_eq!(result.file_name().unwrap(), REPORT);
    }

    #[test]
    fn test_resolve_file_path_nonexistent_file_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir/fixed.csv");
        let path_str = file_path.to_str().unwrap().to_string();

        let result = resolve_file_path(&Some(path_str), REPORT).unwrap();

        assert!(file_path.parent().unwrap().exists());
        assert_eq!(result, file_path);
    }

    #[test]
    fn test_write_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.html");
        write_output(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        let missing = temp_dir.path().join("nope/out.html");
        assert!(write_output(&missing, "x").is_err());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "-");
    }
}
