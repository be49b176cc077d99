//! Writing export results to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use trawl_domain::ExportResult;

/// Writes `result` and returns the path written.
///
/// When `target` is an existing directory, or ends with a path separator, the
/// file is created inside it under the suggested filename. Otherwise `target`
/// is the file path. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_export(result: &ExportResult, target: &Path) -> std::io::Result<PathBuf> {
    let path = if is_directory_target(target) {
        target.join(&result.filename)
    } else {
        target.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &result.content)?;

    info!(path = %path.display(), bytes = result.content.len(), "Wrote document");
    Ok(path)
}

fn is_directory_target(target: &Path) -> bool {
    target.is_dir()
        || target
            .as_os_str()
            .to_str()
            .is_some_and(|s| s.ends_with(std::path::MAIN_SEPARATOR) || s.ends_with('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use trawl_domain::ExportFormat;

    fn result() -> ExportResult {
        ExportResult::new(
            "openapi: 3.0.3\n".to_string(),
            ExportFormat::Yaml,
            "shop-openapi.yaml".to_string(),
            3,
        )
    }

    #[test]
    fn test_write_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(&result(), dir.path()).unwrap();

        assert_eq!(path, dir.path().join("shop-openapi.yaml"));
        assert_eq!(fs::read_to_string(path).unwrap(), "openapi: 3.0.3\n");
    }

    #[test]
    fn test_write_to_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.yaml");
        let path = write_export(&result(), &target).unwrap();

        assert_eq!(path, target);
        assert!(path.is_file());
    }

    #[test]
    fn test_trailing_separator_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = PathBuf::from(format!("{}/specs/", dir.path().display()));
        let path = write_export(&result(), &target).unwrap();

        assert_eq!(path, dir.path().join("specs").join("shop-openapi.yaml"));
    }
}
