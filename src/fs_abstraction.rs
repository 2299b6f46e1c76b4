//! Filesystem abstraction layer for testability
//!
//! The installer writes hook scripts and config files through [`FileSystem`]
//! so its tests can run against a mock instead of `/etc`.

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Filesystem operations needed by the installer.
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Write bytes to a file, creating it if it doesn't exist.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Set Unix file permissions mode (e.g., 0o755).
    fn set_permissions_mode(&self, path: &Path, mode: u32) -> io::Result<()>;
}

/// Real filesystem implementation using std::fs.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn set_permissions_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Shared instance for production code. Tests build a `MockFileSystem`.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_write_exists_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("hook");
        let fs = real_fs();

        assert!(!fs.exists(&file_path));
        fs.write(&file_path, b"#!/bin/sh\n").unwrap();
        assert!(fs.exists(&file_path));
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "#!/bin/sh\n");

        fs.remove_file(&file_path).unwrap();
        assert!(!fs.exists(&file_path));
    }

    #[test]
    fn test_real_fs_create_dir_all() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("hotplug.d/iface");

        RealFileSystem.create_dir_all(&nested_path).unwrap();
        assert!(nested_path.is_dir());
    }

    #[test]
    fn test_real_fs_set_permissions_mode() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("hook");
        let fs = RealFileSystem;

        fs.write(&file_path, b"x").unwrap();
        fs.set_permissions_mode(&file_path, 0o755).unwrap();

        let mode = std::fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_remove_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let err = RealFileSystem
            .remove_file(&temp_dir.path().join("absent"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
