//! Share targets - where an exported snapshot is handed off to

use std::path::{Path, PathBuf};

/// Hands the backing file to something outside the store.
///
/// The exchanger does not control what happens to the file after `share`
/// returns. Implementations must not modify `snapshot`.
pub trait ShareTarget: Send {
    fn share(&self, snapshot: &Path) -> std::io::Result<()>;

    /// Human-readable description of the destination
    fn describe(&self) -> String;
}

/// Copies the snapshot byte-for-byte to a path.
///
/// If the destination is an existing directory, the snapshot keeps its file
/// name inside that directory.
#[derive(Debug, Clone)]
pub struct CopyShare {
    destination: PathBuf,
}

impl CopyShare {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    fn resolve(&self, snapshot: &Path) -> PathBuf {
        match snapshot.file_name() {
            Some(file_name) if self.destination.is_dir() => self.destination.join(file_name),
            _ => self.destination.clone(),
        }
    }
}

/// Whether `target` already names the file at `snapshot`
fn is_same_file(snapshot: &Path, target: &Path) -> std::io::Result<bool> {
    if !target.exists() {
        return Ok(false);
    }
    Ok(std::fs::canonicalize(snapshot)? == std::fs::canonicalize(target)?)
}

impl ShareTarget for CopyShare {
    fn share(&self, snapshot: &Path) -> std::io::Result<()> {
        let target = self.resolve(snapshot);
        // fs::copy truncates the target before reading the source
        if is_same_file(snapshot, &target)? {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is the snapshot itself", target.display()),
            ));
        }
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::copy(snapshot, &target)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.destination.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_into_directory_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("names.db");
        std::fs::write(&source, b"bytes").unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        CopyShare::new(&out).share(&source).unwrap();
        assert_eq!(std::fs::read(out.join("names.db")).unwrap(), b"bytes");
    }

    #[test]
    fn test_copy_to_new_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("names.db");
        std::fs::write(&source, b"bytes").unwrap();
        let target = dir.path().join("backups/2024/names-backup.db");

        CopyShare::new(&target).share(&source).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"bytes");
    }

    #[test]
    fn test_copy_onto_itself_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("names.db");
        std::fs::write(&source, b"bytes").unwrap();

        let into_own_dir = CopyShare::new(dir.path()).share(&source).unwrap_err();
        assert_eq!(into_own_dir.kind(), std::io::ErrorKind::InvalidInput);

        let via_dotted_path = dir.path().join(".").join("names.db");
        assert!(CopyShare::new(via_dotted_path).share(&source).is_err());
        assert_eq!(std::fs::read(&source).unwrap(), b"bytes");
    }
}
