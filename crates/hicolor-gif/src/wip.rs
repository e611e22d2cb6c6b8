use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use hicolor_core::Error;

/// Work-in-progress token (spec §6): writes go to a temporary companion
/// file; `commit` atomically renames it onto the final path; if the token
/// is dropped without committing, the temp file is removed so a crash or
/// cancellation never leaves a partial GIF at the target path.
pub struct WipToken {
    final_path: PathBuf,
    temp_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl WipToken {
    pub fn create(final_path: impl AsRef<Path>) -> Result<Self, Error> {
        let final_path = final_path.as_ref().to_path_buf();
        let mut temp_path = final_path.clone();
        let file_name = temp_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        temp_path.set_file_name(format!("{file_name}.wip"));

        let file = File::create(&temp_path).map_err(|source| Error::IoFailure {
            message: format!("could not create WIP file at {}", temp_path.display()),
            source,
        })?;

        Ok(WipToken {
            final_path,
            temp_path,
            file: Some(file),
            committed: false,
        })
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.file
            .as_mut()
            .expect("WipToken used after commit")
            .write_all(bytes)
            .map_err(|source| Error::IoFailure {
                message: "write to WIP file failed".to_string(),
                source,
            })
    }

    /// Flush, close, and atomically replace the final path with the temp
    /// file's contents.
    pub fn commit(mut self) -> Result<(), Error> {
        {
            let file = self.file.as_mut().expect("WipToken used after commit");
            file.flush().map_err(|source| Error::IoFailure {
                message: "flush of WIP file failed".to_string(),
                source,
            })?;
        }
        self.file = None;
        std::fs::rename(&self.temp_path, &self.final_path).map_err(|source| Error::IoFailure {
            message: format!("could not commit WIP file to {}", self.final_path.display()),
            source,
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for WipToken {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_renames_temp_file_onto_final_path() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.gif");

        let mut token = WipToken::create(&final_path).unwrap();
        token.write_all(b"GIF89a").unwrap();
        token.commit().unwrap();

        assert!(final_path.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"GIF89a");
    }

    #[test]
    fn dropping_without_commit_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.gif");
        let temp_path = dir.path().join("out.gif.wip");

        {
            let mut token = WipToken::create(&final_path).unwrap();
            token.write_all(b"partial").unwrap();
        }

        assert!(!final_path.exists());
        assert!(!temp_path.exists());
    }
}
