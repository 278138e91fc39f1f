use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("could not run git: {0}")]
    Spawn(#[source] io::Error),
    #[error("git mv {} -> {} exited with {status}", src.display(), dst.display())]
    Git { src: PathBuf, dst: PathBuf, status: String },
    #[error("rename {} -> {}: {source}", src.display(), dst.display())]
    Rename { src: PathBuf, dst: PathBuf, source: io::Error },
}

/// Moves a note to its new name.
pub trait Mover {
    fn move_note(&self, repo_root: &Path, src: &Path, dst: &Path) -> Result<(), MoveError>;
}

/// `git mv`, so the note keeps its history.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitMover;

impl Mover for GitMover {
    fn move_note(&self, repo_root: &Path, src: &Path, dst: &Path) -> Result<(), MoveError> {
        let status = Command::new("git")
            .arg("mv")
            .arg(src)
            .arg(dst)
            .current_dir(repo_root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(MoveError::Spawn)?;
        if !status.success() {
            return Err(MoveError::Git {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Plain filesystem rename for trees that are not under git.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl Mover for FsMover {
    fn move_note(&self, _repo_root: &Path, src: &Path, dst: &Path) -> Result<(), MoveError> {
        fs::rename(src, dst).map_err(|source| MoveError::Rename {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fs_mover_renames() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("old.md");
        let dst = tmp.path().join("new.md");
        fs::write(&src, "body").unwrap();
        FsMover.move_note(tmp.path(), &src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "body");
    }

    #[test]
    fn test_fs_mover_missing_source() {
        let tmp = tempdir().unwrap();
        let err = FsMover
            .move_note(tmp.path(), &tmp.path().join("nope.md"), &tmp.path().join("x.md"))
            .unwrap_err();
        assert!(matches!(err, MoveError::Rename { .. }));
        assert!(err.to_string().contains("nope.md"));
    }
}
