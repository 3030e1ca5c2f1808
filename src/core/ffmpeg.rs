//! FFmpeg locator.
//!
//! Resolution order: the host `PATH`, then the bundled binary tree that
//! installers ship next to the executable:
//!
//! ```text
//! tunegrab/
//! ├── tunegrab(.exe)
//! └── ffmpeg/
//!     ├── windows/ffmpeg.exe
//!     └── linux/ffmpeg
//! ```
//!
//! Returning `None` is not an error at this layer. Callers that need audio
//! extraction must treat "no binary resolved" as a precondition failure
//! before any network activity starts.

use std::path::{Path, PathBuf};

const BINARY_NAMES: [&str; 2] = ["ffmpeg.exe", "ffmpeg"];

/// Resolve an ffmpeg executable, or `None` when nothing usable is found.
pub fn locate_ffmpeg() -> Option<PathBuf> {
    if let Some(found) = search_path_env() {
        tracing::debug!("Resolved ffmpeg from PATH: {}", found.display());
        return Some(found);
    }

    let exe_dir = std::env::current_exe().ok()?.parent()?.to_path_buf();
    let found = search_bundled(&exe_dir);
    match &found {
        Some(path) => tracing::debug!("Resolved bundled ffmpeg: {}", path.display()),
        None => tracing::debug!("No ffmpeg found on PATH or in bundled tree"),
    }
    found
}

fn search_path_env() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        for name in BINARY_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Search the bundled-binary candidates relative to `base`.
pub fn search_bundled(base: &Path) -> Option<PathBuf> {
    let candidates = [
        base.to_path_buf(),
        base.join("bin"),
        base.join("ffmpeg"),
        base.join("ffmpeg").join("windows"),
        base.join("ffmpeg").join("linux"),
    ];

    for dir in &candidates {
        for name in BINARY_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_bundled_platform_dir_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let platform = dir.path().join("ffmpeg").join("linux");
        std::fs::create_dir_all(&platform).unwrap();
        File::create(platform.join("ffmpeg")).unwrap();

        let found = search_bundled(dir.path()).unwrap();
        assert_eq!(found, platform.join("ffmpeg"));
    }

    #[test]
    fn test_bin_dir_wins_over_platform_dir() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        let platform = dir.path().join("ffmpeg").join("linux");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::create_dir_all(&platform).unwrap();
        File::create(bin.join("ffmpeg")).unwrap();
        File::create(platform.join("ffmpeg")).unwrap();

        let found = search_bundled(dir.path()).unwrap();
        assert_eq!(found, bin.join("ffmpeg"));
    }

    #[test]
    fn test_empty_tree_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ffmpeg").join("linux")).unwrap();
        assert!(search_bundled(dir.path()).is_none());
    }
}
