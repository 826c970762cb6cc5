// src/tmpdir.rs
//
// Scratch directories with collision-free random names. Directories are
// not removed automatically; the caller owns cleanup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Create a uniquely named directory under the system temp dir.
pub fn tmp_dir() -> Result<PathBuf> {
    tmp_dir_in(&env::temp_dir())
}

/// Create a uniquely named directory under `base`, creating intermediate
/// directories as needed. Retries on name collision.
pub fn tmp_dir_in(base: &Path) -> Result<PathBuf> {
    loop {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let name = hex::encode(Sha256::digest(bytes));

        let dir = base.join(name);
        if dir.exists() {
            continue;
        }

        fs::create_dir_all(&dir)?;
        debug!("created scratch directory {}", dir.display());
        return Ok(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_dir_creates_directory() {
        let dir = tmp_dir().unwrap();
        assert!(dir.is_dir());
        assert!(dir.starts_with(env::temp_dir()));
        fs::remove_dir(&dir).unwrap();
    }

    #[test]
    fn test_tmp_dir_in_nests_under_base() {
        let base = tmp_dir().unwrap();
        let nested = tmp_dir_in(&base).unwrap();

        assert!(nested.is_dir());
        assert!(nested.starts_with(&base));

        fs::remove_dir(&nested).unwrap();
        fs::remove_dir(&base).unwrap();
    }

    #[test]
    fn test_tmp_dir_in_creates_missing_base() {
        let base = tmp_dir().unwrap();
        let deep = base.join("a").join("b");

        let dir = tmp_dir_in(&deep).unwrap();
        assert!(dir.is_dir());

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_names_are_distinct() {
        let first = tmp_dir().unwrap();
        let second = tmp_dir().unwrap();
        assert_ne!(first, second);

        fs::remove_dir(&first).unwrap();
        fs::remove_dir(&second).unwrap();
    }

    #[test]
    fn test_directory_is_empty() {
        let dir = tmp_dir().unwrap();
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        fs::remove_dir(&dir).unwrap();
    }
}
