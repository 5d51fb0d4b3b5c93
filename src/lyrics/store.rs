// src/lyrics/store.rs

//! Saving fetched lyrics to disk and loading them back.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::fs::FileSystem;

pub fn save(fs: &dyn FileSystem, path: &Path, lyrics: &str) -> Result<()> {
    debug!(path = %path.display(), bytes = lyrics.len(), "saving lyrics");
    fs.write(path, lyrics.as_bytes())
}

/// Load previously saved lyrics; `Ok(None)` when nothing was saved at
/// `path`. Invalid UTF-8 is replaced rather than rejected.
pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Option<String>> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let bytes = fs.read(path)?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn save_then_load() {
        let fs = MockFileSystem::new();
        let path = Path::new("/lyrics/artist - title.txt");
        save(&fs, path, "la la\nla").unwrap();
        assert_eq!(load(&fs, path).unwrap().as_deref(), Some("la la\nla"));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let fs = MockFileSystem::new();
        assert_eq!(load(&fs, Path::new("/nope")).unwrap(), None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let fs = MockFileSystem::new();
        fs.add_file("/bad", vec![b'o', b'k', 0xfe]);
        assert_eq!(load(&fs, Path::new("/bad")).unwrap().as_deref(), Some("ok\u{fffd}"));
    }
}
