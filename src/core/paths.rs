use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base textpatch config directory (~/.config/textpatch/ on all platforms)
pub fn textpatch() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("textpatch"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("textpatch"))
    }
}

/// Global textpatch.json config file path
pub fn textpatch_json() -> Result<PathBuf> {
    Ok(textpatch()?.join("textpatch.json"))
}
