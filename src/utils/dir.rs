use std::{env, path::PathBuf};

use anyhow::{Context, Result};

/// Resolves and creates the application data directory. Records and logs
/// both live under it.
pub fn default_data_dir() -> Result<PathBuf> {
    #[cfg(windows)]
    let mut path = PathBuf::from(
        env::var("APPDATA").context("APPDATA should be present on Windows")?,
    );

    #[cfg(not(windows))]
    let mut path = match env::var("XDG_STATE_HOME") {
        Ok(v) => PathBuf::from(v),
        Err(_) => {
            let home = env::var("HOME").context("Couldn't find neither XDG_STATE_HOME nor HOME")?;
            PathBuf::from(home).join(".local/state")
        }
    };

    path.push("worklog");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}
