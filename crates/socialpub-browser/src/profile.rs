use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Chrome user-data directory backing one session.
///
/// Cookie-based sessions get a throwaway directory that is removed on drop,
/// so no state leaks between runs. Profile-based sessions reuse a directory
/// that already holds a logged-in browser state and is never deleted.
#[derive(Debug)]
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    /// Create a temporary profile that will be deleted on drop
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("socialpub-profile-")
            .tempdir()?;

        Ok(Self {
            path: temp_dir.keep(),
            is_temporary: true,
        })
    }

    /// Use a persistent profile at the given path, creating it if needed
    pub fn persistent(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "Profile directory {} does not exist; creating an empty one",
                path.display()
            );
            std::fs::create_dir_all(&path)?;
        } else if !path.is_dir() {
            return Err(Error::Browser(format!(
                "Profile path is not a directory: {}",
                path.display()
            )));
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    /// Root directory for named profiles (`~/.socialpub/profiles`)
    pub fn profiles_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Browser("Could not determine home directory".to_string()))?;
        Ok(home.join(".socialpub").join("profiles"))
    }

    /// Resolve a profile name to its directory under [`Self::profiles_dir`]
    pub fn named_path(name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Browser(format!("Invalid profile name: '{}'", name)));
        }
        Ok(Self::profiles_dir()?.join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
