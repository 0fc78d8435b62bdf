use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const SESSION_FILE: &str = "session.json";

/// The authenticated user as returned by the login and register endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// `CONDUIT_HOME`, or `conduit` under the platform config directory.
pub fn session_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("CONDUIT_HOME") {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("conduit"))
        .ok_or_else(|| anyhow::anyhow!("could not determine a config directory; set CONDUIT_HOME"))
}

pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn at(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn load(&self) -> anyhow::Result<Option<User>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()));
            }
        };
        let user = serde_json::from_str(&text)
            .with_context(|| format!("corrupt session file {}", self.path.display()))?;
        Ok(Some(user))
    }

    pub fn save(&self, user: &User) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Removes the stored session. Returns false if there was none.
    pub fn clear(&self) -> anyhow::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> User {
        User {
            username: "jake".to_string(),
            email: "jake@jake.jake".to_string(),
            token: "jwt.token.here".to_string(),
            bio: None,
            image: None,
        }
    }

    #[test]
    fn test_load_missing_session() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Session::at(dir.path()).load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let session = Session::at(&dir.path().join("nested"));
        session.save(&user()).unwrap();
        assert_eq!(session.load().unwrap(), Some(user()));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let session = Session::at(dir.path());
        assert!(!session.clear().unwrap());
        session.save(&user()).unwrap();
        assert!(session.clear().unwrap());
        assert_eq!(session.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        let err = Session::at(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains("corrupt session file"));
    }
}
