#![forbid(unsafe_code)]

//! Session context: the active role, owned by the composition root.
//!
//! The role is loaded once when the context is opened, cached for the life
//! of the context, and written through to a [`RoleStore`] on every change.
//! Closing the context hands the store back to the caller; there is no
//! process-wide role state.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing state | First launch / cleared | `role()` is `None` |
//! | Unknown role string | Older/newer client wrote it | Ignored, `role()` is `None` |
//! | Malformed state file | Truncated write | `SessionError::Corrupt` from `open` |
//! | I/O error | Permissions, disk | `SessionError::Io`; cached role unchanged |

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of the platform the user is acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Advocate,
}

impl Role {
    /// Stable lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Advocate => "advocate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role string that is neither `parent` nor `advocate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "parent" => Ok(Self::Parent),
            "advocate" => Ok(Self::Advocate),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Errors from session persistence.
#[derive(Debug)]
pub enum SessionError {
    /// The backing store could not be read or written.
    Io(io::Error),
    /// Persisted state exists but could not be decoded.
    Corrupt(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "session store I/O error: {err}"),
            Self::Corrupt(msg) => write!(f, "session state is corrupt: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(_) => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Persistence backend for the active role.
pub trait RoleStore {
    /// Load the persisted role, if any.
    fn load(&mut self) -> Result<Option<Role>, SessionError>;
    /// Persist `role` as the active role.
    fn save(&mut self, role: Role) -> Result<(), SessionError>;
    /// Remove any persisted role.
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// In-memory store (tests, ephemeral sessions).
#[derive(Debug, Clone, Default)]
pub struct MemoryRoleStore {
    role: Option<Role>,
}

impl MemoryRoleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a role already persisted.
    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role) }
    }

    /// The persisted role.
    #[must_use]
    pub fn persisted(&self) -> Option<Role> {
        self.role
    }
}

impl RoleStore for MemoryRoleStore {
    fn load(&mut self) -> Result<Option<Role>, SessionError> {
        Ok(self.role)
    }

    fn save(&mut self, role: Role) -> Result<(), SessionError> {
        self.role = Some(role);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.role = None;
        Ok(())
    }
}

/// On-disk layout of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(default, rename = "miephero_active_role")]
    active_role: Option<String>,
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FileRoleStore {
    path: PathBuf,
}

impl FileRoleStore {
    /// Store the session at `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, state: &PersistedSession) -> Result<(), SessionError> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|err| SessionError::Corrupt(err.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl RoleStore for FileRoleStore {
    fn load(&mut self) -> Result<Option<Role>, SessionError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state: PersistedSession = serde_json::from_slice(&bytes)
            .map_err(|err| SessionError::Corrupt(err.to_string()))?;
        let Some(raw) = state.active_role else {
            return Ok(None);
        };
        match raw.parse::<Role>() {
            Ok(role) => Ok(Some(role)),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring persisted role");
                Ok(None)
            }
        }
    }

    fn save(&mut self, role: Role) -> Result<(), SessionError> {
        self.write(&PersistedSession {
            active_role: Some(role.as_str().to_string()),
        })
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Lifecycle-scoped holder of the active role.
#[derive(Debug)]
pub struct SessionContext<S: RoleStore> {
    store: S,
    role: Option<Role>,
}

impl<S: RoleStore> SessionContext<S> {
    /// Open a session, loading the persisted role once.
    pub fn open(mut store: S) -> Result<Self, SessionError> {
        let role = store.load()?;
        tracing::info!(role = role.map(Role::as_str), "session opened");
        Ok(Self { store, role })
    }

    /// The active role, if one has been chosen.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Persist and activate `role`. The cache only changes once the store
    /// accepted the write.
    pub fn set_role(&mut self, role: Role) -> Result<(), SessionError> {
        self.store.save(role)?;
        self.role = Some(role);
        tracing::debug!(role = role.as_str(), "active role changed");
        Ok(())
    }

    /// Forget the active role.
    pub fn clear_role(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.role = None;
        tracing::debug!("active role cleared");
        Ok(())
    }

    /// Borrow the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear the session down and return the store.
    pub fn close(self) -> S {
        tracing::info!("session closed");
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn role_parses_known_values() {
        assert_eq!("parent".parse::<Role>(), Ok(Role::Parent));
        assert_eq!(" advocate ".parse::<Role>(), Ok(Role::Advocate));
        let err = "admin".parse::<Role>().expect_err("unknown role");
        assert_eq!(err.to_string(), "unknown role: admin");
    }

    #[test]
    fn memory_session_lifecycle() {
        let mut session = SessionContext::open(MemoryRoleStore::new()).expect("open");
        assert_eq!(session.role(), None);

        session.set_role(Role::Advocate).expect("set");
        assert_eq!(session.role(), Some(Role::Advocate));
        assert_eq!(session.store().persisted(), Some(Role::Advocate));

        session.clear_role().expect("clear");
        assert_eq!(session.role(), None);

        let store = session.close();
        assert_eq!(store.persisted(), None);
    }

    #[test]
    fn open_loads_persisted_role_once() {
        let session =
            SessionContext::open(MemoryRoleStore::with_role(Role::Parent)).expect("open");
        assert_eq!(session.role(), Some(Role::Parent));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.json");

        let mut session = SessionContext::open(FileRoleStore::new(&path)).expect("open");
        assert_eq!(session.role(), None);
        session.set_role(Role::Parent).expect("save");
        let store = session.close();

        let reopened = SessionContext::open(store).expect("reopen");
        assert_eq!(reopened.role(), Some(Role::Parent));

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("miephero_active_role"));
    }

    #[test]
    fn file_store_clear_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        let mut session = SessionContext::open(FileRoleStore::new(&path)).expect("open");
        session.set_role(Role::Advocate).expect("save");
        assert!(path.exists());
        session.clear_role().expect("clear");
        assert!(!path.exists());
        // Clearing twice is fine.
        session.clear_role().expect("clear again");
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").expect("write");
        let err = SessionContext::open(FileRoleStore::new(&path)).expect_err("corrupt");
        assert!(matches!(err, SessionError::Corrupt(_)));
    }

    #[traced_test]
    #[test]
    fn unknown_persisted_role_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, br#"{"miephero_active_role":"superuser"}"#).expect("write");
        let session = SessionContext::open(FileRoleStore::new(&path)).expect("open");
        assert_eq!(session.role(), None);
        assert!(logs_contain("ignoring persisted role"));
    }
}
