//! Where the signed-in session lives between calls (and between runs).

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::SupabaseResult;
use crate::models::StoredSession;

pub trait SessionStore: Send + Sync {
    fn load(&self) -> SupabaseResult<Option<StoredSession>>;
    fn save(&self, session: &StoredSession) -> SupabaseResult<()>;
    fn clear(&self) -> SupabaseResult<()>;
}

/// Session kept for the lifetime of the process only.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SupabaseResult<Option<StoredSession>> {
        Ok(lock(&self.session).clone())
    }

    fn save(&self, session: &StoredSession) -> SupabaseResult<()> {
        *lock(&self.session) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> SupabaseResult<()> {
        *lock(&self.session) = None;
        Ok(())
    }
}

/// Session persisted as a JSON file.
///
/// A missing file means no session. On unix the file is readable by its owner
/// only, and every save replaces it atomically.
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the session file that a save is staged in.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

// Owner-only on unix. A leftover staging file is removed first so its old
// permissions are not inherited.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SupabaseResult<Option<StoredSession>> {
        let _guard = lock(&self.write_lock);
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &StoredSession) -> SupabaseResult<()> {
        let _guard = lock(&self.write_lock);
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_vec_pretty(session)?;
        let temp_path = self.temp_path();
        if let Err(e) = write_private(&temp_path, &contents)
            .and_then(|()| fs::rename(&temp_path, &self.path))
        {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> SupabaseResult<()> {
        let _guard = lock(&self.write_lock);
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// A poisoned lock only means another thread panicked mid-update; the stored
// value is still a whole session or none.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn session() -> StoredSession {
        StoredSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
            user: User {
                id: Uuid::new_v4(),
                phone: None,
            },
        }
    }

    #[test]
    fn test_memory_store_save_and_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().unwrap(), None);

        let session = session();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let session = session();

        FileSessionStore::new(&path).save(&session).unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(session));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // Pre-existing world-readable file gets replaced, not reused
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSessionStore::new(&path);
        let session = session();
        store.save(&session).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn test_file_store_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);

        store.save(&session()).unwrap();
        store.save(&session()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["session.json".to_string()]);
    }

    #[test]
    fn test_file_store_missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(FileSessionStore::new(&path).load().is_err());
    }
}
