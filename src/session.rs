//! Server-side login state.
//!
//! Cookies and session lifecycles are handled by `tower-sessions`; this
//! module supplies the filesystem store, one JSON file per session id under
//! `SESSION_DIR`, and the layer configuration the router uses.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::{fs, io::AsyncWriteExt, task::JoinHandle};
use tower_sessions::{
    session::{Id, Record},
    session_store, Expiry, SessionManagerLayer, SessionStore,
};
use tracing::{debug, info, warn};

/// Session key holding the logged-in user's id.
pub const USER_ID_KEY: &str = "user_id";

pub const COOKIE_NAME: &str = "bookreview_session";

/// Non-permanent cookie sessions: the cookie dies with the browser session.
pub fn session_layer<S>(store: S) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(COOKIE_NAME)
        .with_secure(false)
        .with_expiry(Expiry::OnSessionEnd)
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub async fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create session dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &Id) -> PathBuf {
        // Id displays as url-safe base64, fine as a file name
        self.dir.join(format!("{id}.json"))
    }

    /// Remove expired and unreadable session files. Returns how many went.
    pub async fn delete_expired(&self) -> anyhow::Result<usize> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("read session dir {}", self.dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let stale = match fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice::<Record>(&bytes) {
                    Ok(record) => is_expired(&record),
                    Err(_) => true,
                },
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e).context("read session file"),
            };
            if stale && remove_if_present(&path).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn is_expired(record: &Record) -> bool {
    record.expiry_date <= OffsetDateTime::now_utc()
}

async fn remove_if_present(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn backend(e: std::io::Error) -> session_store::Error {
    session_store::Error::Backend(e.to_string())
}

fn encode(record: &Record) -> session_store::Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| session_store::Error::Encode(e.to_string()))
}

#[async_trait]
impl SessionStore for FileSessionStore {
    /// Claims a file for a fresh id. An id that is already on disk belongs to
    /// someone else, so a new one is drawn instead of overwriting it.
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            let path = self.path_for(&record.id);
            let opened = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            match opened {
                Ok(mut file) => {
                    file.write_all(&encode(record)?).await.map_err(backend)?;
                    file.flush().await.map_err(backend)?;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("session id collision, drawing another");
                    record.id = Id::default();
                }
                Err(e) => return Err(backend(e)),
            }
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let bytes = encode(record)?;
        let path = self.path_for(&record.id);
        // private temp file per write, then an atomic rename over the target
        let tmp = self.dir.join(format!("{}.{}.tmp", record.id, Id::default()));
        if let Err(e) = fs::write(&tmp, bytes).await {
            let _ = remove_if_present(&tmp).await;
            return Err(backend(e));
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = remove_if_present(&tmp).await;
            return Err(backend(e));
        }
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let path = self.path_for(session_id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(backend(e)),
        };
        let record: Record = serde_json::from_slice(&bytes)
            .map_err(|e| session_store::Error::Decode(e.to_string()))?;
        if is_expired(&record) {
            debug!(path = %path.display(), "dropping expired session");
            remove_if_present(&path).await.map_err(backend)?;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        remove_if_present(&self.path_for(session_id))
            .await
            .map_err(backend)?;
        Ok(())
    }
}

/// Periodically clear out sessions whose cookie is long gone.
pub fn spawn_expired_sweep(store: FileSessionStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match store.delete_expired().await {
                Ok(0) => {}
                Ok(n) => info!(removed = n, "swept expired sessions"),
                Err(e) => warn!(error = %e, "session sweep failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(expires_in: time::Duration) -> Record {
        let mut data = HashMap::new();
        data.insert(USER_ID_KEY.to_string(), serde_json::json!(42));
        Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).await.unwrap();
        let rec = record(time::Duration::hours(1));

        store.save(&rec).await.unwrap();
        let loaded = store.load(&rec.id).await.unwrap().expect("saved session");
        assert_eq!(loaded.data.get(USER_ID_KEY), Some(&serde_json::json!(42)));

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
        // deleting twice is fine
        store.delete(&rec.id).await.unwrap();
    }

    #[tokio::test]
    async fn create_never_takes_over_an_existing_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).await.unwrap();
        let alice = record(time::Duration::hours(1));
        store.save(&alice).await.unwrap();

        let mut bob = record(time::Duration::hours(1));
        bob.id = alice.id;
        bob.data.insert(USER_ID_KEY.to_string(), serde_json::json!(7));
        store.create(&mut bob).await.unwrap();

        assert_ne!(bob.id, alice.id);
        let kept = store.load(&alice.id).await.unwrap().expect("alice still there");
        assert_eq!(kept.data.get(USER_ID_KEY), Some(&serde_json::json!(42)));
        let fresh = store.load(&bob.id).await.unwrap().expect("bob stored");
        assert_eq!(fresh.id, bob.id);
        assert_eq!(fresh.data.get(USER_ID_KEY), Some(&serde_json::json!(7)));
    }

    #[tokio::test]
    async fn concurrent_saves_of_one_session_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).await.unwrap();
        let rec = record(time::Duration::hours(1));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let rec = rec.clone();
            handles.push(tokio::spawn(async move { store.save(&rec).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(store.load(&rec.id).await.unwrap().is_some());
        let leftovers = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().and_then(|x| x.to_str()) != Some("json"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn unknown_id_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).await.unwrap();
        assert!(store.load(&Id::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_is_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path()).await.unwrap();
        let rec = record(time::Duration::seconds(-5));
        store.save(&rec).await.unwrap();

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert!(!store.path_for(&rec.id).exists());
    }

    #[tokio::test]
    async fn sweep_removes_expired_and_garbage_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested")).await.unwrap();
        let live = record(time::Duration::hours(1));
        let dead = record(time::Duration::seconds(-1));
        store.save(&live).await.unwrap();
        store.save(&dead).await.unwrap();
        std::fs::write(store.dir().join("junk.json"), b"not json").unwrap();
        std::fs::write(store.dir().join("notes.txt"), b"left alone").unwrap();

        assert_eq!(store.delete_expired().await.unwrap(), 2);
        assert!(store.load(&live.id).await.unwrap().is_some());
        assert!(store.dir().join("notes.txt").exists());
    }
}
