use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use super::Editor;

/// Sessions untouched for this long are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct SessionEntry {
    editor: Arc<Mutex<Editor>>,
    last_access: Instant,
}

/// Live editor sessions keyed by session id.
///
/// Each editor sits behind its own mutex; holding it for a whole event keeps
/// one session's events strictly sequential while sessions run independently.
/// Sessions idle for longer than the store's timeout are evicted on the next
/// `create`/`get` or by [`SessionStore::evict_idle`].
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Start a fresh, empty session
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        Self::evict_from(&mut sessions, self.idle_timeout);
        sessions.insert(
            id,
            SessionEntry {
                editor: Arc::new(Mutex::new(Editor::new())),
                last_access: Instant::now(),
            },
        );
        id
    }

    /// Look up a session and mark it as used
    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Editor>>> {
        let mut sessions = self.sessions.write().await;
        Self::evict_from(&mut sessions, self.idle_timeout);
        sessions.get_mut(id).map(|entry| {
            entry.last_access = Instant::now();
            Arc::clone(&entry.editor)
        })
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every session idle past the timeout; returns how many went
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        Self::evict_from(&mut sessions, self.idle_timeout)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn evict_from(sessions: &mut HashMap<Uuid, SessionEntry>, idle_timeout: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() <= idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "idle sessions evicted");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let id = store.create().await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(&id).await.is_some());

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a, b);

        let editor_a = store.get(&a).await.unwrap();
        editor_a
            .lock()
            .await
            .handle(crate::editor::EditorEvent::Upload {
                file_name: "a.csv".to_string(),
                bytes: b"x\n1\n".to_vec(),
            })
            .unwrap();

        let editor_b = store.get(&b).await.unwrap();
        assert!(editor_b.lock().await.pending().is_none());
    }

    #[tokio::test]
    async fn test_idle_session_is_evicted() {
        let store = SessionStore::with_idle_timeout(Duration::from_millis(50));
        let idle = store.create().await;
        tokio::time::sleep(Duration::from_millis(120)).await;

        let fresh = store.create().await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(&idle).await.is_none());
        assert!(store.get(&fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_access_keeps_session_alive() {
        let store = SessionStore::with_idle_timeout(Duration::from_millis(1000));
        let id = store.create().await;
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(400)).await;
            assert!(store.get(&id).await.is_some());
        }
        assert_eq!(store.evict_idle().await, 0);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(store.evict_idle().await, 1);
        assert!(store.is_empty().await);
    }
}
