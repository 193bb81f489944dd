//! Bearer-token persistence scopes and stores.

use core::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// The two persistence lifetimes available for the bearer credential.
///
/// A login or signup writes the returned token into exactly one scope,
/// selected by the operation's `remember` flag. Writing one scope never
/// clears the other; when both hold a token, readers resolve the conflict
/// through the fixed priority documented on [`TokenStore::read`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenScope {
    /// Short-lived credential, dropped when the owning process ends.
    ///
    /// This is the scope the HTTP wrapper deletes when the API answers
    /// with `401 Unauthorized`.
    Session,
    /// Long-lived credential, expected to survive process restarts.
    Remembered,
}

/// Storage contract for the bearer token.
///
/// Implementations back the two [`TokenScope`]s however they like; the
/// [`Luxora`](crate::Luxora) client only ever talks to this trait. The
/// client reads lazily, once per outgoing request, so an external writer
/// (another process sharing a [`FileTokenStore`] path, for instance) is
/// picked up on the next request — last writer wins.
pub trait TokenStore: Send + Sync {
    /// Writes `token` into the given scope.
    ///
    /// The opposite scope is intentionally left untouched, even when it
    /// already holds a token from an earlier login with a different
    /// `remember` choice.
    fn persist(&self, scope: TokenScope, token: &str);

    /// Reads the token held by the given scope, if any.
    fn read_scope(&self, scope: TokenScope) -> Option<String>;

    /// Deletes the token held by the given scope, if any.
    fn clear(&self, scope: TokenScope);

    /// Reads the token used for request header injection.
    ///
    /// Both scopes are checked in a fixed priority order: the session
    /// scope first, then the remembered scope.
    fn read(&self) -> Option<String> {
        self.read_scope(TokenScope::Session)
            .or_else(|| self.read_scope(TokenScope::Remembered))
    }

    /// Deletes the tokens of both scopes.
    fn clear_all(&self) {
        self.clear(TokenScope::Session);
        self.clear(TokenScope::Remembered);
    }
}

/// A [`TokenStore`] keeping both scopes in process memory.
///
/// Nothing survives the process; the "remembered" scope only outlives the
/// "session" scope conceptually. This is the default store of
/// [`Luxora::new`](crate::Luxora::new) and the store of choice in tests.
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
/// use luxora_rs::{Luxora, MemoryTokenStore, TokenScope, TokenStore};
///
/// let store = Arc::new(MemoryTokenStore::new());
/// let client = Luxora::new("http://localhost:4000").with_token_store(store.clone());
///
/// store.persist(TokenScope::Remembered, "token-from-last-run");
/// assert_eq!(store.read().as_deref(), Some("token-from-last-run"));
/// ```
#[derive(Default)]
pub struct MemoryTokenStore {
    session: RwLock<Option<String>>,
    remembered: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, scope: TokenScope) -> &RwLock<Option<String>> {
        match scope {
            TokenScope::Session => &self.session,
            TokenScope::Remembered => &self.remembered,
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn persist(&self, scope: TokenScope, token: &str) {
        *self
            .cell(scope)
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn read_scope(&self, scope: TokenScope) -> Option<String> {
        self.cell(scope)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self, scope: TokenScope) {
        *self
            .cell(scope)
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field(
                "session",
                &self.read_scope(TokenScope::Session).map(|_| "***REDACTED***"),
            )
            .field(
                "remembered",
                &self
                    .read_scope(TokenScope::Remembered)
                    .map(|_| "***REDACTED***"),
            )
            .finish()
    }
}

/// A [`TokenStore`] whose remembered scope is a file on disk.
///
/// The remembered token is written as plain text to the configured path and
/// therefore survives process restarts; the session token lives in memory
/// and dies with the process. This mirrors the two persistence lifetimes the
/// Luxora web client uses.
///
/// File I/O is best-effort: a failed write or delete is logged through
/// [`tracing`] and otherwise swallowed, so authentication flows (logout in
/// particular) can never be blocked by the storage layer.
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
/// use luxora_rs::{FileTokenStore, Luxora};
///
/// let store = Arc::new(FileTokenStore::new("~/.config/luxora/token"));
/// let client = Luxora::new("https://api.luxora.app").with_token_store(store);
/// ```
pub struct FileTokenStore {
    path: PathBuf,
    session: RwLock<Option<String>>,
}

impl FileTokenStore {
    /// Creates a store persisting the remembered scope at `path`.
    ///
    /// The file (and any missing parent directory) is only created when a
    /// remembered token is first persisted.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            session: RwLock::new(None),
        }
    }

    /// Returns the path backing the remembered scope.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn persist(&self, scope: TokenScope, token: &str) {
        match scope {
            TokenScope::Session => {
                *self
                    .session
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
            }
            TokenScope::Remembered => {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        if let Err(error) = fs::create_dir_all(parent) {
                            tracing::warn!(
                                path = %self.path.display(),
                                %error,
                                "could not create token directory"
                            );
                            return;
                        }
                    }
                }

                if let Err(error) = fs::write(&self.path, token) {
                    tracing::warn!(
                        path = %self.path.display(),
                        %error,
                        "could not persist remembered token"
                    );
                }
            }
        }
    }

    fn read_scope(&self, scope: TokenScope) -> Option<String> {
        match scope {
            TokenScope::Session => self
                .session
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            TokenScope::Remembered => fs::read_to_string(&self.path)
                .ok()
                .map(|contents| contents.trim().to_string())
                .filter(|token| !token.is_empty()),
        }
    }

    fn clear(&self, scope: TokenScope) {
        match scope {
            TokenScope::Session => {
                *self
                    .session
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = None;
            }
            TokenScope::Remembered => {
                if let Err(error) = fs::remove_file(&self.path) {
                    if error.kind() != ErrorKind::NotFound {
                        tracing::warn!(
                            path = %self.path.display(),
                            %error,
                            "could not delete remembered token"
                        );
                    }
                }
            }
        }
    }
}

impl fmt::Debug for FileTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTokenStore")
            .field("path", &self.path)
            .field(
                "session",
                &self.read_scope(TokenScope::Session).map(|_| "***REDACTED***"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_token_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("luxora-token-{}-{tag}", std::process::id()))
    }

    #[test]
    fn read_is_none_on_empty_store() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.read(), None);
        assert_eq!(store.read_scope(TokenScope::Session), None);
        assert_eq!(store.read_scope(TokenScope::Remembered), None);
    }

    #[test]
    fn read_prefers_session_scope() {
        let store = MemoryTokenStore::new();
        store.persist(TokenScope::Remembered, "long-lived");
        store.persist(TokenScope::Session, "short-lived");
        assert_eq!(store.read().as_deref(), Some("short-lived"));
    }

    #[test]
    fn read_falls_back_to_remembered_scope() {
        let store = MemoryTokenStore::new();
        store.persist(TokenScope::Remembered, "long-lived");
        assert_eq!(store.read().as_deref(), Some("long-lived"));
    }

    #[test]
    fn persist_leaves_other_scope_untouched() {
        // A scope switch between two logins keeps the first token around;
        // readers resolve the conflict by priority.
        let store = MemoryTokenStore::new();
        store.persist(TokenScope::Session, "first-login");
        store.persist(TokenScope::Remembered, "second-login");
        assert_eq!(
            store.read_scope(TokenScope::Session).as_deref(),
            Some("first-login")
        );
        assert_eq!(
            store.read_scope(TokenScope::Remembered).as_deref(),
            Some("second-login")
        );
        assert_eq!(store.read().as_deref(), Some("first-login"));
    }

    #[test]
    fn clear_removes_only_the_named_scope() {
        let store = MemoryTokenStore::new();
        store.persist(TokenScope::Session, "short-lived");
        store.persist(TokenScope::Remembered, "long-lived");
        store.clear(TokenScope::Session);
        assert_eq!(store.read_scope(TokenScope::Session), None);
        assert_eq!(store.read().as_deref(), Some("long-lived"));
    }

    #[test]
    fn clear_all_empties_both_scopes() {
        let store = MemoryTokenStore::new();
        store.persist(TokenScope::Session, "short-lived");
        store.persist(TokenScope::Remembered, "long-lived");
        store.clear_all();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let store = MemoryTokenStore::new();
        store.persist(TokenScope::Session, "super-secret");
        let debug = format!("{store:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn file_store_remembered_scope_round_trips() {
        let path = temp_token_path("round-trip");
        let store = FileTokenStore::new(&path);
        store.persist(TokenScope::Remembered, "persisted");
        assert_eq!(
            store.read_scope(TokenScope::Remembered).as_deref(),
            Some("persisted")
        );

        // A second store over the same path sees the token, like a fresh
        // process would after a restart.
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.read().as_deref(), Some("persisted"));

        store.clear(TokenScope::Remembered);
        assert_eq!(store.read_scope(TokenScope::Remembered), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_store_session_scope_never_touches_disk() {
        let path = temp_token_path("session-only");
        let store = FileTokenStore::new(&path);
        store.persist(TokenScope::Session, "ephemeral");
        assert!(!path.exists());
        assert_eq!(store.read().as_deref(), Some("ephemeral"));
        store.clear(TokenScope::Session);
        assert_eq!(store.read(), None);
    }

    #[test]
    fn file_store_clear_tolerates_missing_file() {
        let store = FileTokenStore::new(temp_token_path("missing"));
        store.clear(TokenScope::Remembered);
        assert_eq!(store.read_scope(TokenScope::Remembered), None);
    }
}
