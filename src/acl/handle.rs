//! Shared, atomically published ACL for connection handlers.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::auth::{self, ConnectionContext};
use super::error::{AclResult, LoadResult};
use super::store::{AclStore, AclSummary, UserAccessEntry};
use crate::config::AclConfig;

/// Counters for ACL decisions.
#[derive(Debug, Default)]
pub struct AclStats {
    /// Successful loads published.
    pub loads: AtomicU64,
    /// Load attempts that failed.
    pub load_failures: AtomicU64,
    /// Address checks that matched a banned range.
    pub ip_denials: AtomicU64,
    /// Nick or CID checks that matched a ban or deny entry.
    pub name_denials: AtomicU64,
    /// Bans added at runtime.
    pub bans: AtomicU64,
    /// Successful password verifications.
    pub auth_successes: AtomicU64,
    /// Failed password verifications.
    pub auth_failures: AtomicU64,
}

impl AclStats {
    /// Create new stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_denial(counter: &AtomicU64, denied: bool) -> bool {
        if denied {
            Self::bump(counter);
        }
        denied
    }
}

/// Owner of the published ACL.
///
/// Readers take a cheap [`snapshot`](Self::snapshot) and query it without
/// holding any lock. Loads build a scratch store and swap it in only when
/// the whole file parsed. Bans copy the published store on write, so a
/// snapshot taken earlier never changes underneath its reader.
#[derive(Debug, Clone, Default)]
pub struct AclHandle {
    current: Arc<RwLock<Arc<AclStore>>>,
    stats: Arc<AclStats>,
}

impl AclHandle {
    /// Create a handle publishing an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle publishing `store`.
    #[must_use]
    pub fn with_store(store: AclStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(store))),
            stats: Arc::new(AclStats::new()),
        }
    }

    /// Create a handle from hub configuration.
    ///
    /// Without a configured file the handle starts empty. If the load fails
    /// and the file is not `required`, the handle also starts empty.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`](super::LoadError) of a required file.
    pub fn from_config(config: &AclConfig) -> LoadResult<Self> {
        let handle = Self::new();
        let Some(path) = config.path() else {
            info!("No ACL file configured, starting with an empty ACL");
            return Ok(handle);
        };
        match handle.load(path) {
            Err(e) if config.required => Err(e),
            _ => Ok(handle),
        }
    }

    /// Load an ACL file and publish it.
    ///
    /// On failure the previously published store stays in place.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`](super::LoadError) that aborted the load.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> LoadResult<AclSummary> {
        let result = AclStore::load(path);
        self.publish_result(result)
    }

    /// Parse ACL text and publish it.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`](super::LoadError) that aborted the parse.
    pub fn load_str(&self, content: &str) -> LoadResult<AclSummary> {
        self.publish_result(content.parse())
    }

    fn publish_result(&self, result: LoadResult<AclStore>) -> LoadResult<AclSummary> {
        match result {
            Ok(store) => {
                let summary = store.summary();
                self.publish(store);
                AclStats::bump(&self.stats.loads);
                Ok(summary)
            },
            Err(e) => {
                AclStats::bump(&self.stats.load_failures);
                warn!("ACL load failed, keeping previous ACL: {}", e);
                Err(e)
            },
        }
    }

    /// Replace the published store.
    pub fn publish(&self, store: AclStore) {
        let summary = store.summary();
        *self.write() = Arc::new(store);
        info!("ACL published: {}", summary);
    }

    /// Publish an empty store, releasing all entries once outstanding
    /// snapshots are dropped.
    pub fn shutdown(&self) {
        *self.write() = Arc::new(AclStore::new());
        debug!("ACL shut down");
    }

    /// The currently published store.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AclStore> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Arc<AclStore>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Statistics.
    #[must_use]
    pub fn stats(&self) -> &AclStats {
        &self.stats
    }

    /// Find an account by name.
    #[must_use]
    pub fn lookup_user(&self, name: &str) -> Option<UserAccessEntry> {
        self.snapshot().lookup_user(name).cloned()
    }

    /// Whether `nick` is denied or banned.
    #[must_use]
    pub fn is_nick_blocked(&self, nick: &str) -> bool {
        let store = self.snapshot();
        let blocked = store.is_denied_nick(nick) || store.is_banned_nick(nick);
        AclStats::record_denial(&self.stats.name_denials, blocked)
    }

    /// Whether `cid` is banned.
    #[must_use]
    pub fn is_cid_banned(&self, cid: &str) -> bool {
        let banned = self.snapshot().is_banned_cid(cid);
        AclStats::record_denial(&self.stats.name_denials, banned)
    }

    /// Whether `address` is banned. Malformed addresses are not.
    #[must_use]
    pub fn is_ip_banned(&self, address: &str) -> bool {
        let banned = self.snapshot().is_banned_ip(address);
        AclStats::record_denial(&self.stats.ip_denials, banned)
    }

    /// Whether `address` is in a NAT override range.
    #[must_use]
    pub fn is_ip_nat_override(&self, address: &str) -> bool {
        self.snapshot().is_nat_override(address)
    }

    /// Ban a nick on the published store.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::Allocation`](super::AclError::Allocation) if the
    /// ban list cannot grow.
    pub fn ban_nick(&self, nick: &str) -> AclResult<()> {
        Arc::make_mut(&mut *self.write()).ban_nick(nick)?;
        AclStats::bump(&self.stats.bans);
        info!(nick, "ACL: nick banned");
        Ok(())
    }

    /// Ban a CID on the published store.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::Allocation`](super::AclError::Allocation) if the
    /// ban list cannot grow.
    pub fn ban_cid(&self, cid: &str) -> AclResult<()> {
        Arc::make_mut(&mut *self.write()).ban_cid(cid)?;
        AclStats::bump(&self.stats.bans);
        info!(cid, "ACL: CID banned");
        Ok(())
    }

    /// Lift a nick ban. Not supported: always fails without touching the
    /// published store.
    ///
    /// # Errors
    ///
    /// Always returns [`AclError::UnbanUnsupported`](super::AclError::UnbanUnsupported).
    pub fn unban_nick(&self, nick: &str) -> AclResult<()> {
        self.snapshot().unban_nick(nick)
    }

    /// Lift a CID ban. Not supported: always fails without touching the
    /// published store.
    ///
    /// # Errors
    ///
    /// Always returns [`AclError::UnbanUnsupported`](super::AclError::UnbanUnsupported).
    pub fn unban_cid(&self, cid: &str) -> AclResult<()> {
        self.snapshot().unban_cid(cid)
    }

    /// Challenge for a connection.
    #[must_use]
    pub fn generate_challenge(&self, ctx: &ConnectionContext) -> String {
        auth::generate_challenge(ctx)
    }

    /// Verify a client's response against the published store.
    #[must_use]
    pub fn verify_password(&self, username: &str, ctx: &ConnectionContext, response: &str) -> bool {
        let ok = auth::verify_password(&self.snapshot(), username, ctx, response);
        if ok {
            AclStats::bump(&self.stats.auth_successes);
        } else {
            AclStats::bump(&self.stats.auth_failures);
        }
        ok
    }
}
