//! The ACL store: accounts, nick/CID bans and address ranges.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info};

use super::address::BinaryAddress;
use super::credential::CredentialLevel;
use super::error::{AclError, AclResult, LoadError, LoadResult};
use super::parser::{parse_line, AclEntry};
use super::range::AddressRange;

/// An account entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccessEntry {
    /// Account name, compared case-insensitively.
    pub username: String,
    /// Shared secret. Accounts without one can never pass authentication.
    pub secret: Option<String>,
    /// Privilege level.
    pub level: CredentialLevel,
}

/// Number of entries in each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AclSummary {
    /// Accounts.
    pub users: usize,
    /// Denied nicks.
    pub denied_nicks: usize,
    /// Banned nicks.
    pub banned_nicks: usize,
    /// Banned CIDs.
    pub banned_cids: usize,
    /// Banned address ranges.
    pub banned_networks: usize,
    /// NAT override ranges.
    pub nat_override: usize,
}

impl std::fmt::Display for AclSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} users, {} denied nicks, {} banned nicks, {} banned CIDs, {} banned networks, {} NAT overrides",
            self.users,
            self.denied_nicks,
            self.banned_nicks,
            self.banned_cids,
            self.banned_networks,
            self.nat_override
        )
    }
}

/// Access control lists for a hub.
///
/// Name comparisons are ASCII case-insensitive and independent of locale.
/// Duplicates are allowed; lookups return the first inserted match.
///
/// The store does no locking of its own. Queries take `&self`; the two ban
/// operations take `&mut self`, so sharing between threads goes through an
/// owner such as [`AclHandle`](super::AclHandle).
#[derive(Debug, Clone, Default)]
pub struct AclStore {
    users: Vec<UserAccessEntry>,
    denied_nicks: Vec<String>,
    banned_nicks: Vec<String>,
    banned_cids: Vec<String>,
    banned_networks: Vec<AddressRange>,
    nat_override: Vec<AddressRange>,
}

impl AclStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from an ACL file.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read or any line is
    /// malformed. Nothing is returned for a partially parsed file.
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let reader = BufReader::new(File::open(path).map_err(io_err)?);
        let mut store = Self::new();
        for (index, raw) in reader.split(b'\n').enumerate() {
            let line_no = index + 1;
            let raw = raw.map_err(io_err)?;
            let line = std::str::from_utf8(&raw)
                .map_err(|_| LoadError::InvalidUtf8 { line: line_no })?;
            store.apply_line(line, line_no)?;
        }

        info!(path = %path.display(), "ACL loaded: {}", store.summary());
        Ok(store)
    }

    fn apply_line(&mut self, line: &str, line_no: usize) -> LoadResult<()> {
        if let Some(entry) = parse_line(line, line_no)? {
            self.insert(entry)
                .map_err(|_| LoadError::Allocation { line: line_no })?;
        }
        Ok(())
    }

    /// Append a parsed entry to its collection.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::Allocation`] if the collection cannot grow.
    pub fn insert(&mut self, entry: AclEntry) -> AclResult<()> {
        match entry {
            AclEntry::User(user) => push(&mut self.users, user),
            AclEntry::DeniedNick(nick) => push(&mut self.denied_nicks, nick),
            AclEntry::BannedNick(nick) => push(&mut self.banned_nicks, nick),
            AclEntry::BannedCid(cid) => push(&mut self.banned_cids, cid),
            AclEntry::BannedNetwork(range) => push(&mut self.banned_networks, range),
            AclEntry::NatOverride(range) => push(&mut self.nat_override, range),
        }
    }

    /// Find an account by name. The first matching entry wins.
    #[must_use]
    pub fn lookup_user(&self, name: &str) -> Option<&UserAccessEntry> {
        self.users
            .iter()
            .find(|user| user.username.eq_ignore_ascii_case(name))
    }

    /// Whether `nick` may not be used on the hub.
    #[must_use]
    pub fn is_denied_nick(&self, nick: &str) -> bool {
        contains_ignore_case(&self.denied_nicks, nick)
    }

    /// Whether `nick` is banned.
    #[must_use]
    pub fn is_banned_nick(&self, nick: &str) -> bool {
        contains_ignore_case(&self.banned_nicks, nick)
    }

    /// Whether `cid` is banned.
    #[must_use]
    pub fn is_banned_cid(&self, cid: &str) -> bool {
        contains_ignore_case(&self.banned_cids, cid)
    }

    /// Whether `address` falls in a banned range.
    ///
    /// A malformed address matches nothing. This keeps the check
    /// infallible on the connection path; callers that need to reject
    /// unparsable addresses must validate them first.
    #[must_use]
    pub fn is_banned_ip(&self, address: &str) -> bool {
        any_range_contains(&self.banned_networks, address)
    }

    /// Whether `address` falls in a NAT override range.
    ///
    /// A malformed address matches nothing, as with [`is_banned_ip`](Self::is_banned_ip).
    #[must_use]
    pub fn is_nat_override(&self, address: &str) -> bool {
        any_range_contains(&self.nat_override, address)
    }

    /// Ban a nick. Duplicates are appended as-is.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::Allocation`] if the collection cannot grow.
    pub fn ban_nick(&mut self, nick: &str) -> AclResult<()> {
        push(&mut self.banned_nicks, nick.to_string())?;
        debug!(nick, "ACL: banned nick");
        Ok(())
    }

    /// Ban a CID. Duplicates are appended as-is.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::Allocation`] if the collection cannot grow.
    pub fn ban_cid(&mut self, cid: &str) -> AclResult<()> {
        push(&mut self.banned_cids, cid.to_string())?;
        debug!(cid, "ACL: banned CID");
        Ok(())
    }

    /// Lift a nick ban. Not supported: always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`AclError::UnbanUnsupported`].
    pub fn unban_nick(&self, _nick: &str) -> AclResult<()> {
        Err(AclError::UnbanUnsupported {
            collection: "banned nicks",
        })
    }

    /// Lift a CID ban. Not supported: always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`AclError::UnbanUnsupported`].
    pub fn unban_cid(&self, _cid: &str) -> AclResult<()> {
        Err(AclError::UnbanUnsupported {
            collection: "banned CIDs",
        })
    }

    /// All accounts, in insertion order.
    #[must_use]
    pub fn users(&self) -> &[UserAccessEntry] {
        &self.users
    }

    /// All banned ranges, in insertion order.
    #[must_use]
    pub fn banned_networks(&self) -> &[AddressRange] {
        &self.banned_networks
    }

    /// All NAT override ranges, in insertion order.
    #[must_use]
    pub fn nat_override(&self) -> &[AddressRange] {
        &self.nat_override
    }

    /// Entry counts per collection.
    #[must_use]
    pub fn summary(&self) -> AclSummary {
        AclSummary {
            users: self.users.len(),
            denied_nicks: self.denied_nicks.len(),
            banned_nicks: self.banned_nicks.len(),
            banned_cids: self.banned_cids.len(),
            banned_networks: self.banned_networks.len(),
            nat_override: self.nat_override.len(),
        }
    }
}

/// Parse ACL file contents. Line numbers start at 1.
impl FromStr for AclStore {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut store = Self::new();
        for (index, line) in s.lines().enumerate() {
            store.apply_line(line, index + 1)?;
        }
        Ok(store)
    }
}

fn push<T>(list: &mut Vec<T>, item: T) -> AclResult<()> {
    list.try_reserve(1)?;
    list.push(item);
    Ok(())
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(value))
}

fn any_range_contains(ranges: &[AddressRange], address: &str) -> bool {
    match address.trim().parse::<BinaryAddress>() {
        Ok(addr) => ranges.iter().any(|range| range.contains(&addr)),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Hub accounts
user_admin  root:toor
user_reg    Bob:first
user_reg    bob:second
bot         stats

deny_nick   Hub-Security
ban_nick    troll
ban_cid     ABCDEFGHIJKLMNOPQRSTUVWXYZ234567ABCDEFG

deny_ip     10.0.0.0/24
deny_ip     2001:db8::/32
deny_ip     10.0.0.1-::1
nat_ip      192.168.0.0/16
";

    fn sample() -> AclStore {
        SAMPLE.parse().unwrap()
    }

    #[test]
    fn test_summary() {
        let store = sample();
        assert_eq!(
            store.summary(),
            AclSummary {
                users: 4,
                denied_nicks: 1,
                banned_nicks: 1,
                banned_cids: 1,
                banned_networks: 2,
                nat_override: 1,
            }
        );
    }

    #[test]
    fn test_lookup_user() {
        let store = sample();
        let root = store.lookup_user("ROOT").unwrap();
        assert_eq!(root.level, CredentialLevel::Admin);
        assert_eq!(root.secret.as_deref(), Some("toor"));

        let stats = store.lookup_user("stats").unwrap();
        assert_eq!(stats.level, CredentialLevel::Bot);
        assert_eq!(stats.secret, None);

        assert!(store.lookup_user("nobody").is_none());
    }

    #[test]
    fn test_first_match_shadows_later_duplicates() {
        let store = sample();
        let bob = store.lookup_user("BOB").unwrap();
        assert_eq!(bob.username, "Bob");
        assert_eq!(bob.secret.as_deref(), Some("first"));
    }

    #[test]
    fn test_nick_and_cid_checks() {
        let store = sample();
        assert!(store.is_denied_nick("hub-security"));
        assert!(!store.is_denied_nick("troll"));
        assert!(store.is_banned_nick("TROLL"));
        assert!(!store.is_banned_nick("Hub-Security"));
        assert!(store.is_banned_cid("abcdefghijklmnopqrstuvwxyz234567abcdefg"));
        assert!(!store.is_banned_cid("ABCDEFG"));
    }

    #[test]
    fn test_ip_checks() {
        let store = sample();
        assert!(store.is_banned_ip("10.0.0.5"));
        assert!(!store.is_banned_ip("10.0.1.5"));
        assert!(store.is_banned_ip("2001:db8::42"));
        assert!(!store.is_banned_ip("::1"));
        assert!(store.is_nat_override("192.168.44.2"));
        assert!(!store.is_nat_override("10.0.0.5"));
    }

    #[test]
    fn test_malformed_query_matches_nothing() {
        let store: AclStore = "deny_ip 0.0.0.0/0\ndeny_ip ::/0".parse().unwrap();
        assert!(store.is_banned_ip("1.2.3.4"));
        assert!(!store.is_banned_ip("not an address"));
        assert!(!store.is_banned_ip(""));
        assert!(!store.is_nat_override("999.1.1.1"));
    }

    #[test]
    fn test_ban_appends_duplicates() {
        let mut store = AclStore::new();
        store.ban_nick("spammer").unwrap();
        store.ban_nick("spammer").unwrap();
        store.ban_cid("CID1").unwrap();
        assert!(store.is_banned_nick("SPAMMER"));
        assert!(store.is_banned_cid("cid1"));
        assert_eq!(store.summary().banned_nicks, 2);
        assert_eq!(store.summary().banned_cids, 1);
    }

    #[test]
    fn test_unban_is_unsupported() {
        let store = sample();
        assert!(matches!(
            store.unban_nick("troll"),
            Err(AclError::UnbanUnsupported { .. })
        ));
        assert!(matches!(
            store.unban_cid("ABCDEFGHIJKLMNOPQRSTUVWXYZ234567ABCDEFG"),
            Err(AclError::UnbanUnsupported { .. })
        ));
        assert!(matches!(
            store.unban_nick("never-banned"),
            Err(AclError::UnbanUnsupported { .. })
        ));
        assert!(store.is_banned_nick("troll"));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = "user_reg alice\n\n# ok so far\nfrobnicate now\n"
            .parse::<AclStore>()
            .unwrap_err();
        assert!(matches!(err, LoadError::UnknownDirective { line: 4, .. }));
    }
}
