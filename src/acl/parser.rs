//! ACL file line parser.
//!
//! Each non-empty line holds one directive followed by whitespace and a
//! payload. `#` starts a comment that runs to the end of the line.
//!
//! ```text
//! # accounts
//! user_admin  root:hunter2
//! user_reg    alice:secret
//! bot         stats
//!
//! # bans
//! deny_nick   Hub-Security
//! ban_cid     3NYVTXR4JKKEGSVLRY4UMTS3JY6JH2A2Z4IUCFY
//! deny_ip     10.0.0.0/8
//! deny_ip     192.168.1.10-192.168.1.20
//! nat_ip      172.16.0.0/12
//! ```

use tracing::{debug, warn};

use super::credential::CredentialLevel;
use super::error::{LoadError, LoadResult};
use super::range::AddressRange;
use super::store::UserAccessEntry;

/// What a directive keyword produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    User(CredentialLevel),
    DenyNick,
    BanNick,
    BanCid,
    DenyIp,
    NatIp,
}

const DIRECTIVES: &[(&str, Directive)] = &[
    ("bot", Directive::User(CredentialLevel::Bot)),
    ("user_admin", Directive::User(CredentialLevel::Admin)),
    ("user_super", Directive::User(CredentialLevel::Super)),
    ("user_op", Directive::User(CredentialLevel::Operator)),
    ("user_reg", Directive::User(CredentialLevel::User)),
    ("link", Directive::User(CredentialLevel::Link)),
    ("deny_nick", Directive::DenyNick),
    ("ban_nick", Directive::BanNick),
    ("ban_cid", Directive::BanCid),
    ("deny_ip", Directive::DenyIp),
    ("nat_ip", Directive::NatIp),
];

/// One parsed ACL entry, tagged with its target collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclEntry {
    /// Account entry.
    User(UserAccessEntry),
    /// Nick that may not be used.
    DeniedNick(String),
    /// Banned nick.
    BannedNick(String),
    /// Banned client ID.
    BannedCid(String),
    /// Banned address range.
    BannedNetwork(AddressRange),
    /// Address range trusted to report internal addresses.
    NatOverride(AddressRange),
}

/// Parse a single ACL line.
///
/// Returns `Ok(None)` for blank and comment-only lines, and for address
/// ranges that do not parse; those are logged and skipped without aborting
/// the load.
///
/// # Errors
///
/// Returns a [`LoadError`] carrying `line_no` for an unknown directive, a
/// directive with no payload, or a user directive without a username.
pub fn parse_line(line: &str, line_no: usize) -> LoadResult<Option<AclEntry>> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, payload) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));

    let Some(&(name, directive)) = DIRECTIVES.iter().find(|(name, _)| *name == keyword) else {
        return Err(LoadError::UnknownDirective {
            line: line_no,
            content: line.to_string(),
        });
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return Err(LoadError::EmptyPayload {
            line: line_no,
            directive: name,
        });
    }

    let entry = match directive {
        Directive::User(level) => AclEntry::User(parse_user(payload, level, line_no)?),
        Directive::DenyNick => AclEntry::DeniedNick(payload.to_string()),
        Directive::BanNick => AclEntry::BannedNick(payload.to_string()),
        Directive::BanCid => AclEntry::BannedCid(payload.to_string()),
        Directive::DenyIp | Directive::NatIp => match AddressRange::parse_spec(payload) {
            Ok(range) => {
                if range.low() > range.high() {
                    warn!(line = line_no, %range, "ACL: range is reversed and matches nothing");
                }
                if directive == Directive::DenyIp {
                    AclEntry::BannedNetwork(range)
                } else {
                    AclEntry::NatOverride(range)
                }
            },
            Err(e) => {
                warn!(line = line_no, directive = name, "ACL: ignoring '{}': {}", payload, e);
                return Ok(None);
            },
        },
    };

    debug!(line = line_no, directive = name, "ACL: {}", describe(&entry));
    Ok(Some(entry))
}

/// Split `name[:secret]` at the last colon.
fn parse_user(
    payload: &str,
    level: CredentialLevel,
    line_no: usize,
) -> LoadResult<UserAccessEntry> {
    let (username, secret) = match payload.rsplit_once(':') {
        Some((username, secret)) => (username.trim(), Some(secret.to_string())),
        None => (payload, None),
    };
    if username.is_empty() {
        return Err(LoadError::MissingUsername { line: line_no });
    }
    Ok(UserAccessEntry {
        username: username.to_string(),
        secret,
        level,
    })
}

fn describe(entry: &AclEntry) -> String {
    match entry {
        AclEntry::User(user) => format!("Added user '{}' ({})", user.username, user.level),
        AclEntry::DeniedNick(v) | AclEntry::BannedNick(v) | AclEntry::BannedCid(v) => {
            format!("Deny access for: '{v}'")
        },
        AclEntry::BannedNetwork(range) => format!("Deny access for: {range}"),
        AclEntry::NatOverride(range) => format!("NAT override for: {range}"),
    }
}
