//! Credential levels assigned to hub accounts.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Privilege tier of an account.
///
/// Levels from [`None`](Self::None) to [`Admin`](Self::Admin) are ordered.
/// [`Link`](Self::Link) marks an inter-hub link and is not comparable with
/// any other level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CredentialLevel {
    /// No credentials.
    #[default]
    None,
    /// Registered bot.
    Bot,
    /// Guest account.
    Guest,
    /// Registered user.
    User,
    /// Operator.
    Operator,
    /// Super user.
    Super,
    /// Hub administrator.
    Admin,
    /// Inter-hub link.
    Link,
}

impl CredentialLevel {
    /// Stable name used in logs and protocol info fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bot => "bot",
            Self::Guest => "guest",
            Self::User => "user",
            Self::Operator => "operator",
            Self::Super => "super",
            Self::Admin => "admin",
            Self::Link => "link",
        }
    }

    /// Position in the privilege order, `None` for links.
    const fn rank(self) -> Option<u8> {
        match self {
            Self::None => Some(0),
            Self::Bot => Some(1),
            Self::Guest => Some(2),
            Self::User => Some(3),
            Self::Operator => Some(4),
            Self::Super => Some(5),
            Self::Admin => Some(6),
            Self::Link => None,
        }
    }

    /// Operator or above.
    #[must_use]
    pub fn is_operator(self) -> bool {
        self >= Self::Operator
    }

    /// Inter-hub link account.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Link)
    }
}

impl PartialOrd for CredentialLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }
}

impl fmt::Display for CredentialLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised credential level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown credential level: '{0}'")]
pub struct UnknownCredentialLevel(pub String);

impl FromStr for CredentialLevel {
    type Err = UnknownCredentialLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::None,
            Self::Bot,
            Self::Guest,
            Self::User,
            Self::Operator,
            Self::Super,
            Self::Admin,
            Self::Link,
        ]
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| UnknownCredentialLevel(s.to_string()))
    }
}
