//! Tiger/Base32 challenge-response authentication.
//!
//! The hub derives a challenge from values both ends of the handshake
//! already know, and the client proves knowledge of its secret by
//! returning `base32(tiger(secret || tiger_raw(challenge)))`. The secret is
//! never sent over the wire.

use data_encoding::BASE32_NOPAD;
use subtle::ConstantTimeEq;
use tiger::{Digest, Tiger};

use super::store::AclStore;

/// Size of a Tiger digest in bytes.
pub const TIGER_SIZE: usize = 24;

/// Length of a Base32-encoded Tiger digest (the protocol's CID length).
pub const MAX_CID_LEN: usize = 39;

/// Upper bound on `secret || raw challenge`.
///
/// The bound is inclusive: a secret of `MAX_AUTH_BUFFER - TIGER_SIZE` bytes
/// is accepted, one byte more is rejected.
pub const MAX_AUTH_BUFFER: usize = 1024;

/// Connection values the challenge is derived from.
///
/// The same triple must be supplied when generating the challenge and when
/// verifying the response for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionContext {
    /// When the connection was established, in seconds since the Unix epoch.
    pub connected_at: u64,
    /// Session ID assigned to the peer.
    pub sid: u32,
    /// Socket handle of the connection.
    pub handle: u64,
}

impl ConnectionContext {
    /// Create a connection context.
    #[must_use]
    pub const fn new(connected_at: u64, sid: u32, handle: u64) -> Self {
        Self {
            connected_at,
            sid,
            handle,
        }
    }
}

/// Generate the challenge for a connection.
///
/// Pure: the same context always yields the same challenge.
#[must_use]
pub fn generate_challenge(ctx: &ConnectionContext) -> String {
    let seed = format!("{}{}{}", ctx.connected_at, ctx.sid, ctx.handle);
    encode_digest(&Tiger::digest(seed.as_bytes()))
}

/// Compute the response a client holding `secret` sends for `challenge`.
///
/// Returns `None` if the challenge is not valid Base32 or if the secret is
/// too long to fit the authentication buffer.
#[must_use]
pub fn compute_response(secret: &str, challenge: &str) -> Option<String> {
    let raw = BASE32_NOPAD
        .decode(challenge.to_ascii_uppercase().as_bytes())
        .ok()?;
    let raw = raw.get(..TIGER_SIZE)?;

    let len = secret.len() + TIGER_SIZE;
    if len > MAX_AUTH_BUFFER {
        return None;
    }
    let mut buf = Vec::with_capacity(len);
    buf.extend_from_slice(secret.as_bytes());
    buf.extend_from_slice(raw);

    Some(encode_digest(&Tiger::digest(&buf)))
}

/// Check a client's response for `username` on the connection `ctx`.
///
/// Every failure (wrong length, unknown account, account without a secret,
/// oversized secret, mismatch) returns the same `false`. Once the length
/// check passes the same hashing work is done whether or not the account
/// exists.
#[must_use]
pub fn verify_password(
    store: &AclStore,
    username: &str,
    ctx: &ConnectionContext,
    response: &str,
) -> bool {
    if response.len() != MAX_CID_LEN {
        return false;
    }

    let secret = store
        .lookup_user(username)
        .and_then(|user| user.secret.as_deref());

    let challenge = generate_challenge(ctx);
    let Some(expected) = compute_response(secret.unwrap_or_default(), &challenge) else {
        return false;
    };

    let supplied = response.to_ascii_uppercase();
    let matches: bool = expected.as_bytes().ct_eq(supplied.as_bytes()).into();
    secret.is_some() & matches
}

fn encode_digest(digest: &[u8]) -> String {
    let mut encoded = BASE32_NOPAD.encode(digest);
    encoded.truncate(MAX_CID_LEN);
    encoded
}
