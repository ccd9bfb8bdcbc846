//! # Hub Access Control
//!
//! Admission and authentication decisions for an ADC hub.
//!
//! ## Features
//!
//! - **Accounts**: credential levels from `bot` to `admin`, plus hub links
//! - **Nick/CID bans**: deny and ban lists, case-insensitive
//! - **Address ranges**: IPv4/IPv6 bans and NAT overrides as ranges or CIDR blocks
//! - **Challenge-response**: Tiger/Base32 password verification
//!
//! ## Usage
//!
//! ```
//! use r0n_hub_acl::acl::{AclHandle, ConnectionContext, compute_response};
//!
//! let acl = AclHandle::new();
//! acl.load_str("user_reg alice:secret\ndeny_ip 10.0.0.0/8").unwrap();
//!
//! assert!(acl.is_ip_banned("10.1.2.3"));
//!
//! let ctx = ConnectionContext::new(1_700_000_000, 1, 7);
//! let challenge = acl.generate_challenge(&ctx);
//! let response = compute_response("secret", &challenge).unwrap();
//! assert!(acl.verify_password("alice", &ctx, &response));
//! ```

mod address;
mod auth;
mod credential;
mod error;
mod handle;
mod parser;
mod range;
mod store;

pub use address::{AddressFamily, BinaryAddress};
pub use auth::{
    compute_response, generate_challenge, verify_password, ConnectionContext, MAX_AUTH_BUFFER,
    MAX_CID_LEN, TIGER_SIZE,
};
pub use credential::{CredentialLevel, UnknownCredentialLevel};
pub use error::{AclError, AclResult, LoadError, LoadResult};
pub use handle::{AclHandle, AclStats};
pub use parser::{parse_line, AclEntry};
pub use range::{AddressRange, RangeSpecError};
pub use store::{AclStore, AclSummary, UserAccessEntry};
