//! # R0N Hub ACL
//!
//! Access control and authentication for ADC peer-to-peer hubs.
//!
//! ## Features
//!
//! - Line-oriented ACL files with accounts, nick/CID bans and address ranges
//! - IPv4 and IPv6 range matching (explicit ranges and CIDR blocks)
//! - Tiger/Base32 challenge-response password verification
//! - Atomic publication of reloaded ACLs to concurrent readers
//!
//! ## Architecture
//!
//! The [`acl`] module holds the store, parser, address arithmetic and
//! authenticator. Connection-handling code owns an [`acl::AclHandle`] and
//! queries it synchronously for every admission decision. Network I/O and
//! the ADC wire protocol live outside this crate.

pub mod acl;
pub mod config;
pub mod logging;
