//! Integration tests for loading ACL files and querying the published ACL.

use r0n_hub_acl::acl::{AclError, AclHandle, AclStore, CredentialLevel, LoadError};
use r0n_hub_acl::config::ConfigLoader;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const USERS_CONF: &str = "\
# Sample hub ACL
user_admin  root:toor
user_op     Bob:first
user_reg    bob:second       # shadowed by the entry above
bot         stats
link        otherhub:linksecret

deny_nick   Hub-Security
ban_nick    troll
ban_cid     UGOGKXAZ3VEDPRHWOU7MBZOQ3QHNIIOB6JE2F4A

deny_ip     192.168.1.0/24
deny_ip     10.0.0.1-10.0.0.10
deny_ip     10.0.0.1-::1
deny_ip     2001:db8::/48
nat_ip      172.16.0.0/12
";

fn write_acl(content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.conf");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

fn load(path: &Path) -> AclHandle {
    let handle = AclHandle::new();
    handle.load(path).unwrap();
    handle
}

#[test]
fn test_load_sample_file() {
    let (_dir, path) = write_acl(USERS_CONF);
    let summary = AclHandle::new().load(&path).unwrap();

    assert_eq!(summary.users, 5);
    assert_eq!(summary.denied_nicks, 1);
    assert_eq!(summary.banned_nicks, 1);
    assert_eq!(summary.banned_cids, 1);
    // The mixed-family range is skipped without failing the load
    assert_eq!(summary.banned_networks, 3);
    assert_eq!(summary.nat_override, 1);
}

#[test]
fn test_cidr_and_explicit_ranges() {
    let (_dir, path) = write_acl(USERS_CONF);
    let store = AclStore::load(&path).unwrap();

    let networks = store.banned_networks();
    assert_eq!(networks[0].low().to_string(), "192.168.1.0");
    assert_eq!(networks[0].high().to_string(), "192.168.1.255");
    assert_eq!(networks[1].low().to_string(), "10.0.0.1");
    assert_eq!(networks[1].high().to_string(), "10.0.0.10");
}

#[test]
fn test_admission_queries() {
    let (_dir, path) = write_acl(USERS_CONF);
    let acl = load(&path);

    assert!(acl.is_ip_banned("192.168.1.77"));
    assert!(!acl.is_ip_banned("192.168.2.1"));
    assert!(acl.is_ip_banned("10.0.0.10"));
    assert!(!acl.is_ip_banned("10.0.0.11"));
    assert!(acl.is_ip_banned("2001:db8:0:ffff::1"));
    assert!(!acl.is_ip_banned("2001:db8:1::1"));
    assert!(!acl.is_ip_banned("garbage"));

    assert!(acl.is_ip_nat_override("172.31.255.255"));
    assert!(!acl.is_ip_nat_override("172.32.0.0"));

    assert!(acl.is_nick_blocked("HUB-SECURITY"));
    assert!(acl.is_nick_blocked("Troll"));
    assert!(!acl.is_nick_blocked("alice"));
    assert!(acl.is_cid_banned("ugogkxaz3vedprhwou7mbzoq3qhniiob6je2f4a"));
}

#[test]
fn test_user_levels_and_shadowing() {
    let (_dir, path) = write_acl(USERS_CONF);
    let acl = load(&path);

    assert_eq!(acl.lookup_user("root").unwrap().level, CredentialLevel::Admin);
    assert_eq!(acl.lookup_user("STATS").unwrap().level, CredentialLevel::Bot);
    assert_eq!(acl.lookup_user("otherhub").unwrap().level, CredentialLevel::Link);

    let bob = acl.lookup_user("BOB").unwrap();
    assert_eq!(bob.username, "Bob");
    assert_eq!(bob.level, CredentialLevel::Operator);
    assert_eq!(bob.secret.as_deref(), Some("first"));
}

#[test]
fn test_unknown_directive_aborts_load() {
    let (_dir, good) = write_acl("ban_nick troll\n");
    let acl = load(&good);

    let (_dir2, bad) = write_acl("ban_nick other\n\n# comment\nallow_all yes\nban_nick later\n");
    let err = acl.load(&bad).unwrap_err();
    assert!(matches!(err, LoadError::UnknownDirective { line: 4, .. }));
    assert!(err.to_string().contains("line 4"));

    // The previous ACL stays published and nothing from the failed file leaks in
    assert!(acl.is_nick_blocked("troll"));
    assert!(!acl.is_nick_blocked("other"));
    assert!(!acl.is_nick_blocked("later"));
}

#[test]
fn test_empty_payload_aborts_load() {
    let (_dir, path) = write_acl("user_reg alice:pw\ndeny_ip\n");
    let err = AclStore::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::EmptyPayload { line: 2, .. }));
}

#[test]
fn test_invalid_utf8_reports_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.conf");
    std::fs::write(&path, b"ban_nick ok\nban_nick bad\xff\n").unwrap();

    let err = AclStore::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::InvalidUtf8 { line: 2 }));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_crlf_line_endings() {
    let (_dir, path) = write_acl("user_reg alice:pw\r\nban_nick troll\r\n");
    let store = AclStore::load(&path).unwrap();
    assert_eq!(store.lookup_user("alice").unwrap().secret.as_deref(), Some("pw"));
    assert!(store.is_banned_nick("troll"));
}

#[test]
fn test_missing_file() {
    let err = AclStore::load("/nonexistent/users.conf").unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(err.line(), None);
}

#[test]
fn test_runtime_bans() {
    let (_dir, path) = write_acl(USERS_CONF);
    let acl = load(&path);

    acl.ban_nick("flooder").unwrap();
    acl.ban_cid("AAAABBBBCCCC").unwrap();
    assert!(acl.is_nick_blocked("FLOODER"));
    assert!(acl.is_cid_banned("aaaabbbbcccc"));

    assert_eq!(
        acl.unban_nick("flooder"),
        Err(AclError::UnbanUnsupported {
            collection: "banned nicks"
        })
    );
    assert_eq!(
        acl.unban_cid("AAAABBBBCCCC"),
        Err(AclError::UnbanUnsupported {
            collection: "banned CIDs"
        })
    );
    assert!(acl.is_nick_blocked("flooder"));

    // Reloading the file drops runtime bans
    acl.load(&path).unwrap();
    assert!(!acl.is_nick_blocked("flooder"));
}

#[test]
fn test_hub_config_names_acl_file() {
    let (dir, acl_path) = write_acl(USERS_CONF);
    let config_path = dir.path().join("hub.toml");
    std::fs::write(
        &config_path,
        format!("[acl]\nfile = {:?}\n", acl_path.to_str().unwrap()),
    )
    .unwrap();

    let config = ConfigLoader::new().load(&config_path).unwrap();
    let acl = AclHandle::from_config(&config.acl).unwrap();
    assert!(acl.lookup_user("root").is_some());
}
