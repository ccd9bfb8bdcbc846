//! # Hub Configuration
//!
//! TOML configuration for the hub ACL service: where the ACL file lives
//! and how logging is set up.
//!
//! ## Example Configuration
//!
//! ```toml
//! [acl]
//! file = "/etc/uhub/users.conf"
//! required = true
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

mod error;
mod loader;
mod types;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use types::{AclConfig, HubConfig, LogFormat, LogLevel, LogOutput, LoggingConfig};
pub use validation::{BasicValidator, ValidationError, ValidationResult, Validator};
