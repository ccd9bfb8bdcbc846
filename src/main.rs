//! R0N Hub ACL command-line tool.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use r0n_hub_acl::acl::{compute_response, generate_challenge, AclStore, ConnectionContext};
use r0n_hub_acl::config::{BasicValidator, ConfigLoader, HubConfig};
use r0n_hub_acl::logging;
use tracing::error;

/// Inspect hub ACL files and compute authentication values.
#[derive(Debug, Parser)]
#[command(name = "r0n-hub-acl", version)]
struct Cli {
    /// Hub configuration file (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an ACL file and print what it contains.
    Check {
        /// ACL file. Defaults to the file named in the hub configuration.
        file: Option<PathBuf>,
    },
    /// Print the challenge for a connection.
    Challenge(ConnectionArgs),
    /// Print the response a client with SECRET sends for a connection.
    Respond {
        /// Account secret.
        #[arg(long)]
        secret: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[derive(Debug, Args)]
struct ConnectionArgs {
    /// Connection time, seconds since the Unix epoch.
    #[arg(long)]
    connected_at: u64,

    /// Session ID.
    #[arg(long)]
    sid: u32,

    /// Socket handle.
    #[arg(long)]
    handle: u64,
}

impl From<&ConnectionArgs> for ConnectionContext {
    fn from(args: &ConnectionArgs) -> Self {
        ConnectionContext::new(args.connected_at, args.sid, args.handle)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ConfigLoader::new()
            .with_validator(BasicValidator::new())
            .load(path)
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            },
        },
        None => HubConfig::default(),
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match cli.command {
        Command::Check { file } => check(file.as_deref().or(config.acl.path())),
        Command::Challenge(args) => {
            println!("{}", generate_challenge(&ConnectionContext::from(&args)));
            ExitCode::SUCCESS
        },
        Command::Respond { secret, connection } => {
            let challenge = generate_challenge(&ConnectionContext::from(&connection));
            match compute_response(&secret, &challenge) {
                Some(response) => {
                    println!("{response}");
                    ExitCode::SUCCESS
                },
                None => {
                    error!("secret is too long");
                    ExitCode::FAILURE
                },
            }
        },
    }
}

fn check(file: Option<&std::path::Path>) -> ExitCode {
    let Some(path) = file else {
        error!("no ACL file given and none configured");
        return ExitCode::FAILURE;
    };

    match AclStore::load(path) {
        Ok(store) => {
            println!("{}: {}", path.display(), store.summary());
            for user in store.users() {
                let secret = if user.secret.is_some() { "yes" } else { "no" };
                println!(
                    "  user {:<24} {:<8} secret: {}",
                    user.username,
                    user.level.as_str(),
                    secret
                );
            }
            for range in store.banned_networks() {
                println!("  deny {range}");
            }
            for range in store.nat_override() {
                println!("  nat  {range}");
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        },
    }
}
