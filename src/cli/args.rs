//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Satchel - request-scoped session store
///
/// Every invocation is one request: it attaches to the session named by
/// the cookie jar (or --session), runs one operation and saves the map.
#[derive(Parser, Debug)]
#[command(name = "satchel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SATCHEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// State directory holding sessions, cookie jar and audit log
    #[arg(long, global = true, env = "SATCHEL_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Session id to present instead of the one in the cookie jar
    #[arg(short, long, global = true, env = "SATCHEL_SESSION")]
    pub session: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open (or resume) the session and print its id
    Open,

    /// Store a value under a dotted key
    Write(WriteArgs),

    /// Print the value stored under a dotted key
    Read(ReadArgs),

    /// Remove a key from the session
    Destroy(DestroyArgs),

    /// Remove every key from the session
    Clear(ClearArgs),

    /// Close the session and forget the cookie
    Close,

    /// Close the session if it outlived its lifetime, otherwise renew it
    Gc(GcArgs),

    /// Show the current session without opening one
    Status,

    /// Print the whole session map
    Dump(DumpArgs),

    /// List stored sessions
    List(ListArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the write command
#[derive(Parser, Debug)]
pub struct WriteArgs {
    /// Key, optionally dotted (e.g. user.name)
    pub key: String,

    /// Value to store
    pub value: String,

    /// How to interpret the value
    #[arg(short = 't', long = "type", default_value = "text")]
    pub kind: ValueKind,
}

/// Arguments for the read command
#[derive(Parser, Debug)]
pub struct ReadArgs {
    /// Key, optionally dotted (e.g. user.name)
    pub key: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ValueFormat,
}

/// Arguments for the destroy command
#[derive(Parser, Debug)]
pub struct DestroyArgs {
    /// Key to remove
    pub key: String,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the gc command
#[derive(Parser, Debug)]
pub struct GcArgs {
    /// Lifetime in minutes (default: from config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_lifetime: Option<u32>,
}

/// Arguments for the dump command
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., session.max_lifetime_minutes)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Interpretation of a value given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    /// Store as text
    Text,
    /// Parse as a 64-bit integer
    Int,
    /// Parse as a float
    Float,
    /// Parse true/false
    Bool,
    /// Parse an RFC 3339 timestamp, or "now"
    Timestamp,
    /// Parse JSON (objects become nested maps)
    Json,
}

/// Output format for a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueFormat {
    /// Plain text
    Text,
    /// JSON
    Json,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_write() {
        let cli = Cli::parse_from(["satchel", "write", "user.age", "41", "--type", "int"]);
        match cli.command {
            Commands::Write(args) => {
                assert_eq!(args.key, "user.age");
                assert_eq!(args.value, "41");
                assert_eq!(args.kind, ValueKind::Int);
            }
            _ => panic!("expected Write command"),
        }
    }

    #[test]
    fn cli_write_defaults_to_text() {
        let cli = Cli::parse_from(["satchel", "write", "a", "x"]);
        match cli.command {
            Commands::Write(args) => assert_eq!(args.kind, ValueKind::Text),
            _ => panic!("expected Write command"),
        }
    }

    #[test]
    fn cli_parses_read_json() {
        let cli = Cli::parse_from(["satchel", "read", "cart", "--format", "json"]);
        match cli.command {
            Commands::Read(args) => {
                assert_eq!(args.key, "cart");
                assert_eq!(args.format, ValueFormat::Json);
            }
            _ => panic!("expected Read command"),
        }
    }

    #[test]
    fn cli_parses_gc_override() {
        let cli = Cli::parse_from(["satchel", "gc", "--max-lifetime", "30"]);
        match cli.command {
            Commands::Gc(args) => assert_eq!(args.max_lifetime, Some(30)),
            _ => panic!("expected Gc command"),
        }
    }

    #[test]
    fn cli_rejects_zero_gc_lifetime() {
        assert!(Cli::try_parse_from(["satchel", "gc", "--max-lifetime", "0"]).is_err());
    }

    #[test]
    fn cli_global_session_flag() {
        let cli = Cli::parse_from(["satchel", "open", "--session", "abc-123"]);
        assert!(matches!(cli.command, Commands::Open));
        assert_eq!(cli.session.as_deref(), Some("abc-123"));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["satchel", "config", "set", "session.nesting", "uniform"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Set { key, value }),
            }) => {
                assert_eq!(key, "session.nesting");
                assert_eq!(value, "uniform");
            }
            _ => panic!("expected Config Set command"),
        }
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["satchel", "status"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["satchel", "-v", "status"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["satchel", "-vv", "status"]);
        assert_eq!(cli.verbose, 2);
    }
}
