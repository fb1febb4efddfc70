use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "grpstore", version)]
#[command(
    about = "Create groups and add members in a shared flat-file group database",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Group database file (refused when running with elevated privileges)
    #[arg(long, global = true, env = "GRPSTORE_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Configuration file (defaults to /etc/grpstore/config.json)
    #[arg(long, global = true, env = "GRPSTORE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a group and print its GID
    #[command(alias = "create-group")]
    Groupadd {
        /// Name of the new group
        name: String,

        /// Succeed (printing the existing GID) if the group already exists
        #[arg(short = 'f', long)]
        exist_ok: bool,
    },

    /// Add a user to an existing group
    #[command(alias = "add-member")]
    Usermod {
        /// Group to extend
        group: String,

        /// User to add
        user: String,
    },

    /// Print one group record
    Show {
        /// Exact group name
        group: String,
    },

    /// Print every group record
    #[command(alias = "ls")]
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_groupadd() {
        let cli = parse(&["grpstore", "groupadd", "build"]);
        assert_eq!(
            cli.command,
            Commands::Groupadd {
                name: "build".into(),
                exist_ok: false
            }
        );
        assert_eq!(cli.output, OutputMode::Text);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_groupadd_exist_ok_alias() {
        let cli = parse(&["grpstore", "create-group", "-f", "build"]);
        assert_eq!(
            cli.command,
            Commands::Groupadd {
                name: "build".into(),
                exist_ok: true
            }
        );
    }

    #[test]
    fn test_usermod_argument_order() {
        let cli = parse(&["grpstore", "usermod", "build", "alice"]);
        assert_eq!(
            cli.command,
            Commands::Usermod {
                group: "build".into(),
                user: "alice".into()
            }
        );
    }

    #[test]
    fn test_usermod_requires_both_args() {
        assert!(Cli::try_parse_from(["grpstore", "usermod", "build"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&[
            "grpstore", "list", "--store", "/tmp/group", "-vv", "--output", "json",
        ]);
        assert_eq!(cli.command, Commands::List);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/group")));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputMode::Json);
    }
}
