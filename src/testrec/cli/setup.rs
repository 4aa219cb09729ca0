use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date when built from a checkout.
/// Format: "0.3.2" without git, "0.3.2@abc1234 2024-01-15" otherwise
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "testrec", bin_name = "testrec", version = get_version())]
#[command(about = "Keep a table of test records in a CSV file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database file to use (defaults to the configured one)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new, empty database file
    Create,

    /// List records
    #[command(alias = "ls")]
    List {
        /// Show soft-deleted records only
        #[arg(long, conflicts_with = "all")]
        deleted: bool,

        /// Show active and deleted records
        #[arg(long)]
        all: bool,
    },

    /// Show one record
    Show { id: String },

    /// Add a record (prompts for anything not given)
    #[command(alias = "n")]
    Add {
        #[arg(short, long)]
        system_name: Option<String>,

        #[arg(short, long)]
        test_type: Option<String>,

        /// Failed, Passed, Pending or Success
        #[arg(short, long)]
        result: Option<String>,
    },

    /// Update a record (interactive when no fields are given)
    #[command(alias = "e")]
    Update {
        id: String,

        #[arg(short, long)]
        system_name: Option<String>,

        #[arg(short, long)]
        test_type: Option<String>,

        #[arg(short, long)]
        result: Option<String>,
    },

    /// Soft-delete one or more records
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Permanently remove soft-deleted records (all of them if no ids)
    Purge {
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Bring soft-deleted records back
    Recover {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Search active records
    Search { query: String },

    /// List candidate database files in a directory
    Files {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (database, capacity, max-attempts)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_update_flags() {
        let cli = Cli::parse_from(["testrec", "update", "3", "--result", "passed"]);
        match cli.command {
            Some(Commands::Update { id, result, system_name, .. }) => {
                assert_eq!(id, "3");
                assert_eq!(result.as_deref(), Some("passed"));
                assert!(system_name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn db_flag_is_global() {
        let cli = Cli::parse_from(["testrec", "list", "--db", "runs.csv"]);
        assert_eq!(cli.db, Some(PathBuf::from("runs.csv")));
    }
}
