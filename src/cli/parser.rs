use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for dutyroster
/// CLI application to assign a daily duty with SQLite
#[derive(Parser)]
#[command(
    name = "dutyroster",
    version = env!("CARGO_PKG_VERSION"),
    about = "A daily duty roster CLI: administrative and volunteer queues with a fair draw, stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pretend today is the given date (YYYY-MM-DD)
    #[arg(global = true, long = "today", hide = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Register and manage persons
    Person {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Manage the administrative and volunteer queues
    Queue {
        #[command(subcommand)]
        action: QueueAction,
    },

    /// Manage off-duty windows
    OffDuty {
        #[command(subcommand)]
        action: OffDutyAction,
    },

    /// Make sure a person holds the duty of a date (default: today)
    Ensure {
        /// Date (YYYY-MM-DD)
        date: Option<String>,
    },

    /// Mark the duty of a date as done (default: today)
    Complete {
        /// Date (YYYY-MM-DD)
        date: Option<String>,
    },

    /// Administrative override: put a person on a date
    Assign {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Person id or exact name
        person: String,
    },

    /// Volunteer for a specific date
    Claim {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Person id or exact name
        person: String,
    },

    /// Show the recorded duties of a month
    Schedule {
        #[arg(long, value_name = "YYYY-MM", help = "Month to show (default: current)")]
        month: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Project the next assignments without storing anything
    Forecast {
        #[arg(long, value_name = "DATE", help = "First projected date (default: today)")]
        from: Option<String>,

        #[arg(long, default_value_t = 14, help = "Number of days to project")]
        days: u32,
    },

    /// Show duty statistics for a person
    Stats {
        /// Person id or exact name
        person: String,
    },

    /// Run the steps due at the current time of day (for cron)
    Trigger,

    /// Export the schedule
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_name = "YYYY-MM", help = "Month to export (default: all)")]
        month: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum PersonAction {
    /// Register a new person
    Add {
        name: String,

        #[arg(long, help = "Register as administrator")]
        admin: bool,
    },

    /// List registered persons
    List {
        #[arg(long, help = "Include inactive persons")]
        all: bool,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Put a person back into rotation
    Activate { person: String },

    /// Take a person out of rotation
    Deactivate { person: String },

    /// Grant (or revoke) the administrator flag
    Admin {
        person: String,

        #[arg(long)]
        revoke: bool,
    },
}

#[derive(Subcommand)]
pub enum QueueAction {
    /// Add days to a person's queue
    Add {
        person: String,

        #[arg(long, value_name = "CLASS", help = "A=administrative, V=volunteer")]
        class: String,

        #[arg(long, default_value_t = 1)]
        days: u32,
    },

    /// Show every active person's counters
    Show,
}

#[derive(Subcommand)]
pub enum OffDutyAction {
    /// Set the off-duty window (both days included)
    Set {
        person: String,

        #[arg(long, value_name = "DATE")]
        start: String,

        #[arg(long, value_name = "DATE")]
        end: String,
    },

    /// Remove the off-duty window
    Clear { person: String },
}
