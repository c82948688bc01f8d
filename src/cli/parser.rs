use crate::export::ExportFormat;
use crate::models::period::ChartRange;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for paytimer
#[derive(Parser)]
#[command(
    name = "paytimer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Work-time tracker: a work/overtime session timer, history statistics \
             and salary projection",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which period to show: a range, a date inside it and an offset in units
/// of the range (`-1` = the one before).
#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    #[arg(long, value_enum, default_value = "month")]
    pub range: ChartRange,

    #[arg(long, value_name = "YYYY-MM-DD", help = "Date inside the period (default: today)")]
    pub date: Option<String>,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i32,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show, edit or update the configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,

        #[arg(
            long = "work-time",
            value_name = "DURATION",
            help = "Regular work time per day (e.g. 8h, 7h30m)"
        )]
        work_time: Option<String>,

        #[arg(
            long = "overtime",
            value_name = "DURATION",
            help = "Maximum overtime per day (e.g. 2h)"
        )]
        overtime: Option<String>,

        #[arg(
            long = "log-overtime",
            value_name = "BOOL",
            help = "Keep counting overtime after regular work time"
        )]
        log_overtime: Option<bool>,

        #[arg(long = "gross-pay", value_name = "AMOUNT", help = "Gross pay per month")]
        gross_pay: Option<i64>,

        #[arg(long = "net-pay", value_name = "BOOL", help = "Calculate net pay for new entries")]
        net_pay: Option<bool>,

        #[arg(
            long = "first-weekday",
            value_name = "DAY",
            help = "First day of the week (mon, sun, ...)"
        )]
        first_weekday: Option<String>,
    },

    /// Start a work session (or resume a paused one)
    Start,

    /// Pause the running work session
    Pause,

    /// Resume a paused work session
    Resume,

    /// Stop the work session and save it
    Stop,

    /// Show the current work session
    Status,

    /// Follow the running session live, one tick per second
    Watch {
        #[arg(long, value_name = "N", help = "Stop watching after N seconds")]
        seconds: Option<u64>,
    },

    /// Add a work entry manually
    Add {
        /// Date of the entry (YYYY-MM-DD)
        date: String,

        #[arg(long = "in", value_name = "HH:MM", help = "Start time")]
        start: String,

        #[arg(long = "out", value_name = "HH:MM", help = "Finish time")]
        end: String,
    },

    /// Change the date or times of an entry
    Edit {
        /// Entry id or a unique prefix of it
        id: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,

        #[arg(long = "in", value_name = "HH:MM")]
        start: Option<String>,

        #[arg(long = "out", value_name = "HH:MM")]
        end: Option<String>,
    },

    /// Delete one entry, or all of them with --all
    Del {
        /// Entry id or a unique prefix of it
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,

        #[arg(long, help = "Delete every entry")]
        all: bool,
    },

    /// List entries of a period
    List {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Totals and a bar chart of a period
    Stats {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Gross (and net) salary of a period, with a prediction
    Pay {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Export entries
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_enum, help = "Limit the export to a period (default: everything)")]
        range: Option<ChartRange>,

        #[arg(long, value_name = "YYYY-MM-DD", requires = "range")]
        date: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
