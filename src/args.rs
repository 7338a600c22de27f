use clap::{Parser, Subcommand};

use crate::format::DataFormat;

#[derive(Parser, Debug)]
#[command(name = "gsheet")]
#[command(about = "Send and receive Google Sheets data from the command line")]
#[command(version)]
pub struct Args {
    /// OAuth client secret file
    #[arg(long, global = true, value_name = "FILE")]
    pub client_secret_file: Option<String>,

    /// Where to store the OAuth token
    #[arg(long, global = true, value_name = "FILE")]
    pub auth_token_file: Option<String>,

    /// Path to the alias store file
    #[arg(long, global = true, value_name = "FILE")]
    pub alias_file: Option<String>,

    /// Prefix marking an argument as an alias reference
    #[arg(long, global = true, value_name = "PREFIX")]
    pub alias_prefix: Option<String>,

    /// How many rows at a time to read while fetching data
    #[arg(long = "read-chunksize", global = true, value_name = "ROWS")]
    pub read_chunk_size: Option<usize>,

    /// Output format
    #[arg(long, global = true, value_enum, value_name = "FORMAT")]
    pub output_format: Option<DataFormat>,

    /// Refuse to clear or delete worksheets
    #[arg(long, global = true)]
    pub protect_worksheets: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a range of data from a sheet
    ///
    /// For example:
    ///   gsheet get SprEaDsHeeTiD rawdata
    ///   gsheet get SprEaDsHeeTiD 'rawdata!A3:G5'
    ///   gsheet get @mysheet 'worksheet!A1:B100'
    ///   gsheet get @myfavouriterange
    Get {
        /// Data spec (workbook/worksheet/range, aliases allowed)
        #[arg(value_name = "SPEC", required = true)]
        spec: Vec<String>,
    },

    /// Output the entire contents of a worksheet
    ///
    /// The data spec must name a worksheet:
    ///   gsheet cat SpreAdSheeTiD myworksheet
    ///   gsheet cat @myworkbook myworksheet
    ///   gsheet cat @myworksheet
    Cat {
        #[arg(value_name = "SPEC", required = true)]
        spec: Vec<String>,
    },

    /// Show the last few non-blank rows of a worksheet
    ///
    ///   gsheet tail SpReAdShEetId myworksheet --lines=10
    ///   gsheet tail @mysheet --lines=50
    Tail {
        #[arg(value_name = "SPEC", required = true)]
        spec: Vec<String>,

        /// Rows to output
        #[arg(long, default_value_t = 10)]
        lines: u32,
    },

    /// List worksheets in a workbook
    Ls {
        #[arg(value_name = "SPEC", required = true)]
        spec: Vec<String>,
    },

    /// Write data from stdin to a worksheet or range
    ///
    /// When writing to a worksheet, the worksheet is cleared first. When
    /// writing to a range, the range must be of fixed size and the data must
    /// fit inside it. Respects --protect-worksheets.
    Put {
        #[arg(value_name = "SPEC", required = true)]
        spec: Vec<String>,

        /// Override protect-worksheets and put data
        #[arg(long)]
        force_put: bool,
    },

    /// Touch a workbook or worksheet, creating it if it doesn't exist
    #[command(subcommand)]
    Touch(TouchCommand),

    /// Delete a worksheet or clear a range
    ///
    /// Deleting a worksheet removes it from the workbook; "deleting" a range
    /// fills it with empty cells. Workbooks cannot be deleted.
    Rm {
        #[arg(value_name = "SPEC", required = true)]
        spec: Vec<String>,

        /// Override protect-worksheets and delete
        #[arg(long)]
        force_delete: bool,
    },

    /// Get, set or delete aliases
    #[command(subcommand)]
    Alias(AliasCommand),

    /// Show the effective configuration
    Config {
        /// A single config key to show
        key: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TouchCommand {
    /// Create a new workbook (in the root of your drive); prints its ID
    Workbook {
        /// Title of the new workbook
        title: Option<String>,
    },

    /// Create a worksheet if it doesn't already exist
    ///
    ///   gsheet touch worksheet MyWoRkBoOk mynewsheet
    ///   gsheet touch worksheet @myworkbook mynewsheet
    ///   gsheet touch worksheet @mynewsheet
    Worksheet {
        #[arg(value_name = "SPEC", required = true)]
        spec: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AliasCommand {
    /// Show one alias, or all of them
    Get {
        name: Option<String>,
    },

    /// Bind an alias to a workbook, worksheet or range
    ///
    ///   gsheet alias set myrangealias myworkbook 'myworksheet!A1:B2'
    ///   gsheet alias set mywbalias myworkbook
    Set {
        name: String,
        workbook: String,
        /// Worksheet name, optionally with a !range suffix
        worksheet: Option<String>,
    },

    /// Delete an alias
    Rm {
        name: String,
    },
}
