//! Clap derive structures for the `lotto` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lotto -- agent console for the 2D lotto platform
#[derive(Debug, Parser)]
#[command(
    name = "lotto",
    version,
    about = "Place and track 2D lotto bids from the command line",
    long_about = "Agent console for the 2D lotto platform.\n\n\
        Browse draw slots, build a bid cart per date and slot, submit it,\n\
        and follow results and wallet activity.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "LOTTO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "LOTTO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Agent phone number used to sign in (overrides profile)
    #[arg(long, env = "LOTTO_LOGIN_PHONE", global = true)]
    pub login_phone: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LOTTO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LOTTO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Product selector shared by slot, bid and result commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProductArg {
    /// Lucky Draw: one number, many units
    #[value(alias = "lucky-draw")]
    Ld,
    /// Jackpot: six-number combination
    #[value(alias = "jackpot")]
    Jp,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in, sign out, and manage device sessions
    Auth(AuthArgs),

    /// Browse draw slots
    #[command(alias = "s")]
    Slots(SlotsArgs),

    /// Build and submit bids
    #[command(alias = "b")]
    Bid(BidArgs),

    /// Review submitted bids
    Bids(BidsArgs),

    /// Draw results
    #[command(alias = "r")]
    Results(ResultsArgs),

    /// Wallet balance and transfers
    Wallet(WalletArgs),

    /// Signed-in agent profile
    Profile(ProfileArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared argument groups ───────────────────────────────────────────

/// Which draw to target. Without flags the nearest bookable date and
/// slot are picked automatically.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Draw date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Slot ID (defaults to the first open slot of the date)
    #[arg(long)]
    pub slot: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CustomerArgs {
    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Customer phone (10 digits)
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page
    #[arg(long, default_value = "20")]
    pub page_size: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and show the account
    Login,

    /// Sign in, then end that session on the server
    Logout,

    /// List signed-in devices
    Devices,

    /// Revoke a device session
    RevokeDevice {
        /// Device session ID
        device: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SLOTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SlotsArgs {
    #[command(subcommand)]
    pub command: SlotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SlotsCommand {
    /// List the slots of one date
    #[command(alias = "ls")]
    List {
        /// Draw date (YYYY-MM-DD); defaults to the nearest bookable date
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,

        /// Product
        #[arg(long = "type", short = 't', default_value = "ld")]
        product: ProductArg,
    },

    /// List dates that have slots within the booking window
    Dates,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BID
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BidArgs {
    #[command(subcommand)]
    pub command: BidCommand,
}

#[derive(Debug, Subcommand)]
pub enum BidCommand {
    /// Lucky Draw bids: `#`-separated numbers and matching counts
    #[command(alias = "lucky-draw")]
    Ld {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        customer: CustomerArgs,

        /// Numbers 0-37, `#`-separated (e.g. 5#10#22)
        #[arg(long, short = 'n')]
        numbers: String,

        /// Units per number 1-80, `#`-separated (e.g. 20#30#5)
        #[arg(long, short = 'c')]
        counts: String,
    },

    /// Jackpot bids: one or more six-number combinations
    #[command(alias = "jackpot")]
    Jp {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        customer: CustomerArgs,

        /// Six numbers 0-37; repeat the flag for more combinations
        #[arg(
            long,
            short = 'n',
            num_args = 6,
            value_name = "N",
            action = clap::ArgAction::Append,
            required = true
        )]
        numbers: Vec<String>,
    },

    /// Guided cart session: add, edit, delete, review and submit
    #[command(alias = "i")]
    Interactive {
        #[command(flatten)]
        target: TargetArgs,

        /// Start on this product
        #[arg(long = "type", short = 't', default_value = "ld")]
        product: ProductArg,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BIDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BidsArgs {
    #[command(subcommand)]
    pub command: BidsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BidsCommand {
    /// Bids placed by the signed-in agent
    #[command(alias = "ls")]
    History(PageArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESULTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResultsArgs {
    #[command(subcommand)]
    pub command: ResultsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResultsCommand {
    /// All published results
    #[command(alias = "ls")]
    List {
        /// Only this product
        #[arg(long = "type", short = 't')]
        product: Option<ProductArg>,
    },

    /// Results of one day, split by product
    Date {
        /// Date (YYYY-MM-DD); defaults to today
        date: Option<NaiveDate>,
    },

    /// Result of one slot
    Get {
        /// Slot ID
        slot: String,
    },

    /// Count down to a draw and wait for its result
    Watch {
        #[command(flatten)]
        target: TargetArgs,

        /// Product
        #[arg(long = "type", short = 't', default_value = "ld")]
        product: ProductArg,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WALLET
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WalletArgs {
    #[command(subcommand)]
    pub command: WalletCommand,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Amount
    #[arg(long, short = 'a')]
    pub amount: f64,

    /// Bank or transfer reference
    #[arg(long)]
    pub trans_id: String,

    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum WalletCommand {
    /// Current balances
    Balance,

    /// Wallet transactions
    History(PageArgs),

    /// Request a top-up
    Deposit {
        #[command(flatten)]
        transfer: TransferArgs,

        /// URL of the transfer receipt
        #[arg(long)]
        proof_url: Option<String>,
    },

    /// Pay a customer's winnings out of the reserved balance
    SettleWin {
        #[command(flatten)]
        transfer: TransferArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in agent
    Show,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
