mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "consensus",
    about = "Group decisions by lowest total resistance",
    version
)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a decision store in the current directory
    Init,

    /// Create a new decision and open it
    New {
        /// Decision title
        title: String,
    },

    /// Open a decision by id or share link
    Open {
        /// Decision id or a link containing `?id=`
        target: String,
    },

    /// Close the open decision and return to the start
    Home,

    /// Show the open decision with totals and the winner
    Show,

    /// Add, rename or delete options
    Option {
        #[command(subcommand)]
        action: OptionAction,
    },

    /// Set one participant's resistance for an option
    Score {
        /// Option id, or `#N` for the N-th option
        option: String,

        /// Participant number, starting at 1
        user: usize,

        /// Resistance; clamped to 0..=max score
        #[arg(allow_negative_numbers = true)]
        score: i64,
    },

    /// Set the number of participants
    Users {
        count: u32,
    },

    /// Set the highest allowed resistance (also the veto threshold)
    MaxScore {
        max: u32,
    },

    /// Turn veto highlighting on or off
    Veto,

    /// Rename the open decision
    Title {
        title: String,
    },

    /// Print the share link for the open decision
    Share {
        /// Also copy it to the terminal clipboard
        #[arg(long)]
        copy: bool,
    },

    /// List every decision in the store
    List,

    /// Manage the list of recently opened decisions
    Recents {
        #[command(subcommand)]
        action: RecentsAction,
    },

    /// Follow changes to the open decision
    Watch {
        /// Stop after this many polls
        #[arg(long)]
        iterations: Option<usize>,
    },
}

#[derive(Subcommand)]
enum OptionAction {
    /// Append an option
    Add {
        text: String,
    },
    /// Rename an option
    Edit {
        /// Option id, or `#N` for the N-th option
        option: String,
        text: String,
    },
    /// Delete an option
    Rm {
        /// Option id, or `#N` for the N-th option
        option: String,
    },
}

#[derive(Subcommand)]
enum RecentsAction {
    /// Show recently opened decisions, newest first
    List,
    /// Forget one decision
    Remove {
        id: String,
    },
    /// Forget all decisions
    Clear,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("error: {}", e);
    }

    let json = cli.json;
    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::New { title } => commands::new::run(title, json),
        Commands::Open { target } => commands::open::run(target, json),
        Commands::Home => commands::home::run(json),
        Commands::Show => commands::show::run(json),
        Commands::Option { action } => match action {
            OptionAction::Add { text } => commands::option::add(text, json),
            OptionAction::Edit { option, text } => commands::option::edit(option, text, json),
            OptionAction::Rm { option } => commands::option::remove(option, json),
        },
        Commands::Score {
            option,
            user,
            score,
        } => commands::score::run(option, user, score, json),
        Commands::Users { count } => commands::settings::users(count, json),
        Commands::MaxScore { max } => commands::settings::max_score(max, json),
        Commands::Veto => commands::settings::veto(json),
        Commands::Title { title } => commands::settings::title(title, json),
        Commands::Share { copy } => commands::share::run(copy, json),
        Commands::List => commands::list::run(json),
        Commands::Recents { action } => match action {
            RecentsAction::List => commands::recents::list(json),
            RecentsAction::Remove { id } => commands::recents::remove(id),
            RecentsAction::Clear => commands::recents::clear(),
        },
        Commands::Watch { iterations } => commands::watch::run(iterations, json),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CONSENSUS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
