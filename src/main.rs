use std::convert::Infallible;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use quill::{
    api::{ResourceId, ResourceKind},
    commands::{self, ResourceAction},
    config::Environment,
    runtime::RealRuntime,
};

/// quill - book club assistant
///
/// Ask the language model questions, look up the weather, and manage the
/// club's clubs, members and reading sessions.
///
/// Credentials are read from the environment: KEY_OPEN_AI for the language
/// model, KEY_WEATHER for weather lookups, and API_URL/API_KEY (or
/// SUPABASE_URL/SUPABASE_KEY) for the book club backend. Set ENV=dev for
/// debug logging.
///
/// Examples:
///   quill ask "Recommend a cozy mystery"
///   quill member get 42
///   quill points 42 10
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Book club API base URL
    #[arg(long = "api-url", env = "API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Language model to use (defaults to gpt-3.5-turbo)
    #[arg(long, env = "OPENAI_MODEL", value_name = "MODEL", global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the language model a question
    Ask(AskArgs),

    /// Show the current weather for a location
    Weather(WeatherArgs),

    /// Manage clubs
    Club {
        #[command(subcommand)]
        action: ResourceCommand,
    },

    /// Manage members
    Member {
        #[command(subcommand)]
        action: ResourceCommand,
    },

    /// Manage reading sessions
    Session {
        #[command(subcommand)]
        action: ResourceCommand,
    },

    /// Show a readable summary of a club, member or session
    Show(ShowArgs),

    /// Give points to (or take points from) a member
    Points(PointsArgs),

    /// Ask the language model about a club's active book
    Summary(SummaryArgs),
}

#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    #[arg(value_name = "PROMPT")]
    pub prompt: String,
}

#[derive(clap::Args, Debug)]
pub struct WeatherArgs {
    /// City name
    #[arg(value_name = "LOCATION")]
    pub location: String,
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// Fetch a record by ID
    Get {
        #[arg(value_parser = parse_id)]
        id: ResourceId,
    },

    /// Create a record from a JSON payload
    Create {
        #[arg(long, value_name = "JSON")]
        data: String,
    },

    /// Update fields of a record
    Update {
        #[arg(value_parser = parse_id)]
        id: ResourceId,

        #[arg(long, value_name = "JSON")]
        data: String,
    },

    /// Delete a record by ID
    Delete {
        #[arg(value_parser = parse_id)]
        id: ResourceId,
    },
}

impl From<ResourceCommand> for ResourceAction {
    fn from(command: ResourceCommand) -> Self {
        match command {
            ResourceCommand::Get { id } => ResourceAction::Get(id),
            ResourceCommand::Create { data } => ResourceAction::Create(data),
            ResourceCommand::Update { id, data } => ResourceAction::Update(id, data),
            ResourceCommand::Delete { id } => ResourceAction::Delete(id),
        }
    }
}

/// Integer-looking IDs become JSON numbers, everything else strings.
fn parse_id(s: &str) -> Result<ResourceId, Infallible> {
    s.parse()
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum KindArg {
    Club,
    Member,
    Session,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Club => ResourceKind::Club,
            KindArg::Member => ResourceKind::Member,
            KindArg::Session => ResourceKind::Session,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    #[arg(value_enum)]
    kind: KindArg,

    #[arg(value_parser = parse_id)]
    id: ResourceId,
}

#[derive(clap::Args, Debug)]
pub struct PointsArgs {
    #[arg(value_name = "MEMBER_ID", value_parser = parse_id)]
    pub member_id: ResourceId,

    /// Points to add; negative values subtract
    #[arg(allow_negative_numbers = true)]
    pub delta: i64,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    #[arg(value_name = "CLUB_ID", value_parser = parse_id)]
    pub club_id: ResourceId,
}

#[tokio::main]
async fn main() -> Result<()> {
    let runtime = RealRuntime;
    let filter = Environment::from_runtime(&runtime).default_log_filter();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask(args) => commands::ask(runtime, &args.prompt, cli.model).await?,
        Commands::Weather(args) => commands::weather(runtime, &args.location).await?,
        Commands::Club { action } => {
            commands::resource(runtime, cli.api_url, ResourceKind::Club, action.into()).await?
        }
        Commands::Member { action } => {
            commands::resource(runtime, cli.api_url, ResourceKind::Member, action.into()).await?
        }
        Commands::Session { action } => {
            commands::resource(runtime, cli.api_url, ResourceKind::Session, action.into()).await?
        }
        Commands::Show(args) => {
            commands::show(runtime, cli.api_url, args.kind.into(), &args.id).await?
        }
        Commands::Points(args) => {
            commands::points(runtime, cli.api_url, &args.member_id, args.delta).await?
        }
        Commands::Summary(args) => {
            commands::summary(runtime, cli.api_url, cli.model, &args.club_id).await?
        }
    }
    Ok(())
}
