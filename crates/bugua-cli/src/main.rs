use anyhow::Result;
use bugua_core::{Category, Gender, InputMode, RecordUpdate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod bootstrap;
mod commands;
mod display;
mod logging;
mod repl;

use bootstrap::AppBootstrap;
use commands::draw::DrawOptions;

#[derive(Parser)]
#[command(name = "bugua")]
#[command(about = "BUGUA - Xiangqi five-piece divination", long_about = None)]
struct Cli {
    /// Configuration directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Print debug logs to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw five pieces and ask the oracle
    Draw(DrawArgs),
    /// Manage stored readings
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
    /// Manage the reading prompt template
    Prompt {
        #[command(subcommand)]
        action: PromptAction,
    },
    /// Show configuration and test the record store
    Check,
}

#[derive(Args)]
struct DrawArgs {
    /// flip (draw from a shuffled deck) or manual (place pieces yourself)
    #[arg(long, default_value = "flip")]
    mode: InputMode,

    /// CAREER, LOVE, HEALTH, WEALTH or GENERAL
    #[arg(long)]
    category: Option<Category>,

    /// MALE or FEMALE
    #[arg(long)]
    gender: Option<Gender>,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Exit after the reading instead of opening the chat
    #[arg(long)]
    no_chat: bool,
}

#[derive(Subcommand)]
enum RecordsAction {
    /// List readings, newest first
    List,
    /// Show one reading
    Show { key: String },
    /// Edit the text of a reading; blank values are ignored
    Edit {
        key: String,
        #[arg(long)]
        luck_level: Option<String>,
        #[arg(long)]
        hexagram_name: Option<String>,
        #[arg(long)]
        analysis: Option<String>,
        #[arg(long)]
        advice: Option<String>,
    },
    /// Delete a reading
    Delete { key: String },
}

#[derive(Subcommand)]
enum PromptAction {
    /// Print the effective template
    Show,
    /// Store a template read from FILE
    Set { file: PathBuf },
    /// Go back to the built-in template
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AppBootstrap::paths(cli.config_dir);
    let logs_dir = paths.logs_dir().ok();
    let _log_guard = logging::init(logs_dir.as_deref(), cli.verbose);

    let app = AppBootstrap::initialize(paths)?;

    match cli.command {
        Commands::Draw(args) => {
            commands::draw::run(
                &app,
                DrawOptions {
                    mode: args.mode,
                    category: args.category,
                    gender: args.gender,
                    seed: args.seed,
                    no_chat: args.no_chat,
                },
            )
            .await?
        }
        Commands::Records { action } => match action {
            RecordsAction::List => commands::records::list(&app).await?,
            RecordsAction::Show { key } => commands::records::show(&app, &key).await?,
            RecordsAction::Edit {
                key,
                luck_level,
                hexagram_name,
                analysis,
                advice,
            } => {
                let update = RecordUpdate {
                    luck_level,
                    hexagram_name,
                    analysis,
                    advice,
                    layout_image: None,
                };
                commands::records::edit(&app, &key, update).await?
            }
            RecordsAction::Delete { key } => commands::records::delete(&app, &key).await?,
        },
        Commands::Prompt { action } => match action {
            PromptAction::Show => commands::prompt::show(&app).await?,
            PromptAction::Set { file } => commands::prompt::set(&app, &file).await?,
            PromptAction::Reset => commands::prompt::reset(&app).await?,
        },
        Commands::Check => commands::check::run(&app).await?,
    }

    Ok(())
}
