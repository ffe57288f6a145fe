//! Hockey and NASA command groups for a poise/serenity Discord bot.
//!
//! The binary in `main.rs` only wires logging, configuration and the gateway client;
//! everything the commands need lives here so it can be exercised from `tests/`.

pub use poise::serenity_prelude as serenity;
use tracing::error;

pub mod commands;
pub mod utils;

use utils::{config::Settings, database::ConfigStore};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// State shared by every command invocation.
pub struct Data {
    /// Reused HTTP client for the NHL and NASA APIs.
    pub http: reqwest::Client,
    pub settings: Settings,
    /// Key-value settings store (guild, channel and global scopes).
    pub store: ConfigStore,
}

impl Data {
    pub fn new(settings: Settings) -> Result<Self, Error> {
        let store = ConfigStore::open(&settings.database_path)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("cogbot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            settings,
            store,
        })
    }
}

#[poise::command(slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Every command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    use commands::{
        hockey::{hockeyset::hockeyset, lookup::hockey},
        nasa::lookup::nasa,
    };

    vec![
        // Default commands
        register(),
        help(),
        // Cogs
        hockey(),
        hockeyset(),
        nasa(),
    ]
}

/// Logs every framework error before handing it to poise's default reply logic.
pub async fn on_error(e: poise::FrameworkError<'_, Data, Error>) {
    match &e {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command '{}' invoked by {} failed: {}",
                ctx.command().qualified_name,
                ctx.author().name,
                error
            );
        }
        other => error!("Framework error: {}", other),
    }

    if let Err(e) = poise::builtins::on_error(e).await {
        error!("Error while handling error: {}", e);
    }
}
