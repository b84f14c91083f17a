use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use rollcall_core::{ChatFailure, MessageRef, RenderedReport};
use rollcall_engine::{
    ChatTarget, Collaborators, DiscordChatTarget, DiscordSettings, FetchSettings,
    JsonMessageRefStore, JsonWatchlistStore, ReconcileSettings, Reconciler, ReqwestRosterSource,
    Scheduler,
};
use rollcall_logging::{rollcall_info, rollcall_warn};

use super::cli::{joined, Cli, Command};
use super::config::AppConfig;
use super::logging::{self, LogDestination};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: Could not read .env: {err}");
        }
    }
    let config = AppConfig::from_env().context("invalid configuration")?;
    let command = cli.command();

    let level = match (cli.verbose, &command) {
        (true, _) => LevelFilter::Debug,
        (false, Command::Run) => LevelFilter::Info,
        (false, _) => LevelFilter::Warn,
    };
    let destination = match command {
        Command::Run => LogDestination::TerminalAndFile {
            dir: config.data_dir.clone(),
        },
        _ => LogDestination::Terminal,
    };
    logging::initialize(destination, level);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(dispatch(command, config))
}

async fn dispatch(command: Command, config: AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Run => run_scheduler(&config).await,
        Command::Check => {
            let reconciler = build_reconciler(&config, Arc::new(DetachedChat))?;
            let report = reconciler.manual_check().await;
            print!("{}", report.to_plain_text());
            Ok(())
        }
        Command::Add { name } => {
            let reconciler = build_reconciler(&config, Arc::new(DetachedChat))?;
            let added = reconciler.add_entry(&joined(&name))?;
            println!(
                "Added '{added}' ({} / {})",
                reconciler.list_entries().len(),
                config.max_slots
            );
            Ok(())
        }
        Command::Remove { name } => {
            let reconciler = build_reconciler(&config, Arc::new(DetachedChat))?;
            let removed = reconciler.remove_entry(&joined(&name))?;
            println!("Removed '{removed}'");
            Ok(())
        }
        Command::List => {
            let reconciler = build_reconciler(&config, Arc::new(DetachedChat))?;
            println!("{}", reconciler.render_entries());
            Ok(())
        }
    }
}

async fn run_scheduler(config: &AppConfig) -> anyhow::Result<()> {
    let (token, channel_id) = config.chat_credentials()?;
    let chat = DiscordChatTarget::new(DiscordSettings {
        api_base: config.api_base.clone(),
        ..DiscordSettings::new(token, channel_id)
    })
    .context("failed to build chat client")?;
    let reconciler = Arc::new(build_reconciler(config, Arc::new(chat))?);

    rollcall_info!(
        "Watching {} every {}s, reporting to channel {}",
        config.server_url,
        config.interval.as_secs(),
        channel_id
    );
    let handle = Scheduler::spawn(reconciler, config.interval);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    rollcall_info!("Shutdown requested; waiting for the current cycle");
    handle.stop().await;
    Ok(())
}

fn build_reconciler(config: &AppConfig, chat: Arc<dyn ChatTarget>) -> anyhow::Result<Reconciler> {
    let roster = ReqwestRosterSource::new(FetchSettings {
        request_timeout: config.fetch_timeout,
        ..FetchSettings::for_url(config.server_url.clone())
    })
    .context("failed to build roster client")?;

    Ok(Reconciler::new(
        Collaborators {
            roster: Arc::new(roster),
            watchlist: Arc::new(JsonWatchlistStore::new(config.data_dir.clone())),
            refs: Arc::new(JsonMessageRefStore::new(config.data_dir.clone())),
            chat,
        },
        ReconcileSettings::new(config.max_slots, config.server_label.clone()),
    ))
}

/// Chat target for one-shot commands, which never publish.
struct DetachedChat;

#[async_trait::async_trait]
impl ChatTarget for DetachedChat {
    async fn create(&self, _content: &RenderedReport) -> Result<MessageRef, ChatFailure> {
        rollcall_warn!("Publishing is only available from `rollcall run`");
        Err(ChatFailure::Other("chat target not attached".to_string()))
    }

    async fn fetch_and_edit(
        &self,
        _message_ref: MessageRef,
        _content: &RenderedReport,
    ) -> Result<(), ChatFailure> {
        rollcall_warn!("Publishing is only available from `rollcall run`");
        Err(ChatFailure::Other("chat target not attached".to_string()))
    }
}
