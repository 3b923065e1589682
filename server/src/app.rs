//! Core application

use std::sync::Arc;

use anyhow::Result;

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::{MemoryRepository, SurveyRepository};
use crate::domain::query::QueryExpressionCompiler;
use crate::domain::surveys::SurveyService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub auth: Arc<AuthManager>,
    pub surveys: SurveyService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.debug);

        tracing::debug!("Application starting");
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config)?;
        Self::start_server(app).await
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        if config.debug && !cli.debug {
            tracing::info!(
                "Debug enabled in config file; set {}=debug for verbose logs",
                ENV_LOG
            );
        }

        let auth = Arc::new(AuthManager::init(&config.auth)?);
        let repository: Arc<dyn SurveyRepository> = Arc::new(MemoryRepository::new());
        let compiler =
            QueryExpressionCompiler::surveys().with_duplicate_policy(config.query.duplicates);
        let surveys = SurveyService::new(repository, compiler, config.query.limits);

        tracing::debug!(
            max_depth = config.query.limits.max_depth,
            max_conditions = config.query.limits.max_conditions,
            duplicates = ?config.query.duplicates,
            "Survey service initialized"
        );

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            auth,
            surveys,
        })
    }

    fn init_logging(debug: bool) {
        let default_filter = if debug {
            format!("info,{}=debug,tower_http=debug", APP_NAME_LOWER)
        } else {
            format!("info,{}=info", APP_NAME_LOWER)
        };

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        app.shutdown.install_signal_handlers();

        banner::print_banner(&app.config, app.auth.bootstrap_token());

        ApiServer::new(app).start().await?;
        tracing::debug!("Shutdown complete");

        Ok(())
    }
}
