use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use logcentral::{
    api::{start_api_server, ApiState},
    auth::{create_account, AccountCreation, CreateUserRequest, PasswordHasher, Role},
    config::{self, AppConfig},
    observability::{init_logging, log_config_info},
    storage::{create_pool, SqlxUserRepository},
    APP_NAME, VERSION,
};
use mockable::DefaultClock;
use tracing::info;
use validator::Validate;

#[derive(Parser)]
#[command(name = "logcentral")]
#[command(about = "Multi-tenant log aggregation backend")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Seed a manager account
    CreateManager {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "LOGCENTRAL_MANAGER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
        config.validate().context("invalid --database-url")?;
    }

    init_logging(&config.observability)?;
    info!(app_name = APP_NAME, version = VERSION, "Starting LogCentral");
    log_config_info(&config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::CreateManager { name, email, password } => {
            create_manager(&config, CreateUserRequest { name, email, password }).await
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let pool = create_pool(&config.database).await.context("failed to open database")?;
    let state = ApiState::from_pool(pool, &config.auth, Arc::new(DefaultClock))?;
    start_api_server(&config.server, state).await?;
    Ok(())
}

async fn create_manager(config: &AppConfig, request: CreateUserRequest) -> anyhow::Result<()> {
    request.validate().context("invalid manager account")?;

    let pool = create_pool(&config.database).await.context("failed to open database")?;
    let repository = SqlxUserRepository::new(pool);
    let hasher = PasswordHasher::new(config.auth.hash_iterations)?;

    match create_account(
        &repository,
        &hasher,
        &DefaultClock,
        &request.name,
        &request.email,
        &request.password,
        Role::Manager,
    )
    .await?
    {
        AccountCreation::Created(user) => {
            info!(user_id = %user.id, email = %user.email, "manager account created");
            Ok(())
        }
        AccountCreation::EmailTaken => bail!("email {} is already in use", request.email),
    }
}
