use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lincd_application::LincdServices;
use lincd_core::store::SortDirection;
use lincd_infrastructure::{ConfigService, LoggingViewInvalidator, open_record_store};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "lincd")]
#[command(about = "lincd - user directory and activity feed", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/lincd/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a daily rolling file in the log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, update or show a profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Browse other users
    Users {
        /// Identity of the requesting user
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,
        #[arg(long, default_value = "desc")]
        sort: SortDirection,
    },
    /// Replies other users left on your threads
    Activity {
        #[arg(long)]
        id: String,
    },
    /// Post threads and replies
    Thread {
        #[command(subcommand)]
        action: ThreadAction,
    },
    /// Manage communities
    Community {
        #[command(subcommand)]
        action: CommunityAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Onboard or update a user
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long, default_value = "")]
        image: String,
        /// View path the update was submitted from
        #[arg(long, default_value = "")]
        path: String,
    },
    /// Print a profile with its communities
    Show {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum ThreadAction {
    /// Post a thread, or a reply when --parent is given
    Post {
        #[arg(long)]
        author: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        community: Option<String>,
    },
}

#[derive(Subcommand)]
enum CommunityAction {
    /// Create a community
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        bio: String,
    },
    /// Add a user to a community
    Join {
        #[arg(long)]
        id: String,
        #[arg(long)]
        community: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service =
        ConfigService::new(cli.config.as_deref()).context("Failed to locate config file")?;
    let config = config_service
        .get_config()
        .context("Failed to load configuration")?;

    let log_dir = if cli.log_file || config.logging.directory.is_some() {
        Some(config_service.log_dir(&config)?)
    } else {
        None
    };
    let _guard = logging::init(&config.logging.level, log_dir)?;

    tracing::debug!(config = %config_service.config_path().display(), "starting lincd");

    let store = open_record_store(&config, &config_service)?;
    let services = LincdServices::new(store, Arc::new(LoggingViewInvalidator), &config);

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Update {
                id,
                username,
                name,
                bio,
                image,
                path,
            } => commands::profile::update(&services, id, username, name, bio, image, path).await?,
            ProfileAction::Show { id } => commands::profile::show(&services, &id).await?,
        },
        Commands::Users {
            id,
            search,
            page,
            page_size,
            sort,
        } => commands::users::list(&services, id, search, page, page_size, sort).await?,
        Commands::Activity { id } => commands::activity::show(&services, &id).await?,
        Commands::Thread { action } => match action {
            ThreadAction::Post {
                author,
                body,
                parent,
                community,
            } => commands::thread::post(&services, author, body, parent, community).await?,
        },
        Commands::Community { action } => match action {
            CommunityAction::Create { name, slug, bio } => {
                commands::community::create(&services, name, slug, bio).await?
            }
            CommunityAction::Join { id, community } => {
                commands::community::join(&services, &id, &community).await?
            }
        },
    }

    Ok(())
}
