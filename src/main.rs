//! spblog maintenance entry point.
//!
//! Loads configuration, prepares the database and runs one maintenance
//! command. Without a command it prints the dashboard counters and sidebar
//! summary, which doubles as a deployment smoke check.

use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing::{error, info};

use spblog::adapters::{
    run_migrations, PostgresCommentRepository, PostgresLinkRepository, PostgresPostReader,
    PostgresPostRepository, PostgresSubscriberRepository, PostgresTagRepository,
    PostgresUserRepository,
};
use spblog::application::{
    DashboardHandler, ListPostsHandler, ListPostsQuery, ListingSettings, SidebarHandler,
    SubscribeCommand, SubscribeHandler,
};
use spblog::config::AppConfig;

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(
    name = "spblog",
    version,
    about = "Maintenance tool for the spblog database"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print dashboard counters and the sidebar summary (default)
    Stats,
    /// Print one page of published posts with their excerpts
    Posts {
        /// 1-based page index
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only posts carrying this tag id
        #[arg(long, default_value = "")]
        tag: String,
    },
    /// Sign an address up and print its confirmation token
    Subscribe {
        /// Address to sign up
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    config.logging.init_tracing()?;
    if let Err(err) = config.validate() {
        error!(error = %err, "Invalid configuration");
        return Err(err.into());
    }

    let pool = config.database.connect().await?;
    info!(
        url = %config.database.redacted_url(),
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    if config.database.run_migrations {
        run_migrations(&pool).await?;
        info!("Migrations applied");
    }

    let result = match cli.command.unwrap_or(Commands::Stats) {
        Commands::Stats => run_stats(&pool, &config).await,
        Commands::Posts { page, tag } => run_posts(&pool, &config, page, tag).await,
        Commands::Subscribe { email } => run_subscribe(&pool, &config, email).await,
    };

    pool.close().await;
    result
}

async fn run_stats(pool: &PgPool, config: &AppConfig) -> Result<(), BoxError> {
    let tags = Arc::new(PostgresTagRepository::new(pool.clone()));
    let comments = Arc::new(PostgresCommentRepository::new(pool.clone()));

    let stats = DashboardHandler::new(
        Arc::new(PostgresPostRepository::new(pool.clone())),
        tags.clone(),
        Arc::new(PostgresUserRepository::new(pool.clone())),
        comments.clone(),
        Arc::new(PostgresSubscriberRepository::new(pool.clone())),
    )
    .handle()
    .await?;
    info!(
        posts = stats.posts,
        tags = stats.tags,
        users = stats.users,
        comments = stats.comments,
        active_subscribers = stats.active_subscribers,
        "Dashboard"
    );

    let sidebar = SidebarHandler::new(
        Arc::new(PostgresPostReader::new(pool.clone())),
        tags,
        Arc::new(PostgresLinkRepository::new(pool.clone())),
        comments,
    )
    .with_ranking_limit(config.blog.sidebar_limit)
    .handle()
    .await;
    info!(
        tags = sidebar.tags.len(),
        links = sidebar.links.len(),
        archives = sidebar.archives.len(),
        unread_comments = sidebar.unread_comments.len(),
        "Sidebar"
    );
    Ok(())
}

async fn run_posts(
    pool: &PgPool,
    config: &AppConfig,
    page_index: u32,
    tag: String,
) -> Result<(), BoxError> {
    let settings = ListingSettings {
        page_size: config.blog.page_size,
        excerpt_chars: config.blog.excerpt_chars,
    };
    let listing = ListPostsHandler::new(Arc::new(PostgresPostReader::new(pool.clone())))
        .with_settings(settings)
        .handle(ListPostsQuery::index(page_index).with_tag(tag))
        .await?;

    for summary in &listing.items {
        println!("#{} {}", summary.post.id(), summary.post.title());
        println!("    {}", summary.excerpt.replace('\n', " "));
    }
    info!(
        page = page_index,
        total = listing.total,
        total_pages = listing.total_pages(),
        "Listed posts"
    );
    Ok(())
}

async fn run_subscribe(pool: &PgPool, config: &AppConfig, email: String) -> Result<(), BoxError> {
    let issued = SubscribeHandler::new(
        Arc::new(PostgresSubscriberRepository::new(pool.clone())),
        config.blog.subscription_ttl()?,
    )
    .handle(SubscribeCommand { email })
    .await?;

    println!("{}", issued.signature);
    Ok(())
}
