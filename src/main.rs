//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::commands::{self, edit::Changes, new::Draft};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Markdown blog engine for a personal portfolio site", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// List posts or tags
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print a post
    Show {
        slug: String,

        /// Print the rendered HTML body instead
        #[arg(long)]
        html: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Short description shown in listings
        #[arg(short, long)]
        excerpt: Option<String>,

        /// Markdown file with the body, `-` for stdin
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Edit an existing post
    Edit {
        slug: String,

        #[arg(long)]
        title: Option<String>,

        /// Comma-separated tags, replacing the current ones
        #[arg(short, long)]
        tags: Option<String>,

        #[arg(short, long)]
        excerpt: Option<String>,

        /// Markdown file with the new body, `-` for stdin
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Delete a post
    Delete { slug: String },

    /// Start an admin session
    Login {
        username: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// End the admin session
    Logout,

    /// Manage the stored GitHub token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Print an Argon2 hash for FOLIO_ADMIN_PASSWORD_HASH
    HashPassword { password: String },

    /// Serve the blog over HTTP
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store a GitHub personal access token
    Set { token: String },
    /// Remove the stored token
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::List { r#type } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            commands::list::run(&folio, &r#type).await?;
        }

        Commands::Show { slug, html } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            commands::show::run(&folio, &slug, html).await?;
        }

        Commands::New {
            title,
            tags,
            excerpt,
            file,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let body = match file {
                Some(path) => commands::read_body(&path)?,
                None => String::new(),
            };
            let draft = Draft {
                title,
                tags: tags.as_deref().map(commands::parse_tags).unwrap_or_default(),
                excerpt,
                body,
            };
            tracing::info!("Creating post: {}", draft.title);
            commands::new::create_post(&folio, draft).await?;
        }

        Commands::Edit {
            slug,
            title,
            tags,
            excerpt,
            file,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let changes = Changes {
                title,
                tags: tags.as_deref().map(commands::parse_tags),
                excerpt,
                body: file.as_deref().map(commands::read_body).transpose()?,
            };
            commands::edit::edit_post(&folio, &slug, changes).await?;
        }

        Commands::Delete { slug } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            commands::delete::delete_post(&folio, &slug).await?;
        }

        Commands::Login { username, password } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            commands::account::login(&folio, &username, password)?;
        }

        Commands::Logout => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            commands::account::logout(&folio)?;
        }

        Commands::Token { action } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            match action {
                TokenAction::Set { token } => commands::account::set_token(&folio, &token)?,
                TokenAction::Clear => commands::account::clear_token(&folio)?,
            }
        }

        Commands::HashPassword { password } => {
            commands::account::hash_password(&password)?;
        }

        Commands::Server { port, ip } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
