// Stela - A content management core built with Rust
// Copyright (C) 2025 Stela Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

mod config;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use config::Config;
use sqlx::SqlitePool;
use stela_core::{Page, PageState, Site};
use stela_db::repositories::{PageRepository, SiteRepository};
use stela_db::UrlRewriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stela")]
#[command(about = "Stela CLI tool for site and page management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database (create tables)
    Init,

    /// Site management commands
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },

    /// Page management commands
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },
}

#[derive(Subcommand)]
enum SiteCommands {
    /// Create a new site with its root page
    Create {
        /// Site label
        label: String,
    },

    /// List all sites
    List,
}

#[derive(Subcommand)]
enum PageCommands {
    /// Add a page; its URL is generated from the title unless --url is given
    Add {
        /// Site label
        site: String,
        /// Page title
        title: String,
        /// Explicit URL (skips generation)
        #[arg(long)]
        url: Option<String>,
        /// Parent page id (defaults to the site root)
        #[arg(long)]
        parent: Option<i64>,
    },

    /// List pages of a site
    List {
        /// Site label
        site: String,
    },

    /// Show a page
    Show {
        /// Page id
        id: i64,
    },

    /// Change a page title (may rewrite its URL)
    SetTitle {
        /// Page id
        id: i64,
        /// New title
        title: String,
    },

    /// Set a page URL manually (empty string requests regeneration)
    SetUrl {
        /// Page id
        id: i64,
        /// New URL
        url: String,
    },

    /// Change a page state (offline, online, hidden)
    SetState {
        /// Page id
        id: i64,
        /// New state
        state: String,
    },

    /// Remove a page, freeing its URL
    Rm {
        /// Page id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stela=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Init => init_database(&config).await,
        Commands::Site { command } => {
            let pool = connect_database(&config).await?;
            handle_site_command(command, pool).await
        }
        Commands::Page { command } => {
            let pool = connect_database(&config).await?;
            handle_page_command(command, pool, &config).await
        }
    }
}

async fn init_database(config: &Config) -> Result<()> {
    println!("Initializing database at: {}", config.database_url);

    let _pool = stela_db::init_database(&config.database_url).await?;

    println!("Database initialized successfully!");
    Ok(())
}

async fn connect_database(config: &Config) -> Result<SqlitePool> {
    // init_database also ensures the schema is present
    stela_db::init_database(&config.database_url).await
}

async fn handle_site_command(command: SiteCommands, pool: SqlitePool) -> Result<()> {
    let sites = SiteRepository::new(pool.clone());

    match command {
        SiteCommands::Create { label } => {
            let site_id = sites.create(&Site::new(label.clone())).await?;
            println!("Created site '{}' (id {}) with root page /", label, site_id);
            Ok(())
        }
        SiteCommands::List => {
            let all = sites.list().await?;
            if all.is_empty() {
                println!("No sites found. Run 'site create' first.");
                return Ok(());
            }
            for site in all {
                println!(
                    "{:>4}  {}",
                    site.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    site.label
                );
            }
            Ok(())
        }
    }
}

async fn handle_page_command(command: PageCommands, pool: SqlitePool, config: &Config) -> Result<()> {
    let pages = PageRepository::new(pool.clone());
    let rewriter = UrlRewriter::with_policy(pool.clone(), config.policy);

    match command {
        PageCommands::Add {
            site,
            title,
            url,
            parent,
        } => {
            let site = find_site(&pool, &site).await?;
            let site_id = site.id.ok_or_else(|| anyhow!("Site has no ID"))?;

            let parent_id = match parent {
                Some(id) => id,
                None => {
                    let root = pages
                        .get_root_page(site_id)
                        .await?
                        .ok_or_else(|| anyhow!("Site '{}' has no root page", site.label))?;
                    root.id.ok_or_else(|| anyhow!("Root page has no ID"))?
                }
            };

            let mut page = Page::new_with_parent(site_id, parent_id, title);
            if let Some(url) = url {
                page.url = Some(url);
            }

            let id = rewriter.save(&mut page).await?;
            println!(
                "Created page {} at {}",
                id,
                page.url.as_deref().unwrap_or("(no url)")
            );
            Ok(())
        }

        PageCommands::List { site } => {
            let site = find_site(&pool, &site).await?;
            let site_id = site.id.ok_or_else(|| anyhow!("Site has no ID"))?;

            for page in pages.list_by_site_id(site_id).await? {
                println!(
                    "{:>4}  {:<8}  {:<30}  {}",
                    page.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    page.state.as_str(),
                    page.url.as_deref().unwrap_or("(no url)"),
                    page.title
                );
            }
            Ok(())
        }

        PageCommands::Show { id } => {
            let page = find_page(&pages, id).await?;
            println!("Id:     {}", id);
            println!("Site:   {}", page.site_id);
            println!("Title:  {}", page.title);
            println!("Url:    {}", page.url.as_deref().unwrap_or("(no url)"));
            println!("State:  {}", page.state);
            if let Some(parent_id) = page.parent_page_id {
                println!("Parent: {}", parent_id);
            }
            Ok(())
        }

        PageCommands::SetTitle { id, title } => {
            let mut page = find_page(&pages, id).await?;
            page.title = title;
            rewriter.save(&mut page).await?;
            println!(
                "Updated page {} at {}",
                id,
                page.url.as_deref().unwrap_or("(no url)")
            );
            Ok(())
        }

        PageCommands::SetUrl { id, url } => {
            let mut page = find_page(&pages, id).await?;
            page.url = Some(url);
            rewriter.save(&mut page).await?;
            println!(
                "Updated page {} at {}",
                id,
                page.url.as_deref().unwrap_or("(no url)")
            );
            Ok(())
        }

        PageCommands::SetState { id, state } => {
            let mut page = find_page(&pages, id).await?;
            page.state = PageState::parse(&state).map_err(|e| anyhow!(e))?;
            rewriter.save(&mut page).await?;
            println!("Page {} is now {}", id, page.state);
            Ok(())
        }

        PageCommands::Rm { id } => {
            let page = find_page(&pages, id).await?;
            rewriter.remove(&page).await?;
            println!(
                "Removed page {}; {} is free for reuse",
                id,
                page.url.as_deref().unwrap_or("(no url)")
            );
            Ok(())
        }
    }
}

async fn find_site(pool: &SqlitePool, label: &str) -> Result<Site> {
    SiteRepository::new(pool.clone())
        .find_by_label(label)
        .await?
        .ok_or_else(|| anyhow!("Site '{}' not found", label))
}

async fn find_page(pages: &PageRepository, id: i64) -> Result<Page> {
    pages
        .find_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("Page with id {} not found", id))
}
