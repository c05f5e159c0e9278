/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */


//! docflowctl - command-line interface for the docflow workflow engine.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docflow::config::{ConfigLoader, DocflowConfig};

mod commands;

/// docflow - assignment and acknowledgment workflow engine
#[derive(Parser)]
#[command(name = "docflowctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL; overrides the configuration file
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Configuration file (defaults to $DOCFLOW_CONFIG or the search path)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Register users and documents
    Directory {
        #[command(subcommand)]
        command: DirectoryCommands,
    },

    /// Dashboard summaries
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommands,
    },

    /// Acknowledgment queues
    Acknowledgments {
        #[command(subcommand)]
        command: AcknowledgmentCommands,
    },
}

#[derive(Subcommand)]
enum DirectoryCommands {
    /// Add a user to the directory
    AddUser {
        #[arg(long)]
        login: String,

        #[arg(long)]
        full_name: String,

        /// Comma-separated roles: admin, clerk, executor
        #[arg(long, default_value = "executor")]
        roles: String,
    },

    /// Register a document
    AddDocument {
        /// incoming or outgoing
        #[arg(long)]
        kind: String,

        #[arg(long)]
        number: String,

        #[arg(long)]
        subject: String,
    },
}

#[derive(Subcommand)]
enum DashboardCommands {
    /// Print the dashboard summary for a user as JSON
    Stats {
        /// Login of the user to act as
        #[arg(long)]
        login: String,

        /// Requested dashboard role
        #[arg(long)]
        role: Option<String>,

        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Window end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Named window ending today: month, quarter or year
        #[arg(long, conflicts_with_all = ["start", "end"])]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
enum AcknowledgmentCommands {
    /// List acknowledgments awaiting a user's confirmation
    Pending {
        #[arg(long)]
        login: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    docflow::init_logging(Some(level));

    match cli.command {
        Commands::Migrate => commands::migrate::run(&config).await?,
        Commands::Directory { command } => match command {
            DirectoryCommands::AddUser {
                login,
                full_name,
                roles,
            } => commands::directory::add_user(&config, login, full_name, &roles).await?,
            DirectoryCommands::AddDocument {
                kind,
                number,
                subject,
            } => commands::directory::add_document(&config, &kind, number, subject).await?,
        },
        Commands::Dashboard { command } => match command {
            DashboardCommands::Stats {
                login,
                role,
                start,
                end,
                period,
            } => {
                commands::dashboard::stats(
                    &config,
                    &login,
                    commands::dashboard::StatsArgs {
                        role,
                        start,
                        end,
                        period,
                    },
                )
                .await?
            }
        },
        Commands::Acknowledgments { command } => match command {
            AcknowledgmentCommands::Pending { login } => {
                commands::acknowledgments::pending(&config, &login).await?
            }
        },
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<DocflowConfig> {
    let mut config = ConfigLoader::new()
        .load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }
    Ok(config)
}
