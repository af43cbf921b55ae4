pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Atlas CLI - inspect forum permissions and mint development tokens")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show what a member may do in a forum of a fixture site")]
    Check {
        #[arg(long, help = "Site fixture (YAML)")]
        fixture: PathBuf,
        #[arg(long, help = "Forum id")]
        forum: Uuid,
        #[arg(long, help = "Member id from the fixture; anonymous when omitted")]
        member: Option<Uuid>,
        #[arg(long = "role", help = "Additional role to hold (repeatable)")]
        roles: Vec<String>,
    },

    #[command(about = "List the permission sets of a fixture site")]
    Sets {
        #[arg(long, help = "Site fixture (YAML)")]
        fixture: PathBuf,
    },

    #[command(about = "Generate a bearer token for a member")]
    Token {
        #[arg(long, help = "Site id")]
        site: Uuid,
        #[arg(long, help = "Member id")]
        member: Uuid,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Check {
            fixture,
            forum,
            member,
            roles,
        } => commands::check::handle(fixture, forum, member, roles, output_format).await,
        Commands::Sets { fixture } => commands::sets::handle(fixture, output_format),
        Commands::Token { site, member } => commands::token::handle(site, member, output_format),
    }
}
