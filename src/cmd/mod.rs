use clap::{Parser, Subcommand};

use crate::prelude::Result;

mod evaluate;
mod history;
mod migrate;
mod probe;
mod settings;
mod work;

#[derive(Parser)]
#[command(about = "evaluates candidate CVs against job descriptions")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Run queue consumers until interrupted
    Work,
    /// Run one evaluation batch and print the outcome
    Evaluate {
        #[arg(long)]
        jd: String,
        #[arg(long = "cv", required = true)]
        cvs: Vec<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Check whether the active AI provider is reachable
    Probe,
    /// Activate an AI provider configuration
    SetProvider {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<i32>,
    },
    /// List recent evaluation records
    History {
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    Migrate,
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    match args.command {
        Some(SubCommandType::Work) => {
            work::run().await?;
        }
        Some(SubCommandType::Evaluate { jd, cvs, tags }) => {
            evaluate::run(&jd, cvs, tags).await?;
        }
        Some(SubCommandType::Probe) => {
            probe::run().await?;
        }
        Some(SubCommandType::SetProvider {
            provider,
            model,
            api_key,
            host,
            port,
        }) => {
            settings::set_provider(&provider, model, api_key, host, port).await?;
        }
        Some(SubCommandType::History { limit }) => {
            history::run(limit).await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
