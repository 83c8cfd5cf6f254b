use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::sync::Arc;

use stepflow_rs::flow::{check, DocumentLoader, Session, Transition, Values};
use stepflow_rs::kit::{PageCompletion, PageRef, Result, RuntimeConfig, SessionObserver};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a document for integrity defects
    Check {
        /// Path to the document (JSON or YAML)
        #[arg(short, long)]
        file: String,
    },
    /// Run a session non-interactively from scripted answers
    Simulate {
        /// Path to the document (JSON or YAML)
        #[arg(short, long)]
        file: String,

        /// Path to a list of per-page answer maps (JSON or YAML)
        #[arg(short, long)]
        answers: String,
    },
}

/// Prints session events to stdout
struct PrintObserver;

#[async_trait]
impl SessionObserver for PrintObserver {
    fn on_page_change(&self, page: &PageRef) {
        println!("-> page {} '{}' ({})", page.index, page.id, page.name);
    }

    fn on_page_complete(&self, completion: &PageCompletion) {
        println!(
            "   completed '{}' with {} answer(s)",
            completion.page.id,
            completion.values.len()
        );
    }

    async fn on_complete(&self, values: &Values, redirect_url: Option<&str>) -> Result<()> {
        match redirect_url {
            Some(url) => println!("Finished, redirecting to {}", url),
            None => println!("Finished"),
        }
        println!("{}", serde_json::to_string_pretty(values)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let loader = DocumentLoader::new();

    match args.command {
        Commands::Check { file } => {
            let document = loader
                .load(&file)
                .with_context(|| format!("loading {}", file))?;
            let defects = check(&document);
            if defects.is_empty() {
                println!("{}: ok ({} pages)", file, document.page_count());
                return Ok(());
            }
            for defect in &defects {
                println!("{}: {}", file, defect);
            }
            anyhow::bail!("{} defect(s) found", defects.len());
        }
        Commands::Simulate { file, answers } => {
            let document = loader
                .load(&file)
                .with_context(|| format!("loading {}", file))?;
            let script = loader
                .load_answers(&answers)
                .with_context(|| format!("loading {}", answers))?;
            let config = RuntimeConfig::from_env()?;

            let session = Session::builder(document)
                .with_config(&config)?
                .observer(Arc::new(PrintObserver))
                .start()
                .await;
            log::info!("Simulating session {}", session.session_id());

            for values in script {
                match session.next(values).await {
                    Transition::Invalid(errors) => {
                        for (block, message) in &errors {
                            println!("   {}: {}", block, message);
                        }
                    }
                    Transition::Redirected(_) | Transition::Completed => break,
                    Transition::Moved(_) | Transition::Ignored => {}
                }
            }

            if !session.state().await.is_terminal() {
                println!("Answers ran out on page {}", session.current_index().await);
            }
            println!(
                "Variables: {}",
                serde_json::to_string(&session.variables().await.to_json())?
            );
        }
    }

    Ok(())
}
