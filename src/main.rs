//! Notification orchestrator CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use notif_orchestrator::{Category, Config, Orchestrator, RpcServer, Urgency};

#[derive(Parser)]
#[command(name = "notif")]
#[command(about = "Notification orchestrator - urgency queue, category dependencies, focus mode and undo")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/notif-orchestrator/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON-RPC server (stdio unless --port is given)
    Serve {
        /// Listen on 127.0.0.1:<port>
        #[arg(long)]
        port: Option<u16>,
    },
    /// Score a notification without submitting it
    Classify {
        #[arg(long, default_value = "Unknown")]
        sender: String,
        #[arg(long)]
        content: String,
        /// Category (app_type)
        #[arg(long)]
        category: Category,
    },
    /// Print the effective configuration
    Config {
        /// Print only the default config file path
        #[arg(long)]
        path: bool,
    },
    /// Run a scripted scenario in-process and print each state
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "notif_orchestrator=debug,notif=debug"
    } else {
        "notif_orchestrator=info,notif=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout carries RPC responses, logs go to stderr
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            let orchestrator = Orchestrator::new(&config).context("Invalid dependency configuration")?;
            let server = RpcServer::new(orchestrator);
            match port {
                Some(port) => server.run_tcp(port).await?,
                None => server.run_stdio().await?,
            }
        }
        Commands::Classify { sender, content, category } => {
            let orchestrator = Orchestrator::new(&config).context("Invalid dependency configuration")?;
            let priority = orchestrator.classify(&sender, &content, category);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "sender": sender,
                    "content": content,
                    "app_type": category,
                    "priority": priority,
                    "urgency": Urgency::from_priority(priority),
                }))?
            );
        }
        Commands::Config { path } => {
            if path {
                println!("{}", cli.config.unwrap_or_else(Config::path).display());
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        Commands::Demo => run_demo(&config)?,
    }

    Ok(())
}

fn print_state(title: &str, orchestrator: &Orchestrator) -> Result<()> {
    println!("\n=== {} ===", title);
    println!("{}", serde_json::to_string_pretty(&orchestrator.list())?);
    Ok(())
}

/// Normal mode ordering, focus-mode buffering with an emergency override,
/// flush on exit, then dismiss and undo.
fn run_demo(config: &Config) -> Result<()> {
    let orchestrator = Orchestrator::new(config)?;

    info!("Phase 1: normal mode");
    orchestrator.notify("Mom", "Call me back", "social")?;
    orchestrator.notify("Promo", "50% Off", "news")?;
    orchestrator.notify("Boss", "Server Down!", "work")?;
    print_state("Normal mode", &orchestrator)?;

    while let Some(delivered) = orchestrator.deliver_next() {
        println!("Delivered: [{}] {} - {}", delivered.priority, delivered.sender, delivered.content);
    }

    info!("Phase 2: focus mode");
    orchestrator.set_mode(true, Some("DND"));
    let party = orchestrator.notify("Friend", "Party tonight?", "social")?;
    orchestrator.notify("Twitter", "New follower", "social")?;
    orchestrator.notify("Govt", "Earthquake Alert", "emergency")?;
    print_state("Focus mode", &orchestrator)?;
    println!("{}", orchestrator.summarize(party.id)?);

    info!("Phase 3: focus mode off");
    orchestrator.set_mode(false, None);
    print_state("Buffer flushed", &orchestrator)?;

    info!("Phase 4: dismiss and undo");
    if let Some(top) = orchestrator.deliver_next() {
        println!("Delivered: [{}] {} - {}", top.priority, top.sender, top.content);
    }
    orchestrator.dismiss(party.id)?;
    print_state("After dismiss", &orchestrator)?;
    let restored = orchestrator.undo()?;
    println!("Restored: {} ({})", restored.content, restored.status);
    println!("{}", serde_json::to_string_pretty(&orchestrator.visualize())?);

    Ok(())
}
