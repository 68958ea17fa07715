mod cli;
mod config;
mod controller;
mod error;
mod launcher;
mod repository;
#[cfg(test)]
mod tests;
mod types;
mod ui;
mod utils;

use clap::Parser;
use crossterm::{
    execute,
    style::{Stylize, style},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::IsTerminal;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use cli::{Cli, Command, NodeOp, PodOp};
use config::StoreConfig;
use launcher::Launcher;
use repository::Repository;
use types::{NewNode, NewPod, Node, Pod, ScaleRequest};
use ui::{Action, App, AppEvent};
use utils::{format_table, status_tone, tone_crossterm_color};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine if we'll use TUI mode (needed to configure logging appropriately)
    let use_tui = cli.command.is_none() && !cli.no_tui && std::io::stdout().is_terminal();

    // Initialize tracing subscriber - configure differently for TUI vs stdout mode
    let filter = if cli.verbose { "debug" } else { "info" };
    if use_tui {
        // In TUI mode: write logs to a file to avoid corrupting the display
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/aks-console.log");

        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
            )
            .with_target(false)
            .with_ansi(false);
        match log_file {
            Ok(file) => builder.with_writer(std::sync::Mutex::new(file)).init(),
            Err(_) => {
                eprintln!("Warning: Could not open /tmp/aks-console.log for logging");
                builder.with_writer(std::io::sink).init();
            }
        }
    } else {
        // In stdout mode: write logs to stderr
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let store_config = match StoreConfig::resolve(&cli.config, cli.store_overrides()) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid store configuration: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // No offline mode: without a store connection nothing else starts
    let mut repo = match Repository::connect(&store_config).await {
        Ok(repo) => repo,
        Err(e) => {
            error!("Could not connect to {}: {}", store_config.redacted_url(), e);
            eprintln!("DB Connection failed: {}", e);
            std::process::exit(1);
        }
    };

    if cli.init_schema {
        repo.ensure_schema().await?;
    }

    let launcher = Launcher::new(cli.launcher_config());

    let result = match cli.command.clone() {
        Some(command) => run_command(&mut repo, &launcher, command).await,
        None if use_tui => run_tui_mode(&mut repo, &launcher).await,
        None => print_snapshot(&mut repo).await,
    };

    let closed = repo.close().await;
    result?;
    closed?;
    Ok(())
}

async fn run_command(
    repo: &mut Repository,
    launcher: &Launcher,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Nodes { op } => match op {
            NodeOp::List => print_nodes(&repo.list_nodes().await?),
            NodeOp::Add {
                name,
                status,
                kubelet_version,
            } => {
                repo.insert_node(&NewNode {
                    name,
                    status,
                    kubelet_version,
                })
                .await?;
                print_nodes(&repo.list_nodes().await?);
            }
            NodeOp::Delete { id } => {
                repo.delete_node(id).await?;
                print_nodes(&repo.list_nodes().await?);
            }
        },
        Command::Pods { op } => match op {
            PodOp::List => print_pods(&repo.list_pods().await?),
            PodOp::Add {
                name,
                namespace,
                status,
            } => {
                repo.insert_pod(&NewPod {
                    name,
                    namespace,
                    status,
                })
                .await?;
                print_pods(&repo.list_pods().await?);
            }
            PodOp::Delete { id } => {
                repo.delete_pod(id).await?;
                print_pods(&repo.list_pods().await?);
            }
        },
        Command::Scale {
            deployment,
            namespace,
            cpu,
        } => {
            let request = ScaleRequest {
                deployment,
                namespace,
                cpu,
            };
            print!("{}", launcher.autoscale(&request).await?);
        }
    }
    Ok(())
}

async fn print_snapshot(repo: &mut Repository) -> anyhow::Result<()> {
    let nodes = repo.list_nodes().await?;
    let pods = repo.list_pods().await?;
    println!("{}", style("AKS Nodes").bold());
    print_nodes(&nodes);
    println!();
    println!("{}", style("AKS Pods").bold());
    print_pods(&pods);
    Ok(())
}

fn print_nodes(nodes: &[Node]) {
    let rows: Vec<Vec<String>> = nodes
        .iter()
        .map(|n| {
            vec![
                n.id.to_string(),
                n.name.clone(),
                n.status.clone(),
                n.kubelet_version.clone(),
            ]
        })
        .collect();
    let statuses: Vec<&str> = nodes.iter().map(|n| n.status.as_str()).collect();
    print_colored(
        &format_table(&["ID", "NAME", "STATUS", "KUBELET VERSION"], &rows),
        &statuses,
    );
}

fn print_pods(pods: &[Pod]) {
    let rows: Vec<Vec<String>> = pods
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.namespace.clone(),
                p.status.clone(),
            ]
        })
        .collect();
    let statuses: Vec<&str> = pods.iter().map(|p| p.status.as_str()).collect();
    print_colored(
        &format_table(&["ID", "NAME", "NAMESPACE", "STATUS"], &rows),
        &statuses,
    );
}

/// Print a formatted table, coloring row `i` by the tone of `statuses[i]`.
/// Color is skipped when stdout is not a terminal.
fn print_colored(table: &str, statuses: &[&str]) {
    let colorize = std::io::stdout().is_terminal();
    let mut lines = table.lines();
    if let Some(header) = lines.next() {
        if colorize {
            println!("{}", style(header).bold());
        } else {
            println!("{}", header);
        }
    }
    for (line, status) in lines.zip(statuses) {
        if colorize {
            println!("{}", style(line).with(tone_crossterm_color(status_tone(status))));
        } else {
            println!("{}", line);
        }
    }
}

async fn run_tui_mode(repo: &mut Repository, launcher: &Launcher) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    // Create event channel
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(100);

    // Spawn keyboard event loop
    tokio::spawn(async move {
        ui::events::event_loop(event_tx).await;
    });

    let result = tui_loop(&mut terminal, &mut app, repo, launcher, event_rx).await;

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn tui_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    repo: &mut Repository,
    launcher: &Launcher,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> anyhow::Result<()> {
    run_action(terminal, app, repo, launcher, Action::RefreshAll).await?;

    while let Some(event) = event_rx.recv().await {
        match event {
            AppEvent::Key(key) => {
                if let Some(action) = ui::events::handle_key_event(app, key) {
                    if action == Action::Quit {
                        info!("Quit requested");
                        break;
                    }
                    run_action(terminal, app, repo, launcher, action).await?;
                }
                ui::renderer::render(terminal, app)?;
            }
            AppEvent::Tick => {
                ui::renderer::render(terminal, app)?;
            }
        }
    }
    Ok(())
}

/// Show the in-flight action in the status bar, then run it to completion.
/// Input queues behind it until it returns.
async fn run_action<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    repo: &mut Repository,
    launcher: &Launcher,
    action: Action,
) -> anyhow::Result<()> {
    debug!("Action: {:?}", action);
    app.busy = Some(action.describe());
    ui::renderer::render(terminal, app)?;
    controller::perform(app, repo, launcher, action).await;
    app.busy = None;
    ui::renderer::render(terminal, app)?;
    Ok(())
}
