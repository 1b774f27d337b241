mod action;
mod app;
mod auth;
mod browse;
mod catalog;
mod config;
mod error;
mod event;
mod feed;
mod link;
mod tmdb;
mod tui;
mod types;
mod ui;
mod window;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::event::Event;
use crate::tmdb::Tmdb;
use crate::types::{Category, QueryState};

#[derive(Parser, Debug)]
#[command(
    name = "reel",
    version,
    about = "Browse, search, and paginate TMDB movies from the terminal"
)]
struct Cli {
    /// Category to start in: popular, top-rated, or upcoming
    #[arg(long, default_value = "popular")]
    category: Category,

    /// Start with a search query
    #[arg(long)]
    search: Option<String>,

    /// Start at a page
    #[arg(long)]
    page: Option<u32>,

    /// Restore a shared position, e.g. "search=dune&page=3"
    #[arg(long, conflicts_with_all = ["search", "page"])]
    link: Option<String>,
}

impl Cli {
    fn starting_query(&self) -> QueryState {
        if let Some(position) = &self.link {
            return link::parse(position);
        }
        QueryState {
            search: self.search.clone().unwrap_or_default(),
            page: self.page.unwrap_or(1).max(1),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let config = Config::load();
    let api_key = auth::resolve_api_key(&config)?;
    let catalog = Tmdb::new(api_key, config.language.clone())?;

    let result = run(Arc::new(catalog), &config, &cli).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(
    catalog: Arc<dyn Catalog>,
    config: &Config,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(catalog, action_tx.clone(), config);
    app.restore(cli.category, cli.starting_query());

    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = tui::EventHandler::new(render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
