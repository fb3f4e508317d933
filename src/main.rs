mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut settings = AppSettings::load();
    match parse_cli_args(std::env::args().skip(1)) {
        CliAction::Exit => return Ok(()),
        CliAction::Run { source } => {
            if source.is_some() {
                settings.source = source;
            }
        }
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let refresh_interval = settings.refresh_interval;
    let source = settings.source.clone();
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(source, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic snapshot refresh thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), refresh_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger snapshot load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

#[derive(Debug, PartialEq)]
enum CliAction {
    Exit,
    Run { source: Option<String> },
}

fn parse_cli_args(mut args: impl Iterator<Item = String>) -> CliAction {
    let Some(arg) = args.next() else {
        return CliAction::Run { source: None };
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            CliAction::Exit
        }
        "-V" | "--version" => {
            println!("knockout {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit
        }
        flag if flag.starts_with('-') => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
        _ => CliAction::Run { source: Some(arg) },
    }
}

fn usage_text() -> &'static str {
    "knockout - knockout bracket terminal viewer

Usage:
  knockout [SOURCE]
  knockout --help
  knockout --version

SOURCE is a path to a bracket snapshot JSON file or an http(s) URL serving one.

Environment:
  KNOCKOUT_SOURCE            Snapshot source when SOURCE is omitted
  KNOCKOUT_REFRESH_SECS      Seconds between reloads (default 30)
  KNOCKOUT_CARD_HEIGHT       Card height in rows (default 3)
  KNOCKOUT_BASE_GAP          Rows between first-round cards (default 1)
  KNOCKOUT_CARD_WIDTH        Card width in columns (default 22)
  KNOCKOUT_CONNECTOR_WIDTH   Connector width in columns (default 4)
  KNOCKOUT_LOG               Log level: error, warn, info, debug, trace (default error)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadSnapshot).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::SnapshotLoaded { snapshot } => {
            let mut guard = app.lock().await;
            guard.on_snapshot_loaded(snapshot);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Hide);
    let _ = execute!(stdout, terminal::EnterAlternateScreen);
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = terminal::enable_raw_mode();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn no_args_runs_with_configured_source() {
        assert_eq!(parse_cli_args(args(&[])), CliAction::Run { source: None });
    }

    #[test]
    fn positional_arg_is_the_source() {
        assert_eq!(
            parse_cli_args(args(&["bracket.json"])),
            CliAction::Run { source: Some("bracket.json".into()) }
        );
    }

    #[test]
    fn version_exits() {
        assert_eq!(parse_cli_args(args(&["--version"])), CliAction::Exit);
    }
}
