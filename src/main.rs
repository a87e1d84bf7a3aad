// ============================================================================
// GoldWatch - Dashboard terminal des indicateurs liés à l'or
// ============================================================================
// Programme TUI : 5 cartes d'indicateurs (or, dollar, taux), graphiques
// ligne, rafraîchissement en arrière-plan et export CSV.
//
// Architecture :
// - L'event loop (thread principal) dessine et traite le clavier
// - Un worker thread exécute les tâches longues (fetch API, export) et
//   possède le cache d'une heure ; communication par channels mpsc
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use goldwatch::api::{DataSource, Snapshot, WINDOW_DAYS};
use goldwatch::app::App;
use goldwatch::cache::{CacheKey, SeriesCache};
use goldwatch::export;
use goldwatch::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand / AppResult : communication avec le worker thread
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Clone)]
enum AppCommand {
    /// Recharger les 5 séries ; force = true ignore le cache d'une heure
    Refresh { force: bool },

    /// Remplacer la clé API FRED (la prochaine Refresh l'utilisera)
    SetApiKey { key: String },

    /// Exporter le dernier snapshot en CSV dans le répertoire courant
    ExportCsv,
}

// Debug manuel : la clé API ne doit jamais finir dans les logs
impl std::fmt::Debug for AppCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppCommand::Refresh { force } => f.debug_struct("Refresh").field("force", force).finish(),
            AppCommand::SetApiKey { .. } => f.write_str("SetApiKey { key: <redacted> }"),
            AppCommand::ExportCsv => f.write_str("ExportCsv"),
        }
    }
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Snapshot chargé (depuis le cache ou les providers)
    DataLoaded {
        snapshot: Snapshot,
        errors: Vec<String>,
    },

    /// Export CSV terminé
    ExportFinished { path: String },

    /// Export CSV en échec
    ExportFailed { error: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne, sous le répertoire data de la plateforme
// (~/.local/share/goldwatch/logs sur Linux).
//
// Contrôle du niveau : RUST_LOG=debug, RUST_LOG=goldwatch=trace, etc.
// ============================================================================

fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("goldwatch")
        .join("logs");

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "goldwatch.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goldwatch=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("GoldWatch starting up");

    // Clé API FRED : variable d'environnement, modifiable ensuite avec [c]
    let fred_api_key = std::env::var("FRED_API_KEY").unwrap_or_default();
    if fred_api_key.is_empty() {
        warn!("FRED_API_KEY is not set; FRED series will fail until a key is entered");
    }

    // État partagé entre l'event loop et le worker
    let app = Arc::new(Mutex::new(App::new(fred_api_key)));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, app.clone());

    // Premier chargement : passe par le worker, l'UI affiche "chargement"
    let _ = command_tx.send(AppCommand::Refresh { force: false });

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app.clone(), &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// Thread séparé avec son runtime tokio : reçoit des AppCommand, exécute les
// fetch/export, renvoie des AppResult. Le cache d'une heure et le dernier
// snapshot vivent ici, pas dans l'état UI.
// ============================================================================

fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let source = match DataSource::new() {
            Ok(source) => source,
            Err(e) => {
                error!(error = ?e, "Failed to create data source, worker exiting");
                return;
            }
        };

        let mut cache = SeriesCache::new();
        let mut last_snapshot = Snapshot::new();
        let mut fred_api_key = {
            let app_lock = app.lock().unwrap();
            app_lock.fred_api_key.clone()
        };

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::Refresh { force } => {
                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.start_loading(Some(
                                    "Chargement des données...".to_string(),
                                ));
                            }

                            if force {
                                cache.invalidate();
                            }

                            let key = CacheKey::new(&fred_api_key, WINDOW_DAYS);

                            // Cache d'abord : un résultat de moins d'une heure
                            // est resservi tel quel
                            let (snapshot, errors) = match cache.get(key) {
                                Some((snapshot, errors)) => {
                                    info!("Serving snapshot from cache");
                                    (snapshot.clone(), errors.to_vec())
                                }
                                None => {
                                    let (snapshot, errors) = runtime.block_on(
                                        source.fetch_all(&fred_api_key, WINDOW_DAYS),
                                    );
                                    cache.store(key, snapshot.clone(), errors.clone());
                                    (snapshot, errors)
                                }
                            };

                            last_snapshot = snapshot.clone();
                            let _ = result_tx.send(AppResult::DataLoaded { snapshot, errors });

                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.stop_loading();
                            }
                        }

                        AppCommand::SetApiKey { key } => {
                            // La clé change : l'empreinte de cache aussi, la
                            // prochaine Refresh repartira des providers
                            fred_api_key = key;
                            info!("FRED API key updated");
                        }

                        AppCommand::ExportCsv => {
                            if last_snapshot.is_empty() {
                                let _ = result_tx.send(AppResult::ExportFailed {
                                    error: "aucune donnée à exporter".to_string(),
                                });
                                continue;
                            }

                            let csv = export::to_csv(&last_snapshot);
                            let path = export::export_filename(Local::now().date_naive());

                            match std::fs::write(&path, csv.as_bytes()) {
                                Ok(()) => {
                                    info!(path = %path, "CSV export written");
                                    let _ = result_tx.send(AppResult::ExportFinished { path });
                                }
                                Err(e) => {
                                    error!(error = ?e, "CSV export failed");
                                    let _ = result_tx.send(AppResult::ExportFailed {
                                        error: e.to_string(),
                                    });
                                }
                            }
                        }
                    }
                }
                Err(_) => {
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// Pattern classique : résultats du worker → render → input → update
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // Résultats du worker (non-bloquant)
        match result_rx.try_recv() {
            Ok(result) => match result {
                AppResult::DataLoaded { snapshot, errors } => {
                    let mut app_lock = app.lock().unwrap();
                    info!(
                        series = snapshot.len(),
                        failures = errors.len(),
                        "Applying fetched snapshot"
                    );
                    app_lock.apply_snapshot(&snapshot, errors);
                }
                AppResult::ExportFinished { path } => {
                    let mut app_lock = app.lock().unwrap();
                    app_lock.set_status(format!("📥 CSV exporté : {}", path));
                }
                AppResult::ExportFailed { error } => {
                    let mut app_lock = app.lock().unwrap();
                    app_lock.set_status(format!("⚠ Export échoué : {}", error));
                }
            },
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // Render
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // Input
        if let Ok(event) = events.next() {
            let mut app_lock = app.lock().unwrap();
            handle_event(&mut app_lock, event, &command_tx);
        }

        // Update
        {
            let mut app_lock = app.lock().unwrap();
            app_lock.tick();
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// Ordre des guards : le mode input capture tout en premier (une clé API
/// peut contenir 'q', 'r', 'e'...), puis les raccourcis globaux, puis les
/// raccourcis propres à chaque écran.
fn handle_event(app: &mut App, event: goldwatch::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use goldwatch::ui::events::{
        get_char_from_event, is_api_key_char_event, is_api_key_event, is_backspace_event,
        is_down_event, is_enter_event, is_escape_event, is_export_event, is_force_refresh_event,
        is_help_event, is_quit_event, is_refresh_event, is_space_event, is_table_event,
        is_up_event, Event,
    };

    match event {
        // ========================================
        // Mode input : saisie de la clé API FRED
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_in_input_mode() => {
            info!("User cancelled API key input");
            app.cancel_input();
        }

        Event::Key(_) if is_enter_event(&event) && app.is_in_input_mode() => {
            let key = app.submit_input().trim().to_string();
            if key.is_empty() {
                debug!("Empty API key input, ignoring");
            } else {
                info!("User submitted a new FRED API key");
                app.fred_api_key = key.clone();
                let _ = command_tx.send(AppCommand::SetApiKey { key });
                let _ = command_tx.send(AppCommand::Refresh { force: false });
            }
        }

        Event::Key(_) if is_backspace_event(&event) && app.is_in_input_mode() => {
            app.backspace();
        }

        Event::Key(_) if is_api_key_char_event(&event) && app.is_in_input_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }

        // Toute autre touche en mode input : ignorée
        Event::Key(_) if app.is_in_input_mode() => {}

        // ========================================
        // Raccourcis globaux (tous les écrans hors mode input)
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_force_refresh_event(&event) => {
            app.cancel_quit();
            info!("User requested forced refresh");
            let _ = command_tx.send(AppCommand::Refresh { force: true });
        }

        Event::Key(_) if is_refresh_event(&event) => {
            app.cancel_quit();
            info!("User requested refresh");
            let _ = command_tx.send(AppCommand::Refresh { force: false });
        }

        Event::Key(_) if is_export_event(&event) => {
            app.cancel_quit();
            info!("User requested CSV export");
            let _ = command_tx.send(AppCommand::ExportCsv);
        }

        // ========================================
        // Dashboard
        // ========================================
        Event::Key(_) if is_up_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            debug!("User navigated up");
            app.navigate_up();
        }

        Event::Key(_) if is_down_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            debug!("User navigated down");
            app.navigate_down();
        }

        Event::Key(_) if is_enter_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            if let Some(card) = app.selected_card() {
                info!(metric = card.metric.label(), "User opened chart view");
            }
            app.show_chart();
        }

        Event::Key(_) if is_api_key_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            info!("User started API key input");
            app.start_input("Clé API FRED : ".to_string());
        }

        Event::Key(_) if is_table_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            info!("User opened table view");
            app.show_table();
        }

        Event::Key(_) if is_help_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            info!("User opened help view");
            app.show_help();
        }

        // ========================================
        // Vues graphique, tableau et aide
        // ========================================
        Event::Key(_) if (is_escape_event(&event) || is_space_event(&event))
            && (app.is_on_chart() || app.is_on_table() || app.is_on_help()) =>
        {
            app.cancel_quit();
            debug!("User returned to dashboard");
            app.show_dashboard();
        }

        Event::Tick => {}

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit si active
            app.cancel_quit();
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// Raw mode + alternate screen. Toujours restaurer avant de quitter, même en
// cas d'erreur, pour ne pas laisser le terminal cassé.
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
