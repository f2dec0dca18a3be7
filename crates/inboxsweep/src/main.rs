//! `InboxSweep` - scores Gmail messages for clutter and moves the worst to Trash.
//!
//! Built with Rust and the iced GUI framework.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod message;
mod model;
mod style;
mod view;

use std::sync::Arc;
use std::time::Duration;

use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{container, row};
use iced::{Element, Length, Subscription, Task};
use inboxsweep_core::{
    AppConfig, GmailClient, MessageRef, MessageReport, Preflight, ScanConfig, ScanSummary,
    Scanner, Scorer, SessionProvider, config,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use message::{KeyboardAction, Message};
use model::{AppSettings, Controls, NextMessage, ScanState};
use style::widgets::palette::{self, ThemeMode};

/// Timeout for every Gmail, token and completion request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inboxsweep=debug,inboxsweep_core=debug,inboxsweep_oauth=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InboxSweep");

    iced::application(InboxSweep::new, InboxSweep::update, InboxSweep::view)
        .title("InboxSweep")
        .subscription(InboxSweep::subscription)
        .run()
}

/// Main application state.
struct InboxSweep {
    /// Produces authenticated sessions; also owns the token cache.
    sessions: SessionProvider,
    /// Scoring strategy, fixed for the lifetime of the app.
    scorer: Arc<Scorer>,
    /// Environment facts shown in the sidebar.
    preflight: Preflight,
    /// Problem reading the environment, if any.
    config_error: Option<String>,
    /// Sidebar control values.
    controls: Controls,
    /// Current or last run.
    scan: ScanState,
    /// Informational line (revoke result).
    notice: Option<String>,
    /// Error outside of a run (bad controls, revoke, settings).
    error_message: Option<String>,
    /// Current theme mode.
    theme_mode: ThemeMode,
}

impl InboxSweep {
    /// Create new application instance.
    fn new() -> (Self, Task<Message>) {
        let (config, config_error) = match AppConfig::from_env() {
            Ok(config) => (config, None),
            Err(e) => {
                warn!("Invalid configuration, using defaults: {e}");
                (AppConfig::default(), Some(e.to_string()))
            }
        };

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Could not configure HTTP client, using defaults: {e}");
                reqwest::Client::new()
            });

        let scorer = config.scorer(http.clone());
        let preflight = Preflight::check(&config, &scorer);
        info!(
            credentials = %preflight.credentials_path.display(),
            found = preflight.credentials_found,
            scorer = %preflight.scorer_mode,
            "Preflight complete"
        );

        let app = Self {
            sessions: SessionProvider::new(&config, http),
            scorer: Arc::new(scorer),
            preflight,
            config_error,
            controls: Controls::default(),
            scan: ScanState::default(),
            notice: None,
            error_message: None,
            theme_mode: ThemeMode::default(),
        };
        app.apply_theme();

        (app, Task::perform(load_settings(), Message::SettingsLoaded))
    }

    /// Applies the current theme mode to the global palette.
    fn apply_theme(&self) {
        palette::set_theme(self.theme_mode);
    }

    /// Update state based on message.
    #[allow(clippy::needless_pass_by_value)]
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PreviewToggled(preview) => self.controls.preview = preview,
            Message::LimitChanged(limit) => self.controls.set_limit(limit),
            Message::LabelChanged(label) => self.controls.label = label,
            Message::ThresholdChanged(threshold) => self.controls.set_threshold(threshold),
            Message::StartScan => return self.start_scan(),
            Message::Authenticated(result) => match result {
                Ok(mailbox) => {
                    self.scan.authenticated(mailbox);
                    if let Some((mailbox, config)) = self.scan.listing_inputs() {
                        let scorer = Arc::clone(&self.scorer);
                        return Task::perform(
                            list_messages(mailbox, scorer, config),
                            Message::Listed,
                        );
                    }
                }
                Err(e) => {
                    warn!("Authentication failed: {e}");
                    self.scan.fail(e);
                }
            },
            Message::Listed(result) => match result {
                Ok(messages) => {
                    info!("Listed {} messages", messages.len());
                    return match self.scan.listed(messages) {
                        Some(next) => self.process(next),
                        None => self.finish_scan(),
                    };
                }
                Err(e) => {
                    warn!("Listing failed: {e}");
                    self.scan.fail(e);
                }
            },
            Message::Processed(report) => {
                return match self.scan.record(report) {
                    Some(next) => self.process(next),
                    None => self.finish_scan(),
                };
            }
            Message::ClearResults => {
                self.scan.clear();
                self.notice = None;
                self.error_message = None;
            }
            Message::RevokeSession => {
                if !self.scan.is_running() {
                    let sessions = self.sessions.clone();
                    return Task::perform(
                        async move { sessions.revoke().map_err(|e| e.to_string()) },
                        Message::Revoked,
                    );
                }
            }
            Message::Revoked(result) => match result {
                Ok(outcome) => {
                    self.error_message = None;
                    self.notice = Some(outcome.message().to_string());
                }
                Err(e) => self.error_message = Some(format!("Failed to revoke session: {e}")),
            },
            Message::ToggleTheme => {
                self.theme_mode = self.theme_mode.toggled();
                self.apply_theme();
                let settings = AppSettings {
                    theme_mode: self.theme_mode,
                };
                return Task::perform(save_settings(settings), Message::SettingsSaved);
            }
            Message::SettingsLoaded(result) => match result {
                Ok(settings) => {
                    info!("Settings loaded: theme={:?}", settings.theme_mode);
                    self.theme_mode = settings.theme_mode;
                    self.apply_theme();
                }
                Err(e) => info!("Failed to load settings, using defaults: {e}"),
            },
            Message::SettingsSaved(result) => {
                if let Err(e) = result {
                    self.error_message = Some(format!("Failed to save settings: {e}"));
                }
            }
            Message::Notified(result) => {
                if let Err(e) = result {
                    warn!("Desktop notification failed: {e}");
                }
            }
            Message::KeyPressed(action) => return Self::handle_keyboard_action(action),
            Message::Ignored => {}
        }
        Task::none()
    }

    fn start_scan(&mut self) -> Task<Message> {
        if self.scan.is_running() || !self.preflight.is_ready() {
            return Task::none();
        }
        let config = match self.controls.to_config() {
            Ok(config) => config,
            Err(e) => {
                self.error_message = Some(e);
                return Task::none();
            }
        };

        info!(
            preview = config.preview(),
            limit = config.limit(),
            label = %config.label(),
            threshold = config.threshold(),
            "Starting scan"
        );
        self.error_message = None;
        self.notice = None;
        self.scan.begin(config);

        Task::perform(authenticate(self.sessions.clone()), Message::Authenticated)
    }

    fn process(&self, next: NextMessage) -> Task<Message> {
        Task::perform(
            process_message(next, Arc::clone(&self.scorer)),
            Message::Processed,
        )
    }

    fn finish_scan(&self) -> Task<Message> {
        let Some(report) = self.scan.report() else {
            return Task::none();
        };
        let summary = report.summary();
        info!("Scan finished: {summary}");
        let preview = self.scan.config().is_some_and(ScanConfig::preview);
        Task::perform(notify_finished(summary, preview), Message::Notified)
    }

    /// Handle keyboard shortcut actions.
    fn handle_keyboard_action(action: KeyboardAction) -> Task<Message> {
        match action {
            KeyboardAction::Scan => Task::done(Message::StartScan),
            KeyboardAction::Clear => Task::done(Message::ClearResults),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let header = view::view_header(&self.preflight.scorer_mode, self.theme_mode);
        let sidebar = view::view_sidebar(
            &self.controls,
            &self.preflight,
            self.config_error.as_deref(),
            self.scan.is_running(),
        );
        let results = view::view_results(
            &self.scan,
            self.notice.as_deref(),
            self.error_message.as_deref(),
        );

        container(iced::widget::column![
            header,
            row![sidebar, results].height(Length::Fill)
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::widgets::app_background_style)
        .into()
    }

    /// Subscribe to keyboard events for shortcuts.
    #[allow(clippy::unused_self)] // Required signature for iced subscription
    fn subscription(&self) -> Subscription<Message> {
        keyboard::listen().map(|event| {
            if let keyboard::Event::KeyPressed { key, modifiers, .. } = event {
                handle_key_press(&key, modifiers).unwrap_or(Message::Ignored)
            } else {
                Message::Ignored
            }
        })
    }
}

/// Maps a key press to a shortcut.
fn handle_key_press(key: &Key, modifiers: Modifiers) -> Option<Message> {
    match key {
        Key::Named(keyboard::key::Named::F5) => Some(Message::KeyPressed(KeyboardAction::Scan)),
        Key::Named(keyboard::key::Named::Enter) if modifiers.command() => {
            Some(Message::KeyPressed(KeyboardAction::Scan))
        }
        Key::Named(keyboard::key::Named::Escape) => {
            Some(Message::KeyPressed(KeyboardAction::Clear))
        }
        _ => None,
    }
}

/// Get a session, opening the consent page in the browser when needed.
async fn authenticate(sessions: SessionProvider) -> Result<GmailClient, String> {
    let session = sessions
        .authenticate(|url| {
            info!("Opening Google consent page: {url}");
            if let Err(e) = opener::open_browser(url.as_str()) {
                warn!("Could not open a browser ({e}); visit the URL above manually");
            }
        })
        .await
        .map_err(|e| e.to_string())?;
    Ok(session.into_mailbox())
}

/// List the messages for a run.
async fn list_messages(
    mailbox: GmailClient,
    scorer: Arc<Scorer>,
    config: ScanConfig,
) -> Result<Vec<MessageRef>, String> {
    Scanner::new(&mailbox, &scorer, &config)
        .list()
        .await
        .map_err(|e| e.to_string())
}

/// Fetch, score and act on one message.
async fn process_message(next: NextMessage, scorer: Arc<Scorer>) -> MessageReport {
    Scanner::new(&next.mailbox, &scorer, &next.config)
        .process(next.index, &next.message)
        .await
}

/// Show a desktop notification summarising the run.
async fn notify_finished(summary: ScanSummary, preview: bool) -> Result<(), String> {
    let title = if preview {
        "InboxSweep preview finished"
    } else {
        "InboxSweep scan finished"
    };
    let body = if summary.total == 0 {
        inboxsweep_core::ScanReport::EMPTY_MESSAGE.to_string()
    } else {
        summary.to_string()
    };

    tokio::task::spawn_blocking(move || {
        notify_rust::Notification::new()
            .appname("InboxSweep")
            .summary(title)
            .body(&body)
            .show()
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}

/// Load application settings from file.
async fn load_settings() -> Result<AppSettings, String> {
    let Some(settings_path) = config::config_dir().map(|dir| dir.join("settings.json")) else {
        return Ok(AppSettings::default());
    };

    if !settings_path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = tokio::fs::read_to_string(&settings_path)
        .await
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

/// Save application settings to file.
async fn save_settings(settings: AppSettings) -> Result<(), String> {
    let config_dir = config::config_dir().ok_or("No configuration directory available")?;

    tokio::fs::create_dir_all(&config_dir)
        .await
        .map_err(|e| e.to_string())?;

    let settings_path = config_dir.join("settings.json");
    let contents = serde_json::to_string_pretty(&settings).map_err(|e| e.to_string())?;

    tokio::fs::write(&settings_path, contents)
        .await
        .map_err(|e| e.to_string())?;

    info!("Settings saved to {:?}", settings_path);
    Ok(())
}
