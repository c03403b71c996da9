// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Gesture media control.
//!
//! A terminal application that turns hand gestures from a camera into media
//! player commands.
//!
//! An external hand-pose estimator (a MediaPipe subprocess) streams per-frame
//! hand landmarks into the application. Each frame is run through a pure
//! classification pipeline, per-digit extension extraction followed by an
//! ordered gesture rule table, and the recognized gesture is handed to a
//! debounced dispatcher that drives the controlled media player. A second
//! hand in frame sets the volume directly from its raised-finger count.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. It uses an
//! event-driven architecture where:
//!
//! * The **Main Thread** owns the per-frame pipeline, the UI rendering, and
//!   all dispatch state.
//! * **Background Workers** own everything that blocks: the estimator
//!   subprocess and the media control adapter.
//!
//! Communication between the workers and the main loop is handled via
//! `std::sync::mpsc` channels.

mod actions;
mod config;
mod dispatch;
mod gesture;
mod hand;
mod player;
mod render;
mod theme;
mod tracker;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    actions::events::{AppEvent, process_events},
    config::AppConfig,
    dispatch::GestureDispatcher,
    gesture::{Gesture, GestureClassifier},
    hand::TrackedHand,
    player::{MediaController, PlayerStatus},
    theme::Theme,
};

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub controller: MediaController,
    pub dispatcher: GestureDispatcher,
    pub classifier: GestureClassifier,
    pub backend_name: &'static str,

    pub hands: Vec<TrackedHand>,
    pub last_gesture: Gesture,
    pub last_rule: Option<&'static str>,
    pub last_action: Option<&'static str>,

    pub player_status: PlayerStatus,
    pub last_error: Option<String>,
    pub ticks: u32,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let backend_name = player::ports::resolve_backend(&config).label();
        let controller = MediaController::new(&config, event_tx.clone());
        let dispatcher = GestureDispatcher::new(controller.clone(), &config);
        let classifier = GestureClassifier::for_vocabulary(config.vocabulary);

        Ok(Self {
            config,
            theme: Theme::default(),
            event_tx,
            event_rx,
            controller,
            dispatcher,
            classifier,
            backend_name,
            hands: Vec::new(),
            last_gesture: Gesture::Unknown,
            last_rule: None,
            last_action: None,
            player_status: PlayerStatus::default(),
            last_error: None,
            ticks: 0,
        })
    }
}

/// The entry point of the application.
///
/// Sets up the communication channels, initializes the application state,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    let config = config::load_config();
    // Materialize the file on first launch so users have something to edit.
    config::save_config(&config).ok();

    let mut app = App::new(config).context("Failed to initalise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    util::set_terminal_bg(&Theme::to_hex(app.theme.background_colour));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is designed to be "best-effort" and does not return a result,
/// as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event
/// loop.
///
/// This function spawns several long-running background threads:
/// * The hand tracker worker that owns the estimator subprocess.
/// * An input thread to poll for system keyboard events.
/// * A tick thread that paces status refreshes and UI redraws.
///
/// After spawning the workers, it hands control to [`process_events`] to
/// manage the pipeline and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn the estimator subprocess and its frame reader.
    tracker::spawn_tracker_worker(&app.config, app.event_tx.clone());

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                tx_keys.send(AppEvent::Key(key)).ok();
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let _ = tx_tick.send(AppEvent::Tick);
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
