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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework: the tracked hands with their
//! per-digit extension state, the recognized gesture, and the controlled
//! player's status.
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event.

mod icons;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    hand::TrackedHand,
    hand::fingers::finger_pose,
    player::PlayerState,
    render::icons::{
        ICON_FINGER_CURLED, ICON_FINGER_RAISED, ICON_PAUSE, ICON_PLAY, ICON_STOP,
    },
};

const DIGIT_INITIALS: [&str; 5] = ["T", "I", "M", "R", "P"];

/// Renders the full interface.
pub(crate) fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_hands(f, chunks[1], app);
    draw_player(f, chunks[2], app);
    draw_footer(f, chunks[4], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            " mudra ",
            Style::default().add_modifier(Modifier::BOLD).fg(app.theme.accent_colour),
        ),
        Span::raw("gesture media control"),
        Span::styled(
            format!(
                "  [{} vocabulary, {} backend]",
                app.config.vocabulary.label(),
                app.backend_name
            ),
            Style::default().fg(app.theme.muted_fg),
        ),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

/// Renders the tracked hands with their per-digit state and the recognized
/// gesture.
fn draw_hands(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    if app.hands.is_empty() {
        lines.push(Line::from(Span::styled(
            "no hand in frame",
            Style::default().fg(app.theme.muted_fg),
        )));
    } else {
        for hand in &app.hands {
            lines.push(hand_line(hand, app));
        }
    }

    lines.push(Line::from(vec![
        Span::raw("gesture: "),
        Span::styled(
            app.last_gesture.label(),
            Style::default().add_modifier(Modifier::BOLD).fg(app.theme.accent_colour),
        ),
        Span::styled(
            match app.last_rule {
                Some(rule) => format!("  (rule {rule})"),
                None => String::new(),
            },
            Style::default().fg(app.theme.muted_fg),
        ),
    ]));

    if let Some(action) = app.last_action {
        lines.push(Line::from(vec![
            Span::raw("last action: "),
            Span::styled(action, Style::default().fg(app.theme.accent_colour)),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner_area);
}

fn hand_line<'a>(hand: &TrackedHand, app: &App) -> Line<'a> {
    let physical = hand.handedness.physical(app.config.mirrored_view);
    let pose = finger_pose(&hand.landmarks);

    let mut spans = vec![Span::styled(
        format!("{:>5} hand  ", physical.label()),
        Style::default().add_modifier(Modifier::BOLD).fg(Color::White),
    )];

    for (digit, &raised) in pose.0.iter().enumerate() {
        let (icon, colour) = if raised {
            (ICON_FINGER_RAISED, app.theme.raised_finger_fg)
        } else {
            (ICON_FINGER_CURLED, app.theme.curled_finger_fg)
        };
        spans.push(Span::styled(
            format!("{}{} ", DIGIT_INITIALS[digit], icon),
            Style::default().fg(colour),
        ));
    }

    Line::from(spans)
}

/// Renders the controlled player's cached status.
fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let icon = match app.player_status.state {
        PlayerState::Playing => ICON_PLAY,
        PlayerState::Paused => ICON_PAUSE,
        PlayerState::Ready => ICON_STOP,
    };

    let track_line = Line::from(vec![
        Span::styled(
            format!(" {} ", icon),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(Color::White),
        Span::styled(
            app.player_status.track.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
        Span::raw(format!("  ({})", app.player_status.state.label())),
    ]);
    f.render_widget(Paragraph::new(track_line), chunks[0]);

    let volume_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(chunks[2]);

    let volume = app.player_status.volume.clamp(0, 100);
    let volume_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(f64::from(volume) / 100.0)
        .label("")
        .use_unicode(true);
    f.render_widget(volume_gauge, volume_chunks[0]);

    let volume_label = Paragraph::new(format!(" {}%", volume))
        .alignment(Alignment::Right)
        .fg(Color::White);
    f.render_widget(volume_label, volume_chunks[1]);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.last_error {
        Some(error) => Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(app.theme.error_fg),
        )),
        None => Line::from(Span::styled(
            " q quit | space play/pause | n/b track | -/= volume",
            Style::default().fg(app.theme.muted_fg),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
