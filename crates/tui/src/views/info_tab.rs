use crate::app::{App, Focus};
use crate::theme::{Theme, severity_style};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use txpanel_api::PlayerModalSuccess;
use txpanel_api_client::Transport;
use txpanel_core::format::{date_text, play_time_text, session_time_text, whitelisted_text};

const LABEL_WIDTH: usize = 17;

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", label, width = LABEL_WIDTH),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ),
        Span::styled(value, Style::new().fg(Theme::TEXT_PRIMARY)),
    ])
}

fn action_hint(key: &'static str, label: &'static str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::new().fg(Theme::ACCENT_YELLOW).bold(),
            Style::new().fg(Theme::TEXT_CONTENT),
        )
    } else {
        (
            Style::new().fg(Theme::TEXT_DISABLED),
            Style::new().fg(Theme::TEXT_DISABLED),
        )
    };
    vec![
        Span::raw("  "),
        Span::styled(format!("[{key}] "), key_style),
        Span::styled(label, label_style),
    ]
}

pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>, data: &PlayerModalSuccess, area: Rect) {
    let player = &data.player;
    let modal = &app.modal;

    let mut lines = Vec::new();
    if player.is_connected {
        lines.push(row("Session Time", session_time_text(player.session_time)));
    }
    lines.push(row("Play Time", play_time_text(player.play_time)));
    lines.push(row("Join Date", date_text(player.ts_joined)));
    if !player.is_connected {
        lines.push(row("Last Connection", date_text(player.ts_last_connection)));
    }

    let mut whitelist = row("ID Whitelisted", whitelisted_text(player.ts_whitelisted));
    let label = modal.whitelist_label().unwrap_or("Add WL");
    whitelist
        .spans
        .extend(action_hint("w", label, modal.can_whitelist()));
    lines.push(whitelist);

    let mut log = vec![Span::styled(
        format!("{:<width$}", "Log", width = LABEL_WIDTH),
        Style::new().fg(Theme::TEXT_SECONDARY),
    )];
    if let Some(badges) = modal.log_badges() {
        for badge in badges {
            log.push(Span::styled(
                format!(" {} ", badge.label),
                severity_style(badge.severity),
            ));
            log.push(Span::raw(" "));
        }
    }
    log.extend(action_hint("v", "View", true));
    lines.push(Line::from(log));

    lines.push(Line::raw(""));

    let notes = modal.notes();
    lines.push(Line::from(vec![
        Span::styled("Notes: ", Style::new().fg(Theme::TEXT_PRIMARY).bold()),
        Span::styled(notes.status().to_string(), Style::new().fg(Theme::TEXT_MUTED)),
    ]));

    let [fields_area, notes_area] =
        Layout::vertical([Constraint::Length(lines.len() as u16), Constraint::Fill(1)])
            .areas(area);
    frame.render_widget(Paragraph::new(lines), fields_area);

    let editing = app.focus == Focus::Notes;
    let block = if editing {
        Theme::block_accent()
    } else {
        Theme::block_dim()
    };
    let body = if notes.draft().is_empty() && !editing {
        Text::styled(notes.placeholder(), Style::new().fg(Theme::TEXT_MUTED).italic())
    } else {
        let mut text = notes.draft().to_string();
        if editing {
            text.push('_');
        }
        Text::styled(text, Style::new().fg(Theme::TEXT_CONTENT))
    };
    frame.render_widget(
        Paragraph::new(body).block(block).wrap(Wrap { trim: false }),
        notes_area,
    );
}
