use crate::app::App;
use crate::theme::{Theme, action_color};
use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use txpanel_api::PlayerModalSuccess;
use txpanel_api_client::Transport;
use txpanel_core::format::{MISSING, datetime_text_in, expiration_text};
use txpanel_core::history::newest_first;

pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>, data: &PlayerModalSuccess, area: Rect) {
    let revocable = app
        .selected_action_id()
        .is_some_and(|id| app.modal.can_revoke(&id));
    render_rows(frame, data, app.history_index, revocable, area);
}

/// `revocable` adds the revoke hint to the selected row.
fn render_rows(
    frame: &mut Frame,
    data: &PlayerModalSuccess,
    selected: usize,
    revocable: bool,
    area: Rect,
) {
    let history = newest_first(&data.player.action_history);
    if history.is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No bans or warns found.",
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let selected = selected.min(history.len() - 1);
    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let when = datetime_text_in(entry.ts, &Local).unwrap_or_else(|| MISSING.to_string());
            let mut header = vec![
                Span::styled(
                    format!("{:<5}", entry.kind.label().to_uppercase()),
                    Style::new().fg(action_color(&entry.kind)).bold(),
                ),
                Span::styled(format!(" {} ", entry.id), Style::new().fg(Theme::TEXT_MUTED)),
                Span::styled(
                    format!("by {} ", entry.author),
                    Style::new().fg(Theme::TEXT_SECONDARY),
                ),
                Span::styled(when, Style::new().fg(Theme::TEXT_MUTED)),
            ];
            let status = match (&entry.revoked_by, entry.kind.as_str()) {
                (Some(by), _) => Span::styled(
                    format!("  revoked by {by}"),
                    Style::new().fg(Theme::TEXT_DISABLED).italic(),
                ),
                (None, "ban") => Span::styled(
                    format!("  {}", expiration_text(entry.exp, data.server_time)),
                    Style::new().fg(Theme::TEXT_SECONDARY),
                ),
                (None, _) => Span::raw(""),
            };
            header.push(status);
            if revocable && idx == selected {
                header.push(Span::styled(
                    "  [x] revoke",
                    Style::new().fg(Theme::ACCENT_YELLOW).bold(),
                ));
            }

            let reason = Line::from(Span::styled(
                format!("      {}", entry.reason),
                Style::new().fg(Theme::TEXT_CONTENT),
            ));
            ListItem::new(vec![Line::from(header), reason])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::new().bg(Theme::BORDER_NORMAL))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::buffer_to_string;
    use txpanel_api::ActionKind;
    use txpanel_core::testing::{entry, player};

    #[test]
    fn empty_history_shows_placeholder() {
        let text = render_history(Vec::new(), false);
        assert!(text.contains("No bans or warns found."));
    }

    #[test]
    fn entries_show_kind_author_and_state() {
        let mut ban = entry("B1", ActionKind::Ban);
        ban.ts = 2_000;
        ban.exp = None;
        let mut warn = entry("W1", ActionKind::Warn);
        warn.ts = 1_000;
        warn.revoked_by = Some("mod".into());

        let text = render_history(vec![warn, ban], true);
        let ban_pos = text.find("BAN").expect("ban row");
        let warn_pos = text.find("WARN").expect("warn row");
        assert!(ban_pos < warn_pos);
        assert!(text.contains("permanent"));
        assert!(text.contains("revoked by mod"));
        assert!(text.contains("test reason"));
        let hint = text.find("[x] revoke").expect("revoke hint");
        assert!(hint < warn_pos);
    }

    fn render_history(history: Vec<txpanel_api::ActionHistoryEntry>, revocable: bool) -> String {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let mut p = player("tabby");
        p.action_history = history;
        let data = PlayerModalSuccess {
            server_time: 3_000,
            player: p,
        };
        let backend = TestBackend::new(100, 8);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_rows(frame, &data, 0, revocable, area);
            })
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }
}
