use crate::app::{App, FlashLevel, Focus};
use crate::theme::Theme;
use crate::views::{modal, toasts};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use txpanel_api_client::Transport;
use txpanel_core::Tab;

pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let [body_area, footer_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

    if app.modal.is_open() {
        modal::render(frame, app);
    } else {
        let [_, closed_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(5),
            Constraint::Fill(1),
        ])
        .areas(body_area);
        modal::render_closed(frame, closed_area);
    }

    render_footer(frame, app, footer_area);
    toasts::render(frame, &app.toasts.visible());
}

fn hints<T: Transport>(app: &App<T>) -> Vec<(&'static str, &'static str)> {
    if !app.modal.is_open() {
        return vec![("o", "reopen"), ("q", "quit")];
    }
    match app.focus {
        Focus::Notes => {
            if app.modal.options().touch {
                vec![("Ctrl+S", "save"), ("Esc", "done")]
            } else {
                vec![("Enter", "save"), ("Shift+Enter", "newline"), ("Esc", "done")]
            }
        }
        Focus::BanReason => vec![("Enter", "ban"), ("Esc", "done")],
        Focus::Tabs => {
            let mut keys = vec![("1-4/Tab", "tabs")];
            match app.modal.active_tab() {
                Tab::Info => {
                    keys.push(("w", "whitelist"));
                    keys.push(("n", "notes"));
                    keys.push(("v", "history"));
                }
                Tab::History => {
                    keys.push(("j/k", "select"));
                    keys.push(("x", "revoke"));
                }
                Tab::Ids => {}
                Tab::Ban => {
                    keys.push(("e", "reason"));
                    keys.push(("[/]", "duration"));
                    keys.push(("b", "ban"));
                }
            }
            keys.push(("r", "refresh"));
            keys.push(("Esc", "close"));
            keys
        }
    }
}

fn render_footer<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let mut spans = vec![Span::raw(" ")];
    for (key, desc) in hints(app) {
        spans.push(Span::styled(format!("{key} "), key_style));
        spans.push(Span::styled(format!("{desc}  "), desc_style));
    }

    if let Some((ref msg, level)) = app.flash_message {
        let color = match level {
            FlashLevel::Error => Theme::ACCENT_RED,
            FlashLevel::Info => Theme::ACCENT_BLUE,
        };
        spans.push(Span::styled(msg.as_str(), Style::new().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
