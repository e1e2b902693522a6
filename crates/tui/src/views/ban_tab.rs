use crate::app::{App, Focus};
use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use txpanel_api_client::Transport;
use txpanel_core::workflows::BAN_DURATIONS;

pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    if !app.modal.can_ban() {
        let denied = Paragraph::new(Line::styled(
            "You don't have permission to ban players.",
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(denied, area);
        return;
    }

    let form = app.modal.ban();
    let editing = app.focus == Focus::BanReason;
    let [reason_area, duration_area, submit_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .areas(area);

    let block = if editing {
        Theme::block_accent().title(" Reason ")
    } else {
        Theme::block_dim().title(" Reason [e] ")
    };
    let reason = if form.reason().is_empty() && !editing {
        Span::styled(
            "The reason for the ban, rule violated, etc.",
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        )
    } else {
        let cursor = if editing { "_" } else { "" };
        Span::styled(
            format!("{}{cursor}", form.reason()),
            Style::new().fg(Theme::TEXT_PRIMARY),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(reason)).block(block), reason_area);

    let mut durations = vec![Span::styled(
        "Duration [/]: ",
        Style::new().fg(Theme::TEXT_SECONDARY),
    )];
    for (idx, preset) in BAN_DURATIONS.iter().enumerate() {
        let style = if idx == form.duration_index() {
            Style::new().fg(Color::Black).bg(Theme::ACCENT_RED).bold()
        } else {
            Style::new().fg(Theme::TAB_INACTIVE)
        };
        durations.push(Span::styled(format!(" {preset} "), style));
    }
    frame.render_widget(
        Paragraph::new(Line::from(durations)).wrap(Wrap { trim: true }),
        duration_area,
    );

    let submit = if form.is_pending() {
        Line::styled("Banning...", Style::new().fg(Theme::TEXT_MUTED).italic())
    } else {
        Line::from(vec![
            Span::styled("[b] ", Style::new().fg(Theme::ACCENT_YELLOW).bold()),
            Span::styled("Apply Ban", Style::new().fg(Theme::ACCENT_RED).bold()),
        ])
    };
    frame.render_widget(Paragraph::new(submit), submit_area);
}
