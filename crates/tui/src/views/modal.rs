use crate::app::{App, Focus};
use crate::theme::Theme;
use crate::views::{ban_tab, history_tab, ids_tab, info_tab, tab_bar};
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph, Wrap};
use txpanel_api_client::Transport;
use txpanel_core::{Phase, Tab};

fn title_spans(phase: &Phase) -> Vec<Span<'static>> {
    match phase {
        Phase::Loaded(data) => {
            let tag = match data.player.netid {
                Some(netid) => format!("[{netid}] "),
                None => "[OFFLINE] ".to_string(),
            };
            vec![
                Span::styled(tag, Style::new().fg(Theme::TEXT_SECONDARY)),
                Span::styled(
                    data.player.display_name.clone(),
                    Style::new().fg(Theme::TEXT_PRIMARY).bold(),
                ),
            ]
        }
        Phase::Failed(_) => vec![Span::styled(
            "Error!",
            Style::new().fg(Theme::ACCENT_RED).bold(),
        )],
        Phase::Idle | Phase::Loading => vec![Span::styled(
            "Loading...",
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        )],
    }
}

/// The player modal popup, centered over the whole frame.
pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let area = frame.area();
    let popup_width = 90u16.min(area.width.saturating_sub(4));
    let popup_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let session = app.modal.session();
    let mut title = vec![Span::raw(" ")];
    title.extend(title_spans(session.phase()));
    title.push(Span::raw(" "));
    let block = Theme::block()
        .title(Line::from(title))
        .padding(Theme::PADDING_COMPACT);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let [tabs_area, _, body_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    tab_bar::render(
        frame,
        app.modal.active_tab(),
        tabs_area,
        app.focus == Focus::Tabs,
    );

    match session.phase() {
        Phase::Loaded(data) => match app.modal.active_tab() {
            Tab::Info => info_tab::render(frame, app, data, body_area),
            Tab::History => history_tab::render(frame, app, data, body_area),
            Tab::Ids => ids_tab::render(frame, &data.player, body_area),
            Tab::Ban => ban_tab::render(frame, app, body_area),
        },
        Phase::Failed(text) => {
            let error = Paragraph::new(Line::styled(
                format!("Error: {text}"),
                Style::new().fg(Theme::ACCENT_RED),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(error, body_area);
        }
        Phase::Idle | Phase::Loading => {
            let loading = Paragraph::new(Line::styled(
                "Loading...",
                Style::new().fg(Theme::TEXT_MUTED).italic(),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(loading, body_area);
        }
    }
}

/// Shown behind a closed modal until the user reopens or quits.
pub fn render_closed(frame: &mut Frame, area: Rect) {
    let block = Theme::block_dim().padding(Theme::PADDING_CARD);
    let lines = vec![
        Line::styled("Player modal closed.", Style::new().fg(Theme::TEXT_SECONDARY)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("o ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("reopen  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
            Span::styled("q ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("quit", Style::new().fg(Theme::TEXT_KEY_DESC)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}
