use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use txpanel_core::Tab;

/// Tab strip of the player modal. Number prefixes are hidden while a text
/// field has focus, since digits are typed into the field then.
pub fn render(frame: &mut Frame, active: Tab, area: Rect, keys_enabled: bool) {
    let mut spans = vec![Span::styled(" ", Style::new())];

    for (idx, tab) in Tab::ALL.into_iter().enumerate() {
        let is_active = tab == active;
        let style = if is_active {
            Style::new()
                .fg(Color::Black)
                .bg(Theme::ACCENT_BLUE)
                .bold()
                .add_modifier(Modifier::UNDERLINED)
        } else if tab == Tab::Ban {
            Style::new().fg(Theme::TAB_DANGER)
        } else {
            Style::new().fg(Theme::TAB_INACTIVE)
        };

        let text = if keys_enabled {
            format!(" {}:{} ", idx + 1, tab.title())
        } else {
            format!(" {} ", tab.title())
        };

        spans.push(Span::styled(text, style));
        spans.push(Span::styled(" ", Style::new()));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}
