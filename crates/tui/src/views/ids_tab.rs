use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use txpanel_api::PlayerSnapshot;

fn section(lines: &mut Vec<Line<'static>>, title: &str, ids: &[String]) {
    lines.push(Line::styled(
        format!("{title} ({})", ids.len()),
        Style::new().fg(Theme::ACCENT_BLUE).bold(),
    ));
    if ids.is_empty() {
        lines.push(Line::styled(
            "  none",
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        ));
    }
    for id in ids {
        lines.push(Line::styled(
            format!("  {id}"),
            Style::new().fg(Theme::TEXT_CONTENT),
        ));
    }
    lines.push(Line::raw(""));
}

/// Current identifiers first; older ones only when the backend sent them.
pub fn render(frame: &mut Frame, player: &PlayerSnapshot, area: Rect) {
    let mut lines = Vec::new();
    section(&mut lines, "Player Identifiers", &player.ids);
    section(&mut lines, "Hardware IDs", &player.hwids);
    if let Some(old) = player.old_ids.as_deref().filter(|ids| !ids.is_empty()) {
        section(&mut lines, "Previous Identifiers", old);
    }
    if let Some(old) = player.old_hwids.as_deref().filter(|ids| !ids.is_empty()) {
        section(&mut lines, "Previous Hardware IDs", old);
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::views::test_support::buffer_to_string;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use txpanel_core::testing::player;

    #[test]
    fn lists_current_and_previous_ids() {
        let mut p = player("tabby");
        p.ids = vec!["license:aaa".into(), "discord:123".into()];
        p.old_ids = Some(vec!["license:old".into()]);
        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, &p, area);
            })
            .expect("draw");
        let text = buffer_to_string(terminal.backend().buffer());

        assert!(text.contains("Player Identifiers (2)"));
        assert!(text.contains("discord:123"));
        assert!(text.contains("Hardware IDs (0)"));
        assert!(text.contains("Previous Identifiers (1)"));
        assert!(!text.contains("Previous Hardware IDs"));
    }
}
