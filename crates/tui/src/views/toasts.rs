use crate::theme::{Theme, toast_color};
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};
use txpanel_api_client::{Toast, ToastKind};

const TOAST_WIDTH: u16 = 36;

/// Stack of toasts in the top-right corner, newest at the bottom.
pub fn render(frame: &mut Frame, toasts: &[Toast]) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y;

    for toast in toasts {
        if y + 3 > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width), y, width, 3);
        let icon = match toast.kind {
            ToastKind::Loading => "…",
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
        };
        let color = toast_color(toast.kind);
        let block = Theme::block().border_style(Style::new().fg(color));
        let line = Line::from(vec![
            Span::styled(format!("{icon} "), Style::new().fg(color).bold()),
            Span::styled(toast.message.clone(), Style::new().fg(Theme::TEXT_PRIMARY)),
        ]);
        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(line).block(block), rect);
        y += 3;
    }
}
