use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};
use txpanel_api::ActionKind;
use txpanel_api_client::ToastKind;
use txpanel_core::Severity;

pub struct Theme;

impl Theme {
    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_DIM: Color = Color::DarkGray;
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_DISABLED: Color = Color::Rgb(60, 65, 80);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);

    // ── Badge backgrounds ────────────────────────────────────────────
    pub const BADGE_NEUTRAL: Color = Color::Rgb(70, 75, 90);

    // ── Tab style ────────────────────────────────────────────────────
    pub const TAB_INACTIVE: Color = Color::Rgb(120, 125, 140);
    pub const TAB_DANGER: Color = Color::Rgb(220, 80, 80);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_CARD: Padding = Padding::new(2, 2, 1, 1);
    pub const PADDING_COMPACT: Padding = Padding::new(1, 1, 0, 0);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }

    pub fn block_dim() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_DIM))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }
}

/// Badge style for a log counter.
pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Neutral => Style::new().fg(Theme::TEXT_SECONDARY).bg(Theme::BADGE_NEUTRAL),
        Severity::Medium => Style::new().fg(Color::Black).bg(Theme::ACCENT_YELLOW).bold(),
        Severity::High => Style::new().fg(Color::White).bg(Theme::ACCENT_RED).bold(),
    }
}

pub fn action_color(kind: &ActionKind) -> Color {
    match kind {
        ActionKind::Ban => Theme::ACCENT_RED,
        ActionKind::Warn => Theme::ACCENT_YELLOW,
        ActionKind::Other(_) => Theme::TEXT_SECONDARY,
    }
}

pub fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Loading => Theme::ACCENT_BLUE,
        ToastKind::Success => Theme::ACCENT_GREEN,
        ToastKind::Error => Theme::ACCENT_RED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_zero_ban_badge_is_red() {
        assert_eq!(severity_style(Severity::High).bg, Some(Theme::ACCENT_RED));
        assert_eq!(
            severity_style(Severity::Neutral).bg,
            Some(Theme::BADGE_NEUTRAL)
        );
    }

    #[test]
    fn action_color_maps_known_and_unknown_kinds() {
        assert_eq!(action_color(&ActionKind::Ban), Theme::ACCENT_RED);
        assert_eq!(action_color(&ActionKind::Warn), Theme::ACCENT_YELLOW);
        assert_eq!(
            action_color(&ActionKind::Other("kick".into())),
            Theme::TEXT_SECONDARY
        );
    }

    #[test]
    fn toast_color_follows_kind() {
        assert_eq!(toast_color(ToastKind::Error), Theme::ACCENT_RED);
        assert_eq!(toast_color(ToastKind::Success), Theme::ACCENT_GREEN);
    }
}
