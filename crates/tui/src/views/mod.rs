pub mod ban_tab;
pub mod history_tab;
pub mod ids_tab;
pub mod info_tab;
pub mod modal;
pub mod tab_bar;
pub mod toasts;

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::buffer::Buffer;

    pub fn buffer_to_string(buffer: &Buffer) -> String {
        let area = *buffer.area();
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }
}
