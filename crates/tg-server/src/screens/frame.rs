//! Rendered buffers as plain frame text

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Blank buffer covering a terminal of `width` x `height`
pub fn canvas(width: u16, height: u16) -> Buffer {
    Buffer::empty(Rect::new(0, 0, width, height))
}

/// Flatten a buffer into newline separated rows
///
/// A wide grapheme occupies several cells; the cells it covers are skipped.
/// Trailing blanks on each row and trailing empty rows are dropped.
pub fn to_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut rows: Vec<String> = Vec::with_capacity(usize::from(area.height));

    for y in area.top()..area.bottom() {
        let mut row = String::new();
        let mut x = area.left();
        while x < area.right() {
            let symbol = buf[(x, y)].symbol();
            row.push_str(symbol);
            let width = u16::try_from(symbol.width()).unwrap_or(u16::MAX);
            x = x.saturating_add(width.max(1));
        }
        rows.push(row.trim_end().to_string());
    }

    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows.join("\n")
}
