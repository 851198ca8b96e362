//! Login form layout

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::symbols::border;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Widget, Wrap};

use super::{keymap, LoginScreen, CANCEL, FIELD_COUNT, SUBMIT};
use crate::screens::frame;

/// Width of the form including its borders
pub const FORM_WIDTH: u16 = 52;

/// Rows kept for the wrapped error message
const ERROR_ROWS: u16 = 2;
const HELP_ROWS: u16 = 2;
/// Label and input per field, a gap, the buttons, the error, two borders
const BOX_HEIGHT: u16 = 2 * FIELD_COUNT as u16 + 2 + ERROR_ROWS + 2;

const LABELS: [&str; FIELD_COUNT] = ["Username", "Password"];

pub(super) fn render(screen: &LoginScreen) -> String {
    let mut buf = frame::canvas(screen.sizing.width, screen.sizing.height);
    let area = buf.area;
    draw(screen, area, &mut buf);
    frame::to_text(&buf)
}

fn draw(screen: &LoginScreen, area: Rect, buf: &mut Buffer) {
    let banner_rows = if screen.params.banner.is_empty() { 0 } else { 3 };
    let tab_rows = if screen.params.tabs.is_empty() { 0 } else { 1 };

    let [form, help] = Layout::vertical([
        Constraint::Length(banner_rows + tab_rows + BOX_HEIGHT),
        Constraint::Length(HELP_ROWS),
    ])
    .flex(Flex::SpaceBetween)
    .areas(area);

    let [column] = Layout::horizontal([Constraint::Length(FORM_WIDTH)])
        .flex(Flex::Center)
        .areas(form);

    let [banner, tabs, body] = Layout::vertical([
        Constraint::Length(banner_rows),
        Constraint::Length(tab_rows),
        Constraint::Length(BOX_HEIGHT),
    ])
    .areas(column);

    if banner_rows > 0 {
        Paragraph::new(screen.params.banner.as_str())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP | Borders::BOTTOM)
                    .border_set(border::DOUBLE),
            )
            .render(banner, buf);
    }

    if tab_rows > 0 {
        let names: Vec<&str> = screen.params.tabs.names().collect();
        Paragraph::new(tab_row(&names, &screen.selected))
            .alignment(Alignment::Center)
            .render(tabs, buf);
    }

    draw_body(screen, body, buf);

    Paragraph::new(keymap::help_line())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(help, buf);
}

fn draw_body(screen: &LoginScreen, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::vertical(
        [Constraint::Length(1); 2 * FIELD_COUNT + 2]
            .into_iter()
            .chain([Constraint::Length(ERROR_ROWS)]),
    )
    .split(inner);

    for (i, (label, input)) in LABELS.iter().zip(screen.inputs.iter()).enumerate() {
        Paragraph::new(*label).render(rows[2 * i], buf);
        Paragraph::new(input.view()).render(rows[2 * i + 1], buf);
    }

    let buttons = format!(
        "{}  {}",
        button("Submit", screen.focus == SUBMIT),
        button("Cancel", screen.focus == CANCEL)
    );
    Paragraph::new(buttons)
        .alignment(Alignment::Center)
        .render(rows[2 * FIELD_COUNT + 1], buf);

    if let Some(timed) = &screen.last_error {
        Paragraph::new(timed.to_string())
            .wrap(Wrap { trim: true })
            .render(rows[2 * FIELD_COUNT + 2], buf);
    }
}

fn button(label: &str, focused: bool) -> String {
    if focused {
        format!("[ {} ]", label)
    } else {
        format!("  {}  ", label)
    }
}

/// Tab labels with the selected one bracketed
fn tab_row(names: &[&str], selected: &str) -> String {
    names
        .iter()
        .map(|name| {
            if *name == selected {
                format!("[{}]", name)
            } else {
                format!(" {} ", name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_row() {
        assert_eq!(tab_row(&["basic", "ldap"], "ldap"), " basic  [ldap]");
    }

    #[test]
    fn test_button() {
        assert_eq!(button("Submit", true), "[ Submit ]");
        assert_eq!(button("Submit", false), "  Submit  ");
    }

    #[test]
    fn test_box_height() {
        assert_eq!(BOX_HEIGHT, 10);
    }
}
