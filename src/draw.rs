//! Text-mode widgets drawn onto a [`Surface`].

use macroquad::color::Color;

use crate::surface::Surface;

pub const TEXT_COLOR: Color = Color::new(0.604, 0.647, 0.627, 1.0); // #9aa5a0
pub const SELECTED_COLOR: Color = Color::new(0.078, 0.922, 0.416, 1.0); // #14eb6a
pub const GRID_COLOR: Color = Color::new(0.133, 0.133, 0.133, 1.0); // #222
pub const WIDGET_SIZE: f32 = 28.0;
const DIAL_PAD: &str = " "; // between a dial value and its arrows

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub align: Align,
}

impl Default for TextStyle {
    fn default() -> Self { Self { color: TEXT_COLOR, size: 24.0, align: Align::Center } }
}

fn widget_style(selected: bool) -> TextStyle {
    TextStyle {
        color: if selected { SELECTED_COLOR } else { TEXT_COLOR },
        size: WIDGET_SIZE,
        align: Align::Center,
    }
}

pub fn text(surface: &mut dyn Surface, text: &str, x: f32, y: f32, style: TextStyle) {
    let left = match style.align {
        Align::Left => x,
        Align::Center => x - surface.measure_text(text, style.size) * 0.5,
        Align::Right => x - surface.measure_text(text, style.size),
    };
    surface.draw_text(text, left, y, style.size, style.color);
}

pub fn button(surface: &mut dyn Surface, label: &str, x: f32, y: f32, selected: bool) {
    text(surface, label, x, y, widget_style(selected));
}

pub fn checkbox(surface: &mut dyn Surface, label: &str, x: f32, y: f32, selected: bool, checked: bool) {
    let mark = if checked { "[X]" } else { "[ ]" };
    text(surface, &format!("{label} {mark}"), x, y, widget_style(selected));
}

pub fn dial(surface: &mut dyn Surface, label: &str, value: &str, x: f32, y: f32, selected: bool) {
    text(surface, &format!("{label}: <{DIAL_PAD}{value}{DIAL_PAD}>"), x, y, widget_style(selected));
}

/// Pad `text` to exactly `width` characters. Longer text is left as is.
pub fn format_cell(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    let padding = width.saturating_sub(len);
    match align {
        Align::Left => format!("{text}{}", " ".repeat(padding)),
        Align::Right => format!("{}{text}", " ".repeat(padding)),
        Align::Center => {
            let left = padding / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(padding - left))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub label: &'static str,
    pub width: usize,
    pub align: Align,
}

pub fn table_line(cells: &[String], columns: &[Column]) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| format_cell(cells.get(i).map(String::as_str).unwrap_or(""), col.width, col.align))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn table_header(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|col| format_cell(col.label, col.width, col.align))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn table_separator(columns: &[Column]) -> String {
    columns.iter().map(|col| "-".repeat(col.width)).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub row_height: f32,
    pub font_size: f32,
}

pub const MAX_ROW_HEIGHT: f32 = 32.0;

/// Fit header, separator and `rows` data rows into `available` pixels.
pub fn table_layout(rows: usize, available: f32) -> TableLayout {
    let lines = (rows + 2) as f32;
    let row_height = (available / lines).clamp(8.0, MAX_ROW_HEIGHT);
    let font_size = (row_height * 0.75).round().clamp(8.0, 24.0);
    TableLayout { row_height, font_size }
}

/// Left-aligned rows starting at (`x`, `y`): header, separator, then data.
pub fn table(surface: &mut dyn Surface, rows: &[Vec<String>], columns: &[Column], x: f32, y: f32, layout: TableLayout) {
    let style = TextStyle { color: TEXT_COLOR, size: layout.font_size, align: Align::Left };

    text(surface, &table_header(columns), x, y, style);
    text(surface, &table_separator(columns), x, y + layout.row_height, style);
    for (i, row) in rows.iter().enumerate() {
        let line = table_line(row, columns);
        text(surface, &line, x, y + layout.row_height * (i as f32 + 2.0), style);
    }
}

pub fn grid(surface: &mut dyn Surface, tile: f32) {
    let (w, h) = surface.size();

    let mut x = 0.0;
    while x <= w {
        surface.draw_line(x, 0.0, x, h, 1.0, GRID_COLOR);
        x += tile;
    }
    let mut y = 0.0;
    while y <= h {
        surface.draw_line(0.0, y, w, y, 1.0, GRID_COLOR);
        y += tile;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, RecordingSurface};

    #[test]
    fn format_cell_pads_by_alignment() {
        assert_eq!(format_cell("ab", 5, Align::Left), "ab   ");
        assert_eq!(format_cell("ab", 5, Align::Right), "   ab");
        assert_eq!(format_cell("ab", 5, Align::Center), " ab  ");
    }

    #[test]
    fn format_cell_does_not_truncate() {
        assert_eq!(format_cell("overflowing", 4, Align::Left), "overflowing");
    }

    #[test]
    fn table_lines_have_equal_width() {
        let columns = [
            Column { label: "#", width: 3, align: Align::Right },
            Column { label: "Name", width: 10, align: Align::Left },
            Column { label: "Score", width: 6, align: Align::Right },
        ];
        let header = table_header(&columns);
        let separator = table_separator(&columns);
        let row = table_line(&["1".into(), "Ada".into(), "42".into()], &columns);

        assert_eq!(header.len(), 21);
        assert_eq!(separator.len(), 21);
        assert_eq!(row, "  1 Ada            42");
    }

    #[test]
    fn table_layout_shrinks_for_many_rows() {
        let roomy = table_layout(3, 400.0);
        assert_eq!(roomy.row_height, MAX_ROW_HEIGHT);
        assert_eq!(roomy.font_size, 24.0);

        let packed = table_layout(20, 440.0);
        assert_eq!(packed.row_height, 20.0);
        assert_eq!(packed.font_size, 15.0);
    }

    #[test]
    fn centered_text_is_offset_by_half_its_width() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        text(&mut surface, "abcd", 400.0, 100.0, TextStyle { size: 10.0, ..TextStyle::default() });

        match &surface.calls[0] {
            DrawCall::Text { x, .. } => assert_eq!(*x, 390.0),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn widgets_render_state_markers() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        checkbox(&mut surface, "Grid lines", 0.0, 0.0, false, true);
        dial(&mut surface, "Volume", "80", 0.0, 0.0, true);

        assert_eq!(surface.texts(), vec!["Grid lines [X]", "Volume: < 80 >"]);
        match &surface.calls[1] {
            DrawCall::Text { color, .. } => assert_eq!(*color, SELECTED_COLOR),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn grid_covers_the_surface() {
        let mut surface = RecordingSurface::new(100.0, 60.0);
        grid(&mut surface, 20.0);
        assert_eq!(surface.line_count(), 6 + 4);
    }
}
