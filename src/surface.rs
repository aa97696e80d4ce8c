use macroquad::prelude::*;

/// 2D drawing target. `y` passed to [`Surface::draw_text`] is the vertical
/// middle of the line, not the baseline.
pub trait Surface {
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    fn measure_text(&self, text: &str, size: f32) -> f32;
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
}

/// Draws straight onto the macroquad window.
#[derive(Debug, Default)]
pub struct MacroquadSurface;

impl Surface for MacroquadSurface {
    fn size(&self) -> (f32, f32) { (screen_width(), screen_height()) }

    fn clear(&mut self) { clear_background(BLACK); }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        measure_text(text, None, size as u16, 1.0).width
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let dims = measure_text(text, None, size as u16, 1.0);
        let baseline = y + dims.offset_y * 0.5;
        let params = TextParams {
            font_size: size as u16,
            font_scale: 1.0,
            font_scale_aspect: 1.0,
            color,
            ..Default::default()
        };
        draw_text_ex(text, x, baseline, params);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color) {
        draw_line(x1, y1, x2, y2, thickness, color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        draw_rectangle(x, y, w, h, color);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Text { text: String, x: f32, y: f32, size: f32, color: Color },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
}

/// Headless surface that records draw calls. Glyphs are treated as
/// monospace, half as wide as the font size.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self { Self { width, height, calls: Vec::new() } }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn find_text(&self, needle: &str) -> Option<&DrawCall> {
        self.calls
            .iter()
            .find(|c| matches!(c, DrawCall::Text { text, .. } if text.contains(needle)))
    }

    pub fn line_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. })).count()
    }

    pub fn reset(&mut self) { self.calls.clear(); }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) { (self.width, self.height) }

    fn clear(&mut self) { self.calls.push(DrawCall::Clear); }

    fn measure_text(&self, text: &str, size: f32) -> f32 { text.chars().count() as f32 * size * 0.5 }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.calls.push(DrawCall::Text { text: text.to_string(), x, y, size, color });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, _thickness: f32, _color: Color) {
        self.calls.push(DrawCall::Line { x1, y1, x2, y2 });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.calls.push(DrawCall::Rect { x, y, w, h, color });
    }
}
