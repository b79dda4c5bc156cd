use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::state::MatrixRain;

/// Length of the fading tail behind each drop head.
const TRAIL: u16 = 8;

/// Draws the current rain frame. Holds no state of its own; the frame is
/// advanced by [`MatrixRain::on_frame`].
pub struct MatrixRainWidget<'a> {
    rain: &'a MatrixRain,
    accent: Color,
}

impl<'a> MatrixRainWidget<'a> {
    pub fn new(rain: &'a MatrixRain, accent: Color) -> Self {
        Self { rain, accent }
    }
}

impl Widget for MatrixRainWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (x, &head) in self.rain.drops().iter().enumerate().take(area.width as usize) {
            let x = x as u16;
            for age in 0..TRAIL {
                let Some(y) = head.checked_sub(age) else {
                    break;
                };
                if y >= area.height {
                    continue;
                }
                let style = match age {
                    0 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    1..=3 => Style::default().fg(self.accent),
                    _ => Style::default().fg(self.accent).add_modifier(Modifier::DIM),
                };
                let mut glyph = [0u8; 4];
                buf[(area.x + x, area.y + y)]
                    .set_symbol(self.rain.glyph(x, y).encode_utf8(&mut glyph))
                    .set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::prefs::PreferenceSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::sync::mpsc;

    #[test]
    fn idle_rain_draws_nothing() {
        let rain = MatrixRain::with_rng(StdRng::seed_from_u64(0));
        let area = Rect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(area);
        MatrixRainWidget::new(&rain, Color::Green).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[tokio::test]
    async fn drops_draw_inside_area() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut rain = MatrixRain::with_rng(StdRng::seed_from_u64(9));
        let prefs = PreferenceSet { matrix_active: true, ..PreferenceSet::default() };
        rain.sync(&prefs, &tx);
        let Some(AppEvent::RainFrame(generation)) = rx.recv().await else {
            panic!("expected a rain frame");
        };
        assert!(rain.on_frame(generation, 6, 4));

        let area = Rect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(area);
        MatrixRainWidget::new(&rain, Color::Green).render(area, &mut buf);
        let lit = buf.content().iter().filter(|cell| cell.symbol() != " ").count();
        assert!(lit > 0);

        // Stopping clears the columns, so the next render is blank.
        rain.stop();
        let mut buf = Buffer::empty(area);
        MatrixRainWidget::new(&rain, Color::Green).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
