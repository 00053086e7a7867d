pub mod layout;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    ui::layout::{fitted_grid, screen_layout, Fixation, GridGeometry},
    util::{format_best, format_ms},
};

const FIXATION_SYMBOL: &str = "●";

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let settings = &self.settings;
        let trial = &self.trial;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let layout = screen_layout(area);

        Paragraph::new(Span::styled(
            format!(
                "Schulte table  {}×{} · {}",
                settings.size, settings.size, settings.mode
            ),
            Style::default().fg(Color::Cyan).patch(bold_style),
        ))
        .alignment(Alignment::Center)
        .render(layout.title, buf);

        let time_style = if trial.has_finished() {
            Style::default().fg(Color::Green).patch(bold_style)
        } else {
            bold_style
        };
        let stats = Line::from(vec![
            Span::styled("time ", dim_style),
            Span::styled(format_ms(self.display_ms), time_style),
            Span::styled("   best ", dim_style),
            Span::styled(format_best(self.best), bold_style),
            Span::styled("   next ", dim_style),
            Span::styled(
                trial.target().unwrap_or("—").to_string(),
                Style::default().fg(Color::Yellow).patch(bold_style),
            ),
        ]);
        Paragraph::new(stats)
            .alignment(Alignment::Center)
            .render(layout.stats, buf);

        Paragraph::new(Span::styled(self.status(), italic_style))
            .alignment(Alignment::Center)
            .render(layout.status, buf);

        Paragraph::new(Span::styled(
            format!(
                "{} · keep your eyes on the centre, use peripheral vision",
                settings.mode.describe(settings.size)
            ),
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center)
        .render(layout.hint, buf);

        if let Some(geo) = fitted_grid(layout.grid, settings.size, trial.sequence()) {
            render_grid(self, geo, buf);
        } else {
            Paragraph::new(Span::styled(
                "terminal too small for this grid",
                Style::default().fg(Color::Red),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout.grid, buf);
        }

        Paragraph::new(Span::styled(
            format!(
                "(+/-) size {}  (m) mode  (f) fixation {}  (h) highlight {}",
                settings.size,
                on_off(settings.show_fixation),
                on_off(settings.highlight_target)
            ),
            Style::default().fg(Color::Gray).patch(italic_style),
        ))
        .alignment(Alignment::Center)
        .render(layout.settings, buf);

        Paragraph::new(Span::styled(
            "(space) start / (r) new grid / (arrows+enter or click) pick / (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(layout.legend, buf);
    }
}

fn render_grid(app: &App, geo: GridGeometry, buf: &mut Buffer) {
    let trial = &app.trial;
    let highlight = app.settings.highlight_target && !trial.has_finished();

    let cell_style = Style::default().add_modifier(Modifier::BOLD);
    let target_style = Style::default().bg(Color::Green).fg(Color::Black);
    let shade_style = Style::default().bg(Color::DarkGray);

    for (row, values) in trial.grid().iter().chunks(geo.size).into_iter().enumerate() {
        for (col, value) in values.enumerate() {
            let cell = row * geo.size + col;
            let face = geo.face(cell);

            if highlight && trial.is_target_cell(cell) {
                buf.set_style(face, target_style);
            } else if (row + col) % 2 == 0 {
                buf.set_style(face, shade_style);
            }

            let mut style = cell_style;
            if cell == app.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let (x, y) = geo.text_origin(cell, value.width() as u16);
            buf.set_stringn(x, y, value, face.width as usize, style);
        }
    }

    if !app.settings.show_fixation {
        return;
    }
    match geo.fixation() {
        Fixation::Gap { x, y } => {
            if let Some(c) = buf.cell_mut((x, y)) {
                c.set_symbol(FIXATION_SYMBOL);
                c.set_fg(Color::Yellow);
            }
        }
        Fixation::Cell(cell) => {
            let width = trial.grid()[cell].width() as u16;
            let (x, y) = geo.text_origin(cell, width);
            buf.set_style(
                Rect::new(x, y, width, 1),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::UNDERLINED),
            );
        }
    }
}
