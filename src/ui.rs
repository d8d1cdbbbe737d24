use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::card::CardView;
use crate::editor::{ConfigEditor, FIELDS};
use crate::i18n::{tr, Phrase};

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &CardView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let italic = Style::default().add_modifier(Modifier::ITALIC);
        let dim = Style::default().add_modifier(Modifier::DIM);

        if let Some(error) = &self.error {
            let widget = Paragraph::new(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red).patch(bold),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            widget.render(area, buf);
            return;
        }

        let primary = rgb(self.primary);
        let alert = rgb(self.alert_color);

        let dish_lines = if self.show_dish_presets {
            self.dish_presets.len() as u16 + 2
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // padding
                Constraint::Length(1), // time readout
                Constraint::Length(1), // state badge
                Constraint::Length(1), // active dish / pending input
                Constraint::Length(1), // padding
                Constraint::Length(1), // minute presets
                Constraint::Length(dish_lines),
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Paragraph::new(Span::styled(
            format!("{} {}", self.icon, self.title),
            bold.fg(primary),
        ));
        header.render(chunks[0], buf);

        let time_style = if self.finished {
            bold.fg(alert).add_modifier(Modifier::SLOW_BLINK)
        } else if self.alert {
            bold.fg(alert)
        } else {
            bold.fg(primary)
        };
        Paragraph::new(Span::styled(self.time_text.clone(), time_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let badge_style = if self.finished || self.alert {
            italic.fg(alert)
        } else {
            italic.fg(primary)
        };
        Paragraph::new(Span::styled(self.state_label, badge_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if let Some(input) = &self.pending_input {
            Paragraph::new(Span::styled(format!("› {input}_"), bold))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        } else if let Some(dish) = &self.active_dish {
            Paragraph::new(Span::styled(
                format!("{} {}", dish.icon, dish.name),
                italic,
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }

        let mut preset_spans: Vec<Span> = Vec::new();
        for (idx, minutes) in self.presets.iter().enumerate().take(9) {
            if idx > 0 {
                preset_spans.push(Span::raw("  "));
            }
            preset_spans.push(Span::styled(format!("({})", idx + 1), dim));
            preset_spans.push(Span::styled(
                format!(" {minutes} {}", tr(self.lang, Phrase::Min)),
                Style::default(),
            ));
        }
        Paragraph::new(Line::from(preset_spans))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        if self.show_dish_presets {
            render_dish_list(self, chunks[7], buf);
        }

        let legend = if self.finished {
            format!("(enter) {}", tr(self.lang, Phrase::Ok))
        } else {
            format!(
                "(1-9) {}  (p) {}  (r) {}  (s) {}  (e) config  (q) quit",
                tr(self.lang, Phrase::Min),
                tr(self.lang, Phrase::Pause),
                tr(self.lang, Phrase::Resume),
                tr(self.lang, Phrase::Stop),
            )
        };
        let legend_style = if self.finished { bold.fg(alert) } else { italic };
        Paragraph::new(Span::styled(legend, legend_style)).render(chunks[9], buf);
    }
}

fn render_dish_list(view: &CardView, area: Rect, buf: &mut Buffer) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            tr(view.lang, Phrase::SelectDish).to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];
    for (idx, dish) in view.dish_presets.iter().enumerate() {
        let hotkey = (b'a' + (idx % 26) as u8) as char;
        lines.push(Line::from(vec![
            Span::styled(format!("(d{hotkey}) "), dim),
            Span::raw(format!("{} {} ", dish.icon, dish.name)),
            Span::styled(dish.duration_label(), dim),
        ]));
    }
    Paragraph::new(lines).render(area, buf);
}

impl Widget for &ConfigEditor {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(FIELDS.len() as u16),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new(Span::styled("Card settings", bold)).render(chunks[0], buf);

        let mut rows = Vec::with_capacity(FIELDS.len());
        for &field in FIELDS {
            let selected = field == self.selected();
            let marker = if selected { "> " } else { "  " };
            let value = if selected && self.is_editing() {
                format!("{}_", self.buffer())
            } else {
                self.field_value(field)
            };
            let style = if selected { bold } else { Style::default() };
            rows.push(Line::from(vec![
                Span::styled(marker.to_string(), style),
                Span::styled(format!("{:<24}", field.label()), style),
                Span::styled(value, style),
            ]));
        }
        Paragraph::new(rows).render(chunks[2], buf);

        Paragraph::new(Span::styled(
            "(↑/↓) select  (enter) edit/toggle  (esc) back",
            dim.add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[4], buf);
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}
