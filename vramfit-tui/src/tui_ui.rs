use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use vramfit_core::MemoryMode;

use crate::tui_app::{App, Field};

struct Palette {
    text: Color,
    dim: Color,
    accent: Color,
    highlight_fg: Color,
    highlight_bg: Color,
    good: Color,
    warn: Color,
}

fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            text: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            highlight_fg: Color::Black,
            highlight_bg: Color::Cyan,
            good: Color::Green,
            warn: Color::Red,
        }
    } else {
        Palette {
            text: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            highlight_fg: Color::White,
            highlight_bg: Color::Blue,
            good: Color::Green,
            warn: Color::Red,
        }
    }
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let colors = palette(app.dark_theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(13),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_title(frame, rows[0], &colors);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    draw_inputs(frame, panels[0], app, &colors);
    draw_results(frame, panels[1], app, &colors);
    draw_footer(frame, rows[2], &colors);
}

fn draw_title(frame: &mut Frame, area: Rect, colors: &Palette) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "vramfit",
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " - LLM VRAM & hardware estimator",
            Style::default().fg(colors.text),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn draw_inputs(frame: &mut Frame, area: Rect, app: &App, colors: &Palette) {
    let items: Vec<ListItem> = Field::ALL
        .iter()
        .enumerate()
        .map(|(row, &field)| {
            let selected = row == app.selected_row;
            let marker = if selected { "> " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(colors.highlight_fg)
                    .bg(colors.highlight_bg)
            } else {
                Style::default().fg(colors.text)
            };
            let label_style = if selected {
                style
            } else {
                Style::default().fg(colors.dim)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{:<16}", field.label()), label_style),
                Span::styled(app.field_value(field), style.add_modifier(Modifier::BOLD)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Inputs ", Style::default().fg(colors.accent))),
    );
    frame.render_widget(list, area);
}

fn draw_results(frame: &mut Frame, area: Rect, app: &App, colors: &Palette) {
    let rec = &app.recommendation;
    let label = Style::default().fg(colors.dim);
    let value = Style::default()
        .fg(colors.text)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<18}", "Estimated VRAM"), label),
            Span::styled(format!("{:.2} GB", rec.vram_needed_gb), value),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<18}", "System RAM"), label),
            Span::styled(format!("{:.2} GB", rec.system_ram_needed_gb), value),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<18}", "On-disk size"), label),
            Span::styled(format!("{:.2} GB", app.on_disk_gb), value),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Hardware"), label),
            Span::styled(rec.gpu_type.clone(), value),
        ]),
    ];

    match app.input.memory_mode {
        MemoryMode::DiscreteGpu => {
            if rec.gpus_required == 0 {
                lines.push(Line::from(Span::styled(
                    "Does not fit in a reasonable GPU count",
                    Style::default().fg(colors.warn),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<18}", "GPUs required"), label),
                    Span::styled(rec.gpus_required.to_string(), value),
                ]));
            }
        }
        MemoryMode::UnifiedMemory => {
            let (text, color) = if rec.fits_unified {
                ("Fits in unified memory", colors.good)
            } else {
                ("Does not fit in unified memory", colors.warn)
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
        }
    }

    let results = Paragraph::new(lines).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            " Estimate ",
            Style::default().fg(colors.accent),
        )),
    );
    frame.render_widget(results, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, colors: &Palette) {
    let hints = Paragraph::new(Line::from(Span::styled(
        " up/down select | left/right adjust | space toggle | t theme | q quit",
        Style::default().fg(colors.dim),
    )));
    frame.render_widget(hints, area);
}
