use super::help::draw_help;
use super::state::{resolve_offset, TuiState};
use crate::controller::{ControlState, Field, Section, ViewState};
use crate::image::Thumbnail;
use crate::model::{style_label, AppConfig, Operation};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Widget, Wrap},
    Frame,
};

const PROMPT_PANEL_H: u16 = 6;
const IMAGE_PANEL_H: u16 = 22;
const REFINE_PANEL_H: u16 = 5;
const BUTTONS_H: u16 = 3;

/// Rows of the result section, top to bottom, before scrolling.
const RESULT_CONTENT_H: u16 = PROMPT_PANEL_H + IMAGE_PANEL_H + REFINE_PANEL_H + BUTTONS_H;

pub fn draw(f: &mut Frame, state: &mut TuiState, cfg: &AppConfig) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let selected = match state.view.section {
        Section::Generator => 0,
        Section::Result => 1,
    };
    let title = if state.view.loading.any_busy() {
        format!("logo-studio · {} · {} working", cfg.base_url, state.spinner())
    } else {
        format!("logo-studio · {}", cfg.base_url)
    };
    let tabs = Tabs::new(vec![Line::from("Generate"), Line::from("Result")])
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    if state.show_help {
        draw_help(chunks[1], f);
    } else {
        match state.view.section {
            Section::Generator => draw_generator(chunks[1], f, state),
            Section::Result => draw_result(chunks[1], f, state),
        }
    }

    draw_status(chunks[2], f, &state.view);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

/// Text input contents, with a cursor mark when focused and a dim hint when empty.
fn input_text<'a>(value: &'a str, placeholder: &'a str, focused: bool) -> Vec<Line<'a>> {
    if value.is_empty() && !focused {
        return vec![Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let mut lines: Vec<Line> = value.split('\n').map(Line::from).collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }
    }
    lines
}

fn button_line(label: &str, control: ControlState, spinner: char) -> Line<'static> {
    let text = if control.spinner_visible() {
        format!("[ {spinner} ]")
    } else if control.label_visible() {
        format!("[ {label} ]")
    } else {
        String::new()
    };
    let style = if control.enabled() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(text, style))
}

fn draw_generator(area: Rect, f: &mut Frame, state: &TuiState) {
    let view = &state.view;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let name_focused = view.focus == Field::CompanyName;
    let name = Paragraph::new(input_text(
        &view.form.company_name,
        "Company or product name",
        name_focused,
    ))
    .block(field_block("Company name", name_focused));
    f.render_widget(name, rows[0]);

    let style_focused = view.focus == Field::Style;
    let arrow = Style::default().fg(Color::Magenta);
    let style_line = Line::from(vec![
        Span::styled("◀ ", arrow),
        Span::raw(style_label(&view.form.style).to_string()),
        Span::styled(" ▶", arrow),
    ]);
    f.render_widget(
        Paragraph::new(style_line).block(field_block("Style", style_focused)),
        rows[1],
    );

    let prompt_focused = view.focus == Field::CustomPrompt;
    let prompt = Paragraph::new(input_text(
        &view.form.custom_prompt,
        "Optional: colors, symbols, mood…",
        prompt_focused,
    ))
    .wrap(Wrap { trim: false })
    .block(field_block("Custom prompt (Ctrl-Enter to generate)", prompt_focused));
    f.render_widget(prompt, rows[2]);

    let generate = view.loading.control(Operation::Generate);
    let buttons = Paragraph::new(button_line("Generate", generate, state.spinner()))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(buttons, rows[3]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Magenta)),
        Span::raw(" generate  "),
        Span::styled("Tab", Style::default().fg(Color::Magenta)),
        Span::raw(" next field  "),
        Span::styled("F1", Style::default().fg(Color::Magenta)),
        Span::raw(" help"),
    ]));
    f.render_widget(hints, rows[4]);
}

/// Visible part of a virtual row range `top..top + height`, scrolled by `offset`.
fn place(area: Rect, top: u16, height: u16, offset: u16) -> Option<Rect> {
    let start = i32::from(top) - i32::from(offset);
    let end = start + i32::from(height);
    let vis_start = start.max(0);
    let vis_end = end.min(i32::from(area.height));
    if vis_end <= vis_start {
        return None;
    }
    Some(Rect::new(
        area.x,
        area.y + vis_start as u16,
        area.width,
        (vis_end - vis_start) as u16,
    ))
}

fn draw_result(area: Rect, f: &mut Frame, state: &mut TuiState) {
    let image_top = PROMPT_PANEL_H;
    let offset = resolve_offset(
        state.scroll,
        RESULT_CONTENT_H,
        area.height,
        image_top,
        IMAGE_PANEL_H,
    );
    state.last_offset = offset;

    if let Some(r) = place(area, 0, PROMPT_PANEL_H, offset) {
        let view = &state.view;
        let seed = view
            .current_seed
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());
        let dims = view
            .logo
            .as_ref()
            .map(|l| format!("{}x{}", l.width, l.height))
            .unwrap_or_else(|| "-".into());
        let p = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Seed: ", Style::default().fg(Color::Gray)),
                Span::raw(seed),
                Span::raw("   "),
                Span::styled("Size: ", Style::default().fg(Color::Gray)),
                Span::raw(dims),
            ]),
            Line::from(view.current_prompt.clone()),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Prompt"));
        f.render_widget(p, r);
    }

    if let Some(r) = place(area, image_top, IMAGE_PANEL_H, offset) {
        f.render_widget(Block::default().borders(Borders::ALL).title("Logo"), r);
        let inner_w = area.width.saturating_sub(2);
        let inner_h = IMAGE_PANEL_H - 2;
        // Thumbnail is sized for the whole panel; scrolling only clips it.
        let first_row = offset.saturating_sub(image_top + 1);
        if let Some(inner) = place(area, image_top + 1, inner_h, offset) {
            let inner = Rect::new(inner.x + 1, inner.y, inner_w, inner.height);
            if let Some(thumb) = state.thumbnail(inner_w, inner_h) {
                f.render_widget(
                    LogoThumb {
                        thumb,
                        panel_rows: inner_h,
                        first_row,
                    },
                    inner,
                );
            }
        }
    }

    let view = &state.view;
    let refine_top = image_top + IMAGE_PANEL_H;
    if let Some(r) = place(area, refine_top, REFINE_PANEL_H, offset) {
        let focused = view.focus == Field::Refinement;
        let p = Paragraph::new(input_text(
            &view.refinement,
            "What should change? e.g. \"make it blue\"",
            focused,
        ))
        .wrap(Wrap { trim: false })
        .block(field_block("Refine (Ctrl-Enter)", focused));
        f.render_widget(p, r);
    }

    if let Some(r) = place(area, refine_top + REFINE_PANEL_H, BUTTONS_H, offset) {
        let spinner = state.spinner();
        let mut spans = button_line("Refine", view.loading.control(Operation::Refine), spinner).spans;
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "[ New logo: Ctrl-N ]",
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Ctrl-S save",
            Style::default().fg(Color::Gray),
        ));
        f.render_widget(
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
            r,
        );
    }
}

fn draw_status(area: Rect, f: &mut Frame, view: &ViewState) {
    let line = match view.error.as_deref() {
        Some(err) => Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            view.info.clone(),
            Style::default().fg(Color::Gray),
        )),
    };
    let p = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}

/// Half-block rendering of a [`Thumbnail`], centered in its panel.
struct LogoThumb<'a> {
    thumb: &'a Thumbnail,
    /// Full (unclipped) panel height in rows.
    panel_rows: u16,
    /// Panel rows hidden above `area` by scrolling.
    first_row: u16,
}

impl Widget for LogoThumb<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pad_top = self.panel_rows.saturating_sub(self.thumb.rows) / 2;
        let pad_left = area.width.saturating_sub(self.thumb.cols) / 2;
        for dy in 0..area.height {
            let Some(row) = (self.first_row + dy).checked_sub(pad_top) else {
                continue;
            };
            for col in 0..self.thumb.cols.min(area.width) {
                let Some((top, bottom)) = self.thumb.cell(col, row) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + pad_left + col, area.y + dy)) {
                    cell.set_symbol("▀")
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn header_shows_activity_while_a_call_is_in_flight() {
        let cfg = AppConfig {
            base_url: "http://127.0.0.1:5000".into(),
            user_agent: "test".into(),
            error_timeout: std::time::Duration::from_secs(5),
            save_dir: std::env::temp_dir(),
            auto_save: false,
        };
        let mut state = TuiState::new(ViewState::new());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|f| draw(f, &mut state, &cfg)).unwrap();
        assert!(!screen_text(&terminal).contains("working"));

        state.view.loading.acquire(Operation::Generate);
        terminal.draw(|f| draw(f, &mut state, &cfg)).unwrap();
        assert!(screen_text(&terminal).contains("working"));
    }

    #[test]
    fn place_clips_scrolled_rows() {
        let area = Rect::new(0, 2, 80, 20);
        assert_eq!(place(area, 0, 6, 0), Some(Rect::new(0, 2, 80, 6)));
        // Scrolled past entirely.
        assert_eq!(place(area, 0, 6, 6), None);
        // Top half hidden.
        assert_eq!(place(area, 6, 22, 10), Some(Rect::new(0, 2, 80, 18)));
        // Below the viewport.
        assert_eq!(place(area, 28, 5, 0), None);
    }

    #[test]
    fn thumbnail_paints_half_blocks() {
        let thumb = Thumbnail {
            cols: 2,
            rows: 1,
            cells: vec![([255, 0, 0], [0, 0, 255]), ([0, 255, 0], [0, 0, 0])],
        };
        let area = Rect::new(0, 0, 4, 3);
        let mut buf = Buffer::empty(area);
        LogoThumb {
            thumb: &thumb,
            panel_rows: 3,
            first_row: 0,
        }
        .render(area, &mut buf);

        let cell = buf.cell((1, 1)).unwrap();
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), " ");
    }
}
