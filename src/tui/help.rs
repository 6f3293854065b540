use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const GENERATOR_KEYS: &[(&str, &str)] = &[
    ("Enter", "Generate (company name field)"),
    ("Ctrl-Enter", "Generate (custom prompt field)"),
    ("Ctrl-G", "Generate from any field"),
    ("Tab / Shift-Tab", "Move between fields"),
    ("← / →", "Change style"),
];

const RESULT_KEYS: &[(&str, &str)] = &[
    ("Ctrl-Enter", "Refine with the text below the logo"),
    ("Ctrl-R", "Refine"),
    ("Ctrl-N", "Start a new logo"),
    ("Ctrl-S", "Save PNG and prompt"),
    ("Ctrl-Y", "Copy last saved path"),
    ("PgUp / PgDn", "Scroll"),
];

const GLOBAL_KEYS: &[(&str, &str)] = &[
    ("F1", "Toggle this help"),
    ("Esc / Ctrl-C", "Quit"),
];

fn section(title: &str, keys: &[(&'static str, &'static str)], out: &mut Vec<Line<'static>>) {
    out.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Gray),
    )));
    for (key, what) in keys {
        out.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{key:<16}"), Style::default().fg(Color::Magenta)),
            Span::raw(*what),
        ]));
    }
    out.push(Line::from(""));
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let mut lines = Vec::new();
    section("Generator:", GENERATOR_KEYS, &mut lines);
    section("Result:", RESULT_KEYS, &mut lines);
    section("Anywhere:", GLOBAL_KEYS, &mut lines);
    lines.push(Line::from(
        "Ctrl-J works as Ctrl-Enter on terminals that do not report modified Enter.",
    ));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn help_lists_every_section() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw_help(f.area(), f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        for needle in ["Generator:", "Result:", "Anywhere:", "Start a new logo", "Esc / Ctrl-C"] {
            assert!(text.contains(needle), "missing {needle:?}");
        }
    }
}
