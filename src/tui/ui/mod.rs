//! UI module: View components for the TUI.

pub mod form;
pub mod info;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::Page;
use crate::domain::Language;
use crate::tui::styles::{NightTheme, LOGO_SMALL};

/// One-line title bar with the current page and status.
pub fn render_title_bar(f: &mut Frame, area: Rect, page: Page, status: &str) {
    let line = Line::from(vec![
        Span::styled(format!(" {LOGO_SMALL} "), NightTheme::header()),
        Span::styled(format!(" {} ", page.title()), NightTheme::subtitle()),
        Span::styled(status.to_string(), NightTheme::text_muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect, language: Language) {
    let lines: [&str; 2] = match language {
        Language::English => [
            "DISCLAIMER: This tool gives an indicative screening only and does not replace a medical diagnosis.",
            "Consult a health professional about any sleep problem.",
        ],
        Language::Indonesian => [
            "DISCLAIMER: Aplikasi ini hanya alat bantu skrining awal dan tidak menggantikan diagnosis medis.",
            "Konsultasikan masalah tidur Anda dengan tenaga kesehatan profesional.",
        ],
    };

    let text: Vec<Line> = lines
        .iter()
        .map(|l| Line::from(Span::styled(*l, NightTheme::text_muted())))
        .collect();

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(NightTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
