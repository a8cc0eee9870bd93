//! Static About and Credits pages.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::Language;
use crate::tui::styles::NightTheme;

struct Section {
    heading: &'static str,
    body: &'static [&'static str],
}

const ABOUT: [&[Section]; 2] = [
    &[
        Section {
            heading: "About Somnus",
            body: &[
                "Somnus screens for insomnia risk from eleven questions about sleep, lifestyle and basic vital signs.",
                "A transparent rule-based score decides the result. A trained logistic-regression model can be enabled with SOMNUS_SCORING_ENGINE=model.",
            ],
        },
        Section {
            heading: "How to use",
            body: &[
                "1. Fill in every field on the questionnaire.",
                "2. Press Enter to submit.",
                "3. Read the prediction, the risk factors and the advice.",
                "4. Use the result as a starting point for a conversation with a health professional.",
            ],
        },
        Section {
            heading: "About insomnia",
            body: &[
                "Insomnia is difficulty falling asleep, staying asleep, or sleeping well despite having the chance to.",
            ],
        },
        Section {
            heading: "Symptoms",
            body: &[
                "• Trouble falling asleep at night",
                "• Waking often during the night or too early",
                "• Feeling tired or unrefreshed after waking",
                "• Daytime sleepiness",
                "• Poor concentration, irritability or low mood",
            ],
        },
        Section {
            heading: "Risk factors",
            body: &[
                "• Stress, anxiety or depression",
                "• Irregular sleep schedule",
                "• Caffeine, alcohol or nicotine",
                "• Medical conditions such as asthma, diabetes or chronic pain",
                "• Screen use before bed",
            ],
        },
        Section {
            heading: "If you may be at risk",
            body: &[
                "Talk to a doctor or a sleep specialist. Early treatment prevents complications and improves quality of life.",
            ],
        },
    ],
    &[
        Section {
            heading: "Tentang Somnus",
            body: &[
                "Somnus melakukan skrining risiko insomnia dari sebelas pertanyaan tentang tidur, gaya hidup dan tanda vital dasar.",
                "Hasil ditentukan oleh skor berbasis aturan. Model regresi logistik dapat diaktifkan dengan SOMNUS_SCORING_ENGINE=model.",
            ],
        },
        Section {
            heading: "Cara menggunakan",
            body: &[
                "1. Isi semua data pada kuesioner.",
                "2. Tekan Enter untuk mengirim.",
                "3. Lihat hasil prediksi, faktor risiko dan rekomendasi.",
                "4. Gunakan hasil ini sebagai referensi untuk konsultasi dengan tenaga kesehatan.",
            ],
        },
        Section {
            heading: "Tentang insomnia",
            body: &[
                "Insomnia adalah gangguan tidur berupa kesulitan memulai tidur, mempertahankan tidur, atau tidur yang tidak berkualitas.",
            ],
        },
        Section {
            heading: "Gejala",
            body: &[
                "• Sulit mulai tidur di malam hari",
                "• Sering terbangun di malam hari atau terlalu pagi",
                "• Merasa lelah setelah bangun tidur",
                "• Mengantuk di siang hari",
                "• Sulit berkonsentrasi, mudah marah, atau depresi",
            ],
        },
        Section {
            heading: "Faktor risiko",
            body: &[
                "• Stres, kecemasan, atau depresi",
                "• Jadwal tidur yang tidak teratur",
                "• Konsumsi kafein, alkohol, atau nikotin",
                "• Kondisi medis seperti asma, diabetes, atau nyeri kronis",
                "• Penggunaan gadget sebelum tidur",
            ],
        },
        Section {
            heading: "Jika Anda berisiko",
            body: &[
                "Konsultasikan ke dokter atau spesialis gangguan tidur. Penanganan dini meningkatkan kualitas hidup.",
            ],
        },
    ],
];

const CREDITS: &[Section] = &[
    Section {
        heading: "Questionnaire and scoring rules",
        body: &["Ibra Zaki Ridwan, Informatics, Universitas Gunadarma (2025)"],
    },
    Section {
        heading: "Datasets (Kaggle)",
        body: &[
            "• Health and Sleep Relation 2024",
            "• Sleep Health and Lifestyle",
            "• Insights into Sleep Patterns and Daily Habits",
            "• Sleep Health and Lifestyle Dataset",
        ],
    },
    Section {
        heading: "Built with",
        body: &["ratatui, crossterm, serde, tracing, sha2"],
    },
];

fn section_lines(sections: &[Section]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for section in sections {
        lines.push(Line::from(Span::styled(section.heading, NightTheme::subtitle())));
        lines.extend(
            section
                .body
                .iter()
                .map(|l| Line::from(Span::styled(*l, NightTheme::text()))),
        );
        lines.push(Line::from(""));
    }
    lines
}

fn render_page(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let page = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), NightTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(NightTheme::border()),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(page, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Esc] ", NightTheme::key_hint()),
        Span::styled("Back ", NightTheme::key_desc()),
        Span::styled("[F2] ", NightTheme::key_hint()),
        Span::styled("About ", NightTheme::key_desc()),
        Span::styled("[F3] ", NightTheme::key_hint()),
        Span::styled("Credits", NightTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(NightTheme::border()),
    );
    f.render_widget(footer, chunks[1]);
}

pub fn render_info(f: &mut Frame, area: Rect, language: Language) {
    let sections = match language {
        Language::English => ABOUT[0],
        Language::Indonesian => ABOUT[1],
    };
    render_page(f, area, "About", section_lines(sections));
}

pub fn render_credits(f: &mut Frame, area: Rect) {
    render_page(f, area, "Credits", section_lines(CREDITS));
}
