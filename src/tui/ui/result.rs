//! Result page: prediction, advice and a chart of the submitted answers.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::Outcome;
use crate::domain::{Field, Language, RiskLabel};
use crate::tui::styles::NightTheme;

/// Render the result page for `outcome`.
pub fn render_result(f: &mut Frame, area: Rect, outcome: &Outcome, language: Language) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Label
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Explanation / notice
            Constraint::Min(0),    // Advice + chart
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0], outcome);
    render_label(f, chunks[1], outcome, language);
    render_gauge(f, chunks[2], outcome);
    render_explanation(f, chunks[3], outcome);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[4]);

    render_advice(f, body[0], outcome);
    render_input_chart(f, body[1], &outcome.inputs);
    render_result_footer(f, chunks[5]);
}

fn render_result_header(f: &mut Frame, area: Rect, outcome: &Outcome) {
    let assessment = &outcome.assessment;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", NightTheme::text()),
        Span::styled("Screening Result", NightTheme::title()),
        Span::styled(
            format!(
                " │ {} scorer │ {}",
                assessment.source,
                assessment.created_at.format("%Y-%m-%d %H:%M UTC")
            ),
            NightTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(NightTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_label(f: &mut Frame, area: Rect, outcome: &Outcome, language: Language) {
    let label = outcome.assessment.result.label;
    let icon = match label {
        RiskLabel::Normal => "OK",
        RiskLabel::Insomnia => "!",
    };

    let text = Paragraph::new(Line::from(Span::styled(
        format!("{icon} {}", language.label_text(label)),
        NightTheme::risk_label(label).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);

    f.render_widget(text, area);
}

fn render_gauge(f: &mut Frame, area: Rect, outcome: &Outcome) {
    let result = &outcome.assessment.result;
    let insomnia = result.probabilities.insomnia.clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Insomnia Probability ", NightTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(NightTheme::border()),
        )
        .gauge_style(NightTheme::risk_label(result.label))
        .ratio(insomnia)
        .label(format!("{:.1}%", insomnia * 100.0));

    f.render_widget(gauge, area);
}

fn render_explanation(f: &mut Frame, area: Rect, outcome: &Outcome) {
    let mut lines = vec![Line::from(Span::styled(
        outcome.recommendation.explanation.clone(),
        NightTheme::text_secondary(),
    ))];
    if let Some(notice) = &outcome.notice {
        lines.push(Line::from(vec![
            Span::styled("! ", NightTheme::warning()),
            Span::styled(notice.clone(), NightTheme::warning()),
        ]));
    }

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_advice(f: &mut Frame, area: Rect, outcome: &Outcome) {
    let rec = &outcome.recommendation;
    let score = &outcome.assessment.score;

    let mut lines = vec![
        Line::from(Span::styled(
            rec.headline.clone(),
            NightTheme::advice_tier(rec.tier),
        )),
        Line::from(Span::styled(rec.summary.clone(), NightTheme::text())),
        Line::from(""),
    ];
    lines.extend(rec.items.iter().map(|item| {
        Line::from(vec![
            Span::styled("• ", NightTheme::subtitle()),
            Span::styled(*item, NightTheme::text()),
        ])
    }));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Risk score: {} / 8", score.total()),
        NightTheme::subtitle(),
    )));
    if score.factors().is_empty() {
        lines.push(Line::from(Span::styled(
            "No risk factors triggered",
            NightTheme::text_muted(),
        )));
    }
    for factor in score.factors() {
        lines.push(Line::from(vec![
            Span::styled(format!("+{} ", factor.weight()), NightTheme::warning()),
            Span::styled(factor.description(), NightTheme::text_secondary()),
        ]));
    }

    let advice = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(" Recommendation ", NightTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(NightTheme::border_focused()),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(advice, area);
}

/// Position of `value` within the field's domain, as a percentage.
fn normalized(field: Field, value: f64) -> u64 {
    let Some((min, max)) = field.bounds() else {
        return 0;
    };
    let ratio = ((value - min) / (max - min)).clamp(0.0, 1.0);
    (ratio * 100.0).round() as u64
}

fn short_label(field: Field) -> &'static str {
    match field {
        Field::Age => "Age",
        Field::SleepDuration => "Sleep",
        Field::QualityOfSleep => "Qual",
        Field::PhysicalActivityLevel => "Act",
        Field::StressLevel => "Stress",
        Field::HeartRate => "HR",
        Field::DailySteps => "Steps",
        _ => "",
    }
}

fn render_input_chart(f: &mut Frame, area: Rect, inputs: &[(Field, f64)]) {
    let bars: Vec<Bar> = inputs
        .iter()
        .map(|(field, value)| {
            Bar::default()
                .value(normalized(*field, *value))
                .label(Line::from(short_label(*field)))
                .text_value(format!("{value}"))
                .style(NightTheme::bar())
                .value_style(NightTheme::bar_value())
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Your answers (% of range) ",
                    NightTheme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(NightTheme::border()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(1)
        .max(100);

    f.render_widget(chart, area);
}

fn render_result_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Enter/Esc] ", NightTheme::key_hint()),
        Span::styled("New assessment ", NightTheme::key_desc()),
        Span::styled("[i] ", NightTheme::key_hint()),
        Span::styled("About ", NightTheme::key_desc()),
        Span::styled("[c] ", NightTheme::key_hint()),
        Span::styled("Credits ", NightTheme::key_desc()),
        Span::styled("[q] ", NightTheme::key_hint()),
        Span::styled("Quit", NightTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(NightTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_to_field_range() {
        assert_eq!(normalized(Field::Age, 18.0), 0);
        assert_eq!(normalized(Field::Age, 100.0), 100);
        assert_eq!(normalized(Field::SleepDuration, 7.5), 50);
        assert_eq!(normalized(Field::DailySteps, 30000.0), 100);
        assert_eq!(normalized(Field::Occupation, 1.0), 0);
    }
}
