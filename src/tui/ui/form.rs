//! Questionnaire form on the Home page.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{Answers, BmiCategory, Field, Gender, ValidationError};
use crate::tui::styles::NightTheme;

const MAX_TEXT_LEN: usize = 40;

/// How a field is edited.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Cycled with Left/Right
    Choice {
        options: Vec<&'static str>,
        index: usize,
    },
    /// Digits, plus '.' when `decimal`
    Number { value: String, decimal: bool },
    /// Free text
    Text(String),
}

impl FieldInput {
    /// Current value as typed or selected.
    #[must_use]
    pub fn display(&self) -> &str {
        match self {
            Self::Choice { options, index } => options.get(*index).copied().unwrap_or_default(),
            Self::Number { value, .. } | Self::Text(value) => value,
        }
    }

    fn set(&mut self, raw: &str) {
        match self {
            Self::Choice { options, index } => {
                if let Some(i) = options.iter().position(|o| *o == raw) {
                    *index = i;
                }
            }
            Self::Number { value, .. } | Self::Text(value) => {
                value.zeroize();
                value.push_str(raw);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub field: Field,
    pub hint: &'static str,
    pub input: FieldInput,
}

impl FormField {
    fn new(field: Field) -> Self {
        let (hint, input) = match field {
            Field::Gender => (
                "◀ ▶ to choose",
                FieldInput::Choice {
                    options: Gender::ALL.iter().map(Gender::label).collect(),
                    index: 0,
                },
            ),
            Field::BmiCategory => (
                "◀ ▶ to choose",
                FieldInput::Choice {
                    options: BmiCategory::ALL.iter().map(BmiCategory::label).collect(),
                    index: 0,
                },
            ),
            Field::Occupation => ("e.g. Nurse", FieldInput::Text(String::new())),
            Field::BloodPressure => ("systolic/diastolic, e.g. 120/80", FieldInput::Text(String::new())),
            Field::SleepDuration => (
                "hours, 3-12 in steps of 0.5",
                FieldInput::Number {
                    value: String::new(),
                    decimal: true,
                },
            ),
            Field::Age => ("years (18-100)", number()),
            Field::QualityOfSleep => ("1 (poor) - 10 (excellent)", number()),
            Field::PhysicalActivityLevel => ("1 (sedentary) - 10 (very active)", number()),
            Field::StressLevel => ("1 (calm) - 10 (very stressed)", number()),
            Field::HeartRate => ("resting bpm (40-200)", number()),
            Field::DailySteps => ("steps per day (1000-20000)", number()),
        };
        Self { field, hint, input }
    }
}

fn number() -> FieldInput {
    FieldInput::Number {
        value: String::new(),
        decimal: false,
    }
}

/// Questionnaire form state
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
}

impl Default for FormState {
    fn default() -> Self {
        let mut state = Self {
            fields: Field::ALL.iter().copied().map(FormField::new).collect(),
            selected_field: 0,
        };
        state.load_answers(&Answers::default());
        state
    }
}

impl FormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    #[must_use]
    pub fn selected(&self) -> &FormField {
        &self.fields[self.selected_field]
    }

    /// Cycle a choice field; no-op on other kinds.
    pub fn cycle(&mut self, forward: bool) {
        if let FieldInput::Choice { options, index } = &mut self.fields[self.selected_field].input {
            let n = options.len();
            *index = if forward { (*index + 1) % n } else { (*index + n - 1) % n };
        }
    }

    pub fn input_char(&mut self, c: char) {
        if matches!(self.selected().input, FieldInput::Choice { .. }) {
            if c == ' ' {
                self.cycle(true);
            }
            return;
        }

        match &mut self.fields[self.selected_field].input {
            FieldInput::Number { value, decimal } => {
                let accept = c.is_ascii_digit() || (*decimal && c == '.' && !value.contains('.'));
                if accept && value.len() < MAX_TEXT_LEN {
                    value.push(c);
                }
            }
            FieldInput::Text(value) => {
                if !c.is_control() && value.chars().count() < MAX_TEXT_LEN {
                    value.push(c);
                }
            }
            FieldInput::Choice { .. } => {}
        }
    }

    pub fn delete_char(&mut self) {
        if let FieldInput::Number { value, .. } | FieldInput::Text(value) =
            &mut self.fields[self.selected_field].input
        {
            value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let FieldInput::Number { value, .. } | FieldInput::Text(value) =
            &mut self.fields[self.selected_field].input
        {
            value.zeroize();
        }
    }

    /// Wipe typed answers and restore the defaults.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            if let FieldInput::Number { value, .. } | FieldInput::Text(value) = &mut field.input {
                value.zeroize();
            }
        }
        self.load_answers(&Answers::default());
        self.selected_field = 0;
    }

    /// Fill every field from `answers`.
    pub fn load_answers(&mut self, answers: &Answers) {
        for field in self.fields.iter_mut() {
            let raw = match field.field {
                Field::Gender => answers.gender.label().to_string(),
                Field::Age => answers.age.to_string(),
                Field::Occupation => answers.occupation.clone(),
                Field::SleepDuration => format!("{:.1}", answers.sleep_duration),
                Field::QualityOfSleep => answers.quality_of_sleep.to_string(),
                Field::PhysicalActivityLevel => answers.physical_activity_level.to_string(),
                Field::StressLevel => answers.stress_level.to_string(),
                Field::BmiCategory => answers.bmi_category.label().to_string(),
                Field::BloodPressure => answers.blood_pressure.clone(),
                Field::HeartRate => answers.heart_rate.to_string(),
                Field::DailySteps => answers.daily_steps.to_string(),
            };
            field.input.set(&raw);
        }
    }

    /// Load a filled-in example with several risk factors.
    pub fn load_sample_data(&mut self) {
        self.load_answers(&Answers {
            gender: Gender::Male,
            age: 42,
            occupation: "Nurse".to_string(),
            sleep_duration: 5.5,
            quality_of_sleep: 4,
            physical_activity_level: 3,
            stress_level: 8,
            bmi_category: BmiCategory::Overweight,
            blood_pressure: "130/85".to_string(),
            heart_rate: 78,
            daily_steps: 5000,
        });
    }

    /// Parse the typed text into answers. Range checks happen in validation.
    ///
    /// # Errors
    /// Returns the first field, in form order, that is empty or not a number.
    pub fn to_answers(&self) -> Result<Answers, ValidationError> {
        let (answers, errors) = self.parse_fields();
        match errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(answers),
        }
    }

    /// Parse and validate the whole form.
    ///
    /// # Errors
    /// Returns the earliest failing field in form order, whether it failed
    /// to parse or failed a range or format check.
    pub fn checked_answers(&self) -> Result<Answers, ValidationError> {
        let (answers, mut errors) = self.parse_fields();
        // Unparsed fields hold defaults, so their validation results are meaningless.
        let unparsed: Vec<Field> = errors.iter().map(ValidationError::field).collect();
        if let Err(invalid) = answers.validate_all() {
            errors.extend(
                invalid
                    .into_iter()
                    .filter(|e| !unparsed.contains(&e.field())),
            );
        }

        match errors.into_iter().min_by_key(|e| e.field() as usize) {
            Some(e) => Err(e),
            None => Ok(answers),
        }
    }

    /// Parse every field, keeping the default for those that fail.
    fn parse_fields(&self) -> (Answers, Vec<ValidationError>) {
        let mut answers = Answers::default();
        let mut errors = Vec::new();

        for f in &self.fields {
            let raw = f.input.display().trim();
            let parsed = match f.field {
                Field::Gender => raw.parse::<Gender>().map(|v| answers.gender = v),
                Field::BmiCategory => raw.parse::<BmiCategory>().map(|v| answers.bmi_category = v),
                Field::Occupation => {
                    answers.occupation = raw.to_string();
                    Ok(())
                }
                Field::BloodPressure => {
                    answers.blood_pressure = raw.to_string();
                    Ok(())
                }
                Field::SleepDuration => {
                    parse_number(f.field, raw).map(|v| answers.sleep_duration = v)
                }
                Field::Age => parse_number(f.field, raw).map(|v| answers.age = v),
                Field::QualityOfSleep => {
                    parse_number(f.field, raw).map(|v| answers.quality_of_sleep = v)
                }
                Field::PhysicalActivityLevel => {
                    parse_number(f.field, raw).map(|v| answers.physical_activity_level = v)
                }
                Field::StressLevel => parse_number(f.field, raw).map(|v| answers.stress_level = v),
                Field::HeartRate => parse_number(f.field, raw).map(|v| answers.heart_rate = v),
                Field::DailySteps => parse_number(f.field, raw).map(|v| answers.daily_steps = v),
            };
            if let Err(e) = parsed {
                errors.push(e);
            }
        }

        (answers, errors)
    }
}

fn parse_number<T: std::str::FromStr>(field: Field, raw: &str) -> Result<T, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    raw.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

/// Render the questionnaire page
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState, error: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form + guide
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_form_fields(f, body[0], state);
    render_guide(f, body[1], state.selected());
    render_form_footer(f, chunks[2], error);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", NightTheme::text()),
        Span::styled("Sleep Questionnaire", NightTheme::title()),
        Span::styled(
            " │ Answer all eleven questions, then press Enter",
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

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (NightTheme::border_focused(), NightTheme::focused())
        } else {
            (NightTheme::border(), NightTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = field.input.display();
        let mut spans = vec![Span::raw(" ")];
        match &field.input {
            FieldInput::Choice { .. } => {
                spans.push(Span::styled("◀ ", NightTheme::text_muted()));
                spans.push(Span::styled(value, NightTheme::text()));
                spans.push(Span::styled(" ▶", NightTheme::text_muted()));
            }
            _ if value.is_empty() => spans.push(Span::styled(field.hint, NightTheme::text_muted())),
            _ => spans.push(Span::styled(value, NightTheme::text())),
        }
        if is_selected && !matches!(field.input, FieldInput::Choice { .. }) {
            spans.push(Span::styled("▌", NightTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_guide(f: &mut Frame, area: Rect, selected: &FormField) {
    let text = vec![
        Line::from(Span::styled(selected.field.label(), NightTheme::subtitle())),
        Line::from(Span::styled(selected.hint, NightTheme::text_secondary())),
        Line::from(""),
        Line::from(Span::styled("How to fill in", NightTheme::subtitle())),
        Line::from(Span::styled(
            "Answer for a typical week. Scales run from 1 (lowest) to 10 (highest).",
            NightTheme::text(),
        )),
        Line::from(Span::styled(
            "Blood pressure is written as systolic/diastolic, for example 120/80.",
            NightTheme::text(),
        )),
        Line::from(Span::styled(
            "Press F5 to load an example, or Del to clear a field.",
            NightTheme::text_muted(),
        )),
    ];

    let guide = Paragraph::new(text)
        .block(
            Block::default()
                .title(Span::styled(" Guide ", NightTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(NightTheme::border()),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(guide, area);
}

fn render_form_footer(f: &mut Frame, area: Rect, error: Option<&str>) {
    let content = if let Some(err) = error {
        Line::from(vec![
            Span::styled("! ", NightTheme::danger()),
            Span::styled(err.to_string(), NightTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓/Tab] ", NightTheme::key_hint()),
            Span::styled("Navigate ", NightTheme::key_desc()),
            Span::styled("[←→] ", NightTheme::key_hint()),
            Span::styled("Choose ", NightTheme::key_desc()),
            Span::styled("[Enter] ", NightTheme::key_hint()),
            Span::styled("Submit ", NightTheme::key_desc()),
            Span::styled("[F5] ", NightTheme::key_hint()),
            Span::styled("Sample ", NightTheme::key_desc()),
            Span::styled("[F2] ", NightTheme::key_hint()),
            Span::styled("About ", NightTheme::key_desc()),
            Span::styled("[F3] ", NightTheme::key_hint()),
            Span::styled("Credits ", NightTheme::key_desc()),
            Span::styled("[F4] ", NightTheme::key_hint()),
            Span::styled("Language ", NightTheme::key_desc()),
            Span::styled("[Ctrl+Q] ", NightTheme::key_hint()),
            Span::styled("Quit", NightTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(NightTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(state: &mut FormState, field: Field) {
        state.selected_field = Field::ALL
            .iter()
            .position(|f| *f == field)
            .expect("field exists");
    }

    #[test]
    fn test_defaults_need_occupation_and_bp() {
        let state = FormState::default();
        let answers = state.to_answers().expect("Defaults should parse");
        assert_eq!(answers, Answers::default());
        assert_eq!(
            answers.validate().err().map(|e| e.field()),
            Some(Field::Occupation)
        );
    }

    #[test]
    fn test_sample_data_validates() {
        let mut state = FormState::default();
        state.load_sample_data();

        let answers = state.to_answers().expect("Sample should parse");
        assert_eq!(answers.gender, Gender::Male);
        assert_eq!(answers.sleep_duration, 5.5);
        assert!(answers.validate().is_ok());
    }

    #[test]
    fn test_typing_filters_characters() {
        let mut state = FormState::default();
        select(&mut state, Field::Age);
        state.clear_field();
        for c in "4a2.".chars() {
            state.input_char(c);
        }
        assert_eq!(state.selected().input.display(), "42");

        select(&mut state, Field::SleepDuration);
        state.clear_field();
        for c in "6.5.".chars() {
            state.input_char(c);
        }
        assert_eq!(state.selected().input.display(), "6.5");

        state.delete_char();
        assert_eq!(state.selected().input.display(), "6.");
    }

    #[test]
    fn test_cycle_choices() {
        let mut state = FormState::default();
        select(&mut state, Field::BmiCategory);
        state.cycle(false);
        assert_eq!(state.selected().input.display(), "Underweight");
        state.cycle(true);
        state.cycle(true);
        assert_eq!(state.selected().input.display(), "Normal Weight");

        let answers = state.to_answers().expect("Should parse");
        assert_eq!(answers.bmi_category, BmiCategory::NormalWeight);
    }

    #[test]
    fn test_parse_errors_in_form_order() {
        let mut state = FormState::default();
        select(&mut state, Field::DailySteps);
        state.clear_field();
        select(&mut state, Field::Age);
        state.clear_field();

        assert_eq!(state.to_answers(), Err(ValidationError::Missing(Field::Age)));

        for c in "99999999999".chars() {
            state.input_char(c);
        }
        assert!(matches!(
            state.to_answers(),
            Err(ValidationError::NotANumber { field: Field::Age, .. })
        ));
    }

    #[test]
    fn test_checked_answers_reports_earliest_field() {
        let mut state = FormState::default();
        select(&mut state, Field::DailySteps);
        state.clear_field();

        // Occupation is empty and comes before the unparsable step count.
        assert_eq!(
            state.checked_answers().err().map(|e| e.field()),
            Some(Field::Occupation)
        );

        select(&mut state, Field::Occupation);
        for c in "Nurse".chars() {
            state.input_char(c);
        }
        select(&mut state, Field::BloodPressure);
        for c in "120/80".chars() {
            state.input_char(c);
        }
        assert_eq!(
            state.checked_answers(),
            Err(ValidationError::Missing(Field::DailySteps))
        );

        select(&mut state, Field::Age);
        state.clear_field();
        state.input_char('9');
        assert_eq!(
            state.checked_answers().err().map(|e| e.field()),
            Some(Field::Age)
        );
    }

    #[test]
    fn test_checked_answers_accepts_sample() {
        let mut state = FormState::default();
        state.load_sample_data();
        assert_eq!(state.checked_answers(), state.to_answers());
        assert!(state.checked_answers().is_ok());
    }

    #[test]
    fn test_clear_sensitive_restores_defaults() {
        let mut state = FormState::default();
        state.load_sample_data();
        state.selected_field = 4;

        state.clear_sensitive();
        assert_eq!(state.selected_field, 0);
        assert_eq!(state.to_answers(), Ok(Answers::default()));
    }
}
