//! Main TUI application state machine.
//!
//! Handles:
//! - Page navigation through the session FSM
//! - Input event handling
//! - Service integration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::model::{load_shared, LogisticClassifier};
use crate::application::{AssessmentService, Navigation, Page, Session};
use crate::config::{Config, ScoringEngine};
use crate::domain::Language;
use crate::ports::ArtifactError;
use crate::SomnusError;

use super::ui::{
    form::{render_form, FormState},
    info::{render_credits, render_info},
    render_disclaimer, render_title_bar,
    result::render_result,
};

/// Main application state
pub struct App {
    session: Session,

    service: AssessmentService<LogisticClassifier>,

    form: FormState,

    should_quit: bool,
}

impl App {
    /// Build the app from configuration.
    ///
    /// With the model engine, the artifact is loaded here; a failure is shown
    /// as a notice and the rule-based scorer is used instead.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let model = (config.engine == ScoringEngine::Model)
            .then(|| load_shared(&config.model_path, config.require_manifest));
        Self::with_model(&config, model)
    }

    /// Build the app around the outcome of a model load, if one was attempted.
    fn with_model(
        config: &Config,
        model: Option<Result<Arc<LogisticClassifier>, ArtifactError>>,
    ) -> Self {
        let mut session = Session::new();
        let mut service = AssessmentService::new(config.engine, config.language);

        match model {
            Some(Ok(model)) => service = service.with_classifier(model),
            Some(Err(e)) => {
                tracing::warn!("Model unavailable, falling back to rules: {}", e);
                session.set_notice(format!(
                    "Trained model unavailable ({e}); using rule-based scoring."
                ));
            }
            None => {}
        }

        Self::with_service(service, session)
    }

    /// Create application with an injected service.
    #[must_use]
    pub fn with_service(service: AssessmentService<LogisticClassifier>, session: Session) -> Self {
        Self {
            session,
            service,
            form: FormState::default(),
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                let language = self.service.language();
                render_title_bar(f, chunks[0], self.session.page(), &self.status_line());

                match (self.session.page(), self.session.outcome()) {
                    (Page::Result, Some(outcome)) => {
                        render_result(f, chunks[1], outcome, language);
                    }
                    (Page::Info, _) => render_info(f, chunks[1], language),
                    (Page::Credits, _) => render_credits(f, chunks[1]),
                    _ => render_form(f, chunks[1], &self.form, self.session.error()),
                }

                render_disclaimer(f, chunks[2], language);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn status_line(&self) -> String {
        let engine = if self.service.model_active() {
            "model".to_string()
        } else {
            self.service.engine().to_string()
        };
        let mut status = format!("│ engine: {engine} │ language: {}", self.service.language());
        if let Some(notice) = self.session.notice() {
            status.push_str(" │ ");
            status.push_str(notice);
        }
        status
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::F(2) => {
                self.session.apply(Navigation::Info);
                return;
            }
            KeyCode::F(3) => {
                self.session.apply(Navigation::Credits);
                return;
            }
            KeyCode::F(4) => {
                self.toggle_language();
                return;
            }
            _ => {}
        }

        match self.session.page() {
            Page::Home => self.handle_form_key(key),
            Page::Result => self.handle_result_key(key),
            Page::Info | Page::Credits => self.handle_static_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.form.cycle(false),
            KeyCode::Right => self.form.cycle(true),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            KeyCode::F(5) => {
                self.form.load_sample_data();
                self.session.clear_error();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => {
                self.form.input_char(c);
                self.session.clear_error();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Backspace => {
                self.session.apply(Navigation::Back);
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.session.apply(Navigation::Info);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.session.apply(Navigation::Credits);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_static_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
                self.session.apply(Navigation::Back);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn toggle_language(&mut self) {
        let next = match self.service.language() {
            Language::English => Language::Indonesian,
            Language::Indonesian => Language::English,
        };
        self.service.set_language(next);
        tracing::info!("Language switched to {}", next);
    }

    fn submit(&mut self) {
        let outcome = self
            .form
            .checked_answers()
            .map_err(SomnusError::from)
            .and_then(|answers| self.service.assess(&answers));

        match outcome {
            Ok(outcome) => {
                self.session.apply(Navigation::Submit(Box::new(outcome)));
                // Typed answers are not kept once they have been scored.
                self.form.clear_sensitive();
            }
            Err(SomnusError::Validation(e)) => {
                self.form.selected_field = e.field() as usize;
                self.session.reject(e.to_string());
            }
            Err(e) => {
                tracing::error!("Assessment failed: {}", e);
                self.session.reject(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::with_service(
            AssessmentService::new(ScoringEngine::Rules, Language::English),
            Session::new(),
        )
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_invalid_submission_stays_home() {
        let mut app = app();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.session.page(), Page::Home);
        assert_eq!(app.session.error(), Some("Occupation is required"));
        assert_eq!(app.form.selected_field, 2);
    }

    #[test]
    fn test_full_flow() {
        let mut app = app();

        // Occupation
        app.handle_key(KeyCode::Down, KeyModifiers::NONE);
        app.handle_key(KeyCode::Down, KeyModifiers::NONE);
        type_text(&mut app, "Software Engineer");

        // Blood pressure
        for _ in 0..6 {
            app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        }
        type_text(&mut app, "120/80");

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.session.page(), Page::Result);
        let outcome = app.session.outcome().expect("outcome present");
        assert_eq!(outcome.assessment.score.total(), 0);

        // Form is wiped after scoring.
        assert_eq!(app.form.fields[2].input.display(), "");

        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.session.page(), Page::Home);
        assert!(app.session.outcome().is_none());
    }

    #[test]
    fn test_sample_data_reaches_result() {
        let mut app = app();
        app.handle_key(KeyCode::F(5), KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        let outcome = app.session.outcome().expect("outcome present");
        assert_eq!(outcome.assessment.result.label, crate::RiskLabel::Insomnia);
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app();
        app.handle_key(KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(app.session.page(), Page::Info);
        app.handle_key(KeyCode::F(3), KeyModifiers::NONE);
        assert_eq!(app.session.page(), Page::Credits);
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.session.page(), Page::Home);

        app.handle_key(KeyCode::F(4), KeyModifiers::NONE);
        assert_eq!(app.service.language(), Language::Indonesian);

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_first_invalid_field_gets_focus() {
        let mut app = app();
        // Daily steps is the last field; Up wraps around to it.
        app.handle_key(KeyCode::Up, KeyModifiers::NONE);
        app.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.session.page(), Page::Home);
        assert_eq!(app.session.error(), Some("Occupation is required"));
        assert_eq!(app.form.selected_field, 2);
    }

    #[test]
    fn test_missing_model_falls_back_with_notice() {
        let config = Config {
            engine: ScoringEngine::Model,
            ..Config::default()
        };
        let missing = std::path::Path::new("definitely/not/here");
        let load = LogisticClassifier::load(missing, false).map(Arc::new);
        assert!(matches!(load, Err(ArtifactError::NotFound(_))));

        let mut app = App::with_model(&config, Some(load));
        assert!(!app.service.model_active());
        let notice = app.session.notice().expect("notice set");
        assert!(notice.contains("rule-based"));
        assert!(notice.contains("definitely/not/here"));

        app.handle_key(KeyCode::F(5), KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        let outcome = app.session.outcome().expect("outcome present");
        assert_eq!(outcome.assessment.source, crate::domain::ScoringSource::Rules);
    }

    #[test]
    fn test_rules_engine_skips_model() {
        let app = App::with_model(&Config::default(), None);
        assert!(!app.service.model_active());
        assert!(app.session.notice().is_none());
    }
}
