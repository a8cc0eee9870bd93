//! Session state machine for the presentation layer.
//!
//! Pages: Home, Result, Info, Credits. The Result page can only be entered
//! with a successful outcome, and leaving it drops that outcome.

use super::assessment::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Result,
    Info,
    Credits,
}

impl Page {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Questionnaire",
            Self::Result => "Result",
            Self::Info => "About",
            Self::Credits => "Credits",
        }
    }
}

/// Navigation events.
#[derive(Debug, Clone)]
pub enum Navigation {
    /// A submission that passed validation
    Submit(Box<Outcome>),
    Back,
    Home,
    Info,
    Credits,
}

/// Page transition table. `None` means the event is ignored on `from`.
#[must_use]
pub fn transition(from: Page, event: &Navigation) -> Option<Page> {
    match (from, event) {
        (Page::Home, Navigation::Submit(_)) => Some(Page::Result),
        (Page::Result | Page::Info | Page::Credits, Navigation::Back) => Some(Page::Home),
        (_, Navigation::Home) => Some(Page::Home),
        (_, Navigation::Info) => Some(Page::Info),
        (_, Navigation::Credits) => Some(Page::Credits),
        _ => None,
    }
}

/// Per-user session context.
#[derive(Debug, Default)]
pub struct Session {
    page: Page,
    outcome: Option<Outcome>,
    error: Option<String>,
    notice: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// The outcome shown on the Result page.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Last validation message, shown on the form.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last model-path notice.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Apply a navigation event. Returns whether the page changed.
    pub fn apply(&mut self, event: Navigation) -> bool {
        let Some(next) = transition(self.page, &event) else {
            tracing::debug!("Ignoring {} on {:?}", nav_name(&event), self.page);
            return false;
        };

        if self.page == Page::Result && next != Page::Result {
            self.outcome = None;
        }

        if let Navigation::Submit(outcome) = event {
            if let Some(notice) = &outcome.notice {
                self.notice = Some(notice.clone());
            }
            self.error = None;
            self.outcome = Some(*outcome);
        }

        tracing::debug!("Page {:?} -> {:?}", self.page, next);
        self.page = next;
        true
    }

    /// Record a rejected submission; stays on the current page.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

fn nav_name(event: &Navigation) -> &'static str {
    match event {
        Navigation::Submit(_) => "Submit",
        Navigation::Back => "Back",
        Navigation::Home => "Home",
        Navigation::Info => "Info",
        Navigation::Credits => "Credits",
    }
}
