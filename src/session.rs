//! Per-visitor page state and its transitions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::ClassifyError;
use crate::models::ClassificationResult;
use crate::report::{self, ReportStyle};

/// An uploaded file waiting to be analyzed.
#[derive(Debug, Clone)]
pub struct StagedImage {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Why the last attempt left no new result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The upload could not be decoded as an image.
    UnreadableImage,
    /// The classifier could not produce an answer (service down, non-200, timeout).
    Unavailable,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnreadableImage => "The uploaded file could not be read as an image. Please upload a valid chest X-ray.",
            Self::Unavailable => "Analysis is currently unavailable. Please try again later.",
        }
    }
}

impl From<&ClassifyError> for Notice {
    fn from(err: &ClassifyError) -> Self {
        match err {
            ClassifyError::Preprocess(_) => Self::UnreadableImage,
            _ => Self::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    staged: Option<StagedImage>,
    result: Option<ClassificationResult>,
    guidance_visible: bool,
    notice: Option<Notice>,
}

impl SessionState {
    pub fn staged(&self) -> Option<&StagedImage> {
        self.staged.as_ref()
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn guidance_visible(&self) -> bool {
        self.guidance_visible
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Stage a new upload. Any earlier result stays on screen.
    pub fn stage(&mut self, image: StagedImage) {
        self.staged = Some(image);
        self.notice = None;
    }

    /// A rejected upload: nothing is staged and the visitor is told why.
    pub fn reject_upload(&mut self) {
        self.staged = None;
        self.notice = Some(Notice::UnreadableImage);
    }

    /// Apply the outcome of an analysis.
    ///
    /// Success replaces the result and hides guidance again. Failure keeps the
    /// previous result and records a notice instead.
    pub fn record(&mut self, outcome: &Result<ClassificationResult, ClassifyError>) {
        match outcome {
            Ok(result) => {
                self.result = Some(*result);
                self.guidance_visible = false;
                self.notice = None;
            }
            Err(err) => self.notice = Some(Notice::from(err)),
        }
    }

    /// Reveal the guidance block. Stays on until the next successful analysis.
    pub fn show_guidance(&mut self) {
        if self.result.is_some() {
            self.guidance_visible = true;
        }
    }

    pub fn report(&self, at: NaiveDateTime, style: ReportStyle) -> Option<String> {
        self.result.as_ref().map(|r| report::render(r, at, style))
    }
}

/// In-memory sessions keyed by the `session_id` cookie.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionState>> {
        // Poisoning is ignored: sessions hold plain data only.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read a session without creating it. Unknown ids see a fresh state.
    pub fn view<R>(&self, id: Uuid, f: impl FnOnce(&SessionState) -> R) -> R {
        let sessions = self.lock();
        match sessions.get(&id) {
            Some(state) => f(state),
            None => f(&SessionState::default()),
        }
    }

    /// Mutate a session in place, creating it if needed.
    pub fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.lock();
        f(sessions.entry(id).or_default())
    }

    /// Mutate a session only if it already exists.
    pub fn update_existing<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(f)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
