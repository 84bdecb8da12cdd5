//! Interactive session: mood, category, draft and posting.

use crate::{
    CastPoster, DayRecordRepository, GenerateTransport, HostErrorKind, HostSdk, Notifier,
    Orchestrator, PostOutcome, Task, TaskLedger, UserNotice,
};
use moodcaster_core::{Category, MAX_CAST_CHARS, Mood};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where the user is in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Choosing a mood
    Mood,
    /// Choosing a category
    Category,
    /// Editing and posting a draft
    Preview,
}

/// Holds the loading flag for the lifetime of a request.
///
/// Clears the flag on drop, so a caller that abandons `generate` leaves the
/// session ready for the next attempt.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// One user's session.
///
/// Failures never escape: every error becomes a [`UserNotice`] sent to the
/// notifier and the draft stays as it was.
pub struct Session<T, R> {
    orchestrator: Orchestrator<T>,
    host: Arc<dyn HostSdk>,
    poster: Option<CastPoster>,
    ledger: TaskLedger<R>,
    notifier: Arc<dyn Notifier>,
    mood: Option<Mood>,
    category: Option<Category>,
    diverse: bool,
    draft: String,
    step: Step,
    loading: bool,
    in_host: bool,
}

impl<T: GenerateTransport, R: DayRecordRepository> Session<T, R> {
    /// Creates a session at the mood step.
    pub fn new(
        orchestrator: Orchestrator<T>,
        host: Arc<dyn HostSdk>,
        ledger: TaskLedger<R>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orchestrator,
            host,
            poster: None,
            ledger,
            notifier,
            mood: None,
            category: None,
            diverse: false,
            draft: String::new(),
            step: Step::Mood,
            loading: false,
            in_host: false,
        }
    }

    /// Signals readiness to the host, detects the host and records the check-in.
    #[instrument(skip(self))]
    pub async fn start(&mut self) {
        if let Err(e) = self.host.ready().await {
            warn!(error = %e, "Host ready signal failed");
        }
        self.in_host = self.host.is_in_host().await;
        self.poster = Some(CastPoster::connect(Arc::clone(&self.host)).await);
        self.record(Task::Checkin);
        info!(in_host = self.in_host, "Session started");
    }

    /// Selects a mood and clears the category and draft.
    pub fn select_mood(&mut self, mood: Mood) {
        self.mood = Some(mood);
        self.category = None;
        self.draft.clear();
        self.step = Step::Category;
    }

    /// Selects a category and clears the draft.
    ///
    /// Ignored until a mood is chosen.
    pub fn select_category(&mut self, category: Category) {
        if self.mood.is_none() {
            debug!("Category selected before mood, ignoring");
            return;
        }
        self.category = Some(category);
        self.draft.clear();
        self.step = Step::Category;
    }

    /// Toggles "more diverse" sampling.
    pub fn set_diverse(&mut self, diverse: bool) {
        self.diverse = diverse;
    }

    /// Replaces the draft with user-edited text.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Clears the draft.
    pub fn reset_draft(&mut self) {
        self.draft.clear();
    }

    /// Returns true when a mood and category are selected and no request is running.
    pub fn can_generate(&self) -> bool {
        self.mood.is_some() && self.category.is_some() && !self.loading
    }

    /// Requests a new draft.
    ///
    /// Returns true if the draft was replaced.
    #[instrument(
        skip(self),
        fields(mood = ?self.mood, category = ?self.category, diverse = self.diverse)
    )]
    pub async fn generate(&mut self) -> bool {
        let (Some(mood), Some(category)) = (self.mood, self.category) else {
            debug!("Generation refused without mood and category");
            return false;
        };
        if self.loading {
            debug!("Generation already running");
            return false;
        }

        let result = {
            let _loading = LoadingGuard::engage(&mut self.loading);
            self.orchestrator.generate(mood, category, self.diverse).await
        };

        match result {
            Ok(text) => {
                self.draft = text;
                self.step = Step::Preview;
                self.record(Task::Generate);
                true
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                self.notifier.notify(UserNotice::from_client_error(&e));
                false
            }
        }
    }

    /// Posts the current draft through the host.
    ///
    /// Returns the outcome, or `None` when posting failed and a notice was raised.
    #[instrument(skip(self))]
    pub async fn post(&mut self) -> Option<PostOutcome> {
        let poster = self.poster().await;
        match poster.post(&self.draft).await {
            Ok(outcome) => {
                if outcome.is_posted() {
                    if let Err(e) = self.ledger.increment_posted() {
                        warn!(error = %e, "Failed to count posted cast");
                    }
                    self.record(Task::Post);
                    self.notifier.notify(UserNotice::Posted);
                }
                Some(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Posting failed");
                let notice = match e.kind() {
                    HostErrorKind::EmptyCast => UserNotice::EmptyCast,
                    _ => UserNotice::PostFailed,
                };
                self.notifier.notify(notice);
                None
            }
        }
    }

    /// Asks the host to add the mini app.
    ///
    /// Returns true on success.
    pub async fn add_to_host(&mut self) -> bool {
        let poster = self.poster().await;
        match poster.add_mini_app().await {
            Ok(()) => {
                self.notifier.notify(UserNotice::Added);
                true
            }
            Err(e) => {
                warn!(error = %e, "Adding mini app failed");
                let notice = match e.kind() {
                    HostErrorKind::Unsupported(_) => UserNotice::AddUnsupported,
                    _ => UserNotice::AddFailed,
                };
                self.notifier.notify(notice);
                false
            }
        }
    }

    async fn poster(&mut self) -> CastPoster {
        if let Some(poster) = &self.poster {
            return poster.clone();
        }
        let poster = CastPoster::connect(Arc::clone(&self.host)).await;
        self.poster = Some(poster.clone());
        poster
    }

    fn record(&self, task: Task) {
        if let Err(e) = self.ledger.mark_done(task) {
            warn!(task = %task, error = %e, "Failed to record task");
        }
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Selected mood.
    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    /// Selected category.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// "More diverse" flag.
    pub fn diverse(&self) -> bool {
        self.diverse
    }

    /// Current draft.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Draft length in characters.
    pub fn char_count(&self) -> usize {
        self.draft.chars().count()
    }

    /// Returns true if the draft is longer than a cast allows.
    pub fn is_over_limit(&self) -> bool {
        self.char_count() > MAX_CAST_CHARS
    }

    /// Returns true while a generation request is running.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns true when running inside the host app.
    pub fn in_host(&self) -> bool {
        self.in_host
    }

    /// Task ledger.
    pub fn ledger(&self) -> &TaskLedger<R> {
        &self.ledger
    }
}
