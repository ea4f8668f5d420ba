use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::model::{
    AnswerRecord, AnswerValue, Question, QuestionId, Report, ReportId, SessionState,
    SimulatorConfig, rounded_percentage,
};

use super::progress::{SessionSnapshot, format_clock};
use super::selection::QuestionSelector;
use super::view::QuestionReview;
use crate::ticker::{TICK_PERIOD, TickHandle, TickScheduler};

//
// ─── SESSION MANAGER ───────────────────────────────────────────────────────────
//

/// Owns every piece of state of a timed quiz attempt.
///
/// Operations never fail: calls that make no sense in the current state
/// (answering with no current question, navigating out of range, pausing a
/// session that is not running) are logged and ignored.
///
/// At most one tick handle is live at a time. Every transition that stops
/// or restarts the timer cancels the previous handle first, and ticks from
/// any other handle are dropped.
pub struct SessionManager {
    clock: Clock,
    rng: StdRng,
    ticker: Box<dyn TickScheduler>,
    config: SimulatorConfig,
    state: SessionState,
    pool: Vec<Question>,
    selected: Vec<Question>,
    answers: Vec<AnswerRecord>,
    current: usize,
    started_at: Option<DateTime<Utc>>,
    remaining_secs: u32,
    elapsed_secs: u32,
    active_tick: Option<TickHandle>,
}

impl SessionManager {
    #[must_use]
    pub fn new(ticker: impl TickScheduler + 'static) -> Self {
        Self {
            clock: Clock::default_clock(),
            rng: StdRng::from_os_rng(),
            ticker: Box::new(ticker),
            config: SimulatorConfig::default(),
            state: SessionState::Configuring,
            pool: Vec::new(),
            selected: Vec::new(),
            answers: Vec::new(),
            current: 0,
            started_at: None,
            remaining_secs: 0,
            elapsed_secs: 0,
            active_tick: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Use a seeded rng so question order is reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the clock used for answer timing and report timestamps.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    // ─── Setup ─────────────────────────────────────────────────────────────────

    /// Replace the whole question pool. The current selection is untouched.
    pub fn load_questions(&mut self, questions: Vec<Question>) {
        debug!(count = questions.len(), "question pool replaced");
        self.pool = questions;
    }

    /// Replace the configuration. Only honoured while configuring.
    pub fn configure(&mut self, config: SimulatorConfig) {
        if self.state != SessionState::Configuring {
            debug!(state = %self.state, "configure ignored outside configuring");
            return;
        }
        self.config = config;
    }

    /// Filter, shuffle and truncate the pool into the selected question list.
    pub fn select_questions(&mut self) {
        let plan = QuestionSelector::new(&self.config).build(&self.pool, &mut self.rng);
        debug!(
            eligible = plan.eligible,
            selected = plan.questions.len(),
            "questions selected"
        );
        self.selected = plan.questions;
    }

    // ─── Lifecycle ─────────────────────────────────────────────────────────────

    /// Begin a fresh attempt: select questions, reset progress, start the timer.
    pub fn start(&mut self) {
        self.cancel_tick();
        self.select_questions();
        if self.selected.is_empty() {
            warn!(difficulty = %self.config.difficulty(), "starting session with no questions");
        }

        self.state = SessionState::Running;
        self.started_at = Some(self.clock.now());
        self.remaining_secs = self.config.duration_secs();
        self.elapsed_secs = 0;
        self.current = 0;
        self.answers.clear();
        self.schedule_tick();

        info!(
            questions = self.selected.len(),
            duration_secs = self.remaining_secs,
            "session started"
        );
    }

    /// Stop the timer, keeping elapsed and remaining time.
    pub fn pause(&mut self) {
        if self.state != SessionState::Running {
            debug!(state = %self.state, "pause ignored");
            return;
        }
        self.cancel_tick();
        self.state = SessionState::Paused;
        info!(remaining_secs = self.remaining_secs, "session paused");
    }

    /// Restart the timer after a pause.
    pub fn resume(&mut self) {
        if self.state != SessionState::Paused {
            debug!(state = %self.state, "resume ignored");
            return;
        }
        self.cancel_tick();
        self.state = SessionState::Running;
        self.schedule_tick();
        info!(remaining_secs = self.remaining_secs, "session resumed");
    }

    /// Advance the timer by one second if `handle` is the live one.
    ///
    /// Finishes the session when the remaining time reaches zero.
    /// Returns the state after the tick.
    pub fn on_tick(&mut self, handle: TickHandle) -> SessionState {
        if self.active_tick != Some(handle) {
            debug!(handle = handle.value(), "stale tick dropped");
            return self.state;
        }
        if self.state != SessionState::Running {
            return self.state;
        }

        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            info!(elapsed_secs = self.elapsed_secs, "time is up");
            self.finalize();
        }
        self.state
    }

    /// End the attempt. Only a running or paused session can be finalized.
    pub fn finalize(&mut self) {
        if !self.state.is_active() {
            debug!(state = %self.state, "finalize ignored");
            return;
        }
        self.cancel_tick();
        self.state = SessionState::Finished;
        info!(
            answered = self.answers.len(),
            total = self.selected.len(),
            "session finished"
        );
    }

    /// Move a finished session into review.
    pub fn review(&mut self) {
        if self.state != SessionState::Finished {
            debug!(state = %self.state, "review ignored");
            return;
        }
        self.state = SessionState::Reviewing;
    }

    /// Back to configuring. Pool and configuration are kept.
    pub fn reset(&mut self) {
        self.cancel_tick();
        self.state = SessionState::Configuring;
        self.selected.clear();
        self.answers.clear();
        self.current = 0;
        self.started_at = None;
        self.elapsed_secs = 0;
        self.remaining_secs = 0;
        debug!("session reset");
    }

    // ─── Answering ─────────────────────────────────────────────────────────────

    /// Score `value` against the current question and record it.
    ///
    /// A second submission for the same question replaces the first.
    /// Ignored unless the session is running or paused with a current question.
    pub fn submit_answer(&mut self, value: AnswerValue) {
        if !self.state.is_active() {
            debug!(state = %self.state, "answer ignored outside an active attempt");
            return;
        }
        let Some(question) = self.selected.get(self.current) else {
            debug!("answer ignored without a current question");
            return;
        };

        let elapsed = self
            .started_at
            .map_or(0, |started| self.clock.secs_since(started));
        let record = AnswerRecord::score(
            question.id.clone(),
            &question.correct_answer,
            value,
            elapsed,
        );
        debug!(
            question = %record.question_id,
            correct = record.is_correct,
            elapsed_secs = elapsed,
            "answer recorded"
        );

        match self
            .answers
            .iter_mut()
            .find(|a| a.question_id == record.question_id)
        {
            Some(existing) => *existing = record,
            None => self.answers.push(record),
        }
    }

    // ─── Navigation ────────────────────────────────────────────────────────────

    pub fn next(&mut self) {
        if self.current + 1 < self.selected.len() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    pub fn go_to(&mut self, index: usize) {
        if index < self.selected.len() {
            self.current = index;
        } else {
            debug!(index, total = self.selected.len(), "go_to out of range");
        }
    }

    // ─── Reporting ─────────────────────────────────────────────────────────────

    /// Aggregate the current answers into an immutable report.
    #[must_use]
    pub fn generate_report(&self) -> Report {
        Report::from_answers(
            ReportId::generate(),
            self.clock.now(),
            self.config.clone(),
            self.answers.clone(),
            self.selected.len(),
            self.elapsed_secs,
        )
    }

    /// One review row per selected question, in selection order.
    #[must_use]
    pub fn question_reviews(&self) -> Vec<QuestionReview> {
        self.selected
            .iter()
            .map(|q| QuestionReview::new(q, self.answer_for(&q.id)))
            .collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            current_index: self.current,
            total: self.selected.len(),
            answered: self.answers.len(),
            remaining_secs: self.remaining_secs,
            elapsed_secs: self.elapsed_secs,
            remaining_clock: format_clock(self.remaining_secs),
            elapsed_clock: format_clock(self.elapsed_secs),
            progress_percent: self.progress_percent(),
            current_question: self.current_question().cloned(),
        }
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    #[must_use]
    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    #[must_use]
    pub fn selected_questions(&self) -> &[Question] {
        &self.selected
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<&AnswerRecord> {
        self.answers.iter().find(|a| &a.question_id == id)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.selected.get(self.current)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Position of the current question as a rounded percentage of the selection.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let total = u32::try_from(self.selected.len()).unwrap_or(u32::MAX);
        let current = u32::try_from(self.current).unwrap_or(u32::MAX);
        rounded_percentage(current, total)
    }

    /// The live tick handle, if the timer is running.
    #[must_use]
    pub fn active_tick(&self) -> Option<TickHandle> {
        self.active_tick
    }

    // ─── Timer plumbing ────────────────────────────────────────────────────────

    fn schedule_tick(&mut self) {
        let handle = self.ticker.schedule(TICK_PERIOD);
        self.active_tick = Some(handle);
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.active_tick.take() {
            self.ticker.cancel(handle);
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("pool_len", &self.pool.len())
            .field("selected_len", &self.selected.len())
            .field("answers_len", &self.answers.len())
            .field("current", &self.current)
            .field("remaining_secs", &self.remaining_secs)
            .field("elapsed_secs", &self.elapsed_secs)
            .field("active_tick", &self.active_tick)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
