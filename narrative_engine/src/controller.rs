//! The outer session state machine: Title -> Story -> CategorySelect ->
//! Quiz -> Ending.
//!
//! The controller owns the catalog, both inner state machines, and the
//! previous input snapshot. Each [`tick`](SessionController::tick)
//! evaluates the active component's transition exactly once and advances
//! the input snapshot exactly once, whatever branch was taken; the
//! navigator and quiz engine are coupled only through the signals the
//! controller reads here.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use story_content::{Catalog, EndingKind, SceneId};

use crate::input::{Button, ButtonEdges, InputSnapshot};
use crate::navigator::{BranchPath, RevealConfig, SceneNavigator};
use crate::quiz::{QuizEngine, QuizOutcome};

/// Which screen owns the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Title,
    Story,
    CategorySelect,
    Quiz,
    Ending(EndingKind),
}

/// The complete session: catalog, navigator, quiz engine, phase.
#[derive(Debug, Clone)]
pub struct SessionController {
    catalog: Catalog,
    navigator: SceneNavigator,
    quiz: QuizEngine,
    phase: SessionPhase,
    previous_input: InputSnapshot,
}

impl SessionController {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, RevealConfig::default())
    }

    pub fn with_config(catalog: Catalog, config: RevealConfig) -> Self {
        Self {
            catalog,
            navigator: SceneNavigator::new(config),
            quiz: QuizEngine::new(),
            phase: SessionPhase::Title,
            previous_input: InputSnapshot::NONE,
        }
    }

    /// Step the session by one display frame.
    pub fn tick(&mut self, input: InputSnapshot) {
        let edges = ButtonEdges::between(self.previous_input, input);

        match self.phase {
            SessionPhase::Title => self.tick_title(edges),
            SessionPhase::Story => self.tick_story(edges),
            SessionPhase::CategorySelect => self.tick_category_select(edges),
            SessionPhase::Quiz => self.tick_quiz(edges),
            SessionPhase::Ending(_) => self.tick_ending(edges),
        }

        // Snapshot advances exactly once per tick, whatever happened above.
        self.previous_input = input;
    }

    fn tick_title(&mut self, edges: ButtonEdges) {
        if edges.rising(Button::Start) {
            self.navigator.reset();
            self.navigator.start(&self.catalog, SceneId(0));
            self.phase = SessionPhase::Story;
            info!("session started");
        }
    }

    fn tick_story(&mut self, edges: ButtonEdges) {
        // Live navigation always walks the success edge.
        self.navigator
            .update(&self.catalog, edges, BranchPath::Success);

        if self.navigator.should_trigger_quiz() {
            if let Some(question) = self.navigator.question_id(&self.catalog) {
                self.quiz.start_single_question(&self.catalog, question);
                self.phase = SessionPhase::Quiz;
                info!("entering single-question challenge {question}");
            } else if let Some(quiz) = self.navigator.triggered_quiz(&self.catalog) {
                self.quiz.start_quiz(&self.catalog, quiz);
                self.phase = SessionPhase::CategorySelect;
                info!("entering quiz {quiz}");
            } else {
                // Trigger scene with no resolvable reference: walk on.
                warn!("quiz trigger had no resolvable quiz or question; continuing");
                self.navigator
                    .continue_after_quiz(&self.catalog, BranchPath::Success);
            }
        }

        if self.navigator.reached_end() {
            let ending = self.navigator.ending(&self.catalog);
            self.phase = SessionPhase::Ending(ending);
            info!("story reached the {ending:?} ending");
        }
    }

    fn tick_category_select(&mut self, edges: ButtonEdges) {
        if let Some(category) = self.quiz.select_category(&self.catalog, edges) {
            self.phase = SessionPhase::Quiz;
            info!("category {category} chosen");
        }
    }

    fn tick_quiz(&mut self, edges: ButtonEdges) {
        match self.quiz.update(&self.catalog, edges) {
            QuizOutcome::Passed => self.finish_quiz(BranchPath::Success),
            QuizOutcome::Failed => self.finish_quiz(BranchPath::Failure),
            QuizOutcome::InProgress => {}
        }
    }

    /// Route the quiz outcome back into the scene graph.
    fn finish_quiz(&mut self, path: BranchPath) {
        self.navigator.continue_after_quiz(&self.catalog, path);
        if self.navigator.reached_end() {
            let ending = self.navigator.ending(&self.catalog);
            self.phase = SessionPhase::Ending(ending);
            info!("story reached the {ending:?} ending after the quiz");
        } else {
            self.phase = SessionPhase::Story;
        }
    }

    fn tick_ending(&mut self, edges: ButtonEdges) {
        if edges.rising(Button::Start) {
            self.navigator.reset();
            self.quiz.reset();
            self.phase = SessionPhase::Title;
            info!("returned to title");
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Draw-side view of the navigator.
    pub fn navigator(&self) -> &SceneNavigator {
        &self.navigator
    }

    /// Draw-side view of the quiz engine.
    pub fn quiz_engine(&self) -> &QuizEngine {
        &self.quiz
    }
}
