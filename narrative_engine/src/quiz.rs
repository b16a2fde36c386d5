//! The quiz session engine: category selection, question sequencing,
//! scoring, and pass/fail determination.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use story_content::{
    Catalog, CategoryId, Question, QuestionId, QuizId, MAX_SESSION_QUESTIONS,
};

use crate::input::{Button, ButtonEdges};

/// Observable quiz engine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    /// No session bound.
    Unstarted,
    /// A full quiz is bound; waiting for the player to pick a category.
    CategorySelect,
    InProgress,
    Passed,
    Failed,
}

/// Result reported to the controller after each tick or submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizOutcome {
    InProgress,
    Passed,
    Failed,
}

/// An in-progress quiz or single-question challenge.
///
/// The active question set is a fixed-capacity array of references (by id)
/// into the catalog's question table; sessions never allocate. Ending a
/// session just resets the fields.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    phase: QuizPhase,
    /// The bound quiz definition; `None` in single-question mode.
    quiz: Option<QuizId>,
    questions: [QuestionId; MAX_SESSION_QUESTIONS],
    /// Populated length of `questions`.
    total: usize,
    /// Index of the question currently being asked.
    cursor: usize,
    wrong: u8,
    /// Wrong answers tolerated; 1 in single-question mode.
    wrong_limit: u8,
    /// Correct-or-survived answers needed to pass.
    required: usize,
    single_question: bool,
}

impl QuizEngine {
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::Unstarted,
            quiz: None,
            questions: [QuestionId(0); MAX_SESSION_QUESTIONS],
            total: 0,
            cursor: 0,
            wrong: 0,
            wrong_limit: 1,
            required: 0,
            single_question: false,
        }
    }

    /// Clear all fields back to `Unstarted`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Bind a full quiz and enter category selection.
    ///
    /// An out-of-range quiz id is a silent no-op.
    pub fn start_quiz(&mut self, catalog: &Catalog, quiz: QuizId) {
        let Some(definition) = catalog.quiz(quiz) else {
            warn!("start_quiz ignored: quiz {quiz} is out of range");
            return;
        };

        self.phase = QuizPhase::CategorySelect;
        self.quiz = Some(quiz);
        self.total = 0;
        self.cursor = 0;
        self.wrong = 0;
        self.wrong_limit = definition.wrong_limit;
        self.required = definition.question_count as usize;
        self.single_question = false;
        debug!("quiz {quiz} started, awaiting category choice");
    }

    /// Bind a one-question challenge, bypassing category selection.
    ///
    /// An out-of-range question id is a silent no-op.
    pub fn start_single_question(&mut self, catalog: &Catalog, question: QuestionId) {
        if catalog.question(question).is_none() {
            warn!("start_single_question ignored: question {question} is out of range");
            return;
        }

        self.phase = QuizPhase::InProgress;
        self.quiz = None;
        self.questions[0] = question;
        self.total = 1;
        self.cursor = 0;
        self.wrong = 0;
        self.wrong_limit = 1;
        self.required = 1;
        self.single_question = true;
        debug!("single-question challenge started with question {question}");
    }

    /// Map a rising choice press to one of the bound quiz's eligible
    /// categories and build the session's question set from it.
    ///
    /// The first eligible category answers to button A, the second to B,
    /// the third to C. Input matching no eligible category returns `None`
    /// and leaves category selection untouched. Only valid while in
    /// `CategorySelect`.
    pub fn select_category(
        &mut self,
        catalog: &Catalog,
        edges: ButtonEdges,
    ) -> Option<CategoryId> {
        if self.phase != QuizPhase::CategorySelect {
            return None;
        }
        let quiz = self.quiz.and_then(|id| catalog.quiz(id))?;

        for (ordinal, &category) in quiz.selectable_categories().iter().enumerate() {
            if edges.rising(Button::CHOICES[ordinal]) {
                self.load_category(catalog, category);
                self.phase = QuizPhase::InProgress;
                debug!(
                    "category {category} selected, {} questions loaded",
                    self.total
                );
                return Some(category);
            }
        }
        None
    }

    /// Fill the question set from the category's precomputed index list,
    /// in stored order, up to `min(available, question_count)`.
    fn load_category(&mut self, catalog: &Catalog, category: CategoryId) {
        self.total = 0;
        for &question in catalog.questions_in_category(category) {
            if self.total >= self.required || self.total >= MAX_SESSION_QUESTIONS {
                break;
            }
            self.questions[self.total] = question;
            self.total += 1;
        }
    }

    /// Evaluate one answer against the current question.
    ///
    /// Only meaningful while `InProgress` with questions remaining; any
    /// other call is a no-op reporting the current outcome.
    pub fn submit_answer(&mut self, catalog: &Catalog, choice: u8) -> QuizOutcome {
        if self.phase != QuizPhase::InProgress {
            return self.outcome();
        }
        if self.cursor >= self.total {
            return QuizOutcome::InProgress;
        }
        let Some(question) = catalog.question(self.questions[self.cursor]) else {
            warn!("current question vanished from the catalog; ignoring answer");
            return QuizOutcome::InProgress;
        };

        if !question.is_correct(choice) {
            self.wrong += 1;
            debug!(
                "wrong answer {choice} to question {} ({}/{} wrong)",
                question.id, self.wrong, self.wrong_limit
            );
            if self.wrong >= self.wrong_limit {
                self.phase = QuizPhase::Failed;
                info!("quiz failed after {} wrong answers", self.wrong);
                return QuizOutcome::Failed;
            }
        }

        self.cursor += 1;
        if self.cursor >= self.required {
            self.phase = QuizPhase::Passed;
            info!("quiz passed with {} wrong answers", self.wrong);
            return QuizOutcome::Passed;
        }
        QuizOutcome::InProgress
    }

    /// Map this tick's input to an answer submission, if any.
    ///
    /// At most one submission per tick; the lowest-ordinal newly pressed
    /// choice control wins.
    pub fn update(&mut self, catalog: &Catalog, edges: ButtonEdges) -> QuizOutcome {
        match edges.first_rising_choice() {
            Some(choice) => self.submit_answer(catalog, choice),
            None => self.outcome(),
        }
    }

    fn outcome(&self) -> QuizOutcome {
        match self.phase {
            QuizPhase::Passed => QuizOutcome::Passed,
            QuizPhase::Failed => QuizOutcome::Failed,
            _ => QuizOutcome::InProgress,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn single_question_mode(&self) -> bool {
        self.single_question
    }

    /// The question currently being asked, for the renderer.
    pub fn current_question<'a>(&self, catalog: &'a Catalog) -> Option<&'a Question> {
        if self.phase != QuizPhase::InProgress || self.cursor >= self.total {
            return None;
        }
        catalog.question(self.questions[self.cursor])
    }

    /// (answered, required) counts for the progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.required)
    }

    pub fn wrong_answers(&self) -> u8 {
        self.wrong
    }

    /// Wrong answers still tolerated before the session fails.
    pub fn remaining_attempts(&self) -> u8 {
        self.wrong_limit.saturating_sub(self.wrong)
    }

    /// Display name of the bound quiz, for the renderer.
    pub fn quiz_name<'a>(&self, catalog: &'a Catalog) -> Option<&'a str> {
        self.quiz
            .and_then(|id| catalog.quiz(id))
            .map(|q| q.name.as_str())
    }

    /// The categories the player can pick right now, with the control
    /// each answers to. Empty outside `CategorySelect`.
    pub fn selectable_categories<'a>(
        &self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = (Button, CategoryId)> + 'a {
        let categories = match self.phase {
            QuizPhase::CategorySelect => self
                .quiz
                .and_then(|id| catalog.quiz(id))
                .map(|q| q.selectable_categories())
                .unwrap_or(&[]),
            _ => &[],
        };
        Button::CHOICES.into_iter().zip(categories.iter().copied())
    }
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSnapshot;
    use story_content::{Category, Quiz};

    fn no_edges() -> ButtonEdges {
        ButtonEdges::between(InputSnapshot::NONE, InputSnapshot::NONE)
    }

    fn press(button: Button) -> ButtonEdges {
        ButtonEdges::between(InputSnapshot::NONE, InputSnapshot::NONE.with(button))
    }

    fn question(id: u16, category: u16, correct: u8) -> story_content::Question {
        story_content::Question {
            id: QuestionId(id),
            category: CategoryId(category),
            prompt: format!("Question {id}?"),
            choices: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct,
        }
    }

    /// One category holding three questions (correct answers 0, 1, 2),
    /// one quiz asking 3 of them with wrong_limit 2.
    fn drill_catalog() -> Catalog {
        Catalog::new(
            vec![Category {
                id: CategoryId(0),
                name: "history".to_string(),
            }],
            vec![question(0, 0, 0), question(1, 0, 1), question(2, 0, 2)],
            vec![Quiz {
                id: QuizId(0),
                name: "Drill".to_string(),
                wrong_limit: 2,
                question_count: 3,
                categories: vec![CategoryId(0)],
            }],
            vec![],
        )
        .unwrap()
    }

    fn started_engine(catalog: &Catalog) -> QuizEngine {
        let mut engine = QuizEngine::new();
        engine.start_quiz(catalog, QuizId(0));
        engine.select_category(catalog, press(Button::A)).unwrap();
        engine
    }

    #[test]
    fn test_start_quiz_enters_category_select() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();

        assert_eq!(engine.phase(), QuizPhase::Unstarted);
        engine.start_quiz(&catalog, QuizId(0));
        assert_eq!(engine.phase(), QuizPhase::CategorySelect);
        assert_eq!(engine.quiz_name(&catalog), Some("Drill"));
        assert!(!engine.single_question_mode());
    }

    #[test]
    fn test_start_quiz_out_of_range_is_ignored() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();

        engine.start_quiz(&catalog, QuizId(9));
        assert_eq!(engine.phase(), QuizPhase::Unstarted);
    }

    #[test]
    fn test_category_selection_restricted_to_eligible_set() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();
        engine.start_quiz(&catalog, QuizId(0));

        // Only one eligible category, mapped to A. B and C select nothing.
        assert_eq!(engine.select_category(&catalog, press(Button::B)), None);
        assert_eq!(engine.select_category(&catalog, press(Button::C)), None);
        assert_eq!(engine.select_category(&catalog, no_edges()), None);
        assert_eq!(engine.phase(), QuizPhase::CategorySelect);

        assert_eq!(
            engine.select_category(&catalog, press(Button::A)),
            Some(CategoryId(0))
        );
        assert_eq!(engine.phase(), QuizPhase::InProgress);
        assert_eq!(engine.progress(), (0, 3));
    }

    #[test]
    fn test_category_ordinal_mapping() {
        // Quiz declares categories in a custom order; B must map to the
        // second declared category, not to category id 1.
        let catalog = Catalog::new(
            vec![
                Category {
                    id: CategoryId(0),
                    name: "geography".to_string(),
                },
                Category {
                    id: CategoryId(1),
                    name: "history".to_string(),
                },
            ],
            vec![question(0, 0, 0), question(1, 1, 1)],
            vec![Quiz {
                id: QuizId(0),
                name: "Mixed".to_string(),
                wrong_limit: 1,
                question_count: 1,
                categories: vec![CategoryId(1), CategoryId(0)],
            }],
            vec![],
        )
        .unwrap();

        let mut engine = QuizEngine::new();
        engine.start_quiz(&catalog, QuizId(0));

        let mapping: Vec<_> = engine.selectable_categories(&catalog).collect();
        assert_eq!(
            mapping,
            vec![(Button::A, CategoryId(1)), (Button::B, CategoryId(0))]
        );

        assert_eq!(
            engine.select_category(&catalog, press(Button::B)),
            Some(CategoryId(0))
        );
    }

    #[test]
    fn test_select_category_invalid_phase_is_noop() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();

        assert_eq!(engine.select_category(&catalog, press(Button::A)), None);
        assert_eq!(engine.phase(), QuizPhase::Unstarted);
    }

    #[test]
    fn test_question_set_capped_by_availability() {
        // Category holds 2 questions but the quiz asks for 5.
        let catalog = Catalog::new(
            vec![Category {
                id: CategoryId(0),
                name: "history".to_string(),
            }],
            vec![question(0, 0, 0), question(1, 0, 0)],
            vec![Quiz {
                id: QuizId(0),
                name: "Short".to_string(),
                wrong_limit: 1,
                question_count: 5,
                categories: vec![CategoryId(0)],
            }],
            vec![],
        )
        .unwrap();

        let mut engine = QuizEngine::new();
        engine.start_quiz(&catalog, QuizId(0));
        engine.select_category(&catalog, press(Button::A)).unwrap();

        // min(available, requested) questions were loaded.
        assert_eq!(engine.current_question(&catalog).unwrap().id, QuestionId(0));
        assert_eq!(engine.submit_answer(&catalog, 0), QuizOutcome::InProgress);
        assert_eq!(engine.current_question(&catalog).unwrap().id, QuestionId(1));
        assert_eq!(engine.submit_answer(&catalog, 0), QuizOutcome::InProgress);

        // Set exhausted below the requested count: defensive guard holds.
        assert!(engine.current_question(&catalog).is_none());
        assert_eq!(engine.submit_answer(&catalog, 0), QuizOutcome::InProgress);
        assert_eq!(engine.phase(), QuizPhase::InProgress);
    }

    #[test]
    fn test_pass_exactly_at_question_count() {
        let catalog = drill_catalog();
        let mut engine = started_engine(&catalog);

        assert_eq!(engine.submit_answer(&catalog, 0), QuizOutcome::InProgress);
        assert_eq!(engine.submit_answer(&catalog, 1), QuizOutcome::InProgress);
        // Third correct answer reaches question_count: passed on this call.
        assert_eq!(engine.submit_answer(&catalog, 2), QuizOutcome::Passed);
        assert_eq!(engine.phase(), QuizPhase::Passed);
        assert_eq!(engine.progress(), (3, 3));
    }

    #[test]
    fn test_fail_exactly_at_wrong_limit() {
        let catalog = drill_catalog();
        let mut engine = started_engine(&catalog);

        // wrong_limit is 2: first wrong answer stays in progress.
        assert_eq!(engine.submit_answer(&catalog, 2), QuizOutcome::InProgress);
        assert_eq!(engine.wrong_answers(), 1);
        assert_eq!(engine.remaining_attempts(), 1);
        assert_eq!(engine.phase(), QuizPhase::InProgress);

        // Second wrong answer reaches the limit: failed, cursor frozen.
        let (answered_before, _) = engine.progress();
        assert_eq!(engine.submit_answer(&catalog, 0), QuizOutcome::Failed);
        assert_eq!(engine.phase(), QuizPhase::Failed);
        assert_eq!(engine.progress().0, answered_before);
    }

    #[test]
    fn test_mixed_answers_survive_below_limit() {
        let catalog = drill_catalog();
        let mut engine = started_engine(&catalog);

        assert_eq!(engine.submit_answer(&catalog, 1), QuizOutcome::InProgress); // wrong
        assert_eq!(engine.submit_answer(&catalog, 1), QuizOutcome::InProgress); // right
        assert_eq!(engine.submit_answer(&catalog, 2), QuizOutcome::Passed); // right
        assert_eq!(engine.wrong_answers(), 1);
    }

    #[test]
    fn test_single_question_pass() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();
        engine.start_single_question(&catalog, QuestionId(1));

        assert_eq!(engine.phase(), QuizPhase::InProgress);
        assert!(engine.single_question_mode());
        assert_eq!(engine.progress(), (0, 1));
        assert_eq!(engine.quiz_name(&catalog), None);

        assert_eq!(engine.submit_answer(&catalog, 1), QuizOutcome::Passed);
    }

    #[test]
    fn test_single_question_fails_on_first_wrong() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();
        engine.start_single_question(&catalog, QuestionId(2));

        // Limit is 1 regardless of any quiz's wrong_limit.
        assert_eq!(engine.submit_answer(&catalog, 0), QuizOutcome::Failed);
        assert_eq!(engine.phase(), QuizPhase::Failed);
    }

    #[test]
    fn test_single_question_out_of_range_is_ignored() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();

        engine.start_single_question(&catalog, QuestionId(77));
        assert_eq!(engine.phase(), QuizPhase::Unstarted);
    }

    #[test]
    fn test_submit_in_wrong_phase_is_noop() {
        let catalog = drill_catalog();
        let mut engine = QuizEngine::new();

        assert_eq!(engine.submit_answer(&catalog, 0), QuizOutcome::InProgress);
        assert_eq!(engine.phase(), QuizPhase::Unstarted);

        engine.start_single_question(&catalog, QuestionId(0));
        engine.submit_answer(&catalog, 0);
        assert_eq!(engine.phase(), QuizPhase::Passed);

        // Terminal phases keep reporting their outcome.
        assert_eq!(engine.submit_answer(&catalog, 1), QuizOutcome::Passed);
    }

    #[test]
    fn test_update_maps_buttons_to_choices() {
        let catalog = drill_catalog();
        let mut engine = started_engine(&catalog);

        // Question 0's correct answer is ordinal 0 -> button A.
        assert_eq!(engine.update(&catalog, press(Button::A)), QuizOutcome::InProgress);
        assert_eq!(engine.wrong_answers(), 0);

        // Question 1's correct answer is ordinal 1 -> button B.
        assert_eq!(engine.update(&catalog, press(Button::B)), QuizOutcome::InProgress);
        assert_eq!(engine.wrong_answers(), 0);

        // No new press: nothing happens.
        assert_eq!(engine.update(&catalog, no_edges()), QuizOutcome::InProgress);
        assert_eq!(engine.progress(), (2, 3));
    }

    #[test]
    fn test_update_accepts_one_submission_per_tick() {
        let catalog = drill_catalog();
        let mut engine = started_engine(&catalog);

        // A and C rise together; only A (ordinal 0) registers, which is
        // correct for question 0, so no wrong answer is recorded.
        let both = InputSnapshot::NONE.with(Button::A).with(Button::C);
        let edges = ButtonEdges::between(InputSnapshot::NONE, both);
        assert_eq!(engine.update(&catalog, edges), QuizOutcome::InProgress);
        assert_eq!(engine.wrong_answers(), 0);
        assert_eq!(engine.progress(), (1, 3));
    }

    #[test]
    fn test_reset_clears_session() {
        let catalog = drill_catalog();
        let mut engine = started_engine(&catalog);
        engine.submit_answer(&catalog, 2);

        engine.reset();
        assert_eq!(engine.phase(), QuizPhase::Unstarted);
        assert_eq!(engine.wrong_answers(), 0);
        assert_eq!(engine.progress(), (0, 0));
        assert!(engine.current_question(&catalog).is_none());
        assert_eq!(engine.selectable_categories(&catalog).count(), 0);
    }
}
