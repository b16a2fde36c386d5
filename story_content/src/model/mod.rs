//! Content value types: questions, scenes, quizzes, and categories.

use serde::{Deserialize, Serialize};

/// Maximum number of questions a single quiz session can hold.
///
/// Quizzes requesting more than this are rejected at load time, so the
/// engine can keep its active question list in a fixed-size array.
pub const MAX_SESSION_QUESTIONS: usize = 20;

/// Maximum number of categories a quiz can expose on the selection screen
/// (one per choice control).
pub const MAX_SELECTABLE_CATEGORIES: usize = 3;

/// Minimum number of answer choices per question.
pub const MIN_ANSWER_CHOICES: usize = 3;

/// Maximum number of answer choices per question.
pub const MAX_ANSWER_CHOICES: usize = 4;

/// Index of a question in the catalog's question table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u16);

impl QuestionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a scene in the catalog's scene table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub u16);

impl SceneId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a quiz in the catalog's quiz table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(pub u16);

impl QuizId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for QuizId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a category in the catalog's category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u16);

impl CategoryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A knowledge-quiz question with its answer choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: CategoryId,
    /// The question prompt shown to the player.
    pub prompt: String,
    /// 3-4 answer choice strings, in display order.
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub correct: u8,
}

impl Question {
    /// Check whether the given choice ordinal answers this question correctly.
    pub fn is_correct(&self, choice: u8) -> bool {
        choice == self.correct
    }
}

/// What a scene does when the player advances past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    /// Plain narrative beat with outgoing branch edges.
    Normal,
    /// Parks navigation and hands control to the quiz engine.
    QuizTrigger,
    GoodEnding,
    BadEnding,
}

impl SceneKind {
    /// The ending this scene kind represents, if it is terminal.
    pub fn ending(self) -> Option<EndingKind> {
        match self {
            SceneKind::GoodEnding => Some(EndingKind::Good),
            SceneKind::BadEnding => Some(EndingKind::Bad),
            _ => None,
        }
    }

    pub fn is_ending(self) -> bool {
        self.ending().is_some()
    }
}

/// How a completed story ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingKind {
    Good,
    Bad,
}

/// One narrative beat: display text plus outgoing transitions.
///
/// Normal scenes branch through `next_scene_a` (success path) and
/// `next_scene_b` (failure path). Quiz-trigger scenes carry either a full
/// quiz reference or a single question reference; ending scenes carry
/// neither edges nor quiz references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub kind: SceneKind,
    /// Newline-delimited display text.
    pub text: String,
    /// Success-path edge.
    #[serde(default)]
    pub next_scene_a: Option<SceneId>,
    /// Failure-path edge.
    #[serde(default)]
    pub next_scene_b: Option<SceneId>,
    /// Full-quiz reference for quiz-trigger scenes.
    #[serde(default)]
    pub trigger_quiz: Option<QuizId>,
    /// Single-question reference for quiz-trigger scenes. Takes priority
    /// over `trigger_quiz` when both are authored.
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    /// Background tileset identifier for the renderer.
    #[serde(default)]
    pub background: u8,
    /// Music track identifier for the renderer.
    #[serde(default)]
    pub music: u8,
}

/// A bounded sequence of questions drawn from one chosen category, with a
/// wrong-answer failure threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub name: String,
    /// Wrong answers tolerated before the quiz fails. At least 1.
    pub wrong_limit: u8,
    /// Questions the session asks. At least 1.
    pub question_count: u16,
    /// Eligible categories in display order. The first three are
    /// selectable, one per choice control.
    pub categories: Vec<CategoryId>,
}

impl Quiz {
    /// The categories the player can actually pick, capped at one per
    /// choice control.
    pub fn selectable_categories(&self) -> &[CategoryId] {
        let n = self.categories.len().min(MAX_SELECTABLE_CATEGORIES);
        &self.categories[..n]
    }
}

/// A question category with its display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
