//! The content catalog - immutable tables with derived category indexes.

mod loader;

pub use loader::*;

use crate::model::{
    Category, CategoryId, Question, QuestionId, Quiz, QuizId, Scene, SceneId, SceneKind,
};

/// The complete, read-only content set for one story.
///
/// Tables are index-addressed: an id is the position of its entry in the
/// owning table. The per-category question index lists are derived once at
/// construction, in question-table order, and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
    scenes: Vec<Scene>,
    quizzes: Vec<Quiz>,
    categories: Vec<Category>,

    /// Index: category position -> questions belonging to it.
    category_questions: Vec<Vec<QuestionId>>,
}

impl Catalog {
    /// Build a catalog from authored tables, validating them first.
    pub fn new(
        categories: Vec<Category>,
        questions: Vec<Question>,
        quizzes: Vec<Quiz>,
        scenes: Vec<Scene>,
    ) -> Result<Self, ContentError> {
        loader::validate(&categories, &questions, &quizzes, &scenes)?;

        let mut category_questions = vec![Vec::new(); categories.len()];
        for question in &questions {
            category_questions[question.category.index()].push(question.id);
        }

        Ok(Self {
            questions,
            scenes,
            quizzes,
            categories,
            category_questions,
        })
    }

    /// Get a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(id.index())
    }

    /// Get a scene by id.
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id.index())
    }

    /// Get a quiz by id.
    pub fn quiz(&self, id: QuizId) -> Option<&Quiz> {
        self.quizzes.get(id.index())
    }

    /// Get a category by id.
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id.index())
    }

    /// Questions belonging to a category, in question-table order.
    ///
    /// Returns an empty slice for an out-of-range category.
    pub fn questions_in_category(&self, id: CategoryId) -> &[QuestionId] {
        self.category_questions
            .get(id.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn quiz_count(&self) -> usize {
        self.quizzes.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// The largest question count any authored quiz requests.
    pub fn max_question_count(&self) -> u16 {
        self.quizzes
            .iter()
            .map(|q| q.question_count)
            .max()
            .unwrap_or(0)
    }

    /// A small built-in story used by tests and demos: three categories,
    /// six questions, one quiz, and a four-scene branch with both endings.
    pub fn demo() -> Self {
        let categories = vec![
            Category {
                id: CategoryId(0),
                name: "geography".to_string(),
            },
            Category {
                id: CategoryId(1),
                name: "history".to_string(),
            },
            Category {
                id: CategoryId(2),
                name: "math".to_string(),
            },
        ];

        let questions = vec![
            Question {
                id: QuestionId(0),
                category: CategoryId(1),
                prompt: "When did World War II end?".to_string(),
                choices: str_vec(&["1943", "1945", "1947"]),
                correct: 1,
            },
            Question {
                id: QuestionId(1),
                category: CategoryId(0),
                prompt: "Which is the largest ocean?".to_string(),
                choices: str_vec(&["Atlantic", "Pacific", "Indian"]),
                correct: 1,
            },
            Question {
                id: QuestionId(2),
                category: CategoryId(2),
                prompt: "What is 5 * 6?".to_string(),
                choices: str_vec(&["25", "30", "35"]),
                correct: 1,
            },
            Question {
                id: QuestionId(3),
                category: CategoryId(1),
                prompt: "Which empire built the Colosseum?".to_string(),
                choices: str_vec(&["Roman", "Ottoman", "Byzantine"]),
                correct: 0,
            },
            Question {
                id: QuestionId(4),
                category: CategoryId(0),
                prompt: "What is the capital of Japan?".to_string(),
                choices: str_vec(&["Kyoto", "Osaka", "Tokyo"]),
                correct: 2,
            },
            Question {
                id: QuestionId(5),
                category: CategoryId(2),
                prompt: "What is 12 / 4?".to_string(),
                choices: str_vec(&["3", "4", "6"]),
                correct: 0,
            },
        ];

        let quizzes = vec![Quiz {
            id: QuizId(0),
            name: "General Knowledge".to_string(),
            wrong_limit: 2,
            question_count: 2,
            categories: vec![CategoryId(1), CategoryId(0), CategoryId(2)],
        }];

        let scenes = vec![
            Scene {
                id: SceneId(0),
                kind: SceneKind::Normal,
                text: "Welcome to the adventure!\nPress A to continue".to_string(),
                next_scene_a: Some(SceneId(1)),
                next_scene_b: None,
                trigger_quiz: None,
                question_id: None,
                background: 0,
                music: 0,
            },
            Scene {
                id: SceneId(1),
                kind: SceneKind::QuizTrigger,
                text: "You encounter a wise old man.\nHe asks you a question..."
                    .to_string(),
                next_scene_a: Some(SceneId(2)),
                next_scene_b: Some(SceneId(3)),
                trigger_quiz: Some(QuizId(0)),
                question_id: None,
                background: 1,
                music: 1,
            },
            Scene {
                id: SceneId(2),
                kind: SceneKind::GoodEnding,
                text: "You have completed the challenge!\nCongratulations!".to_string(),
                next_scene_a: None,
                next_scene_b: None,
                trigger_quiz: None,
                question_id: None,
                background: 2,
                music: 2,
            },
            Scene {
                id: SceneId(3),
                kind: SceneKind::BadEnding,
                text: "The old man shakes his head.\nDarkness closes in...".to_string(),
                next_scene_a: None,
                next_scene_b: None,
                trigger_quiz: None,
                question_id: None,
                background: 3,
                music: 2,
            },
        ];

        Self::new(categories, questions, quizzes, scenes)
            .expect("built-in demo content is valid")
    }
}

fn str_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
