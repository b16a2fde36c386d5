//! TOML content loading and load-time validation.
//!
//! Branch edges pointing at out-of-range scenes are deliberately not load
//! errors: the navigator treats an invalid edge as absent and falls back
//! to an ending, so suspicious edges are only logged here.

use log::warn;
use serde::Deserialize;
use thiserror::Error;

use super::Catalog;
use crate::model::{
    Category, Question, Quiz, Scene, SceneKind, MAX_ANSWER_CHOICES, MAX_SESSION_QUESTIONS,
    MIN_ANSWER_CHOICES,
};

/// Errors produced while building a catalog.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse content document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{table} entry at position {index} has id {found}; ids must match table order")]
    IdMismatch {
        table: &'static str,
        index: usize,
        found: u16,
    },

    #[error("{context} references out-of-range {target} {id}")]
    BadReference {
        context: String,
        target: &'static str,
        id: u16,
    },

    #[error("question {id} is invalid: {reason}")]
    InvalidQuestion { id: u16, reason: String },

    #[error("quiz {id} is invalid: {reason}")]
    InvalidQuiz { id: u16, reason: String },

    #[error("scene {id} is invalid: {reason}")]
    InvalidScene { id: u16, reason: String },

    #[error("quiz {id} requests {requested} questions; session capacity is {capacity}")]
    CapacityExceeded {
        id: u16,
        requested: u16,
        capacity: usize,
    },
}

/// Top-level shape of a TOML content document.
#[derive(Debug, Deserialize)]
struct ContentDoc {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    quizzes: Vec<Quiz>,
    #[serde(default)]
    scenes: Vec<Scene>,
}

impl Catalog {
    /// Parse and validate a TOML content document.
    pub fn from_toml_str(document: &str) -> Result<Catalog, ContentError> {
        let doc: ContentDoc = toml::from_str(document)?;
        Catalog::new(doc.categories, doc.questions, doc.quizzes, doc.scenes)
    }
}

/// Validate authored tables before the catalog takes ownership of them.
pub(crate) fn validate(
    categories: &[Category],
    questions: &[Question],
    quizzes: &[Quiz],
    scenes: &[Scene],
) -> Result<(), ContentError> {
    for (index, category) in categories.iter().enumerate() {
        if category.id.index() != index {
            return Err(ContentError::IdMismatch {
                table: "category",
                index,
                found: category.id.0,
            });
        }
    }

    for (index, question) in questions.iter().enumerate() {
        if question.id.index() != index {
            return Err(ContentError::IdMismatch {
                table: "question",
                index,
                found: question.id.0,
            });
        }
        if question.category.index() >= categories.len() {
            return Err(ContentError::BadReference {
                context: format!("question {}", question.id),
                target: "category",
                id: question.category.0,
            });
        }
        let choices = question.choices.len();
        if !(MIN_ANSWER_CHOICES..=MAX_ANSWER_CHOICES).contains(&choices) {
            return Err(ContentError::InvalidQuestion {
                id: question.id.0,
                reason: format!(
                    "has {choices} choices, expected {MIN_ANSWER_CHOICES} to {MAX_ANSWER_CHOICES}"
                ),
            });
        }
        if question.correct as usize >= choices {
            return Err(ContentError::InvalidQuestion {
                id: question.id.0,
                reason: format!("correct choice {} is out of range", question.correct),
            });
        }
    }

    for (index, quiz) in quizzes.iter().enumerate() {
        if quiz.id.index() != index {
            return Err(ContentError::IdMismatch {
                table: "quiz",
                index,
                found: quiz.id.0,
            });
        }
        if quiz.wrong_limit < 1 {
            return Err(ContentError::InvalidQuiz {
                id: quiz.id.0,
                reason: "wrong_limit must be at least 1".to_string(),
            });
        }
        if quiz.question_count < 1 {
            return Err(ContentError::InvalidQuiz {
                id: quiz.id.0,
                reason: "question_count must be at least 1".to_string(),
            });
        }
        if quiz.question_count as usize > MAX_SESSION_QUESTIONS {
            return Err(ContentError::CapacityExceeded {
                id: quiz.id.0,
                requested: quiz.question_count,
                capacity: MAX_SESSION_QUESTIONS,
            });
        }
        if quiz.categories.is_empty() {
            return Err(ContentError::InvalidQuiz {
                id: quiz.id.0,
                reason: "has no eligible categories".to_string(),
            });
        }
        for &category in &quiz.categories {
            if category.index() >= categories.len() {
                return Err(ContentError::BadReference {
                    context: format!("quiz {}", quiz.id),
                    target: "category",
                    id: category.0,
                });
            }
        }
    }

    for (index, scene) in scenes.iter().enumerate() {
        if scene.id.index() != index {
            return Err(ContentError::IdMismatch {
                table: "scene",
                index,
                found: scene.id.0,
            });
        }

        match scene.kind {
            SceneKind::QuizTrigger => {
                if scene.trigger_quiz.is_none() && scene.question_id.is_none() {
                    return Err(ContentError::InvalidScene {
                        id: scene.id.0,
                        reason: "quiz trigger carries neither a quiz nor a question"
                            .to_string(),
                    });
                }
                if scene.trigger_quiz.is_some() && scene.question_id.is_some() {
                    warn!(
                        "scene {} sets both trigger_quiz and question_id; \
                         single-question mode will win",
                        scene.id
                    );
                }
                if let Some(quiz) = scene.trigger_quiz {
                    if quiz.index() >= quizzes.len() {
                        return Err(ContentError::BadReference {
                            context: format!("scene {}", scene.id),
                            target: "quiz",
                            id: quiz.0,
                        });
                    }
                }
                if let Some(question) = scene.question_id {
                    if question.index() >= questions.len() {
                        return Err(ContentError::BadReference {
                            context: format!("scene {}", scene.id),
                            target: "question",
                            id: question.0,
                        });
                    }
                }
            }
            SceneKind::GoodEnding | SceneKind::BadEnding => {
                if scene.next_scene_a.is_some() || scene.next_scene_b.is_some() {
                    return Err(ContentError::InvalidScene {
                        id: scene.id.0,
                        reason: "ending scenes have no outgoing edges".to_string(),
                    });
                }
                if scene.trigger_quiz.is_some() || scene.question_id.is_some() {
                    return Err(ContentError::InvalidScene {
                        id: scene.id.0,
                        reason: "ending scenes cannot reference quizzes".to_string(),
                    });
                }
            }
            SceneKind::Normal => {}
        }

        // Dangling edges degrade to an ending at runtime; content is
        // trusted, so only warn.
        for edge in [scene.next_scene_a, scene.next_scene_b].into_iter().flatten() {
            if edge.index() >= scenes.len() {
                warn!(
                    "scene {} has edge to out-of-range scene {}; it will read as an ending",
                    scene.id, edge
                );
            }
        }
    }

    Ok(())
}
