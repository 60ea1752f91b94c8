//! Content kinds the engine can reason about.
//!
//! The engine never inspects concrete content types. It only needs an
//! identifier, a difficulty on the 1-5 scale and a baseline duration, which
//! each kind exposes through the capability traits below.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{ContentType, SkillCategory};

pub const DEFAULT_DIFFICULTY: f64 = 3.0;
pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 5.0;

const VOCABULARY_BASE_MS: i64 = 120_000;
const QUESTION_BASE_MS: i64 = 90_000;
const DEFAULT_BASE_MS: i64 = 180_000;
const MINUTE_MS: i64 = 60_000;

pub trait HasIdentity {
    fn content_id(&self) -> String;
    fn content_type(&self) -> ContentType;
}

pub trait HasDifficulty {
    fn difficulty(&self) -> f64;
}

pub trait EstimatedDuration {
    /// Expected completion time for an average learner, in milliseconds.
    fn base_duration_ms(&self) -> i64 {
        DEFAULT_BASE_MS
    }
}

/// Anything the prediction engine can score.
pub trait LearningContent: HasIdentity + HasDifficulty + EstimatedDuration {}

impl<T: HasIdentity + HasDifficulty + EstimatedDuration> LearningContent for T {}

pub fn synthesized_id() -> String {
    format!("unknown_{}", Uuid::new_v4())
}

fn identity_or_synthesized(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        synthesized_id()
    } else {
        trimmed.to_string()
    }
}

/// Difficulty values outside 1..=5 (or NaN) fall back to mid-scale.
pub fn sanitize_difficulty(value: f64) -> f64 {
    if value.is_finite() && (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&value) {
        value
    } else {
        DEFAULT_DIFFICULTY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub word: String,
    #[serde(default)]
    pub definition: String,
    pub difficulty: u8,
}

impl HasIdentity for VocabularyItem {
    fn content_id(&self) -> String {
        identity_or_synthesized(&self.word)
    }

    fn content_type(&self) -> ContentType {
        ContentType::Vocabulary
    }
}

impl HasDifficulty for VocabularyItem {
    fn difficulty(&self) -> f64 {
        sanitize_difficulty(self.difficulty as f64)
    }
}

impl EstimatedDuration for VocabularyItem {
    fn base_duration_ms(&self) -> i64 {
        VOCABULARY_BASE_MS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub id: String,
    #[serde(default)]
    pub prompt: String,
    pub skill: SkillCategory,
    pub difficulty: f64,
}

impl HasIdentity for GeneratedQuestion {
    fn content_id(&self) -> String {
        identity_or_synthesized(&self.id)
    }

    fn content_type(&self) -> ContentType {
        ContentType::Questions
    }
}

impl HasDifficulty for GeneratedQuestion {
    fn difficulty(&self) -> f64 {
        sanitize_difficulty(self.difficulty)
    }
}

impl EstimatedDuration for GeneratedQuestion {
    fn base_duration_ms(&self) -> i64 {
        QUESTION_BASE_MS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPassage {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Numeric level on the shared 1-5 scale.
    pub difficulty_level: f64,
    pub estimated_minutes: u32,
}

impl HasIdentity for ReadingPassage {
    fn content_id(&self) -> String {
        identity_or_synthesized(&self.id)
    }

    fn content_type(&self) -> ContentType {
        ContentType::Reading
    }
}

impl HasDifficulty for ReadingPassage {
    fn difficulty(&self) -> f64 {
        sanitize_difficulty(self.difficulty_level)
    }
}

impl EstimatedDuration for ReadingPassage {
    fn base_duration_ms(&self) -> i64 {
        self.estimated_minutes as i64 * MINUTE_MS
    }
}

/// Content of a kind the engine does not know. Scored with neutral defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueContent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub kind: String,
}

impl HasIdentity for OpaqueContent {
    fn content_id(&self) -> String {
        self.id
            .as_deref()
            .map(identity_or_synthesized)
            .unwrap_or_else(synthesized_id)
    }

    fn content_type(&self) -> ContentType {
        ContentType::Mixed
    }
}

impl HasDifficulty for OpaqueContent {
    fn difficulty(&self) -> f64 {
        DEFAULT_DIFFICULTY
    }
}

impl EstimatedDuration for OpaqueContent {}

/// Closed set of content kinds, for callers that hold mixed lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "camelCase")]
pub enum ContentItem {
    Vocabulary(VocabularyItem),
    Question(GeneratedQuestion),
    Reading(ReadingPassage),
    Other(OpaqueContent),
}

impl ContentItem {
    /// Skill the item trains, when the kind implies one.
    pub fn skill(&self) -> Option<SkillCategory> {
        match self {
            Self::Vocabulary(_) => Some(SkillCategory::Vocab),
            Self::Question(item) => Some(item.skill),
            Self::Reading(_) => Some(SkillCategory::Reading),
            Self::Other(_) => None,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Vocabulary(item) => item.word.clone(),
            Self::Question(item) => item.prompt.clone(),
            Self::Reading(item) if item.title.trim().is_empty() => item.content_id(),
            Self::Reading(item) => item.title.clone(),
            Self::Other(item) => item.kind.clone(),
        }
    }
}

impl HasIdentity for ContentItem {
    fn content_id(&self) -> String {
        match self {
            Self::Vocabulary(item) => item.content_id(),
            Self::Question(item) => item.content_id(),
            Self::Reading(item) => item.content_id(),
            Self::Other(item) => item.content_id(),
        }
    }

    fn content_type(&self) -> ContentType {
        match self {
            Self::Vocabulary(item) => item.content_type(),
            Self::Question(item) => item.content_type(),
            Self::Reading(item) => item.content_type(),
            Self::Other(item) => item.content_type(),
        }
    }
}

impl HasDifficulty for ContentItem {
    fn difficulty(&self) -> f64 {
        match self {
            Self::Vocabulary(item) => item.difficulty(),
            Self::Question(item) => item.difficulty(),
            Self::Reading(item) => item.difficulty(),
            Self::Other(item) => item.difficulty(),
        }
    }
}

impl EstimatedDuration for ContentItem {
    fn base_duration_ms(&self) -> i64 {
        match self {
            Self::Vocabulary(item) => item.base_duration_ms(),
            Self::Question(item) => item.base_duration_ms(),
            Self::Reading(item) => item.base_duration_ms(),
            Self::Other(item) => item.base_duration_ms(),
        }
    }
}
