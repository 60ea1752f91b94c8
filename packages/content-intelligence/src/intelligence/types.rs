use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillCategory {
    Grammar,
    Reading,
    Listening,
    Vocab,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Grammar,
        SkillCategory::Reading,
        SkillCategory::Listening,
        SkillCategory::Vocab,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Reading => "reading",
            Self::Listening => "listening",
            Self::Vocab => "vocab",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grammar" => Some(Self::Grammar),
            "reading" => Some(Self::Reading),
            "listening" => Some(Self::Listening),
            "vocab" | "vocabulary" => Some(Self::Vocab),
            _ => None,
        }
    }

    /// Case-insensitive substring match against a free-form category label.
    pub fn matches_label(&self, label: &str) -> bool {
        label.to_lowercase().contains(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Vocabulary,
    Questions,
    Reading,
    Mixed,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Vocabulary,
        ContentType::Questions,
        ContentType::Reading,
        ContentType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabulary",
            Self::Questions => "questions",
            Self::Reading => "reading",
            Self::Mixed => "mixed",
        }
    }

    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        let vocab = label.contains("vocab");
        let reading = label.contains("reading");
        match self {
            Self::Vocabulary => vocab,
            Self::Reading => reading,
            Self::Questions => !vocab && !reading,
            Self::Mixed => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurveType {
    #[default]
    Gradual,
    Steep,
    Plateau,
    Accelerated,
}

impl CurveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gradual => "gradual",
            Self::Steep => "steep",
            Self::Plateau => "plateau",
            Self::Accelerated => "accelerated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    ConsistentLowPerformance,
    TimePressureWeakness,
    SpecificTopicStruggle,
    FatigueRelatedDecline,
    ConceptualMisunderstanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentType {
    DifficultyIncrease,
    DifficultyDecrease,
    FocusShift,
    PaceAdjustment,
    MethodChange,
    BreakIncrease,
}

/// A single practice attempt as recorded by the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub timestamp: i64,
    pub category: String,
    pub correct: bool,
    pub minutes_spent: u32,
    #[serde(default)]
    pub points_earned: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub streak_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completion: Option<i64>,
    #[serde(default)]
    pub total_points: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_hour: u32,
    pub end_hour: u32,
    pub optimal_length_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaknessPattern {
    pub skill: SkillCategory,
    pub pattern_type: PatternType,
    pub severity: f64,
    pub frequency: usize,
    pub last_occurrence: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLearningProfile {
    pub user_id: String,
    pub learning_speed: BTreeMap<SkillCategory, f64>,
    pub retention_rate: BTreeMap<ContentType, f64>,
    pub preferred_difficulty_curve: CurveType,
    pub optimal_session_length: u32,
    pub peak_performance_times: Vec<TimeSlot>,
    pub weakness_patterns: Vec<WeaknessPattern>,
    pub interest_areas: Vec<String>,
    pub cognitive_capacity: f64,
    pub motivation_level: f64,
    pub last_updated: i64,
}

impl UserLearningProfile {
    /// Mean learning speed across skills, 0.5 when no skill is tracked.
    pub fn mean_learning_speed(&self) -> f64 {
        if self.learning_speed.is_empty() {
            return 0.5;
        }
        self.learning_speed.values().sum::<f64>() / self.learning_speed.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPerformance {
    pub content_id: String,
    pub content_type: ContentType,
    pub accuracy: f64,
    pub time_spent: i64,
    pub completion_rate: f64,
    pub user_engagement: f64,
    pub difficulty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillCategory>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEffectivenessScore {
    pub content_id: String,
    pub overall_score: f64,
    pub learning_impact: f64,
    pub user_engagement: f64,
    pub retention_rate: f64,
    pub difficulty_appropriateness: f64,
    pub evaluation_count: u32,
    pub last_evaluated: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPrediction {
    pub content_id: String,
    pub predicted_accuracy: f64,
    /// Milliseconds.
    pub predicted_time: i64,
    pub confidence_level: f64,
    pub risk_factors: Vec<String>,
    pub recommended_adjustments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningGoal {
    pub skill: SkillCategory,
    pub target_level: f64,
    #[serde(default)]
    pub timeframe: i64,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub current_progress: f64,
}

impl LearningGoal {
    pub fn new(skill: SkillCategory) -> Self {
        Self {
            skill,
            target_level: 0.8,
            timeframe: 0,
            priority: 0,
            current_progress: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalContentMix {
    pub vocabulary_ratio: f64,
    pub questions_ratio: f64,
    pub reading_ratio: f64,
    /// Minutes.
    pub total_time: i32,
    pub difficulty_distribution: BTreeMap<u8, f64>,
    pub skill_balance: BTreeMap<SkillCategory, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateauArea {
    pub skill: SkillCategory,
    pub plateau_duration: u32,
    pub current_level: f64,
    pub breakthrough_strategies: Vec<String>,
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathAdjustment {
    pub adjustment_type: AdjustmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_skill: Option<SkillCategory>,
    pub description: String,
    pub expected_impact: f64,
    pub implementation_difficulty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecommendation {
    pub content_id: String,
    pub content_type: ContentType,
    pub title: String,
    pub description: String,
    pub estimated_time: u32,
    pub difficulty: f64,
    pub relevance_score: f64,
    pub reason: String,
    #[serde(default)]
    pub skill_focus: Vec<SkillCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyContentPack {
    pub id: String,
    pub date: i64,
    pub vocabulary: Vec<super::content::VocabularyItem>,
    pub questions: Vec<super::content::GeneratedQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<super::content::ReadingPassage>,
    pub recommended_sequence: Vec<ContentType>,
    pub estimated_total_time: u32,
    pub focus_areas: Vec<SkillCategory>,
    pub difficulty_level: f64,
    pub confidence_score: f64,
}
