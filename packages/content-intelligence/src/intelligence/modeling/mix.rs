use std::collections::BTreeMap;

use crate::intelligence::error::IntelligenceError;
use crate::intelligence::types::{
    LearningGoal, OptimalContentMix, SkillCategory, UserLearningProfile,
};

/// Static prior over difficulty levels 1-5, independent of goals.
const DIFFICULTY_PRIOR: [(u8, f64); 5] = [(1, 0.1), (2, 0.1), (3, 0.4), (4, 0.2), (5, 0.2)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MixBucket {
    Vocabulary,
    Reading,
    Questions,
}

impl MixBucket {
    fn of(skill: SkillCategory) -> Self {
        match skill {
            SkillCategory::Vocab => Self::Vocabulary,
            SkillCategory::Reading => Self::Reading,
            _ => Self::Questions,
        }
    }
}

#[derive(Debug, Default)]
pub struct ContentMixOptimizer;

impl ContentMixOptimizer {
    pub fn new() -> Self {
        Self
    }

    pub fn optimize(
        &self,
        available_time: i32,
        goals: &[LearningGoal],
        profile: &UserLearningProfile,
    ) -> Result<OptimalContentMix, IntelligenceError> {
        if available_time < 0 {
            return Err(IntelligenceError::InvalidTimeBudget(available_time));
        }

        let weight = |bucket: MixBucket| -> f64 {
            let goal_count = goals.iter().filter(|g| MixBucket::of(g.skill) == bucket).count();
            let weakness_count = profile
                .weakness_patterns
                .iter()
                .filter(|w| MixBucket::of(w.skill) == bucket)
                .count();
            (goal_count + weakness_count) as f64
        };

        let vocabulary = weight(MixBucket::Vocabulary);
        let questions = weight(MixBucket::Questions);
        let reading = weight(MixBucket::Reading);
        let (vocabulary_ratio, questions_ratio, reading_ratio) =
            normalize_ratios(vocabulary, questions, reading);

        Ok(OptimalContentMix {
            vocabulary_ratio,
            questions_ratio,
            reading_ratio,
            total_time: available_time,
            difficulty_distribution: difficulty_distribution(),
            skill_balance: skill_balance(goals, profile),
        })
    }
}

/// Scales three raw weights to sum to 1. With no signal at all, each gets a third.
pub fn normalize_ratios(vocabulary: f64, questions: f64, reading: f64) -> (f64, f64, f64) {
    let total = vocabulary + questions + reading;
    if total <= 0.0 {
        let third = 1.0 / 3.0;
        return (third, third, third);
    }
    (vocabulary / total, questions / total, reading / total)
}

pub fn difficulty_distribution() -> BTreeMap<u8, f64> {
    DIFFICULTY_PRIOR.iter().copied().collect()
}

/// Every skill keeps a base weight of 1 so none drops to zero.
pub fn skill_balance(
    goals: &[LearningGoal],
    profile: &UserLearningProfile,
) -> BTreeMap<SkillCategory, f64> {
    let denominator =
        (goals.len() + profile.weakness_patterns.len() + SkillCategory::ALL.len()) as f64;

    SkillCategory::ALL
        .iter()
        .map(|skill| {
            let goal_weight = goals.iter().filter(|g| g.skill == *skill).count();
            let weakness_weight = profile
                .weakness_patterns
                .iter()
                .filter(|w| w.skill == *skill)
                .count();
            let weight = (goal_weight + weakness_weight + 1) as f64 / denominator;
            (*skill, weight)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::types::{CurveType, PatternType, WeaknessPattern};

    fn profile(weak: &[SkillCategory]) -> UserLearningProfile {
        UserLearningProfile {
            user_id: "u1".to_string(),
            learning_speed: BTreeMap::new(),
            retention_rate: BTreeMap::new(),
            preferred_difficulty_curve: CurveType::Gradual,
            optimal_session_length: 20,
            peak_performance_times: vec![],
            weakness_patterns: weak
                .iter()
                .map(|skill| WeaknessPattern {
                    skill: *skill,
                    pattern_type: PatternType::ConsistentLowPerformance,
                    severity: 0.5,
                    frequency: 10,
                    last_occurrence: 0,
                })
                .collect(),
            interest_areas: vec![],
            cognitive_capacity: 0.8,
            motivation_level: 0.5,
            last_updated: 0,
        }
    }

    #[test]
    fn no_goals_and_no_weaknesses_split_evenly() {
        let mix = ContentMixOptimizer::new()
            .optimize(30, &[], &profile(&[]))
            .unwrap();
        assert!((mix.vocabulary_ratio - 1.0 / 3.0).abs() < 1e-12);
        assert!((mix.questions_ratio - 1.0 / 3.0).abs() < 1e-12);
        assert!((mix.reading_ratio - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(mix.total_time, 30);
        assert!(mix.skill_balance.values().all(|w| (*w - 0.25).abs() < 1e-12));
    }

    #[test]
    fn goals_and_weaknesses_drive_ratios() {
        let goals = vec![
            LearningGoal::new(SkillCategory::Vocab),
            LearningGoal::new(SkillCategory::Grammar),
            LearningGoal::new(SkillCategory::Listening),
        ];
        let mix = ContentMixOptimizer::new()
            .optimize(45, &goals, &profile(&[SkillCategory::Reading]))
            .unwrap();
        assert!((mix.vocabulary_ratio - 0.25).abs() < 1e-12);
        assert!((mix.questions_ratio - 0.5).abs() < 1e-12);
        assert!((mix.reading_ratio - 0.25).abs() < 1e-12);
        let sum = mix.vocabulary_ratio + mix.questions_ratio + mix.reading_ratio;
        assert!((sum - 1.0).abs() < 1e-6);

        // (1 + 0 + 1) / (3 + 1 + 4)
        assert!((mix.skill_balance[&SkillCategory::Vocab] - 0.25).abs() < 1e-12);
        assert!((mix.skill_balance[&SkillCategory::Reading] - 0.25).abs() < 1e-12);
        let balance_sum: f64 = mix.skill_balance.values().sum();
        assert!((balance_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn difficulty_distribution_is_static() {
        let dist = difficulty_distribution();
        assert_eq!(dist.len(), 5);
        assert_eq!(dist[&3], 0.4);
        assert!((dist[&1] + dist[&2] - 0.2).abs() < 1e-12);
        assert!((dist[&4] + dist[&5] - 0.4).abs() < 1e-12);
        assert!((dist.values().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_budget_is_rejected() {
        let err = ContentMixOptimizer::new()
            .optimize(-5, &[], &profile(&[]))
            .unwrap_err();
        assert!(matches!(err, IntelligenceError::InvalidTimeBudget(-5)));
    }
}
