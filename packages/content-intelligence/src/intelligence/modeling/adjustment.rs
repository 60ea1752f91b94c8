use crate::intelligence::config::AdjustmentParams;
use crate::intelligence::types::{
    AdjustmentType, PathAdjustment, PlateauArea, SkillCategory, UserLearningProfile,
};

pub struct AdjustmentRecommender {
    params: AdjustmentParams,
}

impl AdjustmentRecommender {
    pub fn new(params: AdjustmentParams) -> Self {
        Self { params }
    }

    /// Plateau remedies followed by proactive suggestions, highest impact first.
    /// Duplicate adjustment types are kept.
    pub fn recommend(
        &self,
        plateaus: &[PlateauArea],
        profile: &UserLearningProfile,
    ) -> Vec<PathAdjustment> {
        let mut adjustments: Vec<PathAdjustment> = plateaus
            .iter()
            .flat_map(|plateau| self.plateau_adjustments(plateau))
            .collect();
        adjustments.extend(self.proactive_adjustments(profile));

        adjustments.sort_by(|a, b| {
            b.expected_impact
                .partial_cmp(&a.expected_impact)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        adjustments
    }

    pub fn plateau_adjustments(&self, plateau: &PlateauArea) -> Vec<PathAdjustment> {
        let skill = plateau.skill;
        let name = skill.as_str();
        let mut adjustments = Vec::new();

        if plateau.current_level < self.params.low_level_threshold {
            adjustments.push(adjustment(
                AdjustmentType::DifficultyDecrease,
                Some(skill),
                format!("Reduce difficulty in {name} to build confidence"),
                0.7,
                0.3,
            ));
        }

        adjustments.push(adjustment(
            AdjustmentType::MethodChange,
            Some(skill),
            format!("Try different practice methods for {name}"),
            0.6,
            0.5,
        ));

        if plateau.plateau_duration > self.params.long_plateau_sessions {
            adjustments.push(adjustment(
                AdjustmentType::BreakIncrease,
                Some(skill),
                format!("Increase breaks during {name} practice"),
                0.5,
                0.2,
            ));
        }

        adjustments
    }

    pub fn proactive_adjustments(&self, profile: &UserLearningProfile) -> Vec<PathAdjustment> {
        let mut adjustments = Vec::new();

        if let Some((weakest, gap)) = skill_gap(profile) {
            if gap > self.params.skill_gap_threshold {
                adjustments.push(adjustment(
                    AdjustmentType::FocusShift,
                    Some(weakest),
                    format!("Increase focus on {} to balance skills", weakest.as_str()),
                    0.8,
                    0.4,
                ));
            }
        }

        if profile.optimal_session_length > self.params.long_session_minutes {
            adjustments.push(adjustment(
                AdjustmentType::PaceAdjustment,
                None,
                "Consider shorter, more frequent sessions".to_string(),
                0.6,
                0.3,
            ));
        }

        adjustments
    }
}

impl Default for AdjustmentRecommender {
    fn default() -> Self {
        Self::new(AdjustmentParams::default())
    }
}

/// Weakest skill and the spread between strongest and weakest learning speed.
/// Ties resolve to the first skill in category order.
fn skill_gap(profile: &UserLearningProfile) -> Option<(SkillCategory, f64)> {
    let mut entries = profile.learning_speed.iter();
    let (first_skill, first_speed) = entries.next()?;
    let (mut weakest, mut min) = (*first_skill, *first_speed);
    let mut max = *first_speed;

    for (skill, speed) in entries {
        if *speed < min {
            weakest = *skill;
            min = *speed;
        }
        if *speed > max {
            max = *speed;
        }
    }
    Some((weakest, max - min))
}

fn adjustment(
    adjustment_type: AdjustmentType,
    target_skill: Option<SkillCategory>,
    description: String,
    expected_impact: f64,
    implementation_difficulty: f64,
) -> PathAdjustment {
    PathAdjustment {
        adjustment_type,
        target_skill,
        description,
        expected_impact,
        implementation_difficulty,
    }
}
