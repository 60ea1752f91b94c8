use crate::intelligence::config::PlateauParams;
use crate::intelligence::modeling::stats::{accuracy, sorted_oldest_first};
use crate::intelligence::types::{ActivityLogEntry, PlateauArea, SkillCategory, UserLearningProfile};

pub struct PlateauDetector {
    params: PlateauParams,
}

impl PlateauDetector {
    pub fn new(params: PlateauParams) -> Self {
        Self { params }
    }

    pub fn detect_all(
        &self,
        logs: &[ActivityLogEntry],
        profile: &UserLearningProfile,
    ) -> Vec<PlateauArea> {
        SkillCategory::ALL
            .iter()
            .filter_map(|skill| {
                let skill_logs: Vec<ActivityLogEntry> = logs
                    .iter()
                    .filter(|log| skill.matches_label(&log.category))
                    .cloned()
                    .collect();
                self.detect(*skill, &skill_logs, profile)
            })
            .collect()
    }

    /// Checks one skill's logs for stagnation. Order of `skill_logs` does not matter.
    pub fn detect(
        &self,
        skill: SkillCategory,
        skill_logs: &[ActivityLogEntry],
        profile: &UserLearningProfile,
    ) -> Option<PlateauArea> {
        if skill_logs.len() < self.params.min_logs {
            return None;
        }

        let sorted = sorted_oldest_first(skill_logs);
        let window = &sorted[sorted.len().saturating_sub(self.params.analysis_window)..];
        let half = self.params.comparison_window.min(window.len());

        let recent = accuracy(window[window.len() - half..].iter().copied())?;
        let earlier = accuracy(window[..half].iter().copied())?;
        let improvement = recent - earlier;

        if improvement >= self.params.min_improvement || recent >= self.params.mastery_ceiling {
            return None;
        }

        let plateau_duration = self.plateau_duration(window);
        tracing::trace!(
            skill = skill.as_str(),
            recent,
            earlier,
            plateau_duration,
            "plateau detected"
        );

        Some(PlateauArea {
            skill,
            plateau_duration,
            current_level: recent,
            breakthrough_strategies: breakthrough_strategies(skill),
            recommended_actions: self.recommended_actions(skill, profile),
        })
    }

    /// Walks 5-log windows back from the newest one, counting 5 sessions per
    /// window whose accuracy stays within tolerance of the latest window.
    fn plateau_duration(&self, window: &[&ActivityLogEntry]) -> u32 {
        let size = self.params.duration_window;
        if window.len() <= size {
            return 0;
        }

        let Some(current) = accuracy(window[window.len() - size..].iter().copied()) else {
            return 0;
        };

        let mut duration = 0;
        for start in (0..=window.len() - size - 1).rev() {
            let Some(candidate) = accuracy(window[start..start + size].iter().copied()) else {
                break;
            };
            if (candidate - current).abs() < self.params.duration_tolerance {
                duration += size as u32;
            } else {
                break;
            }
        }
        duration
    }

    fn recommended_actions(&self, skill: SkillCategory, profile: &UserLearningProfile) -> Vec<String> {
        let name = skill.as_str();
        let mut actions = vec![
            format!("Take a short break from {name} practice"),
            format!("Review foundational concepts in {name}"),
            format!("Try a different practice format for {name}"),
        ];
        if profile.optimal_session_length > self.params.long_session_minutes {
            actions.push(format!("Shorten {name} practice sessions"));
        }
        actions
    }
}

impl Default for PlateauDetector {
    fn default() -> Self {
        Self::new(PlateauParams::default())
    }
}

pub fn breakthrough_strategies(skill: SkillCategory) -> Vec<String> {
    let strategies: [&str; 3] = match skill {
        SkillCategory::Grammar => [
            "Focus on one grammar pattern at a time",
            "Use spaced repetition for grammar rules",
            "Practice with real-world examples",
        ],
        SkillCategory::Reading => [
            "Read shorter passages with full comprehension focus",
            "Practice prediction strategies",
            "Use vocabulary pre-teaching",
        ],
        SkillCategory::Listening => [
            "Start with slower, clearer audio",
            "Use transcripts for support",
            "Practice with familiar topics first",
        ],
        SkillCategory::Vocab => [
            "Connect new words to known concepts",
            "Use memory techniques (mnemonics)",
            "Practice in context, not isolation",
        ],
    };
    strategies.iter().map(|s| s.to_string()).collect()
}
