use std::collections::BTreeMap;

use crate::intelligence::config::ProfileParams;
use crate::intelligence::modeling::stats::{
    accuracy, correctness_variance, sorted_newest_first, sorted_oldest_first, DAY_MS, HOUR_MS,
};
use crate::intelligence::types::{
    ActivityLogEntry, ContentType, CurveType, PatternType, SkillCategory, TimeSlot,
    UserLearningProfile, UserProgress, WeaknessPattern,
};

/// Everything a profile is derived from, captured at one instant.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSnapshot<'a> {
    pub logs: &'a [ActivityLogEntry],
    pub progress: &'a UserProgress,
    pub now: i64,
}

pub struct ProfileBuilder {
    params: ProfileParams,
}

impl ProfileBuilder {
    pub fn new(params: ProfileParams) -> Self {
        Self { params }
    }

    pub fn build(&self, user_id: &str, snapshot: ProfileSnapshot<'_>) -> UserLearningProfile {
        let logs = snapshot.logs;
        UserLearningProfile {
            user_id: user_id.to_string(),
            learning_speed: self.learning_speed(logs),
            retention_rate: self.retention_rates(logs),
            preferred_difficulty_curve: self.difficulty_curve(logs),
            optimal_session_length: self.optimal_session_length(logs),
            peak_performance_times: self.peak_performance_times(logs),
            weakness_patterns: self.weakness_patterns(logs),
            interest_areas: self.interest_areas(logs),
            cognitive_capacity: self.cognitive_capacity(logs),
            motivation_level: self.motivation_level(snapshot.progress, logs, snapshot.now),
            last_updated: snapshot.now,
        }
    }

    pub fn learning_speed(&self, logs: &[ActivityLogEntry]) -> BTreeMap<SkillCategory, f64> {
        SkillCategory::ALL
            .iter()
            .map(|skill| {
                let speed = accuracy(logs.iter().filter(|log| skill.matches_label(&log.category)))
                    .unwrap_or(self.params.default_learning_speed);
                (*skill, speed)
            })
            .collect()
    }

    /// Low variance in pass/fail outcomes stands in for retention.
    pub fn retention_rates(&self, logs: &[ActivityLogEntry]) -> BTreeMap<ContentType, f64> {
        ContentType::ALL
            .iter()
            .map(|content_type| {
                let relevant: Vec<&ActivityLogEntry> = logs
                    .iter()
                    .filter(|log| content_type.matches_label(&log.category))
                    .collect();
                let retention = if relevant.len() >= self.params.retention_min_samples {
                    (1.0 - correctness_variance(relevant.iter().copied())).clamp(0.0, 1.0)
                } else {
                    self.params.default_retention
                };
                (*content_type, retention)
            })
            .collect()
    }

    pub fn difficulty_curve(&self, logs: &[ActivityLogEntry]) -> CurveType {
        if logs.len() < self.params.curve_min_logs {
            return CurveType::Gradual;
        }

        let sorted = sorted_oldest_first(logs);
        let (first, second) = sorted.split_at(sorted.len() / 2);
        let first_accuracy = accuracy(first.iter().copied()).unwrap_or(0.0);
        let second_accuracy = accuracy(second.iter().copied()).unwrap_or(0.0);
        let improvement = second_accuracy - first_accuracy;

        if improvement > self.params.accelerated_threshold {
            CurveType::Accelerated
        } else if improvement > self.params.gradual_threshold {
            CurveType::Gradual
        } else if improvement > self.params.plateau_threshold {
            CurveType::Plateau
        } else {
            CurveType::Steep
        }
    }

    pub fn optimal_session_length(&self, logs: &[ActivityLogEntry]) -> u32 {
        let average = if logs.is_empty() {
            0
        } else {
            let total: u64 = logs.iter().map(|log| log.minutes_spent as u64).sum();
            (total / logs.len() as u64) as u32
        };

        let cutoff = self.params.short_session_minutes;
        let short = accuracy(logs.iter().filter(|log| log.minutes_spent <= cutoff)).unwrap_or(0.5);
        let long = accuracy(logs.iter().filter(|log| log.minutes_spent > cutoff)).unwrap_or(0.5);

        if short > long + self.params.short_session_margin {
            average.min(cutoff)
        } else {
            average.clamp(self.params.min_session_minutes, self.params.max_session_minutes)
        }
    }

    pub fn peak_performance_times(&self, logs: &[ActivityLogEntry]) -> Vec<TimeSlot> {
        // (hour, correct, total) in first-seen order so ties stay stable.
        let mut buckets: Vec<(u32, usize, usize)> = Vec::new();
        for log in logs {
            let hour = (log.timestamp.div_euclid(HOUR_MS)).rem_euclid(24) as u32;
            match buckets.iter_mut().find(|(h, _, _)| *h == hour) {
                Some(bucket) => {
                    bucket.1 += log.correct as usize;
                    bucket.2 += 1;
                }
                None => buckets.push((hour, log.correct as usize, 1)),
            }
        }

        let mut scored: Vec<(u32, f64)> = buckets
            .into_iter()
            .map(|(hour, correct, total)| (hour, correct as f64 / total as f64))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(self.params.peak_slot_count)
            .map(|(hour, _)| TimeSlot {
                start_hour: hour,
                end_hour: (hour + self.params.peak_slot_hours) % 24,
                optimal_length_minutes: self.params.slot_optimal_length,
            })
            .collect()
    }

    pub fn weakness_patterns(&self, logs: &[ActivityLogEntry]) -> Vec<WeaknessPattern> {
        let mut patterns = Vec::new();

        for skill in SkillCategory::ALL {
            let mut skill_logs: Vec<&ActivityLogEntry> = logs
                .iter()
                .filter(|log| skill.matches_label(&log.category))
                .collect();
            if skill_logs.len() < self.params.weakness_min_logs {
                continue;
            }
            skill_logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

            let window = self.params.weakness_recent_window.min(skill_logs.len());
            let recent = accuracy(skill_logs[..window].iter().copied()).unwrap_or(0.0);
            let overall = accuracy(skill_logs.iter().copied()).unwrap_or(0.0);

            if recent >= self.params.weakness_threshold {
                continue;
            }

            let severity = (1.0 - recent).clamp(0.0, 1.0);
            let pattern_type = if recent < overall - self.params.time_pressure_gap {
                PatternType::TimePressureWeakness
            } else if severity > self.params.consistent_low_severity {
                PatternType::ConsistentLowPerformance
            } else {
                PatternType::SpecificTopicStruggle
            };

            patterns.push(WeaknessPattern {
                skill,
                pattern_type,
                severity,
                frequency: skill_logs.len(),
                last_occurrence: skill_logs[0].timestamp,
            });
        }

        patterns.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        patterns
    }

    /// Most frequent categories, compared case-insensitively. Ties keep first-seen order.
    pub fn interest_areas(&self, logs: &[ActivityLogEntry]) -> Vec<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for log in logs {
            let label = log.category.trim().to_lowercase();
            match counts.iter_mut().find(|(seen, _)| *seen == label) {
                Some(entry) => entry.1 += 1,
                None => counts.push((label, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(self.params.interest_count)
            .map(|(label, _)| label)
            .collect()
    }

    /// How well accuracy holds up from the older to the newer half of recent work.
    pub fn cognitive_capacity(&self, logs: &[ActivityLogEntry]) -> f64 {
        let newest = sorted_newest_first(logs);
        let window = &newest[..newest.len().min(self.params.cognitive_window)];
        let half = self.params.cognitive_window / 2;
        if window.len() < half {
            return self.params.default_cognitive_capacity;
        }

        let late = accuracy(window[..half].iter().copied()).unwrap_or(0.0);
        let early = accuracy(window[window.len() - half..].iter().copied()).unwrap_or(0.0);
        let degradation = (early - late).max(0.0);

        (1.0 - degradation).clamp(self.params.min_cognitive_capacity, 1.0)
    }

    pub fn motivation_level(
        &self,
        progress: &UserProgress,
        logs: &[ActivityLogEntry],
        now: i64,
    ) -> f64 {
        let streak_factor = (progress.streak_count as f64 / self.params.streak_target_days).min(1.0);
        let recent_activity = logs
            .iter()
            .filter(|log| now - log.timestamp < 7 * DAY_MS)
            .count();
        let activity_factor = (recent_activity as f64 / self.params.weekly_activity_target).min(1.0);

        (streak_factor * 0.4 + activity_factor * 0.6).clamp(self.params.min_motivation, 1.0)
    }
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new(ProfileParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::modeling::stats::fixtures::*;

    const NOW: i64 = 1_700_000_000_000;

    fn builder() -> ProfileBuilder {
        ProfileBuilder::default()
    }

    #[test]
    fn empty_history_yields_defaults() {
        let progress = UserProgress::default();
        let profile = builder().build(
            "new_user",
            ProfileSnapshot {
                logs: &[],
                progress: &progress,
                now: NOW,
            },
        );

        assert_eq!(profile.learning_speed.len(), 4);
        assert!(profile.learning_speed.values().all(|v| *v == 0.5));
        assert!(profile.retention_rate.values().all(|v| *v == 0.7));
        assert_eq!(profile.preferred_difficulty_curve, CurveType::Gradual);
        assert_eq!(profile.optimal_session_length, 10);
        assert!(profile.peak_performance_times.is_empty());
        assert!(profile.weakness_patterns.is_empty());
        assert!(profile.interest_areas.is_empty());
        assert_eq!(profile.cognitive_capacity, 0.8);
        assert_eq!(profile.motivation_level, 0.2);
        assert_eq!(profile.last_updated, NOW);
    }

    #[test]
    fn learning_speed_is_accuracy_per_skill() {
        let mut logs = series(NOW, "Grammar", &[true, true, false, true]);
        logs.extend(series(NOW, "vocab_review", &[false, false]));
        let speed = builder().learning_speed(&logs);
        assert_eq!(speed[&SkillCategory::Grammar], 0.75);
        assert_eq!(speed[&SkillCategory::Vocab], 0.0);
        assert_eq!(speed[&SkillCategory::Listening], 0.5);
    }

    #[test]
    fn retention_needs_six_samples() {
        let few = series(NOW, "reading", &[true, false, true, false, true]);
        assert_eq!(builder().retention_rates(&few)[&ContentType::Reading], 0.7);

        let many = series(NOW, "reading", &[true, false, true, false, true, false]);
        let rates = builder().retention_rates(&many);
        assert!((rates[&ContentType::Reading] - 0.75).abs() < 1e-12);
        assert_eq!(rates[&ContentType::Vocabulary], 0.7);
        assert!((rates[&ContentType::Mixed] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn difficulty_curve_classifies_improvement() {
        let curve = |first: usize, second: usize| {
            let mut outcomes = outcomes(10, first);
            outcomes.extend(self::outcomes(10, second));
            builder().difficulty_curve(&series(NOW, "grammar", &outcomes))
        };
        assert_eq!(curve(2, 6), CurveType::Accelerated);
        assert_eq!(curve(4, 6), CurveType::Gradual);
        assert_eq!(curve(5, 5), CurveType::Plateau);
        assert_eq!(curve(8, 4), CurveType::Steep);
        assert_eq!(builder().difficulty_curve(&series(NOW, "grammar", &[true; 9])), CurveType::Gradual);
    }

    #[test]
    fn short_sessions_win_when_clearly_better() {
        let mut logs = vec![
            log(NOW, "grammar", true, 10),
            log(NOW, "grammar", true, 12),
            log(NOW, "grammar", false, 30),
            log(NOW, "grammar", false, 40),
        ];
        // average 23, short sessions outperform
        assert_eq!(builder().optimal_session_length(&logs), 15);

        logs[0].correct = false;
        logs[1].correct = false;
        // no advantage for short sessions, average clamped to 10..=25
        assert_eq!(builder().optimal_session_length(&logs), 23);

        let long = vec![log(NOW, "grammar", true, 60)];
        assert_eq!(builder().optimal_session_length(&long), 25);
    }

    #[test]
    fn peak_times_are_top_three_hours() {
        let at = |hour: i64, correct: bool| log(hour * HOUR_MS, "grammar", correct, 10);
        let logs = vec![
            at(8, true),
            at(8, true),
            at(9, false),
            at(14, true),
            at(14, false),
            at(23, true),
        ];
        let slots = builder().peak_performance_times(&logs);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].start_hour, 8);
        assert_eq!(slots[1].start_hour, 23);
        assert_eq!(slots[1].end_hour, 1);
        assert_eq!(slots[2].start_hour, 14);
        assert_eq!(slots[0].optimal_length_minutes, 15);
    }

    #[test]
    fn weakness_patterns_classify_and_sort() {
        // grammar: 20 logs, older 10 all correct, newest 10 at 30% -> time pressure
        let mut outcomes = vec![true; 10];
        outcomes.extend(self::outcomes(10, 3));
        let mut logs = series(NOW, "grammar", &outcomes);
        // listening: 6 logs at 50% -> severity 0.5, consistently low
        logs.extend(series(NOW, "listening", &[true, false, true, false, true, false]));
        // reading: 5 logs at 60% -> topic struggle
        logs.extend(series(NOW, "reading", &[true, true, true, false, false]));
        // vocab: strong, not flagged
        logs.extend(series(NOW, "vocab", &[true; 8]));

        let patterns = builder().weakness_patterns(&logs);
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[0].skill, SkillCategory::Grammar);
        assert_eq!(patterns[0].pattern_type, PatternType::TimePressureWeakness);
        assert!((patterns[0].severity - 0.7).abs() < 1e-12);
        assert_eq!(patterns[0].frequency, 20);
        assert_eq!(patterns[1].skill, SkillCategory::Listening);
        assert_eq!(patterns[1].pattern_type, PatternType::ConsistentLowPerformance);
        assert_eq!(patterns[2].skill, SkillCategory::Reading);
        assert_eq!(patterns[2].pattern_type, PatternType::SpecificTopicStruggle);
        assert_eq!(patterns[2].last_occurrence, NOW + 4 * 60_000);
    }

    #[test]
    fn interest_areas_are_most_frequent_labels() {
        let mut logs = series(NOW, "Grammar", &[true; 3]);
        logs.extend(series(NOW, "Reading", &[true; 5]));
        logs.extend(series(NOW, "listening", &[true; 1]));
        logs.extend(series(NOW, "vocab", &[true; 2]));
        assert_eq!(
            builder().interest_areas(&logs),
            vec!["reading".to_string(), "grammar".to_string(), "vocab".to_string()]
        );
    }

    #[test]
    fn interest_areas_merge_labels_differing_only_in_case() {
        let mut logs = series(NOW, "Grammar", &[true; 2]);
        logs.extend(series(NOW, "grammar", &[true; 2]));
        logs.extend(series(NOW, "Reading", &[true; 3]));
        logs.extend(series(NOW, "vocab", &[true; 1]));
        assert_eq!(
            builder().interest_areas(&logs),
            vec!["grammar".to_string(), "reading".to_string(), "vocab".to_string()]
        );
    }

    #[test]
    fn cognitive_capacity_tracks_late_decline() {
        let mut outcomes = vec![true; 10];
        outcomes.extend(self::outcomes(10, 4));
        let logs = series(NOW, "grammar", &outcomes);
        assert!((builder().cognitive_capacity(&logs) - 0.4).abs() < 1e-12);

        let mut collapse = vec![true; 10];
        collapse.extend(vec![false; 10]);
        assert_eq!(builder().cognitive_capacity(&series(NOW, "grammar", &collapse)), 0.3);

        let mut improving = vec![false; 10];
        improving.extend(vec![true; 10]);
        assert_eq!(builder().cognitive_capacity(&series(NOW, "grammar", &improving)), 1.0);

        assert_eq!(builder().cognitive_capacity(&series(NOW, "grammar", &[true; 9])), 0.8);
    }

    #[test]
    fn motivation_blends_streak_and_activity() {
        let progress = UserProgress {
            streak_count: 15,
            ..Default::default()
        };
        let mut logs = series(NOW - DAY_MS, "grammar", &[true; 10]);
        logs.extend(series(NOW - 8 * DAY_MS, "grammar", &[true; 10]));
        let level = builder().motivation_level(&progress, &logs, NOW);
        assert!((level - (0.5 * 0.4 + 0.5 * 0.6)).abs() < 1e-12);

        let maxed = UserProgress {
            streak_count: 90,
            ..Default::default()
        };
        let busy = series(NOW - DAY_MS, "grammar", &[true; 40]);
        assert_eq!(builder().motivation_level(&maxed, &busy, NOW), 1.0);
    }
}
