//! Batch reports built from a JSON activity snapshot.

mod common;

use std::io::Write;

use common::*;
use studyplan_content_intelligence::intelligence::{
    ContentItem, EngineConfig, GeneratedQuestion, SkillCategory,
};
use studyplan_content_intelligence::report::{InsightInput, InsightRunner, ReportError};

fn snapshot_json() -> String {
    let mut grammar = series(NOW - DAY_MS, "grammar", &outcomes(10, 9));
    grammar.extend(series(NOW - DAY_MS / 2, "grammar", &outcomes(10, 5)));
    let logs = serde_json::to_value(&grammar).unwrap();

    serde_json::json!({
        "users": {
            "learner-b": { "logs": [] },
            "learner-a": { "logs": logs, "progress": { "streakCount": 3 } }
        },
        "goals": [{ "skill": "GRAMMAR", "targetLevel": 0.8 }],
        "availableTime": 40,
        "candidates": [
            { "kind": "question", "item": { "id": "q1", "prompt": "Pick the tense", "skill": "GRAMMAR", "difficulty": 2.0 } },
            { "kind": "vocabulary", "item": { "word": "candid", "difficulty": 3 } }
        ],
        "completions": [
            { "contentId": "q1", "contentType": "QUESTIONS", "accuracy": 0.7, "timeSpent": 30000,
              "completionRate": 1.0, "userEngagement": 0.9, "difficulty": 2.0, "timestamp": 0 },
            { "contentId": "bad", "contentType": "QUESTIONS", "accuracy": 3.0, "timeSpent": 30000,
              "completionRate": 1.0, "userEngagement": 0.9, "difficulty": 2.0, "timestamp": 0 }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn loads_snapshot_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(snapshot_json().as_bytes()).unwrap();

    let input = InsightInput::load(file.path()).await.unwrap();
    assert_eq!(input.users.len(), 2);
    assert_eq!(input.available_time, 40);
    assert_eq!(input.candidates.len(), 2);
    assert_eq!(input.recommendation_limit, 5);
    assert_eq!(input.users["learner-a"].progress.streak_count, 3);
}

#[tokio::test]
async fn missing_file_and_bad_json_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = InsightInput::load(&dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let err = InsightInput::load(file.path()).await.unwrap_err();
    assert!(matches!(err, ReportError::Json(_)));
}

#[tokio::test]
async fn run_reports_every_user_in_id_order() {
    let input: InsightInput = serde_json::from_str(&snapshot_json()).unwrap();
    let runner = InsightRunner::new(input.users.clone(), EngineConfig::default());
    let reports = runner.run(&input).await.unwrap();

    let ids: Vec<&str> = reports.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(ids, vec!["learner-a", "learner-b"]);

    let a = &reports[0];
    assert_eq!(a.plateaus.len(), 1);
    assert_eq!(a.plateaus[0].skill, SkillCategory::Grammar);
    assert_eq!(a.content_mix.total_time, 40);
    assert!(!a.adjustments.is_empty());
    assert_eq!(a.recommendations.len(), 2);

    let b = &reports[1];
    assert!(b.plateaus.is_empty());
    assert!(b.profile.weakness_patterns.is_empty());

    // the out-of-range completion is skipped, the valid one recorded
    assert_eq!(runner.engine().store().len(), 1);
    assert!(runner.engine().tracker().score("bad").is_none());

    let json = serde_json::to_value(&reports).unwrap();
    assert!(json[0]["contentMix"]["vocabularyRatio"].is_number());
    assert!(json[0]["profile"]["learningSpeed"]["GRAMMAR"].is_number());
}

#[tokio::test]
async fn recommendations_are_served_from_cache() {
    let runner = InsightRunner::new(Default::default(), EngineConfig::default());
    let first = vec![ContentItem::Question(GeneratedQuestion {
        id: "q1".to_string(),
        prompt: "Choose the preposition".to_string(),
        skill: SkillCategory::Grammar,
        difficulty: 3.0,
    })];

    let fresh = runner.recommendations("u1", &first, 5).await.unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(runner.cache().len(), 1);

    // same user and limit: served from the cache
    let cached = runner.recommendations("u1", &[], 5).await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].content_id, "q1");

    runner.cache().clear();
    assert!(runner.recommendations("u1", &[], 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn a_different_limit_is_ranked_afresh() {
    let runner = InsightRunner::new(Default::default(), EngineConfig::default());
    let candidates: Vec<ContentItem> = ["q1", "q2", "q3"]
        .iter()
        .map(|id| {
            ContentItem::Question(GeneratedQuestion {
                id: id.to_string(),
                prompt: "Choose the preposition".to_string(),
                skill: SkillCategory::Grammar,
                difficulty: 3.0,
            })
        })
        .collect();

    let two = runner.recommendations("u1", &candidates, 2).await.unwrap();
    assert_eq!(two.len(), 2);

    let three = runner.recommendations("u1", &candidates, 3).await.unwrap();
    assert_eq!(three.len(), 3);
    assert_eq!(runner.cache().len(), 2);

    let again = runner.recommendations("u1", &[], 2).await.unwrap();
    assert_eq!(again.len(), 2);
}
