//! End-to-end decision lifecycle against a file-backed store:
//! record, feedback, item completion, batch job, trail files and export.

use std::path::Path;

use tempfile::TempDir;

use ocd_core::enums::{AgentType, EntityType, Feedback, ItemStatus, Priority, Swimlane, TrailOp};
use ocd_core::outcome::OutcomeMetrics;
use ocd_core::payload::{
    AgentAction, AgentPayload, Exchange, FilerAction, FilerState, StorerAction, StorerState,
};
use ocd_core::trail::TrailOperation;
use ocd_db::repos::decision::NewDecision;
use ocd_db::repos::item::NewItem;
use ocd_db::service::OcdService;
use ocd_reward::export::{ExportFilter, TrainingExample};
use ocd_reward::{RewardPolicy, RewardWeights};

async fn file_service(dir: &Path) -> OcdService {
    let db_path = dir.join("ocd.db");
    OcdService::new_local(
        db_path.to_str().unwrap(),
        Some(dir.join("trail")),
        RewardPolicy::default(),
    )
    .await
    .unwrap()
}

fn read_trail(dir: &Path, actor: &str) -> Vec<TrailOperation> {
    serde_jsonlines::json_lines(dir.join("trail").join(format!("{actor}.jsonl")))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn filer(labels: &[&str]) -> AgentPayload {
    AgentPayload::Filer(Exchange::new(
        FilerState {
            instructions: "Prepare the workshop slides".into(),
            known_projects: vec!["Workshops".into()],
            ..FilerState::default()
        },
        FilerAction {
            swimlane: Some(Swimlane::Project),
            priority: Some(Priority::High),
            labels: labels.iter().map(ToString::to_string).collect(),
            urgency: Some("this week".into()),
        },
    ))
}

#[tokio::test]
async fn service_new_local_without_trail() {
    let svc = OcdService::new_local(":memory:", None, RewardPolicy::default())
        .await
        .unwrap();
    assert!(!svc.trail().is_enabled());
}

#[tokio::test]
async fn full_filer_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let svc = file_service(tmp.path()).await;

    let item = svc
        .create_item(NewItem {
            user_id: "usr-7".into(),
            title: "Workshop slides".into(),
            swimlane: Some(Swimlane::Project),
            priority: Some(Priority::High),
            labels: vec!["Job 2 (Authority)".into()],
            ..NewItem::default()
        })
        .await
        .unwrap();

    let mut new = NewDecision::new(filer(&["Job 2 (Authority)"]), "filer-v2", "usr-7");
    new.item_id = Some(item.id.clone());
    new.confidence = Some(0.9);
    let decision = svc.create_decision(new).await.unwrap();

    let after_feedback = svc
        .submit_feedback(&decision.id, Feedback::Confirmed, None)
        .await
        .unwrap();
    // user_feedback 1.0 + calibration -0.1 x 0.1; no completions yet, so no
    // focus to align with
    assert!((after_feedback.reward - 0.99).abs() < 1e-9);

    let moved = svc.move_item(&item.id, ItemStatus::Done).await.unwrap();
    assert_eq!(moved.tracker.unwrap().decisions_updated, 1);

    let done = svc.get_decision(&decision.id).await.unwrap();
    // + completion 1.0 x 0.5, and the completed item now makes
    // "Job 2 (Authority)" the focus: + 0.5 x 0.4
    assert!((done.reward.unwrap() - 1.69).abs() < 1e-9);
    assert_eq!(done.outcome().completed_successfully, Some(true));

    let ops = read_trail(tmp.path(), "usr-7");
    let kinds: Vec<_> = ops.iter().map(|op| (op.entity, op.op)).collect();
    assert_eq!(kinds.first(), Some(&(EntityType::Item, TrailOp::Create)));
    assert!(kinds.contains(&(EntityType::Decision, TrailOp::Create)));
    assert!(kinds.contains(&(EntityType::Item, TrailOp::Transition)));
    assert!(ops.iter().all(|op| op.actor == "usr-7"));
}

#[tokio::test]
async fn store_reopens_with_data() {
    let tmp = TempDir::new().unwrap();
    let id = {
        let svc = file_service(tmp.path()).await;
        svc.create_decision(NewDecision::new(filer(&[]), "filer-v2", "usr-1"))
            .await
            .unwrap()
            .id
    };

    let svc = file_service(tmp.path()).await;
    let d = svc.get_decision(&id).await.unwrap();
    assert_eq!(d.agent_type(), AgentType::Filer);
}

#[tokio::test]
async fn storer_correction_drives_edit_distance() {
    let svc = OcdService::new_local(":memory:", None, RewardPolicy::default())
        .await
        .unwrap();
    let payload = AgentPayload::Storer(Exchange::new(
        StorerState {
            content: "Notes from the pottery class".into(),
            existing_collections: vec!["Hobbies".into(), "Learning".into()],
        },
        StorerAction {
            collection: "Learning".into(),
            title: "Pottery class".into(),
            tags: vec!["pottery".into()],
            summary: None,
        },
    ));
    let d = svc
        .create_decision(NewDecision::new(payload, "storer-v1", "usr-1"))
        .await
        .unwrap();

    let correction = AgentAction::Storer(StorerAction {
        collection: "Hobbies".into(),
        title: "Pottery class".into(),
        tags: vec!["pottery".into()],
        summary: None,
    });
    let res = svc
        .submit_feedback(&d.id, Feedback::Corrected, Some(correction))
        .await
        .unwrap();
    // acceptance -0.5 x 1.0 + edit_distance (-0.1 x 1/4) x 0.5
    assert!((res.reward - (-0.5 - 0.0125)).abs() < 1e-9);
}

#[tokio::test]
async fn exported_lines_rederive_their_reward() {
    let tmp = TempDir::new().unwrap();
    let svc = file_service(tmp.path()).await;

    for feedback in [Feedback::Confirmed, Feedback::Corrected, Feedback::Ignored] {
        let d = svc
            .create_decision(NewDecision::new(filer(&["Job 1 (Income)"]), "filer-v2", "usr-3"))
            .await
            .unwrap();
        svc.submit_outcome(
            &d.id,
            &OutcomeMetrics {
                opportunity_cost: Some(0.35),
                ..OutcomeMetrics::default()
            },
        )
        .await
        .unwrap();
        svc.submit_feedback(&d.id, feedback, None).await.unwrap();
    }

    let path = tmp.path().join("export").join("filer.jsonl");
    let written = svc
        .export_to_file(
            &ExportFilter {
                agent_type: Some(AgentType::Filer),
                require_feedback: true,
                ..ExportFilter::default()
            },
            &path,
        )
        .await
        .unwrap();
    assert_eq!(written, 3);

    let weights = RewardWeights::default();
    let examples: Vec<TrainingExample> = serde_jsonlines::json_lines(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(examples.len(), 3);
    for example in &examples {
        assert_eq!(example.metadata.model_version, "filer-v2");
        assert_eq!(example.rederive_reward(&weights).unwrap(), example.reward);
    }
}
