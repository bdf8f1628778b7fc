//! End-to-end checklist flows through the engine

use inspecta_answers::{AnswerMap, AnswerValue};
use inspecta_core::{ChecklistEngine, EngineConfig, EngineError, EvaluationRequest};
use inspecta_store::{ChecklistDraft, ChecklistFilter, VersionMeta, LEGACY_AUTHOR};
use inspecta_test_utils::{frenos_answers, frenos_raw, legacy_items, nested_chain, truck_raw, TECHNICIAN};
use pretty_assertions::assert_eq;
use serde_json::json;

fn engine() -> ChecklistEngine {
    ChecklistEngine::in_memory(EngineConfig::default())
}

#[tokio::test]
async fn frenos_from_authoring_to_payload() {
    let engine = engine();
    let record = engine
        .create_checklist(
            ChecklistDraft::new("Camión 12", "truck"),
            VersionMeta::new("Inicial", TECHNICIAN),
            &frenos_raw(),
        )
        .await
        .unwrap();

    let view = engine.resolve(record.id, true, None).await.unwrap();
    let structure = serde_json::to_value(view.structure.unwrap()).unwrap();
    assert_eq!(structure[0]["key"], json!("frenos"));
    assert_eq!(structure[0]["inputType"], json!("section"));
    assert_eq!(structure[0]["children"][0]["key"], json!("estado"));
    assert_eq!(
        structure[0]["children"][0]["options"],
        json!([
            {"key": "cumple", "label": "Cumple"},
            {"key": "no_cumple", "label": "No cumple"},
            {"key": "no_aplica", "label": "No aplica"}
        ])
    );

    let skeleton = engine.initial_answers(record.id, None).await.unwrap();
    assert_eq!(serde_json::to_value(&skeleton).unwrap(), json!({"estado": ""}));

    let report = engine.validate(record.id, None, &skeleton).await.unwrap();
    assert!(!report.valid);
    assert_eq!(report.missing, ["Estado"]);

    let payload = engine
        .prepare_evaluation(
            record.id,
            EvaluationRequest::new("EQ-7", TECHNICIAN).with_answers(frenos_answers()),
        )
        .await
        .unwrap();
    let wire = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        wire["responses"],
        json!([{"itemKey": "estado", "value": "cumple", "note": ""}])
    );
    assert_eq!(wire["version"], json!(1));
    assert_eq!(wire["equipmentId"], json!("EQ-7"));
}

#[tokio::test]
async fn drafts_follow_structure_changes() {
    let engine = engine();
    let record = engine
        .create_checklist(
            ChecklistDraft::new("Camión 12", "truck"),
            VersionMeta::new("Inicial", TECHNICIAN),
            &truck_raw(),
        )
        .await
        .unwrap();

    let draft = AnswerMap::new()
        .with("placa", "ABC-123")
        .with("fugas", true)
        .with("nivel_de_aceite", "cumple");

    engine
        .publish_version(record.id, VersionMeta::new("Solo placa", TECHNICIAN), &frenos_raw(), Some(1))
        .await
        .unwrap();

    let carried = engine.reconcile_draft(record.id, None, &draft).await.unwrap();
    assert_eq!(serde_json::to_value(&carried).unwrap(), json!({"estado": ""}));

    let pinned = engine.reconcile_draft(record.id, Some(1), &draft).await.unwrap();
    assert_eq!(pinned.get("placa"), Some(&AnswerValue::from("ABC-123")));
    assert_eq!(pinned.get("fugas"), Some(&AnswerValue::from(true)));
    assert_eq!(pinned.get("fallas_visibles"), Some(&AnswerValue::Choices(vec![])));
}

#[tokio::test]
async fn truck_tree_collects_every_leaf() {
    let engine = engine();
    let record = engine
        .create_checklist(
            ChecklistDraft::new("Camión 12", "truck"),
            VersionMeta::new("Inicial", TECHNICIAN),
            &truck_raw(),
        )
        .await
        .unwrap();

    let answers = AnswerMap::new()
        .with("nivel_de_aceite", "cumple")
        .with("kilometraje", "120500")
        .with("placa", "ABC-123");
    let payload = engine
        .prepare_evaluation(record.id, EvaluationRequest::new("EQ-1", TECHNICIAN).with_answers(answers))
        .await
        .unwrap();

    let keys: Vec<&str> = payload.responses.iter().map(|r| r.item_key.as_str()).collect();
    assert_eq!(
        keys,
        ["nivel_de_aceite", "fugas", "kilometraje", "fallas_visibles", "observaciones", "placa"]
    );
    assert_eq!(payload.answered(), 3);
}

#[tokio::test]
async fn depth_limit_is_eight() {
    let engine = engine();
    assert!(engine.normalize(&nested_chain(8)).is_ok());
    assert!(matches!(
        engine.normalize(&nested_chain(9)),
        Err(EngineError::Normalize(_))
    ));
}

#[tokio::test]
async fn legacy_import_then_publish() {
    let engine = engine();
    let record = engine
        .import_legacy(ChecklistDraft::new("Grúa vieja", "crane"), legacy_items())
        .await
        .unwrap();

    let legacy_answers = engine.initial_answers(record.id, None).await.unwrap();
    assert_eq!(
        serde_json::to_value(&legacy_answers).unwrap(),
        json!({"estado": "", "luces": false, "observaciones": ""})
    );

    let v2 = engine
        .publish_version(record.id, VersionMeta::new("Nueva", TECHNICIAN), &frenos_raw(), Some(1))
        .await
        .unwrap();
    assert_eq!(v2.version, 2);

    let stored = engine.get(record.id).await.unwrap();
    assert_eq!(stored.versions().len(), 2);
    assert_eq!(stored.versions()[0].created_by, LEGACY_AUTHOR);

    let view = engine.resolve(record.id, true, Some(1)).await.unwrap();
    assert_eq!(view.structure.unwrap().len(), 3);
}

#[tokio::test]
async fn listing_respects_filters() {
    let engine = engine();
    for (name, equipment) in [("Camión", "truck"), ("Grúa", "crane"), ("Volqueta", "truck")] {
        engine
            .create_checklist(
                ChecklistDraft::new(name, equipment),
                VersionMeta::new("v1", TECHNICIAN),
                &frenos_raw(),
            )
            .await
            .unwrap();
    }

    let trucks = engine
        .list(&ChecklistFilter::new().with_equipment_type("truck"))
        .await
        .unwrap();
    let names: Vec<&str> = trucks.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Camión") && names.contains(&"Volqueta"));
}
