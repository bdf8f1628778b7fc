//! Testing utilities for the Inspecta workspace
//!
//! Shared fixtures: authoring trees, version histories and legacy records.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use inspecta_answers::AnswerMap;
use inspecta_schema::{normalize, LegacyItem, Node, RawNode};
use inspecta_store::{ChecklistDraft, ChecklistRecord, VersionMeta};
use serde_json::json;

pub const TECHNICIAN: &str = "ana";

/// Fixed clock, `hour` hours into 2024-03-01
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

/// `[{title: "Frenos", children: [{title: "Estado", inputType: "select", required: true}]}]`
pub fn frenos_raw() -> Vec<RawNode> {
    serde_json::from_value(json!([
        {"title": "Frenos", "children": [
            {"title": "Estado", "inputType": "select", "required": true}
        ]}
    ]))
    .unwrap()
}

pub fn frenos_tree() -> Vec<Node> {
    normalize(&frenos_raw()).unwrap()
}

/// Answers that satisfy [`frenos_tree`]
pub fn frenos_answers() -> AnswerMap {
    AnswerMap::new().with("estado", "cumple")
}

/// A larger inspection tree: two sections, one nested, every input type
pub fn truck_raw() -> Vec<RawNode> {
    serde_json::from_value(json!([
        {"title": "Motor", "children": [
            {"title": "Aceite", "children": [
                {"title": "Nivel de aceite", "inputType": "select", "required": true},
                {"title": "Fugas", "inputType": "checkbox"}
            ]},
            {"title": "Kilometraje", "inputType": "number", "required": true}
        ]},
        {"title": "Cabina", "children": [
            {"title": "Fallas visibles", "inputType": "select", "allowMultiple": true,
             "options": ["Vidrio", "Espejo", "Asiento"]},
            {"title": "Observaciones", "inputType": "textarea"}
        ]},
        {"title": "Placa", "inputType": "text", "required": true}
    ]))
    .unwrap()
}

pub fn truck_tree() -> Vec<Node> {
    normalize(&truck_raw()).unwrap()
}

/// Single chain of sections `depth` levels deep ending in one text leaf
pub fn nested_chain(depth: usize) -> Vec<RawNode> {
    let mut node = RawNode::titled(format!("Nivel {depth}")).with_input_type("text");
    for level in (1..depth).rev() {
        node = RawNode::titled(format!("Nivel {level}")).with_children(vec![node]);
    }
    vec![node]
}

/// One-leaf tree titled `title`
pub fn single(title: &str) -> Vec<Node> {
    normalize(&[RawNode::titled(title)]).unwrap()
}

/// Record whose history holds versions `1..=count`, version `n` titled `v{n}`
pub fn record_with_versions(count: u32) -> ChecklistRecord {
    let mut record = ChecklistRecord::create(
        ChecklistDraft::new("Camión 12", "truck").with_tags(["flota"]),
        VersionMeta::new("v1", TECHNICIAN).with_notes("notes v1"),
        single("v1"),
        at(0),
    )
    .unwrap();
    for n in 2..=count {
        let title = format!("v{n}");
        record
            .append_version(
                VersionMeta::new(title.clone(), TECHNICIAN).with_notes(format!("notes {title}")),
                single(&title),
                Some(n - 1),
                at(n),
            )
            .unwrap();
    }
    record
}

pub fn legacy_items() -> Vec<LegacyItem> {
    serde_json::from_value(json!([
        {"key": "estado", "label": "Estado"},
        {"key": "luces", "label": "Luces", "type": "checkbox", "required": true},
        {"label": "Observaciones", "type": "textarea"}
    ]))
    .unwrap()
}

/// Pre-versioning record holding only [`legacy_items`]
pub fn legacy_record() -> ChecklistRecord {
    ChecklistRecord::legacy(ChecklistDraft::new("Grúa vieja", "crane"), legacy_items(), at(0))
}
