//! Snapshot store tests

use super::*;
use conduit_wiring_core::{
    run_batch, Diagnostic, ExecutionMode, GaugeAssigner, WiringConfig,
};
use tempfile::tempdir;

fn conduit(id: u64) -> SnapshotElement {
    SnapshotElement::new(id, "Conduits")
}

fn sample_model() -> ModelSnapshot {
    let mut model = ModelSnapshot::new("Level 1");
    model.elements.push(
        conduit(1001)
            .with_text("1.3. Wiring", "FFNT")
            .with_text("1.4. Gauge", "1.5")
            .with_integer("1,5mm²_Phase A", 0)
            .with_integer("1,5mm²_Phase B", 0)
            .with_empty("1,5mm²_Neutral")
            .with_integer("1,5mm²_Ground", 2),
    );
    model.elements.push(
        SnapshotElement::new(2002, "Walls")
            .with_text("1.3. Wiring", "FFF")
            .with_text("1.4. Gauge", "2.5")
            .with_integer("2,5mm²_Phase A", 0),
    );
    model
}

#[test]
fn write_replaces_value_and_journals_it() {
    let mut element = conduit(1).with_integer("4,0mm²_Neutral", 3);

    element.set_integer("4,0mm²_Neutral", 5).unwrap();

    assert_eq!(element.integer("4,0mm²_Neutral"), Some(5));
    let changes = element.take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].before, Some(ParameterValue::Integer(3)));
    assert_eq!(changes[0].after, 5);
    assert!(element.take_changes().is_empty());
}

#[test]
fn write_to_empty_parameter_stores_integer() {
    let mut element = conduit(1).with_empty("4,0mm²_Ground");
    element.set_integer("4,0mm²_Ground", 1).unwrap();
    assert_eq!(
        element.parameters["4,0mm²_Ground"],
        Some(ParameterValue::Integer(1))
    );
}

#[test]
fn text_counter_keeps_text_storage() {
    let mut element = conduit(1).with_text("4,0mm²_Return", "2");
    element.set_integer("4,0mm²_Return", 3).unwrap();
    assert_eq!(
        element.parameters["4,0mm²_Return"],
        Some(ParameterValue::Text("3".into()))
    );
}

#[test]
fn rejected_writes() {
    let mut element = conduit(1)
        .with_integer("locked", 0)
        .with_read_only("locked");
    element
        .parameters
        .insert("length".into(), Some(ParameterValue::Double(2.5)));
    element = element.with_integer("big", 0);

    assert_eq!(element.set_integer("locked", 1), Err(WriteError::ReadOnly));
    assert_eq!(element.set_integer("length", 1), Err(WriteError::StorageMismatch));
    assert_eq!(
        element.set_integer("big", i64::from(i32::MAX) + 1),
        Err(WriteError::OutOfRange(i64::from(i32::MAX) + 1))
    );
    assert!(matches!(element.set_integer("absent", 1), Err(WriteError::Host(_))));
    assert!(element.take_changes().is_empty());
}

#[test]
fn collector_filters_by_category() {
    let mut model = sample_model();
    let config = CollectorConfig::default();
    let mut collector = model.collector(&config);
    let ids: Vec<ElementId> = collector
        .collect_elements()
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![ElementId(1001)]);

    let all = CollectorConfig::all();
    let mut collector = model.collector(&all);
    assert_eq!(collector.collect_elements().unwrap().len(), 2);
}

#[test]
fn committed_batch_lands_with_journal() {
    let mut model = sample_model();
    let assigner = GaugeAssigner::new(WiringConfig::default()).unwrap();
    let config = CollectorConfig::default();
    let mut sink: Vec<Diagnostic> = Vec::new();

    let mut tx = Transaction::begin(&mut model, "assign wires");
    let report = run_batch(
        &mut tx.snapshot_mut().collector(&config),
        &assigner,
        &mut sink,
        ExecutionMode::Sequential,
    )
    .unwrap();
    let journal = tx.commit();

    assert_eq!(report.parameters_incremented, 4);
    assert!(sink.is_empty());
    assert_eq!(journal.changes.len(), 4);
    assert_eq!(journal.name, "assign wires");

    let conduit = model.element(1001).unwrap();
    assert_eq!(conduit.integer("1,5mm²_Phase A"), Some(1));
    assert_eq!(conduit.integer("1,5mm²_Phase B"), Some(1));
    assert_eq!(conduit.integer("1,5mm²_Neutral"), Some(1));
    assert_eq!(conduit.integer("1,5mm²_Ground"), Some(3));
    // Not a collected category.
    assert_eq!(model.element(2002).unwrap().integer("2,5mm²_Phase A"), Some(0));
}

#[test]
fn dropped_transaction_changes_nothing() {
    let mut model = sample_model();
    let before = model.clone();
    let assigner = GaugeAssigner::new(WiringConfig::default()).unwrap();
    let config = CollectorConfig::all();

    {
        let mut tx = Transaction::begin(&mut model, "assign wires");
        run_batch(
            &mut tx.snapshot_mut().collector(&config),
            &assigner,
            &mut Vec::<Diagnostic>::new(),
            ExecutionMode::Sequential,
        )
        .unwrap();
        assert_eq!(
            tx.snapshot().element(1001).unwrap().integer("1,5mm²_Phase A"),
            Some(1)
        );
        tx.rollback();
    }

    assert_eq!(model, before);
}

#[test]
fn snapshot_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("model.json");
    let model = sample_model();

    save_snapshot(&path, &model).unwrap();
    let loaded = load_snapshot(&path).unwrap();

    assert_eq!(loaded, model);
    assert!(!dir.path().join("nested").join(".model.json.tmp").exists());
}

#[test]
fn snapshot_json_shape() {
    let json = r#"{
        "name": "Level 2",
        "elements": [
            {
                "id": 7,
                "category": "Cable Trays",
                "parameters": {
                    "1.3. Wiring": { "text": "NN" },
                    "4,0mm²_Neutral": { "integer": 1 },
                    "4,0mm²_Ground": null
                },
                "read_only": ["4,0mm²_Ground"]
            }
        ]
    }"#;
    let model: ModelSnapshot = serde_json::from_str(json).unwrap();
    let element = &model.elements[0];
    assert_eq!(element.id, ElementId(7));
    assert_eq!(element.integer("4,0mm²_Neutral"), Some(1));
    assert!(element.has_parameter("4,0mm²_Ground"));
    assert!(!element.parameter("4,0mm²_Ground").unwrap().has_value());
    assert!(element.read_only.contains("4,0mm²_Ground"));
}

#[test]
fn load_reports_path_on_bad_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_snapshot(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}
