use super::*;
use serde_json::json;

fn sample() -> Snapshot {
    Snapshot::new()
        .with("age", "30")
        .with("height", "170")
        .with("weight", "65")
        .with("waist", "30")
}

#[test]
fn canonical_json_sorts_keys() {
    assert_eq!(
        sample().canonical_json(),
        r#"{"age":"30","height":"170","waist":"30","weight":"65"}"#
    );
}

#[test]
fn empty_snapshot_carries_standard_fields() {
    assert_eq!(
        Snapshot::new().canonical_json(),
        r#"{"age":"","height":"","waist":"","weight":""}"#
    );
    assert_eq!(Seed::derive("health", &Snapshot::new()).0, 3_570_986_439);
}

#[test]
fn worked_example_seed_and_scores() {
    let snap = sample();
    assert_eq!(Seed::derive("health", &snap), Seed(1_296_346_590));

    let set = synthesize("health", &snap);
    assert_eq!(set.mode(), Mode::Health);
    assert_eq!(set.values(), [82, 58, 84, 57, 80, 73, 81, 86, 62, 86]);
    assert_eq!(set.aggregate(), 75);
}

#[test]
fn alias_hashes_verbatim_but_uses_same_table() {
    let snap = sample();
    let psy = synthesize("psy", &snap);
    let full = synthesize("psychology", &snap);
    assert_eq!(psy.mode(), Mode::Psychology);
    assert_eq!(full.mode(), Mode::Psychology);
    assert_eq!(psy.values(), [58, 76, 61, 67, 72, 86, 64, 80, 88, 71]);
    assert_eq!(full.values(), [88, 57, 82, 63, 71, 59, 85, 56, 78, 88]);
    assert_eq!(psy.labels(), full.labels());
}

#[test]
fn unknown_mode_falls_back_to_health_table() {
    let set = synthesize("bogus", &sample());
    assert_eq!(set.mode(), Mode::Health);
    assert_eq!(set.scores()[0].axis_id, "cardio");
    assert_eq!(set.values(), [65, 89, 69, 76, 60, 71, 56, 72, 69, 64]);
}

#[test]
fn garbage_fields_become_empty_strings() {
    let snap = Snapshot::from_json_value(&json!({
        "age": null,
        "height": [1, 2],
        "weight": {"kg": 65},
        "waist": true,
    }));
    assert_eq!(snap, Snapshot::new());

    let numeric = Snapshot::from_json_value(&json!({"age": 30, "height": "170"}));
    assert_eq!(numeric.get("age"), "30");
    assert_eq!(numeric.get("height"), "170");
    assert_eq!(numeric.get("missing"), "");

    assert_eq!(Snapshot::from_json_value(&json!("nope")), Snapshot::new());
}

#[test]
fn snapshot_deserialize_is_lenient() {
    let snap: Snapshot = serde_json::from_value(json!({"age": "30", "waist": false})).unwrap();
    assert_eq!(snap.get("age"), "30");
    assert_eq!(snap.get("waist"), "");
}

#[test]
fn scores_respect_engine_bounds() {
    for age in 0..200 {
        let snap = sample().with("age", age.to_string());
        for mode in ["health", "skin", "fortune", "psychology"] {
            for v in synthesize(mode, &snap).values() {
                assert!((MIN_SYNTH_SCORE..=MAX_SYNTH_SCORE).contains(&v));
            }
        }
    }
}

#[test]
fn score_mapping_endpoints() {
    assert_eq!(score_from_unit(0.0), 55);
    assert_eq!(score_from_unit(0.999_999), 90);
    assert_eq!(score_from_unit(-10.0), MIN_SYNTH_SCORE);
    assert_eq!(score_from_unit(10.0), MAX_SYNTH_SCORE);
}
