//! Plan computation: completeness, direction, and degenerate spans.

mod common;

use rand::Rng;
use shopstore::prelude::*;

fn inventory_for(chain: &[SchemaDefinition]) -> (tempfile::TempDir, ModelsInventory) {
    let dir = tempfile::tempdir().unwrap();
    common::write_package(dir.path(), "Shop", chain);
    let inventory = ModelsInventory::from_package("Shop", dir.path()).unwrap();
    (dir, inventory)
}

#[test]
fn test_forward_plan_visits_every_intermediate_version() {
    let chain = common::growing_chain(6);
    let (_dir, inventory) = inventory_for(&chain);

    let plan = MigrationPlan::between(&inventory, &chain[1], &chain[4]).unwrap();

    let hops: Vec<(&str, &str)> = plan
        .steps()
        .iter()
        .map(|s| (s.source_version.name(), s.target_version.name()))
        .collect();
    assert_eq!(
        hops,
        [
            ("Model 2", "Model 3"),
            ("Model 3", "Model 4"),
            ("Model 4", "Model 5"),
        ]
    );
}

#[test]
fn test_reverse_plan_walks_back_through_every_version() {
    let chain = common::growing_chain(5);
    let (_dir, inventory) = inventory_for(&chain);

    let plan = MigrationPlan::between(&inventory, &chain[4], &chain[1]).unwrap();

    let hops: Vec<(&str, &str)> = plan
        .steps()
        .iter()
        .map(|s| (s.source_version.name(), s.target_version.name()))
        .collect();
    assert_eq!(
        hops,
        [
            ("Model 5", "Model 4"),
            ("Model 4", "Model 3"),
            ("Model 3", "Model 2"),
        ]
    );
}

#[test]
fn test_random_spans_never_skip_an_index() {
    let chain = common::growing_chain(8);
    let (_dir, inventory) = inventory_for(&chain);
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let i = rng.gen_range(0..chain.len());
        let j = rng.gen_range(0..chain.len());
        if i == j {
            continue;
        }

        let plan = MigrationPlan::between(&inventory, &chain[i], &chain[j]).unwrap();
        assert_eq!(plan.len(), i.abs_diff(j));

        let mut expected = i;
        for step in plan.steps() {
            assert_eq!(step.source_version.name(), chain[expected].name);
            expected = if j > i { expected + 1 } else { expected - 1 };
            assert_eq!(step.target_version.name(), chain[expected].name);
        }
    }
}

#[test]
fn test_same_source_and_target_yields_empty_plan() {
    let chain = common::growing_chain(4);
    let (_dir, inventory) = inventory_for(&chain);

    let plan = MigrationPlan::between(&inventory, &chain[2], &chain[2]).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_unknown_boundary_yields_empty_plan() {
    let chain = common::growing_chain(4);
    let (_dir, inventory) = inventory_for(&chain);

    let stranger = SchemaDefinition::new(
        "Model X",
        vec![EntityDefinition::new(
            "Coupon",
            vec![FieldDefinition::required("code", FieldKind::Text)],
        )],
    );

    // Unknown target: the walk finds the source but never closes the span.
    let plan = MigrationPlan::between(&inventory, &chain[0], &stranger).unwrap();
    assert!(plan.is_empty());

    // Unknown source behaves the same way.
    let plan = MigrationPlan::between(&inventory, &stranger, &chain[3]).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_steps_carry_materialized_schemas() {
    let chain = common::schema_chain();
    let (_dir, inventory) = inventory_for(&chain);

    let plan = MigrationPlan::between(&inventory, &chain[0], &chain[2]).unwrap();
    assert_eq!(plan.len(), 2);

    let first = &plan.steps()[0];
    assert!(first.source_schema.structurally_matches(&chain[0]));
    assert!(first.target_schema.structurally_matches(&chain[1]));
}
