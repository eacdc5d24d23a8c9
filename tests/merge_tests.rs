//! Tests for the merge engine.
//!
//! These tests verify:
//! - Mergeable bonuses collapse into one entry
//! - Non-mergeable bonuses accumulate
//! - Unknown persisted records are dropped
//! - Removal keeps the relative order of the rest
//! - Durability folds in stage order

use proptest::prelude::*;
use serde_json::Value;
use skilltree::bonus::{AttributeModifier, CombatBonus};
use skilltree::codec::save_value;
use skilltree::item::{ItemData, BONUSES_KEY};
use skilltree::merge::{add_bonus, load_bonuses, remove_bonus};
use skilltree::*;

fn registries() -> Registries {
    Registries::builtin().unwrap()
}

fn durability(amount: f32, operation: Operation) -> ItemBonus {
    ItemBonus::Durability { amount, operation }
}

fn armor(name: &str, amount: f64) -> SkillBonus {
    SkillBonus::Attribute {
        attribute: ResourceId::parse("generic.armor").unwrap(),
        modifier: AttributeModifier::new(name, amount, Operation::Add),
        player_condition: None,
        multiplier: None,
    }
}

fn damage(amount: f32) -> SkillBonus {
    SkillBonus::Damage(CombatBonus::new(amount, Operation::Add))
}

// ============================================================================
// In-memory lists
// ============================================================================

#[test]
fn test_mergeable_pair_yields_single_entry() {
    let mut list = Vec::new();
    add_bonus(&mut list, damage(5.0));
    add_bonus(&mut list, damage(3.0));
    assert_eq!(list, vec![damage(8.0)]);
}

#[test]
fn test_non_mergeable_bonuses_accumulate() {
    let mut list = Vec::new();
    add_bonus(&mut list, damage(5.0));
    add_bonus(
        &mut list,
        SkillBonus::CraftedItem {
            item: ItemCondition::Equipment,
            bonus: durability(5.0, Operation::Add),
        },
    );
    assert_eq!(list.len(), 2);
}

#[test]
fn test_different_operations_do_not_merge() {
    let mut list = Vec::new();
    add_bonus(&mut list, durability(5.0, Operation::Add));
    add_bonus(&mut list, durability(5.0, Operation::MultiplyBase));
    assert_eq!(list.len(), 2);
}

#[test]
fn test_merged_entry_moves_to_end() {
    let mut list = vec![
        durability(1.0, Operation::Add),
        ItemBonus::Sockets { sockets: 1 },
        ItemBonus::FoodHealing { amount: 2.0 },
    ];
    add_bonus(&mut list, durability(2.0, Operation::Add));
    assert_eq!(
        list,
        vec![
            ItemBonus::Sockets { sockets: 1 },
            ItemBonus::FoodHealing { amount: 2.0 },
            durability(3.0, Operation::Add),
        ]
    );
}

#[test]
fn test_differently_named_modifiers_do_not_merge() {
    let mut forward = Vec::new();
    add_bonus(&mut forward, armor("Skill Tree Armor", 2.0));
    add_bonus(&mut forward, armor("Gem Armor", 3.0));

    let mut backward = Vec::new();
    add_bonus(&mut backward, armor("Gem Armor", 3.0));
    add_bonus(&mut backward, armor("Skill Tree Armor", 2.0));

    assert_eq!(forward.len(), 2);
    assert!(forward.iter().all(|bonus| backward.contains(bonus)));

    assert!(remove_bonus(&mut forward, &armor("Gem Armor", 3.0)));
    assert_eq!(forward, vec![armor("Skill Tree Armor", 2.0)]);
}

#[test]
fn test_remove_keeps_relative_order() {
    let mut list = vec![
        ItemBonus::Sockets { sockets: 1 },
        durability(4.0, Operation::Add),
        ItemBonus::PotionDuration { amount: 0.5 },
    ];
    assert!(remove_bonus(&mut list, &durability(4.0, Operation::Add)));
    assert_eq!(
        list,
        vec![
            ItemBonus::Sockets { sockets: 1 },
            ItemBonus::PotionDuration { amount: 0.5 },
        ]
    );

    // Value equality: same kind, different amount is a different bonus
    assert!(!remove_bonus(&mut list, &ItemBonus::Sockets { sockets: 2 }));
    assert_eq!(list.len(), 2);
}

// ============================================================================
// Persisted lists
// ============================================================================

#[test]
fn test_unknown_identifier_dropped_on_decode() {
    let registries = registries();
    let good = save_value(&registries, &ItemBonus::Sockets { sockets: 1 }).unwrap();
    let mut unknown = CompoundTag::new();
    unknown.put_string("type", "mod:nonexistent");
    unknown.put_f32("amount", 1.0);

    let mut tag = CompoundTag::new();
    tag.put_list(BONUSES_KEY, vec![good, unknown]);

    let bonuses: Vec<ItemBonus> = load_bonuses(&tag, BONUSES_KEY, &registries);
    assert_eq!(bonuses, vec![ItemBonus::Sockets { sockets: 1 }]);
}

#[test]
fn test_unknown_record_not_reproduced_on_write() {
    let registries = registries();
    let mut unknown = CompoundTag::new();
    unknown.put_string("type", "mod:nonexistent");
    let mut tag = CompoundTag::new();
    tag.put_list(BONUSES_KEY, vec![unknown]);

    let mut data = ItemData::from_tag(tag);
    data.add_item_bonus(ItemBonus::QuiverCapacity { amount: 2.0 }, &registries)
        .unwrap();

    let records = data.tag().get_array(BONUSES_KEY).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("type").and_then(Value::as_str),
        Some("skilltree:quiver_capacity")
    );
}

#[test]
fn test_persisted_order_round_trip() {
    let registries = registries();
    let mut data = ItemData::new();
    let bonuses = vec![
        ItemBonus::FoodSaturation { amount: 0.5 },
        ItemBonus::Sockets { sockets: 2 },
        durability(1.5, Operation::MultiplyBase),
    ];
    for bonus in &bonuses {
        data.add_item_bonus(bonus.clone(), &registries).unwrap();
    }

    let json = data.tag().to_json_string();
    let reloaded = ItemData::from_tag(CompoundTag::from_json_str(&json).unwrap());
    assert_eq!(reloaded.item_bonuses(&registries), bonuses);
}

#[test]
fn test_durability_stage_order() {
    let registries = registries();
    let mut data = ItemData::new();
    // Added out of stage order on purpose
    data.add_item_bonus(durability(2.0, Operation::MultiplyTotal), &registries)
        .unwrap();
    data.add_item_bonus(durability(1.5, Operation::MultiplyBase), &registries)
        .unwrap();
    data.add_item_bonus(durability(10.0, Operation::Add), &registries)
        .unwrap();
    assert_eq!(data.max_durability(100, &registries), 330);
}

// ============================================================================
// Properties
// ============================================================================

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Add),
        Just(Operation::MultiplyBase),
        Just(Operation::MultiplyTotal),
    ]
}

proptest! {
    #[test]
    fn prop_merge_order_does_not_matter(
        a in -1000i32..1000,
        b in -1000i32..1000,
        op in operation(),
    ) {
        let first = durability(a as f32, op);
        let second = durability(b as f32, op);

        let mut forward = Vec::new();
        add_bonus(&mut forward, first.clone());
        add_bonus(&mut forward, second.clone());

        let mut backward = Vec::new();
        add_bonus(&mut backward, second);
        add_bonus(&mut backward, first);

        prop_assert_eq!(forward.len(), 1);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_attribute_merge_order_does_not_matter(
        a in -100i32..100,
        b in -100i32..100,
        first_name in "[A-Z][a-z]{0,4}",
        second_name in "[A-Z][a-z]{0,4}",
    ) {
        let first = armor(&first_name, a as f64);
        let second = armor(&second_name, b as f64);

        let mut forward = Vec::new();
        add_bonus(&mut forward, first.clone());
        add_bonus(&mut forward, second.clone());

        let mut backward = Vec::new();
        add_bonus(&mut backward, second);
        add_bonus(&mut backward, first);

        if first_name == second_name {
            prop_assert_eq!(forward.len(), 1);
            prop_assert_eq!(forward, backward);
        } else {
            prop_assert_eq!(forward.len(), 2);
            prop_assert!(forward.iter().all(|bonus| backward.contains(bonus)));
        }
    }

    #[test]
    fn prop_merging_preserves_durability(
        amounts in proptest::collection::vec(0i32..50, 1..8),
        base in 1i32..2000,
    ) {
        let registries = Registries::builtin().unwrap();
        let mut merged = ItemData::new();
        for amount in &amounts {
            merged
                .add_item_bonus(durability(*amount as f32, Operation::Add), &registries)
                .unwrap();
        }
        prop_assert_eq!(merged.item_bonuses(&registries).len(), 1);
        let total: i32 = amounts.iter().sum();
        prop_assert_eq!(merged.max_durability(base, &registries), base + total);
    }
}
