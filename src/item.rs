//! Persistent data attached to one item stack.

use crate::bonus::{EffectInstance, ItemBonus};
use crate::error::CodecError;
use crate::merge::{add_persisted, load_bonuses, remove_persisted};
use crate::operation::apply_operations;
use crate::registry::Registries;
use crate::tag::CompoundTag;
use serde::{Deserialize, Serialize};

/// Key of the item bonus list inside an item's data.
pub const BONUSES_KEY: &str = "SkillBonuses";

/// Key of the effects applied by a poisoned weapon.
pub const POISONS_KEY: &str = "Poisons";

/// An item's persistent-data container.
///
/// Other keys in the container belong to the host and are preserved.
///
/// # Examples
///
/// ```rust
/// use skilltree::item::ItemData;
/// use skilltree::{ItemBonus, Operation, Registries};
///
/// let registries = Registries::builtin().unwrap();
/// let mut data = ItemData::new();
/// for (amount, operation) in [
///     (10.0, Operation::Add),
///     (1.5, Operation::MultiplyBase),
///     (2.0, Operation::MultiplyTotal),
/// ] {
///     data.add_item_bonus(ItemBonus::Durability { amount, operation }, &registries)
///         .unwrap();
/// }
/// assert_eq!(data.max_durability(100, &registries), 330);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemData {
    tag: CompoundTag,
}

impl ItemData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tag(tag: CompoundTag) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> &CompoundTag {
        &self.tag
    }

    pub fn into_tag(self) -> CompoundTag {
        self.tag
    }

    /// Decoded bonuses; unreadable records are skipped.
    pub fn item_bonuses(&self, registries: &Registries) -> Vec<ItemBonus> {
        load_bonuses(&self.tag, BONUSES_KEY, registries)
    }

    pub fn add_item_bonus(
        &mut self,
        bonus: ItemBonus,
        registries: &Registries,
    ) -> Result<(), CodecError> {
        add_persisted(&mut self.tag, BONUSES_KEY, registries, bonus)
    }

    pub fn remove_item_bonus(
        &mut self,
        bonus: &ItemBonus,
        registries: &Registries,
    ) -> Result<bool, CodecError> {
        remove_persisted(&mut self.tag, BONUSES_KEY, registries, bonus)
    }

    pub fn clear_item_bonuses(&mut self) {
        self.tag.remove(BONUSES_KEY);
    }

    /// Replace the poisons applied on hit.
    pub fn set_poisons(&mut self, effects: &[EffectInstance]) {
        self.tag
            .put_list(POISONS_KEY, effects.iter().map(EffectInstance::save).collect());
    }

    pub fn has_poisons(&self) -> bool {
        self.tag.contains(POISONS_KEY)
    }

    /// Decoded poisons; unreadable records are logged and skipped.
    pub fn poisons(&self) -> Vec<EffectInstance> {
        if !self.has_poisons() {
            return Vec::new();
        }
        let records = match self.tag.get_array(POISONS_KEY) {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(%error, "ignoring malformed poison list");
                return Vec::new();
            }
        };
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let decoded = CompoundTag::from_value(record.clone())
                    .and_then(|tag| EffectInstance::load(&tag));
                match decoded {
                    Ok(effect) => Some(effect),
                    Err(error) => {
                        tracing::warn!(index, %error, "dropping poison record");
                        None
                    }
                }
            })
            .collect()
    }

    /// Sockets granted by socket bonuses on this item.
    pub fn additional_sockets(&self, registries: &Registries) -> i32 {
        self.item_bonuses(registries)
            .iter()
            .filter_map(|bonus| match bonus {
                ItemBonus::Sockets { sockets } => Some(*sockets),
                _ => None,
            })
            .sum()
    }

    /// Maximum durability after durability bonuses, truncated toward zero.
    pub fn max_durability(&self, base: i32, registries: &Registries) -> i32 {
        let modifiers = self
            .item_bonuses(registries)
            .into_iter()
            .filter_map(|bonus| match bonus {
                ItemBonus::Durability { amount, operation } => Some((operation, amount as f64)),
                _ => None,
            });
        apply_operations(base as f64, modifiers) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ResourceId;
    use crate::operation::Operation;

    #[test]
    fn test_host_keys_survive_bonus_updates() {
        let registries = Registries::builtin().unwrap();
        let mut tag = CompoundTag::new();
        tag.put_i32("Damage", 12);
        let mut data = ItemData::from_tag(tag);

        data.add_item_bonus(ItemBonus::Sockets { sockets: 1 }, &registries)
            .unwrap();
        data.clear_item_bonuses();
        assert_eq!(data.tag().get_i32("Damage").unwrap(), 12);
        assert!(data.item_bonuses(&registries).is_empty());
    }

    #[test]
    fn test_additional_sockets_sum() {
        let registries = Registries::builtin().unwrap();
        let mut data = ItemData::new();
        data.add_item_bonus(ItemBonus::Sockets { sockets: 1 }, &registries)
            .unwrap();
        data.add_item_bonus(ItemBonus::FoodHealing { amount: 1.0 }, &registries)
            .unwrap();
        data.add_item_bonus(ItemBonus::Sockets { sockets: 2 }, &registries)
            .unwrap();
        assert_eq!(data.additional_sockets(&registries), 3);
        assert_eq!(data.item_bonuses(&registries).len(), 2);
    }

    #[test]
    fn test_durability_without_bonuses() {
        let registries = Registries::builtin().unwrap();
        assert_eq!(ItemData::new().max_durability(250, &registries), 250);
    }

    #[test]
    fn test_durability_truncates() {
        let registries = Registries::builtin().unwrap();
        let mut data = ItemData::new();
        data.add_item_bonus(
            ItemBonus::Durability {
                amount: 1.25,
                operation: Operation::MultiplyTotal,
            },
            &registries,
        )
        .unwrap();
        assert_eq!(data.max_durability(59, &registries), 73);
    }

    #[test]
    fn test_remove_item_bonus() {
        let registries = Registries::builtin().unwrap();
        let mut data = ItemData::new();
        let bonus = ItemBonus::PotionAmplification { amount: 0.1 };
        data.add_item_bonus(bonus.clone(), &registries).unwrap();
        assert!(data.remove_item_bonus(&bonus, &registries).unwrap());
        assert!(!data.remove_item_bonus(&bonus, &registries).unwrap());
    }

    #[test]
    fn test_poisons() {
        let mut data = ItemData::new();
        assert!(!data.has_poisons());
        assert!(data.poisons().is_empty());

        let effects = vec![
            EffectInstance::new(ResourceId::parse("poison").unwrap(), 100, 0),
            EffectInstance::new(ResourceId::parse("weakness").unwrap(), 60, 1),
        ];
        data.set_poisons(&effects);
        assert!(data.has_poisons());

        let reloaded =
            ItemData::from_tag(CompoundTag::from_json_str(&data.tag().to_json_string()).unwrap());
        assert_eq!(reloaded.poisons(), effects);

        // Brewing an empty poison still marks the item
        data.set_poisons(&[]);
        assert!(data.has_poisons());
        assert!(data.poisons().is_empty());
    }

    #[test]
    fn test_broken_poison_record_skipped() {
        let mut broken = CompoundTag::new();
        broken.put_string("id", "poison");
        let mut tag = CompoundTag::new();
        tag.put_list(
            POISONS_KEY,
            vec![
                broken,
                EffectInstance::new(ResourceId::parse("wither").unwrap(), 40, 0).save(),
            ],
        );
        let data = ItemData::from_tag(tag);
        assert_eq!(
            data.poisons(),
            vec![EffectInstance::new(ResourceId::parse("wither").unwrap(), 40, 0)]
        );
    }
}
