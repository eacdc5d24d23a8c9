//! Multipliers scaling a bonus by a quantity observed on the player.

use crate::codec::{load_nested, read_value, save_nested, write_value};
use crate::condition::ItemCondition;
use crate::context::{EquippedItem, LivingSnapshot};
use crate::error::CodecError;
use crate::id::ResourceId;
use crate::registry::{Family, Registries, Registry};
use crate::tag::CompoundTag;
use crate::wire::WireWriter;

/// Scales a bonus's amount by a runtime quantity.
///
/// # Examples
///
/// ```rust
/// use skilltree::context::LivingSnapshot;
/// use skilltree::multiplier::BonusMultiplier;
///
/// let player = LivingSnapshot { food_level: 14, ..Default::default() };
/// assert_eq!(BonusMultiplier::FoodLevel.value(&player), 14.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BonusMultiplier {
    /// One per active effect.
    EffectAmount,
    AttributeValue { attribute: ResourceId },
    /// One per enchantment on matching equipment.
    EnchantsAmount { item: ItemCondition },
    /// Total enchantment levels on matching equipment.
    EnchantsLevels { item: ItemCondition },
    GemsAmount { item: ItemCondition },
    FoodLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BonusMultiplierKind {
    EffectAmount,
    AttributeValue,
    EnchantsAmount,
    EnchantsLevels,
    GemsAmount,
    FoodLevel,
}

impl BonusMultiplier {
    pub fn value(&self, player: &LivingSnapshot) -> f32 {
        match self {
            BonusMultiplier::EffectAmount => player.effects.len() as f32,
            BonusMultiplier::AttributeValue { attribute } => player.attribute(attribute) as f32,
            BonusMultiplier::EnchantsAmount { item } => matching(player, item)
                .map(|equipped| equipped.enchantment_levels.len() as f32)
                .sum(),
            BonusMultiplier::EnchantsLevels { item } => matching(player, item)
                .flat_map(|equipped| equipped.enchantment_levels.iter())
                .map(|level| *level as f32)
                .sum(),
            BonusMultiplier::GemsAmount { item } => {
                matching(player, item).map(|equipped| equipped.gems as f32).sum()
            }
            BonusMultiplier::FoodLevel => player.food_level as f32,
        }
    }

    pub(crate) fn builtin_registry() -> Result<Registry<Self>, CodecError> {
        Ok(Registry::<Self>::builder()
            .register(
                "skilltree:effect_amount",
                BonusMultiplierKind::EffectAmount,
                |_, _| Ok(BonusMultiplier::EffectAmount),
                |_, _| Ok(BonusMultiplier::EffectAmount),
            )?
            .register(
                "skilltree:attribute_value",
                BonusMultiplierKind::AttributeValue,
                |r, _| {
                    Ok(BonusMultiplier::AttributeValue {
                        attribute: r.read_id()?,
                    })
                },
                |t, _| {
                    Ok(BonusMultiplier::AttributeValue {
                        attribute: t.get_id("attribute")?,
                    })
                },
            )?
            .register(
                "skilltree:enchants_amount",
                BonusMultiplierKind::EnchantsAmount,
                |r, reg| {
                    Ok(BonusMultiplier::EnchantsAmount {
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(BonusMultiplier::EnchantsAmount {
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:enchants_levels",
                BonusMultiplierKind::EnchantsLevels,
                |r, reg| {
                    Ok(BonusMultiplier::EnchantsLevels {
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(BonusMultiplier::EnchantsLevels {
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:gems_amount",
                BonusMultiplierKind::GemsAmount,
                |r, reg| {
                    Ok(BonusMultiplier::GemsAmount {
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(BonusMultiplier::GemsAmount {
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:food_level",
                BonusMultiplierKind::FoodLevel,
                |_, _| Ok(BonusMultiplier::FoodLevel),
                |_, _| Ok(BonusMultiplier::FoodLevel),
            )?
            .build())
    }
}

fn matching<'a>(
    player: &'a LivingSnapshot,
    item: &'a ItemCondition,
) -> impl Iterator<Item = &'a EquippedItem> + 'a {
    player
        .equipment
        .iter()
        .filter(move |equipped| item.met(&equipped.profile))
}

impl Family for BonusMultiplier {
    type Kind = BonusMultiplierKind;
    const FAMILY: &'static str = "bonus_multiplier";

    fn registry(registries: &Registries) -> &Registry<Self> {
        &registries.multipliers
    }

    fn kind(&self) -> BonusMultiplierKind {
        match self {
            BonusMultiplier::EffectAmount => BonusMultiplierKind::EffectAmount,
            BonusMultiplier::AttributeValue { .. } => BonusMultiplierKind::AttributeValue,
            BonusMultiplier::EnchantsAmount { .. } => BonusMultiplierKind::EnchantsAmount,
            BonusMultiplier::EnchantsLevels { .. } => BonusMultiplierKind::EnchantsLevels,
            BonusMultiplier::GemsAmount { .. } => BonusMultiplierKind::GemsAmount,
            BonusMultiplier::FoodLevel => BonusMultiplierKind::FoodLevel,
        }
    }

    fn write_payload(
        &self,
        writer: &mut WireWriter,
        registries: &Registries,
    ) -> Result<(), CodecError> {
        match self {
            BonusMultiplier::AttributeValue { attribute } => writer.write_id(attribute),
            BonusMultiplier::EnchantsAmount { item }
            | BonusMultiplier::EnchantsLevels { item }
            | BonusMultiplier::GemsAmount { item } => write_value(writer, registries, item),
            BonusMultiplier::EffectAmount | BonusMultiplier::FoodLevel => Ok(()),
        }
    }

    fn save_payload(&self, tag: &mut CompoundTag, registries: &Registries) -> Result<(), CodecError> {
        match self {
            BonusMultiplier::AttributeValue { attribute } => {
                tag.put_id("attribute", attribute);
                Ok(())
            }
            BonusMultiplier::EnchantsAmount { item }
            | BonusMultiplier::EnchantsLevels { item }
            | BonusMultiplier::GemsAmount { item } => {
                save_nested(tag, "item_condition", registries, item)
            }
            BonusMultiplier::EffectAmount | BonusMultiplier::FoodLevel => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{load_value, read_value, save_value};
    use crate::condition::{ArmorSlot, WeaponType};
    use crate::context::{ItemCategory, ItemProfile};
    use crate::wire::WireReader;

    fn id(s: &str) -> ResourceId {
        ResourceId::parse(s).unwrap()
    }

    fn player() -> LivingSnapshot {
        let mut sword =
            EquippedItem::new(ItemProfile::new(id("diamond_sword")).with(ItemCategory::MeleeWeapon));
        sword.enchantment_levels = vec![5, 2];
        sword.gems = 1;
        let mut helmet =
            EquippedItem::new(ItemProfile::new(id("diamond_helmet")).with(ItemCategory::Helmet));
        helmet.enchantment_levels = vec![4];
        helmet.gems = 3;
        LivingSnapshot {
            effects: vec![id("speed"), id("haste")],
            attributes: [(id("generic.armor"), 12.0)].into_iter().collect(),
            equipment: vec![sword, helmet],
            ..Default::default()
        }
    }

    #[test]
    fn test_enchantment_multipliers() {
        let player = player();
        let weapon = ItemCondition::Weapon(WeaponType::Any);
        assert_eq!(
            BonusMultiplier::EnchantsAmount { item: weapon }.value(&player),
            2.0
        );
        assert_eq!(
            BonusMultiplier::EnchantsLevels { item: weapon }.value(&player),
            7.0
        );
    }

    #[test]
    fn test_gems_and_attributes() {
        let player = player();
        let armor = ItemCondition::Armor(ArmorSlot::Any);
        assert_eq!(BonusMultiplier::GemsAmount { item: armor }.value(&player), 3.0);
        assert_eq!(
            BonusMultiplier::AttributeValue {
                attribute: id("generic.armor")
            }
            .value(&player),
            12.0
        );
        assert_eq!(BonusMultiplier::EffectAmount.value(&player), 2.0);
    }

    #[test]
    fn test_nested_condition_codec() {
        let registries = Registries::builtin().unwrap();
        let multiplier = BonusMultiplier::GemsAmount {
            item: ItemCondition::Jewelry,
        };

        let tag = save_value(&registries, &multiplier).unwrap();
        assert_eq!(tag.get_string("type").unwrap(), "skilltree:gems_amount");
        assert_eq!(load_value::<BonusMultiplier>(&tag, &registries).unwrap(), multiplier);

        let mut writer = WireWriter::new();
        write_value(&mut writer, &registries, &multiplier).unwrap();
        let mut reader = WireReader::new(writer.freeze());
        assert_eq!(
            read_value::<BonusMultiplier>(&mut reader, &registries).unwrap(),
            multiplier
        );
    }
}
