use crate::codec::{load_ordinal, read_ordinal, save_ordinal, write_ordinal, Ordinal};
use crate::context::{EffectCategory, ItemCategory, ItemProfile};
use crate::error::CodecError;
use crate::registry::{Family, Registries, Registry};
use crate::tag::CompoundTag;
use crate::wire::WireWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponType {
    Any,
    Melee,
    Ranged,
}

impl Ordinal for WeaponType {
    const WHAT: &'static str = "weapon type";
    const VALUES: &'static [Self] = &[WeaponType::Any, WeaponType::Melee, WeaponType::Ranged];

    fn name(self) -> &'static str {
        match self {
            WeaponType::Any => "any",
            WeaponType::Melee => "melee",
            WeaponType::Ranged => "ranged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmorSlot {
    Any,
    Head,
    Chest,
    Legs,
    Feet,
    Offhand,
}

impl Ordinal for ArmorSlot {
    const WHAT: &'static str = "armor slot";
    const VALUES: &'static [Self] = &[
        ArmorSlot::Any,
        ArmorSlot::Head,
        ArmorSlot::Chest,
        ArmorSlot::Legs,
        ArmorSlot::Feet,
        ArmorSlot::Offhand,
    ];

    fn name(self) -> &'static str {
        match self {
            ArmorSlot::Any => "any",
            ArmorSlot::Head => "head",
            ArmorSlot::Chest => "chest",
            ArmorSlot::Legs => "legs",
            ArmorSlot::Feet => "feet",
            ArmorSlot::Offhand => "offhand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurioType {
    Ring,
    Necklace,
    Quiver,
}

impl Ordinal for CurioType {
    const WHAT: &'static str = "curio type";
    const VALUES: &'static [Self] = &[CurioType::Ring, CurioType::Necklace, CurioType::Quiver];

    fn name(self) -> &'static str {
        match self {
            CurioType::Ring => "ring",
            CurioType::Necklace => "necklace",
            CurioType::Quiver => "quiver",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PotionType {
    Any,
    Beneficial,
    Harmful,
    Neutral,
}

impl Ordinal for PotionType {
    const WHAT: &'static str = "potion type";
    const VALUES: &'static [Self] = &[
        PotionType::Any,
        PotionType::Beneficial,
        PotionType::Harmful,
        PotionType::Neutral,
    ];

    fn name(self) -> &'static str {
        match self {
            PotionType::Any => "any",
            PotionType::Beneficial => "beneficial",
            PotionType::Harmful => "harmful",
            PotionType::Neutral => "neutral",
        }
    }
}

/// Predicate over an item stack.
///
/// # Examples
///
/// ```rust
/// use skilltree::condition::{ArmorSlot, ItemCondition};
/// use skilltree::context::{ItemCategory, ItemProfile};
/// use skilltree::ResourceId;
///
/// let boots = ItemProfile::new(ResourceId::parse("iron_boots").unwrap())
///     .with(ItemCategory::Boots);
/// assert!(ItemCondition::Armor(ArmorSlot::Feet).met(&boots));
/// assert!(ItemCondition::Armor(ArmorSlot::Any).met(&boots));
/// assert!(!ItemCondition::Armor(ArmorSlot::Head).met(&boots));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCondition {
    Weapon(WeaponType),
    Armor(ArmorSlot),
    Curio(CurioType),
    Equipment,
    Axe,
    Pickaxe,
    Food,
    Jewelry,
    Potion(PotionType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemConditionKind {
    Weapon,
    Armor,
    Curio,
    Equipment,
    Axe,
    Pickaxe,
    Food,
    Jewelry,
    Potion,
}

impl ItemCondition {
    pub fn met(&self, item: &ItemProfile) -> bool {
        match self {
            ItemCondition::Weapon(WeaponType::Any) => item.is_weapon(),
            ItemCondition::Weapon(WeaponType::Melee) => item.is_melee_weapon(),
            ItemCondition::Weapon(WeaponType::Ranged) => item.is_ranged_weapon(),
            ItemCondition::Armor(slot) => match slot {
                ArmorSlot::Any => item.is_armor() || item.is(ItemCategory::Shield),
                ArmorSlot::Head => item.is(ItemCategory::Helmet),
                ArmorSlot::Chest => item.is(ItemCategory::Chestplate),
                ArmorSlot::Legs => item.is(ItemCategory::Leggings),
                ArmorSlot::Feet => item.is(ItemCategory::Boots),
                ArmorSlot::Offhand => item.is(ItemCategory::Shield),
            },
            ItemCondition::Curio(CurioType::Ring) => item.is(ItemCategory::Ring),
            ItemCondition::Curio(CurioType::Necklace) => item.is(ItemCategory::Necklace),
            ItemCondition::Curio(CurioType::Quiver) => item.is(ItemCategory::Quiver),
            ItemCondition::Equipment => item.is_equipment(),
            ItemCondition::Axe => item.is(ItemCategory::Axe),
            ItemCondition::Pickaxe => item.is(ItemCategory::Pickaxe),
            ItemCondition::Food => item.is(ItemCategory::Food),
            ItemCondition::Jewelry => item.is_jewelry(),
            ItemCondition::Potion(potion) => {
                item.is(ItemCategory::Potion)
                    && match potion {
                        PotionType::Any => true,
                        PotionType::Beneficial => {
                            item.potion_effects.contains(&EffectCategory::Beneficial)
                        }
                        PotionType::Harmful => item.potion_effects.contains(&EffectCategory::Harmful),
                        PotionType::Neutral => item.potion_effects.contains(&EffectCategory::Neutral),
                    }
            }
        }
    }

    /// Translation sub-key of parameterized conditions.
    pub fn sub_key(&self) -> Option<&'static str> {
        match self {
            ItemCondition::Weapon(weapon) => Some(weapon.name()),
            ItemCondition::Armor(slot) => Some(slot.name()),
            ItemCondition::Curio(curio) => Some(curio.name()),
            ItemCondition::Potion(potion) => Some(potion.name()),
            _ => None,
        }
    }

    pub(crate) fn builtin_registry() -> Result<Registry<Self>, CodecError> {
        Ok(Registry::<Self>::builder()
            .register(
                "skilltree:weapon",
                ItemConditionKind::Weapon,
                |r, _| Ok(ItemCondition::Weapon(read_ordinal(r)?)),
                |t, _| Ok(ItemCondition::Weapon(load_ordinal(t, "weapon_type")?)),
            )?
            .register(
                "skilltree:armor",
                ItemConditionKind::Armor,
                |r, _| Ok(ItemCondition::Armor(read_ordinal(r)?)),
                |t, _| Ok(ItemCondition::Armor(load_ordinal(t, "slot")?)),
            )?
            .register(
                "skilltree:curio",
                ItemConditionKind::Curio,
                |r, _| Ok(ItemCondition::Curio(read_ordinal(r)?)),
                |t, _| Ok(ItemCondition::Curio(load_ordinal(t, "curio_type")?)),
            )?
            .register(
                "skilltree:equipment",
                ItemConditionKind::Equipment,
                |_, _| Ok(ItemCondition::Equipment),
                |_, _| Ok(ItemCondition::Equipment),
            )?
            .register(
                "skilltree:axe",
                ItemConditionKind::Axe,
                |_, _| Ok(ItemCondition::Axe),
                |_, _| Ok(ItemCondition::Axe),
            )?
            .register(
                "skilltree:pickaxe",
                ItemConditionKind::Pickaxe,
                |_, _| Ok(ItemCondition::Pickaxe),
                |_, _| Ok(ItemCondition::Pickaxe),
            )?
            .register(
                "skilltree:food",
                ItemConditionKind::Food,
                |_, _| Ok(ItemCondition::Food),
                |_, _| Ok(ItemCondition::Food),
            )?
            .register(
                "skilltree:jewelry",
                ItemConditionKind::Jewelry,
                |_, _| Ok(ItemCondition::Jewelry),
                |_, _| Ok(ItemCondition::Jewelry),
            )?
            .register(
                "skilltree:potion",
                ItemConditionKind::Potion,
                |r, _| Ok(ItemCondition::Potion(read_ordinal(r)?)),
                |t, _| Ok(ItemCondition::Potion(load_ordinal(t, "potion_type")?)),
            )?
            .build())
    }
}

impl Family for ItemCondition {
    type Kind = ItemConditionKind;
    const FAMILY: &'static str = "item_condition";

    fn registry(registries: &Registries) -> &Registry<Self> {
        &registries.item_conditions
    }

    fn kind(&self) -> ItemConditionKind {
        match self {
            ItemCondition::Weapon(_) => ItemConditionKind::Weapon,
            ItemCondition::Armor(_) => ItemConditionKind::Armor,
            ItemCondition::Curio(_) => ItemConditionKind::Curio,
            ItemCondition::Equipment => ItemConditionKind::Equipment,
            ItemCondition::Axe => ItemConditionKind::Axe,
            ItemCondition::Pickaxe => ItemConditionKind::Pickaxe,
            ItemCondition::Food => ItemConditionKind::Food,
            ItemCondition::Jewelry => ItemConditionKind::Jewelry,
            ItemCondition::Potion(_) => ItemConditionKind::Potion,
        }
    }

    fn write_payload(&self, writer: &mut WireWriter, _: &Registries) -> Result<(), CodecError> {
        match *self {
            ItemCondition::Weapon(weapon) => write_ordinal(writer, weapon),
            ItemCondition::Armor(slot) => write_ordinal(writer, slot),
            ItemCondition::Curio(curio) => write_ordinal(writer, curio),
            ItemCondition::Potion(potion) => write_ordinal(writer, potion),
            _ => {}
        }
        Ok(())
    }

    fn save_payload(&self, tag: &mut CompoundTag, _: &Registries) -> Result<(), CodecError> {
        match *self {
            ItemCondition::Weapon(weapon) => save_ordinal(tag, "weapon_type", weapon),
            ItemCondition::Armor(slot) => save_ordinal(tag, "slot", slot),
            ItemCondition::Curio(curio) => save_ordinal(tag, "curio_type", curio),
            ItemCondition::Potion(potion) => save_ordinal(tag, "potion_type", potion),
            _ => {}
        }
        Ok(())
    }
}
