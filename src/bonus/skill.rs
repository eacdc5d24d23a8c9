use super::ItemBonus;
use crate::codec::{
    load_nested, load_optional, load_ordinal, read_optional, read_ordinal, read_value, save_nested,
    save_optional, save_ordinal, write_optional, write_ordinal, write_value,
};
use crate::condition::{DamageCondition, EnchantmentCondition, ItemCondition, LivingCondition};
use crate::context::{DamageSource, ItemProfile, LivingSnapshot};
use crate::error::CodecError;
use crate::id::ResourceId;
use crate::item::ItemData;
use crate::merge::Mergeable;
use crate::multiplier::BonusMultiplier;
use crate::operation::Operation;
use crate::registry::{Family, Registries, Registry};
use crate::tag::CompoundTag;
use crate::wire::{WireReader, WireWriter};

/// Shared payload of the damage, crit damage and crit chance bonuses.
///
/// # Examples
///
/// ```rust
/// use skilltree::bonus::CombatBonus;
/// use skilltree::condition::DamageCondition;
/// use skilltree::context::{DamageSource, LivingSnapshot};
/// use skilltree::Operation;
///
/// let mut bonus = CombatBonus::new(0.1, Operation::MultiplyBase);
/// bonus.damage_condition = Some(DamageCondition::Projectile);
///
/// let player = LivingSnapshot::default();
/// let arrow = DamageSource { projectile: true, melee: false };
/// assert!(bonus.applies(&player, None, &arrow));
/// assert!(!bonus.applies(&player, None, &DamageSource::default()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CombatBonus {
    pub amount: f32,
    pub operation: Operation,
    pub player_condition: Option<LivingCondition>,
    pub target_condition: Option<LivingCondition>,
    pub damage_condition: Option<DamageCondition>,
    pub multiplier: Option<BonusMultiplier>,
}

impl CombatBonus {
    pub fn new(amount: f32, operation: Operation) -> Self {
        Self {
            amount,
            operation,
            player_condition: None,
            target_condition: None,
            damage_condition: None,
            multiplier: None,
        }
    }

    /// Whether every present condition holds for this hit.
    pub fn applies(
        &self,
        player: &LivingSnapshot,
        target: Option<&LivingSnapshot>,
        source: &DamageSource,
    ) -> bool {
        self.player_condition
            .as_ref()
            .map_or(true, |condition| condition.met(player, target))
            && self
                .target_condition
                .as_ref()
                .map_or(true, |condition| condition.met(player, target))
            && self
                .damage_condition
                .as_ref()
                .map_or(true, |condition| condition.met(source))
    }

    /// The amount scaled by the multiplier, if any.
    pub fn effective_amount(&self, player: &LivingSnapshot) -> f32 {
        match &self.multiplier {
            Some(multiplier) => self.amount * multiplier.value(player),
            None => self.amount,
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.operation == other.operation
            && self.player_condition == other.player_condition
            && self.target_condition == other.target_condition
            && self.damage_condition == other.damage_condition
            && self.multiplier == other.multiplier
    }

    fn merge(&self, other: &Self) -> Option<Self> {
        self.same_shape(other).then(|| Self {
            amount: self.amount + other.amount,
            ..self.clone()
        })
    }

    fn write(&self, writer: &mut WireWriter, registries: &Registries) -> Result<(), CodecError> {
        writer.write_float(self.amount);
        write_ordinal(writer, self.operation);
        write_optional(writer, registries, self.player_condition.as_ref())?;
        write_optional(writer, registries, self.target_condition.as_ref())?;
        write_optional(writer, registries, self.damage_condition.as_ref())?;
        write_optional(writer, registries, self.multiplier.as_ref())
    }

    fn read(reader: &mut WireReader, registries: &Registries) -> Result<Self, CodecError> {
        Ok(Self {
            amount: reader.read_float()?,
            operation: read_ordinal(reader)?,
            player_condition: read_optional(reader, registries)?,
            target_condition: read_optional(reader, registries)?,
            damage_condition: read_optional(reader, registries)?,
            multiplier: read_optional(reader, registries)?,
        })
    }

    fn save(&self, tag: &mut CompoundTag, registries: &Registries) -> Result<(), CodecError> {
        tag.put_f32("amount", self.amount);
        save_ordinal(tag, "operation", self.operation);
        save_optional(tag, "player_condition", registries, self.player_condition.as_ref())?;
        save_optional(tag, "target_condition", registries, self.target_condition.as_ref())?;
        save_optional(tag, "damage_condition", registries, self.damage_condition.as_ref())?;
        save_optional(tag, "multiplier", registries, self.multiplier.as_ref())
    }

    fn load(tag: &CompoundTag, registries: &Registries) -> Result<Self, CodecError> {
        Ok(Self {
            amount: tag.get_f32("amount")?,
            operation: load_ordinal(tag, "operation")?,
            player_condition: load_optional(tag, "player_condition", registries)?,
            target_condition: load_optional(tag, "target_condition", registries)?,
            damage_condition: load_optional(tag, "damage_condition", registries)?,
            multiplier: load_optional(tag, "multiplier", registries)?,
        })
    }
}

/// A named attribute modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeModifier {
    pub name: String,
    pub amount: f64,
    pub operation: Operation,
}

impl AttributeModifier {
    pub fn new(name: impl Into<String>, amount: f64, operation: Operation) -> Self {
        Self {
            name: name.into(),
            amount,
            operation,
        }
    }

    pub fn write(&self, writer: &mut WireWriter) -> Result<(), CodecError> {
        writer.write_utf(&self.name)?;
        writer.write_double(self.amount);
        write_ordinal(writer, self.operation);
        Ok(())
    }

    pub fn read(reader: &mut WireReader) -> Result<Self, CodecError> {
        Ok(Self {
            name: reader.read_utf()?,
            amount: reader.read_double()?,
            operation: read_ordinal(reader)?,
        })
    }

    fn save(&self) -> CompoundTag {
        let mut tag = CompoundTag::new();
        tag.put_string("name", self.name.as_str());
        tag.put_f64("amount", self.amount);
        save_ordinal(&mut tag, "operation", self.operation);
        tag
    }

    fn load(tag: &CompoundTag) -> Result<Self, CodecError> {
        Ok(Self {
            name: tag.get_string("name")?.to_string(),
            amount: tag.get_f64("amount")?,
            operation: load_ordinal(tag, "operation")?,
        })
    }
}

/// A bonus granted by a learned passive skill.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillBonus {
    Damage(CombatBonus),
    CritDamage(CombatBonus),
    CritChance(CombatBonus),
    Attribute {
        attribute: ResourceId,
        modifier: AttributeModifier,
        player_condition: Option<LivingCondition>,
        multiplier: Option<BonusMultiplier>,
    },
    /// Applies `bonus` to crafted or brewed items matching `item`.
    CraftedItem {
        item: ItemCondition,
        bonus: ItemBonus,
    },
    GemPower {
        amount: f32,
        item: ItemCondition,
    },
    PlayerSockets {
        sockets: i32,
        item: ItemCondition,
    },
    BlockBreakSpeed {
        amount: f32,
        player_condition: Option<LivingCondition>,
    },
    RepairEfficiency {
        amount: f32,
        item: ItemCondition,
    },
    EnchantmentAmplification {
        amount: f32,
        enchantment: EnchantmentCondition,
    },
    EnchantmentRequirement {
        amount: f32,
        enchantment: EnchantmentCondition,
    },
    FreeEnchantment {
        amount: f32,
        enchantment: EnchantmentCondition,
    },
    RecipeUnlock {
        recipe: ResourceId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillBonusKind {
    Damage,
    CritDamage,
    CritChance,
    Attribute,
    CraftedItem,
    GemPower,
    PlayerSockets,
    BlockBreakSpeed,
    RepairEfficiency,
    EnchantmentAmplification,
    EnchantmentRequirement,
    FreeEnchantment,
    RecipeUnlock,
}

impl SkillBonus {
    pub fn amount(&self) -> f32 {
        match self {
            SkillBonus::Damage(combat)
            | SkillBonus::CritDamage(combat)
            | SkillBonus::CritChance(combat) => combat.amount,
            SkillBonus::Attribute { modifier, .. } => modifier.amount as f32,
            SkillBonus::CraftedItem { bonus, .. } => bonus.amount(),
            SkillBonus::PlayerSockets { sockets, .. } => *sockets as f32,
            SkillBonus::GemPower { amount, .. }
            | SkillBonus::BlockBreakSpeed { amount, .. }
            | SkillBonus::RepairEfficiency { amount, .. }
            | SkillBonus::EnchantmentAmplification { amount, .. }
            | SkillBonus::EnchantmentRequirement { amount, .. }
            | SkillBonus::FreeEnchantment { amount, .. } => *amount,
            SkillBonus::RecipeUnlock { .. } => 0.0,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            SkillBonus::Damage(combat)
            | SkillBonus::CritDamage(combat)
            | SkillBonus::CritChance(combat) => combat.operation,
            SkillBonus::Attribute { modifier, .. } => modifier.operation,
            SkillBonus::CraftedItem { bonus, .. } => bonus.operation(),
            _ => Operation::Add,
        }
    }

    /// Apply a crafted-item bonus to a freshly crafted or brewed item.
    ///
    /// Returns whether the item was changed. Other kinds, and items the
    /// condition rejects, are left alone.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skilltree::bonus::SkillBonus;
    /// use skilltree::condition::PotionType;
    /// use skilltree::context::{EffectCategory, ItemProfile};
    /// use skilltree::item::ItemData;
    /// use skilltree::{ItemBonus, ItemCondition, Registries, ResourceId};
    ///
    /// let registries = Registries::builtin().unwrap();
    /// let bonus = SkillBonus::CraftedItem {
    ///     item: ItemCondition::Potion(PotionType::Beneficial),
    ///     bonus: ItemBonus::PotionDuration { amount: 0.25 },
    /// };
    /// let potion = ItemProfile::new(ResourceId::parse("potion").unwrap())
    ///     .with_potion_effect(EffectCategory::Beneficial);
    ///
    /// let mut data = ItemData::new();
    /// assert!(bonus.item_crafted(&mut data, &potion, &registries).unwrap());
    /// assert_eq!(
    ///     data.item_bonuses(&registries),
    ///     vec![ItemBonus::PotionDuration { amount: 0.25 }]
    /// );
    /// ```
    pub fn item_crafted(
        &self,
        item: &mut ItemData,
        profile: &ItemProfile,
        registries: &Registries,
    ) -> Result<bool, CodecError> {
        match self {
            SkillBonus::CraftedItem {
                item: condition,
                bonus,
            } if condition.met(profile) => {
                item.add_item_bonus(bonus.clone(), registries)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub(crate) fn builtin_registry() -> Result<Registry<Self>, CodecError> {
        Ok(Registry::<Self>::builder()
            .register(
                "skilltree:damage",
                SkillBonusKind::Damage,
                |r, reg| Ok(SkillBonus::Damage(CombatBonus::read(r, reg)?)),
                |t, reg| Ok(SkillBonus::Damage(CombatBonus::load(t, reg)?)),
            )?
            .register(
                "skilltree:crit_damage",
                SkillBonusKind::CritDamage,
                |r, reg| Ok(SkillBonus::CritDamage(CombatBonus::read(r, reg)?)),
                |t, reg| Ok(SkillBonus::CritDamage(CombatBonus::load(t, reg)?)),
            )?
            .register(
                "skilltree:crit_chance",
                SkillBonusKind::CritChance,
                |r, reg| Ok(SkillBonus::CritChance(CombatBonus::read(r, reg)?)),
                |t, reg| Ok(SkillBonus::CritChance(CombatBonus::load(t, reg)?)),
            )?
            .register(
                "skilltree:attribute",
                SkillBonusKind::Attribute,
                |r, reg| {
                    Ok(SkillBonus::Attribute {
                        attribute: r.read_id()?,
                        modifier: AttributeModifier::read(r)?,
                        player_condition: read_optional(r, reg)?,
                        multiplier: read_optional(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::Attribute {
                        attribute: t.get_id("attribute")?,
                        modifier: AttributeModifier::load(&t.get_compound("modifier")?)?,
                        player_condition: load_optional(t, "player_condition", reg)?,
                        multiplier: load_optional(t, "multiplier", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:crafted_item_bonus",
                SkillBonusKind::CraftedItem,
                |r, reg| {
                    Ok(SkillBonus::CraftedItem {
                        item: read_value(r, reg)?,
                        bonus: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::CraftedItem {
                        item: load_nested(t, "item_condition", reg)?,
                        bonus: load_nested(t, "bonus", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:gem_power",
                SkillBonusKind::GemPower,
                |r, reg| {
                    Ok(SkillBonus::GemPower {
                        amount: r.read_float()?,
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::GemPower {
                        amount: t.get_f32("amount")?,
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:player_sockets",
                SkillBonusKind::PlayerSockets,
                |r, reg| {
                    Ok(SkillBonus::PlayerSockets {
                        sockets: r.read_int()?,
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::PlayerSockets {
                        sockets: t.get_i32("sockets")?,
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:block_break_speed",
                SkillBonusKind::BlockBreakSpeed,
                |r, reg| {
                    Ok(SkillBonus::BlockBreakSpeed {
                        amount: r.read_float()?,
                        player_condition: read_optional(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::BlockBreakSpeed {
                        amount: t.get_f32("amount")?,
                        player_condition: load_optional(t, "player_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:repair_efficiency",
                SkillBonusKind::RepairEfficiency,
                |r, reg| {
                    Ok(SkillBonus::RepairEfficiency {
                        amount: r.read_float()?,
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::RepairEfficiency {
                        amount: t.get_f32("amount")?,
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:enchantment_amplification",
                SkillBonusKind::EnchantmentAmplification,
                |r, reg| {
                    Ok(SkillBonus::EnchantmentAmplification {
                        amount: r.read_float()?,
                        enchantment: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::EnchantmentAmplification {
                        amount: t.get_f32("amount")?,
                        enchantment: load_nested(t, "enchantment_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:enchantment_requirement",
                SkillBonusKind::EnchantmentRequirement,
                |r, reg| {
                    Ok(SkillBonus::EnchantmentRequirement {
                        amount: r.read_float()?,
                        enchantment: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::EnchantmentRequirement {
                        amount: t.get_f32("amount")?,
                        enchantment: load_nested(t, "enchantment_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:free_enchantment",
                SkillBonusKind::FreeEnchantment,
                |r, reg| {
                    Ok(SkillBonus::FreeEnchantment {
                        amount: r.read_float()?,
                        enchantment: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(SkillBonus::FreeEnchantment {
                        amount: t.get_f32("amount")?,
                        enchantment: load_nested(t, "enchantment_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:recipe_unlock",
                SkillBonusKind::RecipeUnlock,
                |r, _| {
                    Ok(SkillBonus::RecipeUnlock {
                        recipe: r.read_id()?,
                    })
                },
                |t, _| {
                    Ok(SkillBonus::RecipeUnlock {
                        recipe: t.get_id("recipe")?,
                    })
                },
            )?
            .build())
    }
}

impl Mergeable for SkillBonus {
    fn merge(&self, other: &Self) -> Option<Self> {
        use SkillBonus::*;
        match (self, other) {
            (Damage(a), Damage(b)) => a.merge(b).map(Damage),
            (CritDamage(a), CritDamage(b)) => a.merge(b).map(CritDamage),
            (CritChance(a), CritChance(b)) => a.merge(b).map(CritChance),
            (
                Attribute {
                    attribute,
                    modifier,
                    player_condition,
                    multiplier,
                },
                Attribute {
                    attribute: other_attribute,
                    modifier: other_modifier,
                    player_condition: other_player_condition,
                    multiplier: other_multiplier,
                },
            ) if attribute == other_attribute
                && modifier.name == other_modifier.name
                && modifier.operation == other_modifier.operation
                && player_condition == other_player_condition
                && multiplier == other_multiplier =>
            {
                Some(Attribute {
                    attribute: attribute.clone(),
                    modifier: AttributeModifier {
                        amount: modifier.amount + other_modifier.amount,
                        ..modifier.clone()
                    },
                    player_condition: player_condition.clone(),
                    multiplier: multiplier.clone(),
                })
            }
            (
                CraftedItem { item, bonus },
                CraftedItem {
                    item: other_item,
                    bonus: other_bonus,
                },
            ) if item == other_item => bonus.merge(other_bonus).map(|bonus| CraftedItem {
                item: *item,
                bonus,
            }),
            (
                GemPower { amount, item },
                GemPower {
                    amount: other_amount,
                    item: other_item,
                },
            ) if item == other_item => Some(GemPower {
                amount: amount + other_amount,
                item: *item,
            }),
            (
                PlayerSockets { sockets, item },
                PlayerSockets {
                    sockets: other_sockets,
                    item: other_item,
                },
            ) if item == other_item => Some(PlayerSockets {
                sockets: sockets + other_sockets,
                item: *item,
            }),
            (
                BlockBreakSpeed {
                    amount,
                    player_condition,
                },
                BlockBreakSpeed {
                    amount: other_amount,
                    player_condition: other_player_condition,
                },
            ) if player_condition == other_player_condition => Some(BlockBreakSpeed {
                amount: amount + other_amount,
                player_condition: player_condition.clone(),
            }),
            (
                RepairEfficiency { amount, item },
                RepairEfficiency {
                    amount: other_amount,
                    item: other_item,
                },
            ) if item == other_item => Some(RepairEfficiency {
                amount: amount + other_amount,
                item: *item,
            }),
            (
                EnchantmentAmplification {
                    amount,
                    enchantment,
                },
                EnchantmentAmplification {
                    amount: other_amount,
                    enchantment: other_enchantment,
                },
            ) if enchantment == other_enchantment => Some(EnchantmentAmplification {
                amount: amount + other_amount,
                enchantment: *enchantment,
            }),
            (
                EnchantmentRequirement {
                    amount,
                    enchantment,
                },
                EnchantmentRequirement {
                    amount: other_amount,
                    enchantment: other_enchantment,
                },
            ) if enchantment == other_enchantment => Some(EnchantmentRequirement {
                amount: amount + other_amount,
                enchantment: *enchantment,
            }),
            (
                FreeEnchantment {
                    amount,
                    enchantment,
                },
                FreeEnchantment {
                    amount: other_amount,
                    enchantment: other_enchantment,
                },
            ) if enchantment == other_enchantment => Some(FreeEnchantment {
                amount: amount + other_amount,
                enchantment: *enchantment,
            }),
            _ => None,
        }
    }
}

impl Family for SkillBonus {
    type Kind = SkillBonusKind;
    const FAMILY: &'static str = "skill_bonus";

    fn registry(registries: &Registries) -> &Registry<Self> {
        &registries.skill_bonuses
    }

    fn kind(&self) -> SkillBonusKind {
        match self {
            SkillBonus::Damage(_) => SkillBonusKind::Damage,
            SkillBonus::CritDamage(_) => SkillBonusKind::CritDamage,
            SkillBonus::CritChance(_) => SkillBonusKind::CritChance,
            SkillBonus::Attribute { .. } => SkillBonusKind::Attribute,
            SkillBonus::CraftedItem { .. } => SkillBonusKind::CraftedItem,
            SkillBonus::GemPower { .. } => SkillBonusKind::GemPower,
            SkillBonus::PlayerSockets { .. } => SkillBonusKind::PlayerSockets,
            SkillBonus::BlockBreakSpeed { .. } => SkillBonusKind::BlockBreakSpeed,
            SkillBonus::RepairEfficiency { .. } => SkillBonusKind::RepairEfficiency,
            SkillBonus::EnchantmentAmplification { .. } => {
                SkillBonusKind::EnchantmentAmplification
            }
            SkillBonus::EnchantmentRequirement { .. } => SkillBonusKind::EnchantmentRequirement,
            SkillBonus::FreeEnchantment { .. } => SkillBonusKind::FreeEnchantment,
            SkillBonus::RecipeUnlock { .. } => SkillBonusKind::RecipeUnlock,
        }
    }

    fn write_payload(
        &self,
        writer: &mut WireWriter,
        registries: &Registries,
    ) -> Result<(), CodecError> {
        match self {
            SkillBonus::Damage(combat)
            | SkillBonus::CritDamage(combat)
            | SkillBonus::CritChance(combat) => combat.write(writer, registries),
            SkillBonus::Attribute {
                attribute,
                modifier,
                player_condition,
                multiplier,
            } => {
                writer.write_id(attribute)?;
                modifier.write(writer)?;
                write_optional(writer, registries, player_condition.as_ref())?;
                write_optional(writer, registries, multiplier.as_ref())
            }
            SkillBonus::CraftedItem { item, bonus } => {
                write_value(writer, registries, item)?;
                write_value(writer, registries, bonus)
            }
            SkillBonus::GemPower { amount, item }
            | SkillBonus::RepairEfficiency { amount, item } => {
                writer.write_float(*amount);
                write_value(writer, registries, item)
            }
            SkillBonus::PlayerSockets { sockets, item } => {
                writer.write_int(*sockets);
                write_value(writer, registries, item)
            }
            SkillBonus::BlockBreakSpeed {
                amount,
                player_condition,
            } => {
                writer.write_float(*amount);
                write_optional(writer, registries, player_condition.as_ref())
            }
            SkillBonus::EnchantmentAmplification {
                amount,
                enchantment,
            }
            | SkillBonus::EnchantmentRequirement {
                amount,
                enchantment,
            }
            | SkillBonus::FreeEnchantment {
                amount,
                enchantment,
            } => {
                writer.write_float(*amount);
                write_value(writer, registries, enchantment)
            }
            SkillBonus::RecipeUnlock { recipe } => writer.write_id(recipe),
        }
    }

    fn save_payload(&self, tag: &mut CompoundTag, registries: &Registries) -> Result<(), CodecError> {
        match self {
            SkillBonus::Damage(combat)
            | SkillBonus::CritDamage(combat)
            | SkillBonus::CritChance(combat) => combat.save(tag, registries),
            SkillBonus::Attribute {
                attribute,
                modifier,
                player_condition,
                multiplier,
            } => {
                tag.put_id("attribute", attribute);
                tag.put_compound("modifier", modifier.save());
                save_optional(tag, "player_condition", registries, player_condition.as_ref())?;
                save_optional(tag, "multiplier", registries, multiplier.as_ref())
            }
            SkillBonus::CraftedItem { item, bonus } => {
                save_nested(tag, "item_condition", registries, item)?;
                save_nested(tag, "bonus", registries, bonus)
            }
            SkillBonus::GemPower { amount, item }
            | SkillBonus::RepairEfficiency { amount, item } => {
                tag.put_f32("amount", *amount);
                save_nested(tag, "item_condition", registries, item)
            }
            SkillBonus::PlayerSockets { sockets, item } => {
                tag.put_i32("sockets", *sockets);
                save_nested(tag, "item_condition", registries, item)
            }
            SkillBonus::BlockBreakSpeed {
                amount,
                player_condition,
            } => {
                tag.put_f32("amount", *amount);
                save_optional(tag, "player_condition", registries, player_condition.as_ref())
            }
            SkillBonus::EnchantmentAmplification {
                amount,
                enchantment,
            }
            | SkillBonus::EnchantmentRequirement {
                amount,
                enchantment,
            }
            | SkillBonus::FreeEnchantment {
                amount,
                enchantment,
            } => {
                tag.put_f32("amount", *amount);
                save_nested(tag, "enchantment_condition", registries, enchantment)
            }
            SkillBonus::RecipeUnlock { recipe } => {
                tag.put_id("recipe", recipe);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{load_value, read_value, save_value};
    use crate::condition::{LivingTarget, Threshold, WeaponType};
    use crate::context::ItemCategory;

    fn registries() -> Registries {
        Registries::builtin().unwrap()
    }

    fn id(s: &str) -> ResourceId {
        ResourceId::parse(s).unwrap()
    }

    fn armor_bonus(name: &str, amount: f64) -> SkillBonus {
        SkillBonus::Attribute {
            attribute: id("generic.armor"),
            modifier: AttributeModifier::new(name, amount, Operation::Add),
            player_condition: None,
            multiplier: None,
        }
    }

    #[test]
    fn test_combat_bonus_merge_requires_same_conditions() {
        let plain = SkillBonus::Damage(CombatBonus::new(0.1, Operation::MultiplyBase));
        let mut conditioned = CombatBonus::new(0.1, Operation::MultiplyBase);
        conditioned.player_condition = Some(LivingCondition::IsBurning {
            target: LivingTarget::You,
        });
        assert_eq!(plain.merge(&SkillBonus::Damage(conditioned)), None);

        let crit = SkillBonus::CritDamage(CombatBonus::new(0.1, Operation::MultiplyBase));
        assert_eq!(plain.merge(&crit), None);
    }

    #[test]
    fn test_attribute_merge_requires_same_modifier_name() {
        let merged = armor_bonus("Skill Tree Armor", 2.0)
            .merge(&armor_bonus("Skill Tree Armor", 3.0))
            .unwrap();
        assert_eq!(merged, armor_bonus("Skill Tree Armor", 5.0));

        assert_eq!(
            armor_bonus("Skill Tree Armor", 2.0).merge(&armor_bonus("Other", 3.0)),
            None
        );
    }

    #[test]
    fn test_crafted_item_merges_inner_bonus() {
        let crafted = |amount| SkillBonus::CraftedItem {
            item: ItemCondition::Food,
            bonus: ItemBonus::FoodHealing { amount },
        };
        assert_eq!(crafted(1.0).merge(&crafted(2.0)), Some(crafted(3.0)));

        let weapon = SkillBonus::CraftedItem {
            item: ItemCondition::Weapon(WeaponType::Any),
            bonus: ItemBonus::FoodHealing { amount: 1.0 },
        };
        assert_eq!(crafted(1.0).merge(&weapon), None);
    }

    #[test]
    fn test_recipe_unlock_never_merges() {
        let unlock = SkillBonus::RecipeUnlock {
            recipe: id("skilltree:copper_ring"),
        };
        assert!(!unlock.can_merge(&unlock.clone()));
        assert_eq!(unlock.amount(), 0.0);
    }

    #[test]
    fn test_effective_amount_with_multiplier() {
        let mut combat = CombatBonus::new(0.05, Operation::MultiplyBase);
        combat.multiplier = Some(BonusMultiplier::EffectAmount);
        let player = LivingSnapshot {
            effects: vec![id("speed"), id("strength")],
            ..Default::default()
        };
        assert_eq!(combat.effective_amount(&player), 0.1);
    }

    #[test]
    fn test_target_condition_needs_target() {
        let mut combat = CombatBonus::new(1.0, Operation::Add);
        combat.target_condition = Some(LivingCondition::HealthPercentage {
            target: LivingTarget::Target,
            threshold: Threshold::at_most(0.5),
        });
        let player = LivingSnapshot::default();
        let wounded = LivingSnapshot {
            health: 2.0,
            max_health: 20.0,
            ..Default::default()
        };
        let hit = DamageSource::default();
        assert!(!combat.applies(&player, None, &hit));
        assert!(combat.applies(&player, Some(&wounded), &hit));
    }

    #[test]
    fn test_crafted_item_skips_other_items() {
        let registries = registries();
        let bonus = SkillBonus::CraftedItem {
            item: ItemCondition::Food,
            bonus: ItemBonus::FoodSaturation { amount: 0.5 },
        };
        let sword = ItemProfile::new(id("iron_sword")).with(ItemCategory::MeleeWeapon);
        let mut data = ItemData::new();
        assert!(!bonus.item_crafted(&mut data, &sword, &registries).unwrap());
        assert!(data.item_bonuses(&registries).is_empty());
    }

    #[test]
    fn test_fully_conditioned_bonus_both_forms() {
        let registries = registries();
        let mut combat = CombatBonus::new(0.2, Operation::MultiplyTotal);
        combat.player_condition = Some(LivingCondition::HasEffect {
            target: LivingTarget::You,
            effect: id("strength"),
        });
        combat.damage_condition = Some(DamageCondition::Melee);
        combat.multiplier = Some(BonusMultiplier::GemsAmount {
            item: ItemCondition::Jewelry,
        });
        let bonus = SkillBonus::CritChance(combat);

        let tag = save_value(&registries, &bonus).unwrap();
        assert!(!tag.contains("target_condition"));
        assert_eq!(load_value::<SkillBonus>(&tag, &registries).unwrap(), bonus);

        let mut writer = WireWriter::new();
        write_value(&mut writer, &registries, &bonus).unwrap();
        let mut reader = WireReader::new(writer.freeze());
        assert_eq!(read_value::<SkillBonus>(&mut reader, &registries).unwrap(), bonus);
        assert_eq!(reader.remaining(), 0);
    }
}
