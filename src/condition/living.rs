use super::{ItemCondition, Threshold};
use crate::codec::{
    load_nested, load_ordinal, read_ordinal, read_value, save_nested, save_ordinal, write_ordinal,
    write_value, Ordinal,
};
use crate::context::LivingSnapshot;
use crate::error::CodecError;
use crate::id::ResourceId;
use crate::registry::{Family, Registries, Registry};
use crate::tag::CompoundTag;
use crate::wire::WireWriter;

/// Which entity a living condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LivingTarget {
    You,
    Target,
}

impl Ordinal for LivingTarget {
    const WHAT: &'static str = "living target";
    const VALUES: &'static [Self] = &[LivingTarget::You, LivingTarget::Target];

    fn name(self) -> &'static str {
        match self {
            LivingTarget::You => "you",
            LivingTarget::Target => "target",
        }
    }
}

impl LivingTarget {
    pub fn sub_key(self) -> &'static str {
        match self {
            LivingTarget::You => "target.you",
            LivingTarget::Target => "target.target",
        }
    }

    fn pick<'a>(
        self,
        player: &'a LivingSnapshot,
        target: Option<&'a LivingSnapshot>,
    ) -> Option<&'a LivingSnapshot> {
        match self {
            LivingTarget::You => Some(player),
            LivingTarget::Target => target,
        }
    }
}

/// Predicate over the player or the entity they are fighting.
///
/// # Examples
///
/// ```rust
/// use skilltree::condition::{LivingCondition, LivingTarget, Threshold};
/// use skilltree::context::LivingSnapshot;
///
/// let wounded = LivingCondition::HealthPercentage {
///     target: LivingTarget::You,
///     threshold: Threshold::at_most(0.5),
/// };
/// let player = LivingSnapshot { health: 4.0, max_health: 20.0, ..Default::default() };
/// assert!(wounded.met(&player, None));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum LivingCondition {
    EffectAmount {
        target: LivingTarget,
        threshold: Threshold,
    },
    HealthPercentage {
        target: LivingTarget,
        threshold: Threshold,
    },
    HasEnchantedItem {
        target: LivingTarget,
        item: ItemCondition,
    },
    HasItemEquipped {
        target: LivingTarget,
        item: ItemCondition,
    },
    HasGems {
        target: LivingTarget,
        threshold: Threshold,
        item: ItemCondition,
    },
    HasEffect {
        target: LivingTarget,
        effect: ResourceId,
    },
    IsBurning {
        target: LivingTarget,
    },
    AttributeValue {
        target: LivingTarget,
        attribute: ResourceId,
        threshold: Threshold,
    },
    FoodLevel {
        target: LivingTarget,
        threshold: Threshold,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LivingConditionKind {
    EffectAmount,
    HealthPercentage,
    HasEnchantedItem,
    HasItemEquipped,
    HasGems,
    HasEffect,
    IsBurning,
    AttributeValue,
    FoodLevel,
}

impl LivingCondition {
    pub fn target(&self) -> LivingTarget {
        match self {
            LivingCondition::EffectAmount { target, .. }
            | LivingCondition::HealthPercentage { target, .. }
            | LivingCondition::HasEnchantedItem { target, .. }
            | LivingCondition::HasItemEquipped { target, .. }
            | LivingCondition::HasGems { target, .. }
            | LivingCondition::HasEffect { target, .. }
            | LivingCondition::IsBurning { target }
            | LivingCondition::AttributeValue { target, .. }
            | LivingCondition::FoodLevel { target, .. } => *target,
        }
    }

    pub fn threshold(&self) -> Option<Threshold> {
        match self {
            LivingCondition::EffectAmount { threshold, .. }
            | LivingCondition::HealthPercentage { threshold, .. }
            | LivingCondition::HasGems { threshold, .. }
            | LivingCondition::AttributeValue { threshold, .. }
            | LivingCondition::FoodLevel { threshold, .. } => Some(*threshold),
            _ => None,
        }
    }

    /// Whether the condition holds. A condition on the target is never
    /// met when there is no target.
    pub fn met(&self, player: &LivingSnapshot, target: Option<&LivingSnapshot>) -> bool {
        let Some(entity) = self.target().pick(player, target) else {
            return false;
        };
        match self {
            LivingCondition::EffectAmount { threshold, .. } => {
                threshold.contains(entity.effects.len() as f32)
            }
            LivingCondition::HealthPercentage { threshold, .. } => {
                threshold.contains(entity.health_percentage())
            }
            LivingCondition::HasEnchantedItem { item, .. } => entity
                .equipment
                .iter()
                .any(|equipped| equipped.is_enchanted() && item.met(&equipped.profile)),
            LivingCondition::HasItemEquipped { item, .. } => entity
                .equipment
                .iter()
                .any(|equipped| item.met(&equipped.profile)),
            LivingCondition::HasGems {
                threshold, item, ..
            } => {
                let gems: u32 = entity
                    .equipment
                    .iter()
                    .filter(|equipped| item.met(&equipped.profile))
                    .map(|equipped| equipped.gems)
                    .sum();
                threshold.contains(gems as f32)
            }
            LivingCondition::HasEffect { effect, .. } => entity.has_effect(effect),
            LivingCondition::IsBurning { .. } => entity.burning,
            LivingCondition::AttributeValue {
                attribute,
                threshold,
                ..
            } => threshold.contains(entity.attribute(attribute) as f32),
            LivingCondition::FoodLevel { threshold, .. } => {
                threshold.contains(entity.food_level as f32)
            }
        }
    }

    /// Translation sub-key for the threshold shape.
    pub fn sub_key(&self) -> Option<&'static str> {
        let threshold = self.threshold()?;
        let counts = matches!(
            self,
            LivingCondition::EffectAmount { .. } | LivingCondition::HasGems { .. }
        );
        if counts && threshold.min == Some(1.0) && threshold.max.is_none() {
            return Some("min.1");
        }
        threshold.sub_key()
    }

    pub(crate) fn builtin_registry() -> Result<Registry<Self>, CodecError> {
        Ok(Registry::<Self>::builder()
            .register(
                "skilltree:effect_amount",
                LivingConditionKind::EffectAmount,
                |r, _| {
                    Ok(LivingCondition::EffectAmount {
                        target: read_ordinal(r)?,
                        threshold: Threshold::read(r)?,
                    })
                },
                |t, _| {
                    Ok(LivingCondition::EffectAmount {
                        target: load_ordinal(t, "target")?,
                        threshold: Threshold::load(t)?,
                    })
                },
            )?
            .register(
                "skilltree:health_percentage",
                LivingConditionKind::HealthPercentage,
                |r, _| {
                    Ok(LivingCondition::HealthPercentage {
                        target: read_ordinal(r)?,
                        threshold: Threshold::read(r)?,
                    })
                },
                |t, _| {
                    Ok(LivingCondition::HealthPercentage {
                        target: load_ordinal(t, "target")?,
                        threshold: Threshold::load(t)?,
                    })
                },
            )?
            .register(
                "skilltree:has_enchanted_item",
                LivingConditionKind::HasEnchantedItem,
                |r, reg| {
                    Ok(LivingCondition::HasEnchantedItem {
                        target: read_ordinal(r)?,
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(LivingCondition::HasEnchantedItem {
                        target: load_ordinal(t, "target")?,
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:has_item_equipped",
                LivingConditionKind::HasItemEquipped,
                |r, reg| {
                    Ok(LivingCondition::HasItemEquipped {
                        target: read_ordinal(r)?,
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(LivingCondition::HasItemEquipped {
                        target: load_ordinal(t, "target")?,
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:has_gems",
                LivingConditionKind::HasGems,
                |r, reg| {
                    Ok(LivingCondition::HasGems {
                        target: read_ordinal(r)?,
                        threshold: Threshold::read(r)?,
                        item: read_value(r, reg)?,
                    })
                },
                |t, reg| {
                    Ok(LivingCondition::HasGems {
                        target: load_ordinal(t, "target")?,
                        threshold: Threshold::load(t)?,
                        item: load_nested(t, "item_condition", reg)?,
                    })
                },
            )?
            .register(
                "skilltree:has_effect",
                LivingConditionKind::HasEffect,
                |r, _| {
                    Ok(LivingCondition::HasEffect {
                        target: read_ordinal(r)?,
                        effect: r.read_id()?,
                    })
                },
                |t, _| {
                    Ok(LivingCondition::HasEffect {
                        target: load_ordinal(t, "target")?,
                        effect: t.get_id("effect")?,
                    })
                },
            )?
            .register(
                "skilltree:is_burning",
                LivingConditionKind::IsBurning,
                |r, _| {
                    Ok(LivingCondition::IsBurning {
                        target: read_ordinal(r)?,
                    })
                },
                |t, _| {
                    Ok(LivingCondition::IsBurning {
                        target: load_ordinal(t, "target")?,
                    })
                },
            )?
            .register(
                "skilltree:attribute_value",
                LivingConditionKind::AttributeValue,
                |r, _| {
                    Ok(LivingCondition::AttributeValue {
                        target: read_ordinal(r)?,
                        attribute: r.read_id()?,
                        threshold: Threshold::read(r)?,
                    })
                },
                |t, _| {
                    Ok(LivingCondition::AttributeValue {
                        target: load_ordinal(t, "target")?,
                        attribute: t.get_id("attribute")?,
                        threshold: Threshold::load(t)?,
                    })
                },
            )?
            .register(
                "skilltree:food_level",
                LivingConditionKind::FoodLevel,
                |r, _| {
                    Ok(LivingCondition::FoodLevel {
                        target: read_ordinal(r)?,
                        threshold: Threshold::read(r)?,
                    })
                },
                |t, _| {
                    Ok(LivingCondition::FoodLevel {
                        target: load_ordinal(t, "target")?,
                        threshold: Threshold::load(t)?,
                    })
                },
            )?
            .build())
    }
}

impl Family for LivingCondition {
    type Kind = LivingConditionKind;
    const FAMILY: &'static str = "living_condition";

    fn registry(registries: &Registries) -> &Registry<Self> {
        &registries.living_conditions
    }

    fn kind(&self) -> LivingConditionKind {
        match self {
            LivingCondition::EffectAmount { .. } => LivingConditionKind::EffectAmount,
            LivingCondition::HealthPercentage { .. } => LivingConditionKind::HealthPercentage,
            LivingCondition::HasEnchantedItem { .. } => LivingConditionKind::HasEnchantedItem,
            LivingCondition::HasItemEquipped { .. } => LivingConditionKind::HasItemEquipped,
            LivingCondition::HasGems { .. } => LivingConditionKind::HasGems,
            LivingCondition::HasEffect { .. } => LivingConditionKind::HasEffect,
            LivingCondition::IsBurning { .. } => LivingConditionKind::IsBurning,
            LivingCondition::AttributeValue { .. } => LivingConditionKind::AttributeValue,
            LivingCondition::FoodLevel { .. } => LivingConditionKind::FoodLevel,
        }
    }

    fn write_payload(
        &self,
        writer: &mut WireWriter,
        registries: &Registries,
    ) -> Result<(), CodecError> {
        write_ordinal(writer, self.target());
        match self {
            LivingCondition::EffectAmount { threshold, .. }
            | LivingCondition::HealthPercentage { threshold, .. }
            | LivingCondition::FoodLevel { threshold, .. } => threshold.write(writer),
            LivingCondition::HasEnchantedItem { item, .. }
            | LivingCondition::HasItemEquipped { item, .. } => {
                write_value(writer, registries, item)?
            }
            LivingCondition::HasGems {
                threshold, item, ..
            } => {
                threshold.write(writer);
                write_value(writer, registries, item)?;
            }
            LivingCondition::HasEffect { effect, .. } => writer.write_id(effect)?,
            LivingCondition::IsBurning { .. } => {}
            LivingCondition::AttributeValue {
                attribute,
                threshold,
                ..
            } => {
                writer.write_id(attribute)?;
                threshold.write(writer);
            }
        }
        Ok(())
    }

    fn save_payload(&self, tag: &mut CompoundTag, registries: &Registries) -> Result<(), CodecError> {
        save_ordinal(tag, "target", self.target());
        match self {
            LivingCondition::EffectAmount { threshold, .. }
            | LivingCondition::HealthPercentage { threshold, .. }
            | LivingCondition::FoodLevel { threshold, .. } => threshold.save(tag),
            LivingCondition::HasEnchantedItem { item, .. }
            | LivingCondition::HasItemEquipped { item, .. } => {
                save_nested(tag, "item_condition", registries, item)?
            }
            LivingCondition::HasGems {
                threshold, item, ..
            } => {
                threshold.save(tag);
                save_nested(tag, "item_condition", registries, item)?;
            }
            LivingCondition::HasEffect { effect, .. } => tag.put_id("effect", effect),
            LivingCondition::IsBurning { .. } => {}
            LivingCondition::AttributeValue {
                attribute,
                threshold,
                ..
            } => {
                tag.put_id("attribute", attribute);
                threshold.save(tag);
            }
        }
        Ok(())
    }
}
