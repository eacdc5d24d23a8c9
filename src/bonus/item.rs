use crate::codec::{load_ordinal, read_ordinal, save_ordinal, write_ordinal};
use crate::error::CodecError;
use crate::id::ResourceId;
use crate::merge::Mergeable;
use crate::operation::Operation;
use crate::registry::{Family, Registries, Registry};
use crate::tag::CompoundTag;
use crate::wire::{WireReader, WireWriter};

/// A potion effect, granted by food or applied by a poisoned weapon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectInstance {
    pub effect: ResourceId,
    /// Duration in ticks.
    pub duration: i32,
    pub amplifier: i32,
}

impl EffectInstance {
    pub fn new(effect: ResourceId, duration: i32, amplifier: i32) -> Self {
        Self {
            effect,
            duration,
            amplifier,
        }
    }

    pub fn write(&self, writer: &mut WireWriter) -> Result<(), CodecError> {
        writer.write_id(&self.effect)?;
        writer.write_int(self.duration);
        writer.write_int(self.amplifier);
        Ok(())
    }

    pub fn read(reader: &mut WireReader) -> Result<Self, CodecError> {
        Ok(Self {
            effect: reader.read_id()?,
            duration: reader.read_int()?,
            amplifier: reader.read_int()?,
        })
    }

    pub fn save(&self) -> CompoundTag {
        let mut tag = CompoundTag::new();
        tag.put_id("id", &self.effect);
        tag.put_i32("duration", self.duration);
        tag.put_i32("amplifier", self.amplifier);
        tag
    }

    pub fn load(tag: &CompoundTag) -> Result<Self, CodecError> {
        Ok(Self {
            effect: tag.get_id("id")?,
            duration: tag.get_i32("duration")?,
            amplifier: tag.get_i32("amplifier")?,
        })
    }
}

/// A bonus stored on an item stack under its `SkillBonuses` list.
///
/// # Examples
///
/// ```rust
/// use skilltree::merge::Mergeable;
/// use skilltree::{ItemBonus, Operation};
///
/// let a = ItemBonus::Durability { amount: 5.0, operation: Operation::Add };
/// let b = ItemBonus::Durability { amount: 3.0, operation: Operation::Add };
/// assert_eq!(
///     a.merge(&b),
///     Some(ItemBonus::Durability { amount: 8.0, operation: Operation::Add })
/// );
///
/// let scaled = ItemBonus::Durability { amount: 0.5, operation: Operation::MultiplyBase };
/// assert!(!a.can_merge(&scaled));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ItemBonus {
    Sockets { sockets: i32 },
    Durability { amount: f32, operation: Operation },
    QuiverCapacity { amount: f32 },
    PotionAmplification { amount: f32 },
    PotionDuration { amount: f32 },
    FoodEffect { effect: EffectInstance },
    FoodSaturation { amount: f32 },
    FoodHealing { amount: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemBonusKind {
    Sockets,
    Durability,
    QuiverCapacity,
    PotionAmplification,
    PotionDuration,
    FoodEffect,
    FoodSaturation,
    FoodHealing,
}

impl ItemBonus {
    /// Magnitude of the bonus; zero for kinds that carry none.
    pub fn amount(&self) -> f32 {
        match self {
            ItemBonus::Sockets { sockets } => *sockets as f32,
            ItemBonus::Durability { amount, .. }
            | ItemBonus::QuiverCapacity { amount }
            | ItemBonus::PotionAmplification { amount }
            | ItemBonus::PotionDuration { amount }
            | ItemBonus::FoodSaturation { amount }
            | ItemBonus::FoodHealing { amount } => *amount,
            ItemBonus::FoodEffect { .. } => 0.0,
        }
    }

    /// Only durability bonuses choose an operation; the rest are additive.
    pub fn operation(&self) -> Operation {
        match self {
            ItemBonus::Durability { operation, .. } => *operation,
            _ => Operation::Add,
        }
    }

    pub(crate) fn builtin_registry() -> Result<Registry<Self>, CodecError> {
        Ok(Registry::<Self>::builder()
            .register(
                "skilltree:sockets",
                ItemBonusKind::Sockets,
                |r, _| {
                    Ok(ItemBonus::Sockets {
                        sockets: r.read_int()?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::Sockets {
                        sockets: t.get_i32("sockets")?,
                    })
                },
            )?
            .register(
                "skilltree:durability",
                ItemBonusKind::Durability,
                |r, _| {
                    Ok(ItemBonus::Durability {
                        amount: r.read_float()?,
                        operation: read_ordinal(r)?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::Durability {
                        amount: t.get_f32("amount")?,
                        operation: load_ordinal(t, "operation")?,
                    })
                },
            )?
            .register(
                "skilltree:quiver_capacity",
                ItemBonusKind::QuiverCapacity,
                |r, _| {
                    Ok(ItemBonus::QuiverCapacity {
                        amount: r.read_float()?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::QuiverCapacity {
                        amount: t.get_f32("amount")?,
                    })
                },
            )?
            .register(
                "skilltree:potion_amplification",
                ItemBonusKind::PotionAmplification,
                |r, _| {
                    Ok(ItemBonus::PotionAmplification {
                        amount: r.read_float()?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::PotionAmplification {
                        amount: t.get_f32("amount")?,
                    })
                },
            )?
            .register(
                "skilltree:potion_duration",
                ItemBonusKind::PotionDuration,
                |r, _| {
                    Ok(ItemBonus::PotionDuration {
                        amount: r.read_float()?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::PotionDuration {
                        amount: t.get_f32("amount")?,
                    })
                },
            )?
            .register(
                "skilltree:food_effect",
                ItemBonusKind::FoodEffect,
                |r, _| {
                    Ok(ItemBonus::FoodEffect {
                        effect: EffectInstance::read(r)?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::FoodEffect {
                        effect: EffectInstance::load(&t.get_compound("effect")?)?,
                    })
                },
            )?
            .register(
                "skilltree:food_saturation",
                ItemBonusKind::FoodSaturation,
                |r, _| {
                    Ok(ItemBonus::FoodSaturation {
                        amount: r.read_float()?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::FoodSaturation {
                        amount: t.get_f32("amount")?,
                    })
                },
            )?
            .register(
                "skilltree:food_healing",
                ItemBonusKind::FoodHealing,
                |r, _| {
                    Ok(ItemBonus::FoodHealing {
                        amount: r.read_float()?,
                    })
                },
                |t, _| {
                    Ok(ItemBonus::FoodHealing {
                        amount: t.get_f32("amount")?,
                    })
                },
            )?
            .build())
    }
}

impl Mergeable for ItemBonus {
    fn merge(&self, other: &Self) -> Option<Self> {
        use ItemBonus::*;
        match (self, other) {
            (Sockets { sockets: a }, Sockets { sockets: b }) => Some(Sockets { sockets: a + b }),
            (
                Durability {
                    amount: a,
                    operation,
                },
                Durability {
                    amount: b,
                    operation: other_operation,
                },
            ) if operation == other_operation => Some(Durability {
                amount: a + b,
                operation: *operation,
            }),
            (QuiverCapacity { amount: a }, QuiverCapacity { amount: b }) => {
                Some(QuiverCapacity { amount: a + b })
            }
            (PotionAmplification { amount: a }, PotionAmplification { amount: b }) => {
                Some(PotionAmplification { amount: a + b })
            }
            (PotionDuration { amount: a }, PotionDuration { amount: b }) => {
                Some(PotionDuration { amount: a + b })
            }
            // Same effect at the same strength lasts longer.
            (FoodEffect { effect: a }, FoodEffect { effect: b })
                if a.effect == b.effect && a.amplifier == b.amplifier =>
            {
                Some(FoodEffect {
                    effect: EffectInstance::new(
                        a.effect.clone(),
                        a.duration.saturating_add(b.duration),
                        a.amplifier,
                    ),
                })
            }
            (FoodSaturation { amount: a }, FoodSaturation { amount: b }) => {
                Some(FoodSaturation { amount: a + b })
            }
            (FoodHealing { amount: a }, FoodHealing { amount: b }) => {
                Some(FoodHealing { amount: a + b })
            }
            _ => None,
        }
    }
}

impl Family for ItemBonus {
    type Kind = ItemBonusKind;
    const FAMILY: &'static str = "item_bonus";

    fn registry(registries: &Registries) -> &Registry<Self> {
        &registries.item_bonuses
    }

    fn kind(&self) -> ItemBonusKind {
        match self {
            ItemBonus::Sockets { .. } => ItemBonusKind::Sockets,
            ItemBonus::Durability { .. } => ItemBonusKind::Durability,
            ItemBonus::QuiverCapacity { .. } => ItemBonusKind::QuiverCapacity,
            ItemBonus::PotionAmplification { .. } => ItemBonusKind::PotionAmplification,
            ItemBonus::PotionDuration { .. } => ItemBonusKind::PotionDuration,
            ItemBonus::FoodEffect { .. } => ItemBonusKind::FoodEffect,
            ItemBonus::FoodSaturation { .. } => ItemBonusKind::FoodSaturation,
            ItemBonus::FoodHealing { .. } => ItemBonusKind::FoodHealing,
        }
    }

    fn write_payload(&self, writer: &mut WireWriter, _: &Registries) -> Result<(), CodecError> {
        match self {
            ItemBonus::Sockets { sockets } => writer.write_int(*sockets),
            ItemBonus::Durability { amount, operation } => {
                writer.write_float(*amount);
                write_ordinal(writer, *operation);
            }
            ItemBonus::FoodEffect { effect } => effect.write(writer)?,
            other => writer.write_float(other.amount()),
        }
        Ok(())
    }

    fn save_payload(&self, tag: &mut CompoundTag, _: &Registries) -> Result<(), CodecError> {
        match self {
            ItemBonus::Sockets { sockets } => tag.put_i32("sockets", *sockets),
            ItemBonus::Durability { amount, operation } => {
                tag.put_f32("amount", *amount);
                save_ordinal(tag, "operation", *operation);
            }
            ItemBonus::FoodEffect { effect } => tag.put_compound("effect", effect.save()),
            other => tag.put_f32("amount", other.amount()),
        }
        Ok(())
    }
}
