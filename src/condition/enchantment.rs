use crate::context::EnchantmentTarget;
use crate::error::CodecError;
use crate::registry::{Family, Registries, Registry};
use crate::tag::CompoundTag;
use crate::wire::WireWriter;

/// Predicate over the equipment an enchantment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnchantmentCondition {
    Weapon,
    Armor,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnchantmentConditionKind {
    Weapon,
    Armor,
    Any,
}

impl EnchantmentCondition {
    pub fn met(&self, target: EnchantmentTarget) -> bool {
        match self {
            EnchantmentCondition::Weapon => target == EnchantmentTarget::Weapon,
            EnchantmentCondition::Armor => target == EnchantmentTarget::Armor,
            EnchantmentCondition::Any => true,
        }
    }

    pub(crate) fn builtin_registry() -> Result<Registry<Self>, CodecError> {
        Ok(Registry::<Self>::builder()
            .register(
                "skilltree:weapon",
                EnchantmentConditionKind::Weapon,
                |_, _| Ok(EnchantmentCondition::Weapon),
                |_, _| Ok(EnchantmentCondition::Weapon),
            )?
            .register(
                "skilltree:armor",
                EnchantmentConditionKind::Armor,
                |_, _| Ok(EnchantmentCondition::Armor),
                |_, _| Ok(EnchantmentCondition::Armor),
            )?
            .register(
                "skilltree:none",
                EnchantmentConditionKind::Any,
                |_, _| Ok(EnchantmentCondition::Any),
                |_, _| Ok(EnchantmentCondition::Any),
            )?
            .build())
    }
}

impl Family for EnchantmentCondition {
    type Kind = EnchantmentConditionKind;
    const FAMILY: &'static str = "enchantment_condition";

    fn registry(registries: &Registries) -> &Registry<Self> {
        &registries.enchantment_conditions
    }

    fn kind(&self) -> EnchantmentConditionKind {
        match self {
            EnchantmentCondition::Weapon => EnchantmentConditionKind::Weapon,
            EnchantmentCondition::Armor => EnchantmentConditionKind::Armor,
            EnchantmentCondition::Any => EnchantmentConditionKind::Any,
        }
    }

    fn write_payload(&self, _: &mut WireWriter, _: &Registries) -> Result<(), CodecError> {
        Ok(())
    }

    fn save_payload(&self, _: &mut CompoundTag, _: &Registries) -> Result<(), CodecError> {
        Ok(())
    }
}
