use crate::context::DamageSource;
use crate::error::CodecError;
use crate::registry::{Family, Registries, Registry};
use crate::tag::CompoundTag;
use crate::wire::WireWriter;

/// Predicate over a damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageCondition {
    Projectile,
    Melee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageConditionKind {
    Projectile,
    Melee,
}

impl DamageCondition {
    pub fn met(&self, source: &DamageSource) -> bool {
        match self {
            DamageCondition::Projectile => source.projectile,
            DamageCondition::Melee => source.melee && !source.projectile,
        }
    }

    pub(crate) fn builtin_registry() -> Result<Registry<Self>, CodecError> {
        Ok(Registry::<Self>::builder()
            .register(
                "skilltree:is_projectile",
                DamageConditionKind::Projectile,
                |_, _| Ok(DamageCondition::Projectile),
                |_, _| Ok(DamageCondition::Projectile),
            )?
            .register(
                "skilltree:is_melee",
                DamageConditionKind::Melee,
                |_, _| Ok(DamageCondition::Melee),
                |_, _| Ok(DamageCondition::Melee),
            )?
            .build())
    }
}

impl Family for DamageCondition {
    type Kind = DamageConditionKind;
    const FAMILY: &'static str = "damage_condition";

    fn registry(registries: &Registries) -> &Registry<Self> {
        &registries.damage_conditions
    }

    fn kind(&self) -> DamageConditionKind {
        match self {
            DamageCondition::Projectile => DamageConditionKind::Projectile,
            DamageCondition::Melee => DamageConditionKind::Melee,
        }
    }

    fn write_payload(&self, _: &mut WireWriter, _: &Registries) -> Result<(), CodecError> {
        Ok(())
    }

    fn save_payload(&self, _: &mut CompoundTag, _: &Registries) -> Result<(), CodecError> {
        Ok(())
    }
}
