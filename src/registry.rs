//! Identifier registries for the polymorphic families.
//!
//! Each family (skill bonuses, item bonuses, the four condition kinds and
//! multipliers) has one `Registry` mapping a namespaced identifier to the
//! decoders for that kind, plus the inverse map used when writing.
//! Registries are assembled once with a `RegistryBuilder` during startup
//! and are read-only afterwards, so shared references can be used from any
//! thread without locking.

use crate::bonus::{ItemBonus, SkillBonus};
use crate::condition::{DamageCondition, EnchantmentCondition, ItemCondition, LivingCondition};
use crate::error::CodecError;
use crate::id::ResourceId;
use crate::multiplier::BonusMultiplier;
use crate::tag::CompoundTag;
use crate::wire::{WireReader, WireWriter};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Decoder reading a value's payload from the byte stream.
pub type StreamDecoder<F> = fn(&mut WireReader, &Registries) -> Result<F, CodecError>;

/// Decoder reading a value's payload from a persisted record.
pub type TagDecoder<F> = fn(&CompoundTag, &Registries) -> Result<F, CodecError>;

/// A closed polymorphic family whose values are framed with a registry
/// identifier.
///
/// Implementors expose a `Kind` discriminant per variant; the registry
/// maps kinds to identifiers for writing and identifiers to decoders for
/// reading. Payload encoders receive the full `Registries` table because
/// values may nest members of other families.
pub trait Family: Clone + PartialEq + Debug + Sized + 'static {
    /// Discriminant of the concrete kind.
    type Kind: Copy + Eq + Hash + Debug;

    /// Family name used in log lines, errors and translation keys.
    const FAMILY: &'static str;

    /// This family's registry within the table.
    fn registry(registries: &Registries) -> &Registry<Self>;

    fn kind(&self) -> Self::Kind;

    fn write_payload(
        &self,
        writer: &mut WireWriter,
        registries: &Registries,
    ) -> Result<(), CodecError>;

    fn save_payload(&self, tag: &mut CompoundTag, registries: &Registries)
        -> Result<(), CodecError>;
}

/// The decoders registered for one kind.
pub struct Decoder<F: Family> {
    pub kind: F::Kind,
    pub read: StreamDecoder<F>,
    pub load: TagDecoder<F>,
}

impl<F: Family> Clone for Decoder<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Family> Copy for Decoder<F> {}

impl<F: Family> std::fmt::Debug for Decoder<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("family", &F::FAMILY)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Read-only map between identifiers and decoders for one family.
///
/// # Examples
///
/// ```rust
/// use skilltree::{ItemBonus, Registries, ResourceId};
/// use skilltree::registry::Family;
///
/// let registries = Registries::builtin().unwrap();
/// let registry = ItemBonus::registry(&registries);
///
/// let id = ResourceId::parse("skilltree:sockets").unwrap();
/// assert!(registry.resolve(&id).is_ok());
///
/// let missing = ResourceId::parse("mod:nonexistent").unwrap();
/// assert!(registry.resolve(&missing).is_err());
/// ```
pub struct Registry<F: Family> {
    decoders: HashMap<ResourceId, Decoder<F>>,
    ids: HashMap<F::Kind, ResourceId>,
    order: Vec<ResourceId>,
}

impl<F: Family> Registry<F> {
    pub fn builder() -> RegistryBuilder<F> {
        RegistryBuilder {
            registry: Registry {
                decoders: HashMap::new(),
                ids: HashMap::new(),
                order: Vec::new(),
            },
        }
    }

    /// Look up the decoders registered under `id`.
    pub fn resolve(&self, id: &ResourceId) -> Result<&Decoder<F>, CodecError> {
        self.decoders.get(id).ok_or_else(|| CodecError::UnknownType {
            family: F::FAMILY,
            id: id.clone(),
        })
    }

    /// Inverse lookup used when writing.
    pub fn identifier_of(&self, kind: F::Kind) -> Result<&ResourceId, CodecError> {
        self.ids.get(&kind).ok_or_else(|| CodecError::UnregisteredKind {
            family: F::FAMILY,
            kind: format!("{kind:?}"),
        })
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.decoders.contains_key(id)
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<F: Family> std::fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("family", &F::FAMILY)
            .field("ids", &self.order)
            .finish()
    }
}

/// Startup-phase builder; the only way to add entries to a `Registry`.
pub struct RegistryBuilder<F: Family> {
    registry: Registry<F>,
}

impl<F: Family> RegistryBuilder<F> {
    /// Register the decoders for `kind` under `id`.
    ///
    /// Fails when either the identifier or the kind is already taken.
    pub fn register(
        mut self,
        id: &str,
        kind: F::Kind,
        read: StreamDecoder<F>,
        load: TagDecoder<F>,
    ) -> Result<Self, CodecError> {
        let id = ResourceId::parse(id)?;
        if self.registry.decoders.contains_key(&id) {
            return Err(CodecError::DuplicateIdentifier {
                family: F::FAMILY,
                id: id.to_string(),
            });
        }
        if self.registry.ids.contains_key(&kind) {
            return Err(CodecError::DuplicateIdentifier {
                family: F::FAMILY,
                id: format!("{kind:?}"),
            });
        }
        self.registry
            .decoders
            .insert(id.clone(), Decoder { kind, read, load });
        self.registry.ids.insert(kind, id.clone());
        self.registry.order.push(id);
        Ok(self)
    }

    pub fn build(self) -> Registry<F> {
        self.registry
    }
}

/// The central registry table, one registry per family.
///
/// Built once during startup and passed by reference to every codec and
/// merge call.
#[derive(Debug)]
pub struct Registries {
    pub skill_bonuses: Registry<SkillBonus>,
    pub item_bonuses: Registry<ItemBonus>,
    pub item_conditions: Registry<ItemCondition>,
    pub damage_conditions: Registry<DamageCondition>,
    pub enchantment_conditions: Registry<EnchantmentCondition>,
    pub living_conditions: Registry<LivingCondition>,
    pub multipliers: Registry<BonusMultiplier>,
}

impl Registries {
    /// The table with every built-in kind registered under the
    /// `skilltree` namespace.
    pub fn builtin() -> Result<Self, CodecError> {
        let registries = Self {
            skill_bonuses: SkillBonus::builtin_registry()?,
            item_bonuses: ItemBonus::builtin_registry()?,
            item_conditions: ItemCondition::builtin_registry()?,
            damage_conditions: DamageCondition::builtin_registry()?,
            enchantment_conditions: EnchantmentCondition::builtin_registry()?,
            living_conditions: LivingCondition::builtin_registry()?,
            multipliers: BonusMultiplier::builtin_registry()?,
        };
        tracing::debug!(
            skill_bonuses = registries.skill_bonuses.len(),
            item_bonuses = registries.item_bonuses.len(),
            conditions = registries.item_conditions.len()
                + registries.damage_conditions.len()
                + registries.enchantment_conditions.len()
                + registries.living_conditions.len(),
            multipliers = registries.multipliers.len(),
            "registries built"
        );
        Ok(registries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::DamageConditionKind;

    #[test]
    fn test_builtin_registries_populated() {
        let registries = Registries::builtin().unwrap();
        assert_eq!(registries.skill_bonuses.len(), 13);
        assert_eq!(registries.item_bonuses.len(), 8);
        assert_eq!(registries.item_conditions.len(), 9);
        assert_eq!(registries.damage_conditions.len(), 2);
        assert_eq!(registries.enchantment_conditions.len(), 3);
        assert_eq!(registries.living_conditions.len(), 9);
        assert_eq!(registries.multipliers.len(), 6);
    }

    #[test]
    fn test_identifier_round_trip() {
        let registries = Registries::builtin().unwrap();
        let registry = &registries.damage_conditions;
        let id = registry
            .identifier_of(DamageConditionKind::Projectile)
            .unwrap();
        assert_eq!(id.as_str(), "skilltree:is_projectile");
        assert_eq!(
            registry.resolve(id).unwrap().kind,
            DamageConditionKind::Projectile
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let result = Registry::<DamageCondition>::builder()
            .register(
                "skilltree:is_melee",
                DamageConditionKind::Melee,
                |_, _| Ok(DamageCondition::Melee),
                |_, _| Ok(DamageCondition::Melee),
            )
            .and_then(|builder| {
                builder.register(
                    "skilltree:is_melee",
                    DamageConditionKind::Projectile,
                    |_, _| Ok(DamageCondition::Projectile),
                    |_, _| Ok(DamageCondition::Projectile),
                )
            });
        assert!(matches!(
            result,
            Err(CodecError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn test_unregistered_kind() {
        let registry = Registry::<DamageCondition>::builder()
            .register(
                "skilltree:is_melee",
                DamageConditionKind::Melee,
                |_, _| Ok(DamageCondition::Melee),
                |_, _| Ok(DamageCondition::Melee),
            )
            .unwrap()
            .build();
        assert!(matches!(
            registry.identifier_of(DamageConditionKind::Projectile),
            Err(CodecError::UnregisteredKind { .. })
        ));
        assert_eq!(registry.ids().count(), 1);
    }
}
