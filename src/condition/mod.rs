//! Conditions gating whether a bonus applies.
//!
//! Four registry families, each a closed enum evaluated against a host
//! snapshot:
//! - [`ItemCondition`] - classifies an item stack
//! - [`DamageCondition`] - classifies a damage event
//! - [`EnchantmentCondition`] - classifies an enchantment's target
//! - [`LivingCondition`] - inspects the player or their target
//!
//! Threshold-style conditions carry optional `min`/`max` bounds; the
//! translation sub-key is `min`, `max` or `range`, and a condition with
//! neither bound is always met.

mod damage;
mod enchantment;
mod item;
mod living;

pub use damage::{DamageCondition, DamageConditionKind};
pub use enchantment::{EnchantmentCondition, EnchantmentConditionKind};
pub use item::{ArmorSlot, CurioType, ItemCondition, ItemConditionKind, PotionType, WeaponType};
pub use living::{LivingCondition, LivingConditionKind, LivingTarget};

use crate::codec::{read_optional_float, write_optional_float};
use crate::error::CodecError;
use crate::tag::CompoundTag;
use crate::wire::{WireReader, WireWriter};

/// Optional inclusive bounds on an observed quantity.
///
/// # Examples
///
/// ```rust
/// use skilltree::condition::Threshold;
///
/// let range = Threshold::between(2.0, 4.0);
/// assert!(range.contains(3.0));
/// assert!(!range.contains(5.0));
/// assert_eq!(range.sub_key(), Some("range"));
///
/// assert!(Threshold::none().contains(f32::MAX));
/// assert_eq!(Threshold::none().sub_key(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Threshold {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl Threshold {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn at_least(min: f32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: f32, max: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    pub fn sub_key(&self) -> Option<&'static str> {
        match (self.min, self.max) {
            (Some(_), Some(_)) => Some("range"),
            (Some(_), None) => Some("min"),
            (None, Some(_)) => Some("max"),
            (None, None) => None,
        }
    }

    pub(crate) fn write(&self, writer: &mut WireWriter) {
        write_optional_float(writer, self.min);
        write_optional_float(writer, self.max);
    }

    pub(crate) fn read(reader: &mut WireReader) -> Result<Self, CodecError> {
        Ok(Self {
            min: read_optional_float(reader)?,
            max: read_optional_float(reader)?,
        })
    }

    pub(crate) fn save(&self, tag: &mut CompoundTag) {
        if let Some(min) = self.min {
            tag.put_f32("min", min);
        }
        if let Some(max) = self.max {
            tag.put_f32("max", max);
        }
    }

    pub(crate) fn load(tag: &CompoundTag) -> Result<Self, CodecError> {
        Ok(Self {
            min: tag.get_optional_f32("min")?,
            max: tag.get_optional_f32("max")?,
        })
    }
}
