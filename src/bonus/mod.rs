//! Bonus families.
//!
//! - [`SkillBonus`] - granted to the player by learned passive skills
//! - [`ItemBonus`] - persisted on individual item stacks
//!
//! Each kind exposes `amount()` and `operation()` and implements
//! [`Mergeable`](crate::merge::Mergeable): two bonuses merge only when they
//! are the same kind with the same operation and the same target, and the
//! merged bonus sums their amounts.

mod item;
mod skill;

pub use item::{EffectInstance, ItemBonus, ItemBonusKind};
pub use skill::{AttributeModifier, CombatBonus, SkillBonus, SkillBonusKind};
