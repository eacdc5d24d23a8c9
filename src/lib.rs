//! # skilltree - Registry-Driven Bonus Data for a Passive Skill Tree
//!
//! The data layer of a passive skill tree game extension:
//! - **Polymorphic families** (bonuses, item bonuses, conditions,
//!   multipliers) as closed enums, each kind registered under a stable
//!   namespaced identifier
//! - **Discriminator-then-payload** framing for both the network byte
//!   stream and the persisted tag form
//! - **Merging** of compatible bonuses attached to items and skills
//!
//! ## Core Concepts
//!
//! ### Registries
//!
//! Every family has one [`Registry`](registry::Registry) mapping an
//! identifier such as `skilltree:durability` to the decoders of that kind.
//! [`Registries::builtin`] builds the full table once at startup; every
//! codec and merge call receives it by reference.
//!
//! ### Framing
//!
//! ```text
//! value    = identifier payload
//! list     = count value*
//! optional = present:bool [value]
//! ```
//!
//! In the tag form the identifier is the record's `type` field. Reading a
//! persisted list is lossy: records that fail to decode are logged and
//! dropped rather than failing the caller.
//!
//! ### Merging
//!
//! Two bonuses of the same kind, operation and target merge into one with
//! the summed amount. Adding a bonus to a list merges it into the first
//! compatible entry, or appends it.
//!
//! ## Example
//!
//! ```rust
//! use skilltree::item::ItemData;
//! use skilltree::{ItemBonus, Operation, Registries};
//!
//! let registries = Registries::builtin().unwrap();
//! let mut sword = ItemData::new();
//!
//! sword.add_item_bonus(ItemBonus::Durability { amount: 5.0, operation: Operation::Add }, &registries)
//!     .unwrap();
//! sword.add_item_bonus(ItemBonus::Durability { amount: 3.0, operation: Operation::Add }, &registries)
//!     .unwrap();
//!
//! // Merged into a single entry
//! assert_eq!(
//!     sword.item_bonuses(&registries),
//!     vec![ItemBonus::Durability { amount: 8.0, operation: Operation::Add }]
//! );
//! assert_eq!(sword.max_durability(250, &registries), 258);
//! ```
//!
//! ## Modules
//!
//! - [`id`] - Namespaced identifiers
//! - [`registry`] - Identifier registries
//! - [`codec`] - Framing for every family
//! - [`wire`] / [`tag`] - Byte-stream and tag primitives
//! - [`bonus`] - Skill and item bonuses
//! - [`condition`] - Item, damage, enchantment and living conditions
//! - [`multiplier`] - Bonus multipliers
//! - [`merge`] - Merge engine
//! - [`item`] - Item persistent data
//! - [`skill`] - Passive skills, trees and their synchronization
//! - [`graph`] - Skill connectivity
//! - [`config`] - Socket configuration
//! - [`context`] - Host snapshots
//! - [`error`] - Error types

pub mod bonus;
pub mod codec;
pub mod condition;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod id;
pub mod item;
pub mod merge;
pub mod multiplier;
pub mod operation;
pub mod registry;
pub mod skill;
pub mod tag;
pub mod wire;

// Re-export main types for convenience
pub use error::CodecError;
pub use id::ResourceId;
pub use operation::Operation;
pub use registry::Registries;
pub use tag::CompoundTag;

pub use bonus::{ItemBonus, SkillBonus};
pub use condition::{DamageCondition, EnchantmentCondition, ItemCondition, LivingCondition};
pub use merge::Mergeable;
pub use multiplier::BonusMultiplier;
pub use skill::{PassiveSkill, PassiveSkillTree};
