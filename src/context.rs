//! Host state snapshots for condition and multiplier evaluation.
//!
//! The host engine owns items, entities and damage events. Before asking
//! whether a bonus applies, it fills in these plain snapshots; the core
//! never reaches back into the host.

use crate::id::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Item classification supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    MeleeWeapon,
    RangedWeapon,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    Shield,
    Axe,
    Pickaxe,
    Tool,
    Food,
    Ring,
    Necklace,
    Quiver,
    Potion,
}

/// Category of a potion or mob effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    Beneficial,
    Harmful,
    Neutral,
}

/// What the host knows about one item stack.
///
/// # Examples
///
/// ```rust
/// use skilltree::context::{ItemCategory, ItemProfile};
/// use skilltree::ResourceId;
///
/// let sword = ItemProfile::new(ResourceId::parse("iron_sword").unwrap())
///     .with(ItemCategory::MeleeWeapon);
/// assert!(sword.is_weapon());
/// assert!(sword.is_equipment());
/// assert!(!sword.is_jewelry());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProfile {
    pub item: ResourceId,
    #[serde(default)]
    pub categories: HashSet<ItemCategory>,
    /// Categories of the effects a potion carries.
    #[serde(default)]
    pub potion_effects: Vec<EffectCategory>,
}

impl ItemProfile {
    pub fn new(item: ResourceId) -> Self {
        Self {
            item,
            categories: HashSet::new(),
            potion_effects: Vec::new(),
        }
    }

    pub fn with(mut self, category: ItemCategory) -> Self {
        self.categories.insert(category);
        self
    }

    pub fn with_potion_effect(mut self, category: EffectCategory) -> Self {
        self.categories.insert(ItemCategory::Potion);
        self.potion_effects.push(category);
        self
    }

    pub fn is(&self, category: ItemCategory) -> bool {
        self.categories.contains(&category)
    }

    pub fn is_melee_weapon(&self) -> bool {
        self.is(ItemCategory::MeleeWeapon) || self.is(ItemCategory::Axe)
    }

    pub fn is_ranged_weapon(&self) -> bool {
        self.is(ItemCategory::RangedWeapon)
    }

    pub fn is_weapon(&self) -> bool {
        self.is_melee_weapon() || self.is_ranged_weapon()
    }

    pub fn is_armor(&self) -> bool {
        self.is(ItemCategory::Helmet)
            || self.is(ItemCategory::Chestplate)
            || self.is(ItemCategory::Leggings)
            || self.is(ItemCategory::Boots)
    }

    pub fn is_tool(&self) -> bool {
        self.is(ItemCategory::Tool) || self.is(ItemCategory::Axe) || self.is(ItemCategory::Pickaxe)
    }

    pub fn is_equipment(&self) -> bool {
        self.is_weapon() || self.is_armor() || self.is(ItemCategory::Shield) || self.is_tool()
    }

    pub fn is_jewelry(&self) -> bool {
        self.is(ItemCategory::Ring) || self.is(ItemCategory::Necklace)
    }
}

/// An item worn or held by a living entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub profile: ItemProfile,
    /// Level of each enchantment on the item.
    #[serde(default)]
    pub enchantment_levels: Vec<u32>,
    /// Gems inserted into the item's sockets.
    #[serde(default)]
    pub gems: u32,
}

impl EquippedItem {
    pub fn new(profile: ItemProfile) -> Self {
        Self {
            profile,
            enchantment_levels: Vec::new(),
            gems: 0,
        }
    }

    pub fn is_enchanted(&self) -> bool {
        !self.enchantment_levels.is_empty()
    }
}

/// State of a living entity (the player or their target).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivingSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub food_level: i32,
    pub burning: bool,
    pub effects: Vec<ResourceId>,
    pub attributes: HashMap<ResourceId, f64>,
    pub equipment: Vec<EquippedItem>,
}

impl LivingSnapshot {
    /// Health as a fraction of maximum health; zero when max is zero.
    pub fn health_percentage(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    pub fn attribute(&self, attribute: &ResourceId) -> f64 {
        self.attributes.get(attribute).copied().unwrap_or(0.0)
    }

    pub fn has_effect(&self, effect: &ResourceId) -> bool {
        self.effects.contains(effect)
    }
}

/// The kind of damage being dealt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSource {
    pub projectile: bool,
    pub melee: bool,
}

/// Equipment an enchantment can go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnchantmentTarget {
    Weapon,
    Armor,
    Other,
}
