//! Socket configuration.

use crate::context::{ItemCategory, ItemProfile};
use crate::error::CodecError;
use crate::item::ItemData;
use crate::registry::Registries;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default gem socket counts and the items that never get sockets.
///
/// Missing fields take their defaults, so a partial file is valid.
///
/// # Examples
///
/// ```rust
/// use skilltree::config::SocketConfig;
/// use skilltree::context::{ItemCategory, ItemProfile};
/// use skilltree::ResourceId;
///
/// let config = SocketConfig::from_json_str(
///     r#"{ "default_weapon_sockets": 2, "socket_blacklist": ["tetra:*"] }"#,
/// )
/// .unwrap();
///
/// let sword = ItemProfile::new(ResourceId::parse("iron_sword").unwrap())
///     .with(ItemCategory::MeleeWeapon);
/// assert_eq!(config.default_sockets(&sword), 2);
///
/// let modular = ItemProfile::new(ResourceId::parse("tetra:modular_sword").unwrap())
///     .with(ItemCategory::MeleeWeapon);
/// assert!(!config.has_sockets(&modular));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketConfig {
    pub default_helmet_sockets: i32,
    pub default_chestplate_sockets: i32,
    pub default_leggings_sockets: i32,
    pub default_boots_sockets: i32,
    pub default_weapon_sockets: i32,
    pub default_shield_sockets: i32,
    pub default_ring_sockets: i32,
    pub default_necklace_sockets: i32,
    /// Patterns: `*:*`, `namespace:*` or a full item id.
    pub socket_blacklist: Vec<String>,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            default_helmet_sockets: 1,
            default_chestplate_sockets: 1,
            default_leggings_sockets: 1,
            default_boots_sockets: 1,
            default_weapon_sockets: 1,
            default_shield_sockets: 1,
            default_ring_sockets: 1,
            default_necklace_sockets: 1,
            socket_blacklist: Vec::new(),
        }
    }
}

impl SocketConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json).map_err(|e| CodecError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CodecError> {
        let json = fs::read_to_string(path)
            .map_err(|e| CodecError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            blacklisted = config.socket_blacklist.len(),
            "socket config loaded"
        );
        Ok(config)
    }

    fn blacklisted(&self, profile: &ItemProfile) -> bool {
        let id = profile.item.as_str();
        let namespace_wildcard = format!("{}:*", profile.item.namespace());
        self.socket_blacklist
            .iter()
            .any(|pattern| pattern == "*:*" || pattern == id || *pattern == namespace_wildcard)
    }

    /// Whether gems can be inserted into the item at all.
    pub fn has_sockets(&self, profile: &ItemProfile) -> bool {
        !self.blacklisted(profile) && (profile.is_equipment() || profile.is_jewelry())
    }

    /// Sockets an item has before any bonuses. The first matching
    /// category wins, armor pieces before weapons.
    pub fn default_sockets(&self, profile: &ItemProfile) -> i32 {
        if profile.is(ItemCategory::Helmet) {
            self.default_helmet_sockets
        } else if profile.is(ItemCategory::Chestplate) {
            self.default_chestplate_sockets
        } else if profile.is(ItemCategory::Leggings) {
            self.default_leggings_sockets
        } else if profile.is(ItemCategory::Boots) {
            self.default_boots_sockets
        } else if profile.is_weapon() {
            self.default_weapon_sockets
        } else if profile.is(ItemCategory::Shield) {
            self.default_shield_sockets
        } else if profile.is(ItemCategory::Ring) {
            self.default_ring_sockets
        } else if profile.is(ItemCategory::Necklace) {
            self.default_necklace_sockets
        } else {
            0
        }
    }

    /// Default sockets plus socket bonuses; zero for items without sockets.
    pub fn total_sockets(
        &self,
        profile: &ItemProfile,
        item: &ItemData,
        registries: &Registries,
    ) -> i32 {
        if !self.has_sockets(profile) {
            return 0;
        }
        self.default_sockets(profile) + item.additional_sockets(registries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::ItemBonus;
    use crate::id::ResourceId;

    fn profile(id: &str, category: ItemCategory) -> ItemProfile {
        ItemProfile::new(ResourceId::parse(id).unwrap()).with(category)
    }

    #[test]
    fn test_defaults() {
        let config = SocketConfig::default();
        assert_eq!(config.default_sockets(&profile("iron_boots", ItemCategory::Boots)), 1);
        assert_eq!(config.default_sockets(&profile("bread", ItemCategory::Food)), 0);
        assert!(!config.has_sockets(&profile("bread", ItemCategory::Food)));
    }

    #[test]
    fn test_blacklist_patterns() {
        let sword = profile("iron_sword", ItemCategory::MeleeWeapon);

        let exact = SocketConfig {
            socket_blacklist: vec!["minecraft:iron_sword".to_string()],
            ..Default::default()
        };
        assert!(!exact.has_sockets(&sword));
        assert!(exact.has_sockets(&profile("iron_axe", ItemCategory::Axe)));

        let everything = SocketConfig {
            socket_blacklist: vec!["*:*".to_string()],
            ..Default::default()
        };
        assert!(!everything.has_sockets(&profile("skilltree:ring", ItemCategory::Ring)));
    }

    #[test]
    fn test_total_sockets() {
        let registries = Registries::builtin().unwrap();
        let config = SocketConfig {
            default_ring_sockets: 2,
            ..Default::default()
        };
        let ring = profile("skilltree:copper_ring", ItemCategory::Ring);
        let mut data = ItemData::new();
        data.add_item_bonus(ItemBonus::Sockets { sockets: 1 }, &registries)
            .unwrap();
        assert_eq!(config.total_sockets(&ring, &data, &registries), 3);

        let bread = profile("bread", ItemCategory::Food);
        assert_eq!(config.total_sockets(&bread, &data, &registries), 0);
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            SocketConfig::from_json_str(r#"{ "default_ring_sockets": "two" }"#),
            Err(CodecError::Config(_))
        ));
    }
}
