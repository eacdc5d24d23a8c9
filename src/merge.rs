//! Merge engine for attached-bonus lists.
//!
//! Adding a bonus first looks for an existing entry it can combine with.
//! On a match the existing entry is removed and the combined bonus is
//! appended; otherwise the new bonus is appended unchanged. Untouched
//! entries keep their relative order.
//!
//! The persisted variants read a list from a `CompoundTag`, apply the same
//! rule and write the whole list back. Records that fail to decode are
//! dropped during the read and therefore do not survive the write.

use crate::codec::{load_list_lossy, save_list};
use crate::error::CodecError;
use crate::registry::{Family, Registries};
use crate::tag::CompoundTag;

/// Combination rule of a bonus kind.
///
/// `merge` returns `None` for pairs that cannot be combined, so a merge of
/// incompatible kinds cannot be expressed.
pub trait Mergeable: Sized {
    fn merge(&self, other: &Self) -> Option<Self>;

    fn can_merge(&self, other: &Self) -> bool {
        self.merge(other).is_some()
    }
}

/// Add `bonus` to `list`, merging with the first compatible entry.
///
/// # Examples
///
/// ```rust
/// use skilltree::merge::add_bonus;
/// use skilltree::{ItemBonus, Operation};
///
/// let mut list = vec![
///     ItemBonus::Durability { amount: 5.0, operation: Operation::Add },
///     ItemBonus::Sockets { sockets: 1 },
/// ];
/// add_bonus(&mut list, ItemBonus::Durability { amount: 3.0, operation: Operation::Add });
///
/// assert_eq!(
///     list,
///     vec![
///         ItemBonus::Sockets { sockets: 1 },
///         ItemBonus::Durability { amount: 8.0, operation: Operation::Add },
///     ]
/// );
/// ```
pub fn add_bonus<B: Mergeable>(list: &mut Vec<B>, bonus: B) {
    let merged = list
        .iter()
        .enumerate()
        .find_map(|(index, existing)| existing.merge(&bonus).map(|merged| (index, merged)));
    match merged {
        Some((index, merged)) => {
            list.remove(index);
            list.push(merged);
        }
        None => list.push(bonus),
    }
}

/// Remove every entry equal to `target`. Returns whether anything was
/// removed.
pub fn remove_bonus<B: PartialEq>(list: &mut Vec<B>, target: &B) -> bool {
    let before = list.len();
    list.retain(|bonus| bonus != target);
    list.len() != before
}

/// Decode the list stored under `key`; an absent key reads as empty.
///
/// A key holding anything other than a list also reads as empty and is
/// logged, since the next store replaces it.
pub fn load_bonuses<F: Family>(tag: &CompoundTag, key: &str, registries: &Registries) -> Vec<F> {
    if !tag.contains(key) {
        return Vec::new();
    }
    match tag.get_array(key) {
        Ok(records) => load_list_lossy(records, registries),
        Err(error) => {
            tracing::warn!(family = F::FAMILY, key, %error, "ignoring malformed bonus list");
            Vec::new()
        }
    }
}

pub fn store_bonuses<F: Family>(
    tag: &mut CompoundTag,
    key: &str,
    registries: &Registries,
    bonuses: &[F],
) -> Result<(), CodecError> {
    tag.put_list(key, save_list(registries, bonuses)?);
    Ok(())
}

/// [`add_bonus`] on a list persisted under `key`.
pub fn add_persisted<F: Family + Mergeable>(
    tag: &mut CompoundTag,
    key: &str,
    registries: &Registries,
    bonus: F,
) -> Result<(), CodecError> {
    let mut bonuses = load_bonuses(tag, key, registries);
    let before = bonuses.len();
    add_bonus(&mut bonuses, bonus);
    tracing::debug!(
        family = F::FAMILY,
        key,
        merged = bonuses.len() == before,
        len = bonuses.len(),
        "bonus added"
    );
    store_bonuses(tag, key, registries, &bonuses)
}

/// [`remove_bonus`] on a list persisted under `key`.
pub fn remove_persisted<F: Family>(
    tag: &mut CompoundTag,
    key: &str,
    registries: &Registries,
    target: &F,
) -> Result<bool, CodecError> {
    let mut bonuses = load_bonuses(tag, key, registries);
    let removed = remove_bonus(&mut bonuses, target);
    store_bonuses(tag, key, registries, &bonuses)?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::ItemBonus;
    use crate::operation::Operation;

    fn durability(amount: f32) -> ItemBonus {
        ItemBonus::Durability {
            amount,
            operation: Operation::Add,
        }
    }

    #[test]
    fn test_add_to_empty_list() {
        let mut list = Vec::new();
        add_bonus(&mut list, durability(1.0));
        assert_eq!(list, vec![durability(1.0)]);
    }

    #[test]
    fn test_first_match_wins() {
        // Two mutually mergeable entries only arise from hand-edited data.
        let mut list = vec![durability(1.0), durability(2.0)];
        add_bonus(&mut list, durability(4.0));
        assert_eq!(list, vec![durability(2.0), durability(5.0)]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list = vec![durability(1.0), ItemBonus::Sockets { sockets: 1 }];
        assert!(!remove_bonus(&mut list, &durability(2.0)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_persisted_round() {
        let registries = Registries::builtin().unwrap();
        let mut tag = CompoundTag::new();
        add_persisted(&mut tag, "SkillBonuses", &registries, durability(5.0)).unwrap();
        add_persisted(&mut tag, "SkillBonuses", &registries, durability(3.0)).unwrap();

        let bonuses: Vec<ItemBonus> = load_bonuses(&tag, "SkillBonuses", &registries);
        assert_eq!(bonuses, vec![durability(8.0)]);

        assert!(remove_persisted(&mut tag, "SkillBonuses", &registries, &durability(8.0)).unwrap());
        assert_eq!(tag.get_array("SkillBonuses").unwrap().len(), 0);
    }

    #[test]
    fn test_missing_key_reads_empty() {
        let registries = Registries::builtin().unwrap();
        let bonuses: Vec<ItemBonus> = load_bonuses(&CompoundTag::new(), "SkillBonuses", &registries);
        assert!(bonuses.is_empty());
    }

    #[test]
    fn test_non_list_key_reads_empty_and_is_replaced() {
        let registries = Registries::builtin().unwrap();
        let mut tag = CompoundTag::new();
        tag.put_string("SkillBonuses", "corrupted");

        let bonuses: Vec<ItemBonus> = load_bonuses(&tag, "SkillBonuses", &registries);
        assert!(bonuses.is_empty());

        add_persisted(&mut tag, "SkillBonuses", &registries, durability(2.0)).unwrap();
        let bonuses: Vec<ItemBonus> = load_bonuses(&tag, "SkillBonuses", &registries);
        assert_eq!(bonuses, vec![durability(2.0)]);
    }
}
