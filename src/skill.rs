//! Passive skills and skill trees.
//!
//! Skills are authored as tag records and loaded into a [`SkillLibrary`];
//! the authoritative side then synchronizes them to viewers over the
//! byte stream with [`write_skills`] / [`read_skills`].

use crate::bonus::SkillBonus;
use crate::codec::{
    load_list_lossy, read_counted, read_ids, read_list, read_optional_id, save_list,
    write_counted, write_ids, write_list, write_optional_id,
};
use crate::error::CodecError;
use crate::id::ResourceId;
use crate::merge;
use crate::registry::Registries;
use crate::tag::CompoundTag;
use crate::wire::{WireReader, WireWriter};
use serde_json::Value;
use std::collections::BTreeMap;

/// One node of the passive skill tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PassiveSkill {
    pub id: ResourceId,
    pub button_size: i32,
    pub background: ResourceId,
    pub icon: ResourceId,
    pub border: ResourceId,
    pub starting_point: bool,
    pub x: f32,
    pub y: f32,
    pub connected_skills: Vec<ResourceId>,
    /// Tree this skill leads into, for gateway skills.
    pub connected_tree: Option<ResourceId>,
    pub bonuses: Vec<SkillBonus>,
    pub gateways: Vec<ResourceId>,
}

impl PassiveSkill {
    pub fn new(
        id: ResourceId,
        button_size: i32,
        background: ResourceId,
        icon: ResourceId,
        border: ResourceId,
        starting_point: bool,
    ) -> Self {
        Self {
            id,
            button_size,
            background,
            icon,
            border,
            starting_point,
            x: 0.0,
            y: 0.0,
            connected_skills: Vec::new(),
            connected_tree: None,
            bonuses: Vec::new(),
            gateways: Vec::new(),
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Attach a bonus, merging it into a compatible one.
    pub fn add_bonus(&mut self, bonus: SkillBonus) {
        merge::add_bonus(&mut self.bonuses, bonus);
    }

    pub fn remove_bonus(&mut self, bonus: &SkillBonus) -> bool {
        merge::remove_bonus(&mut self.bonuses, bonus)
    }

    pub fn write(&self, writer: &mut WireWriter, registries: &Registries) -> Result<(), CodecError> {
        writer.write_id(&self.id)?;
        writer.write_int(self.button_size);
        writer.write_id(&self.background)?;
        writer.write_id(&self.icon)?;
        writer.write_id(&self.border)?;
        writer.write_bool(self.starting_point);
        writer.write_float(self.x);
        writer.write_float(self.y);
        write_ids(writer, &self.connected_skills)?;
        write_optional_id(writer, self.connected_tree.as_ref())?;
        write_list(writer, registries, &self.bonuses)?;
        write_ids(writer, &self.gateways)
    }

    /// Read a skill; the bonuses are re-added one by one, so duplicates
    /// in the stream arrive merged.
    pub fn read(reader: &mut WireReader, registries: &Registries) -> Result<Self, CodecError> {
        let mut skill = Self::new(
            reader.read_id()?,
            reader.read_int()?,
            reader.read_id()?,
            reader.read_id()?,
            reader.read_id()?,
            reader.read_bool()?,
        );
        skill.set_position(reader.read_float()?, reader.read_float()?);
        skill.connected_skills = read_ids(reader)?;
        skill.connected_tree = read_optional_id(reader)?;
        for bonus in read_list(reader, registries)? {
            skill.add_bonus(bonus);
        }
        skill.gateways = read_ids(reader)?;
        Ok(skill)
    }

    pub fn save(&self, registries: &Registries) -> Result<CompoundTag, CodecError> {
        let mut tag = CompoundTag::new();
        tag.put_id("id", &self.id);
        tag.put_i32("button_size", self.button_size);
        tag.put_id("background_texture", &self.background);
        tag.put_id("icon_texture", &self.icon);
        tag.put_id("border_texture", &self.border);
        tag.put_bool("starting_point", self.starting_point);
        tag.put_f32("x", self.x);
        tag.put_f32("y", self.y);
        tag.put_id_list("connections", &self.connected_skills);
        if let Some(tree) = &self.connected_tree {
            tag.put_id("connected_tree", tree);
        }
        tag.put_list("bonuses", save_list(registries, &self.bonuses)?);
        tag.put_id_list("gateway_connections", &self.gateways);
        Ok(tag)
    }

    /// Load a skill record. Unreadable bonuses are dropped; a missing or
    /// malformed skill field fails the whole record.
    pub fn load(tag: &CompoundTag, registries: &Registries) -> Result<Self, CodecError> {
        let mut skill = Self::new(
            tag.get_id("id")?,
            tag.get_i32("button_size")?,
            tag.get_id("background_texture")?,
            tag.get_id("icon_texture")?,
            tag.get_id("border_texture")?,
            tag.get_bool("starting_point")?,
        );
        skill.set_position(tag.get_f32("x")?, tag.get_f32("y")?);
        skill.connected_skills = optional_id_list(tag, "connections")?;
        skill.connected_tree = tag.get_optional_id("connected_tree")?;
        if tag.contains("bonuses") {
            for bonus in load_list_lossy::<SkillBonus>(tag.get_array("bonuses")?, registries) {
                skill.add_bonus(bonus);
            }
        }
        skill.gateways = optional_id_list(tag, "gateway_connections")?;
        Ok(skill)
    }
}

fn optional_id_list(tag: &CompoundTag, key: &str) -> Result<Vec<ResourceId>, CodecError> {
    if tag.contains(key) {
        tag.get_id_list(key)
    } else {
        Ok(Vec::new())
    }
}

/// A named set of skills.
#[derive(Debug, Clone, PartialEq)]
pub struct PassiveSkillTree {
    pub id: ResourceId,
    pub skill_ids: Vec<ResourceId>,
}

impl PassiveSkillTree {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            skill_ids: Vec::new(),
        }
    }

    pub fn write(&self, writer: &mut WireWriter) -> Result<(), CodecError> {
        writer.write_id(&self.id)?;
        write_ids(writer, &self.skill_ids)
    }

    pub fn read(reader: &mut WireReader) -> Result<Self, CodecError> {
        Ok(Self {
            id: reader.read_id()?,
            skill_ids: read_ids(reader)?,
        })
    }

    pub fn save(&self) -> CompoundTag {
        let mut tag = CompoundTag::new();
        tag.put_id("id", &self.id);
        tag.put_id_list("skill_ids", &self.skill_ids);
        tag
    }

    pub fn load(tag: &CompoundTag) -> Result<Self, CodecError> {
        Ok(Self {
            id: tag.get_id("id")?,
            skill_ids: optional_id_list(tag, "skill_ids")?,
        })
    }
}

pub fn write_skills<'a, I>(
    writer: &mut WireWriter,
    registries: &Registries,
    skills: I,
) -> Result<(), CodecError>
where
    I: IntoIterator<Item = &'a PassiveSkill>,
{
    let skills: Vec<&PassiveSkill> = skills.into_iter().collect();
    write_counted(writer, &skills, |writer, skill| skill.write(writer, registries))
}

pub fn read_skills(
    reader: &mut WireReader,
    registries: &Registries,
) -> Result<Vec<PassiveSkill>, CodecError> {
    read_counted(reader, |reader| PassiveSkill::read(reader, registries))
}

pub fn write_trees<'a, I>(writer: &mut WireWriter, trees: I) -> Result<(), CodecError>
where
    I: IntoIterator<Item = &'a PassiveSkillTree>,
{
    let trees: Vec<&PassiveSkillTree> = trees.into_iter().collect();
    write_counted(writer, &trees, |writer, tree| tree.write(writer))
}

pub fn read_trees(reader: &mut WireReader) -> Result<Vec<PassiveSkillTree>, CodecError> {
    read_counted(reader, PassiveSkillTree::read)
}

/// Every loaded skill and tree, keyed by identifier.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use skilltree::skill::SkillLibrary;
/// use skilltree::Registries;
///
/// let registries = Registries::builtin().unwrap();
/// let good = json!({
///     "id": "skilltree:hunter_class",
///     "button_size": 24,
///     "background_texture": "skilltree:textures/icons/background/class.png",
///     "icon_texture": "skilltree:textures/icons/bow.png",
///     "border_texture": "skilltree:textures/tooltip/class.png",
///     "starting_point": true,
///     "x": 0.0,
///     "y": 0.0
/// });
/// let broken = json!({ "id": "skilltree:broken" });
///
/// let mut library = SkillLibrary::new();
/// library.load_skills([("hunter_class", &good), ("broken", &broken)], &registries);
/// assert_eq!(library.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SkillLibrary {
    skills: BTreeMap<ResourceId, PassiveSkill>,
    trees: BTreeMap<ResourceId, PassiveSkillTree>,
}

impl SkillLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load skill records, each paired with its source name for logging.
    ///
    /// Replaces the current skills. A record that fails to load is logged
    /// and skipped; a later record with the same id replaces an earlier one.
    pub fn load_skills<'a, I>(&mut self, records: I, registries: &Registries)
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        self.skills.clear();
        for (source, record) in records {
            let loaded = CompoundTag::from_value(record.clone())
                .and_then(|tag| PassiveSkill::load(&tag, registries));
            match loaded {
                Ok(skill) => {
                    self.skills.insert(skill.id.clone(), skill);
                }
                Err(error) => {
                    tracing::error!(source, %error, "couldn't load passive skill");
                }
            }
        }
        tracing::debug!(skills = self.skills.len(), "passive skills loaded");
    }

    pub fn load_trees<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        self.trees.clear();
        for (source, record) in records {
            match CompoundTag::from_value(record.clone()).and_then(|tag| PassiveSkillTree::load(&tag))
            {
                Ok(tree) => {
                    self.trees.insert(tree.id.clone(), tree);
                }
                Err(error) => {
                    tracing::error!(source, %error, "couldn't load skill tree");
                }
            }
        }
    }

    /// Replace the contents with skills and trees received from the
    /// authoritative side.
    pub fn replace(&mut self, skills: Vec<PassiveSkill>, trees: Vec<PassiveSkillTree>) {
        self.skills = skills
            .into_iter()
            .map(|skill| (skill.id.clone(), skill))
            .collect();
        self.trees = trees.into_iter().map(|tree| (tree.id.clone(), tree)).collect();
    }

    pub fn skill(&self, id: &ResourceId) -> Option<&PassiveSkill> {
        self.skills.get(id)
    }

    pub fn tree(&self, id: &ResourceId) -> Option<&PassiveSkillTree> {
        self.trees.get(id)
    }

    pub fn skills(&self) -> impl Iterator<Item = &PassiveSkill> {
        self.skills.values()
    }

    pub fn trees(&self) -> impl Iterator<Item = &PassiveSkillTree> {
        self.trees.values()
    }

    /// Skills of one tree, in the tree's order. Unknown ids are skipped.
    pub fn tree_skills<'a>(
        &'a self,
        tree: &'a PassiveSkillTree,
    ) -> impl Iterator<Item = &'a PassiveSkill> + 'a {
        tree.skill_ids.iter().filter_map(|id| self.skills.get(id))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Write every skill then every tree.
    pub fn write(&self, writer: &mut WireWriter, registries: &Registries) -> Result<(), CodecError> {
        write_skills(writer, registries, self.skills())?;
        write_trees(writer, self.trees())
    }

    pub fn read(reader: &mut WireReader, registries: &Registries) -> Result<Self, CodecError> {
        let mut library = Self::new();
        let skills = read_skills(reader, registries)?;
        let trees = read_trees(reader)?;
        library.replace(skills, trees);
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::CombatBonus;
    use crate::operation::Operation;

    fn id(s: &str) -> ResourceId {
        ResourceId::parse(s).unwrap()
    }

    fn skill(path: &str) -> PassiveSkill {
        PassiveSkill::new(
            ResourceId::builtin(path).unwrap(),
            16,
            id("skilltree:textures/icons/background/lesser.png"),
            id("skilltree:textures/icons/void.png"),
            id("skilltree:textures/tooltip/lesser.png"),
            false,
        )
    }

    fn damage(amount: f32) -> SkillBonus {
        SkillBonus::Damage(CombatBonus::new(amount, Operation::MultiplyBase))
    }

    #[test]
    fn test_skill_bonuses_merge() {
        let mut skill = skill("hunter_1");
        skill.add_bonus(damage(0.25));
        skill.add_bonus(damage(0.25));
        assert_eq!(skill.bonuses, vec![damage(0.5)]);
        assert!(skill.remove_bonus(&damage(0.5)));
        assert!(skill.bonuses.is_empty());
    }

    #[test]
    fn test_tag_drops_unknown_bonus() {
        let registries = Registries::builtin().unwrap();
        let mut original = skill("hunter_2");
        original.add_bonus(damage(0.1));
        let mut tag = original.save(&registries).unwrap();

        let mut records: Vec<Value> = tag.get_array("bonuses").unwrap().to_vec();
        let mut unknown = CompoundTag::new();
        unknown.put_string("type", "mod:nonexistent");
        records.insert(0, unknown.into());
        tag.put_list(
            "bonuses",
            records
                .into_iter()
                .map(|record| CompoundTag::from_value(record).unwrap())
                .collect(),
        );

        assert_eq!(PassiveSkill::load(&tag, &registries).unwrap(), original);
    }

    #[test]
    fn test_tree_tag_defaults() {
        let tag = CompoundTag::from_json_str(r#"{"id": "skilltree:main_tree"}"#).unwrap();
        let tree = PassiveSkillTree::load(&tag).unwrap();
        assert!(tree.skill_ids.is_empty());
    }

    #[test]
    fn test_tree_skills_skip_unknown() {
        let registries = Registries::builtin().unwrap();
        let mut library = SkillLibrary::new();
        let record: Value = skill("known").save(&registries).unwrap().into();
        library.load_skills([("known", &record)], &registries);

        let mut tree = PassiveSkillTree::new(id("skilltree:main_tree"));
        tree.skill_ids = vec![id("skilltree:missing"), id("skilltree:known")];
        let found: Vec<_> = library.tree_skills(&tree).map(|s| s.id.clone()).collect();
        assert_eq!(found, vec![id("skilltree:known")]);
    }

    #[test]
    fn test_truncated_stream_fails() {
        let registries = Registries::builtin().unwrap();
        let mut writer = WireWriter::new();
        skill("cut").write(&mut writer, &registries).unwrap();
        let bytes = writer.freeze();
        let mut reader = WireReader::new(bytes.slice(..bytes.len() - 2));
        assert!(matches!(
            PassiveSkill::read(&mut reader, &registries),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }
}
