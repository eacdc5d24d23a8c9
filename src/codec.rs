//! Discriminator-then-payload framing for every registry family.
//!
//! A value is written as its registry identifier followed by its payload;
//! the reader resolves the identifier to pick the decoder. Collections are
//! a count followed by that many framed values, optionals are a presence
//! flag followed by the value when present. The same generic routines
//! serve bonuses, item bonuses, the four condition kinds and multipliers.
//!
//! In the structured-tag form the identifier lives in the record's
//! `type` field. Reading a persisted list is lossy: a record with an
//! unknown `type` or a missing field is logged and dropped.

use crate::error::CodecError;
use crate::id::ResourceId;
use crate::registry::{Family, Registries};
use crate::tag::CompoundTag;
use crate::wire::{WireReader, WireWriter};
use serde_json::Value;

/// Record field holding the registry identifier.
pub const TYPE_KEY: &str = "type";

/// Small fieldless enums stored by ordinal on the wire and by name in
/// persisted records.
pub trait Ordinal: Copy + PartialEq + Sized + 'static {
    /// Name used in error messages.
    const WHAT: &'static str;
    /// Every value in ordinal order.
    const VALUES: &'static [Self];

    fn name(self) -> &'static str;

    fn ordinal(self) -> i32 {
        Self::VALUES
            .iter()
            .position(|value| *value == self)
            .map_or(-1, |index| index as i32)
    }

    fn from_ordinal(ordinal: i32) -> Result<Self, CodecError> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Self::VALUES.get(index).copied())
            .ok_or_else(|| CodecError::InvalidOrdinal {
                what: Self::WHAT,
                value: ordinal.to_string(),
            })
    }

    fn from_name(name: &str) -> Result<Self, CodecError> {
        Self::VALUES
            .iter()
            .copied()
            .find(|value| value.name() == name)
            .ok_or_else(|| CodecError::InvalidOrdinal {
                what: Self::WHAT,
                value: name.to_string(),
            })
    }
}

pub fn write_ordinal<T: Ordinal>(writer: &mut WireWriter, value: T) {
    writer.write_int(value.ordinal());
}

pub fn read_ordinal<T: Ordinal>(reader: &mut WireReader) -> Result<T, CodecError> {
    T::from_ordinal(reader.read_int()?)
}

pub fn save_ordinal<T: Ordinal>(tag: &mut CompoundTag, key: &str, value: T) {
    tag.put_string(key, value.name());
}

pub fn load_ordinal<T: Ordinal>(tag: &CompoundTag, key: &str) -> Result<T, CodecError> {
    T::from_name(tag.get_string(key)?)
}

/// Write a count followed by each element.
pub fn write_counted<T, W>(
    writer: &mut WireWriter,
    values: &[T],
    mut write: W,
) -> Result<(), CodecError>
where
    W: FnMut(&mut WireWriter, &T) -> Result<(), CodecError>,
{
    writer.write_int(values.len() as i32);
    for value in values {
        write(writer, value)?;
    }
    Ok(())
}

/// Read a count followed by that many elements.
pub fn read_counted<T, R>(reader: &mut WireReader, mut read: R) -> Result<Vec<T>, CodecError>
where
    R: FnMut(&mut WireReader) -> Result<T, CodecError>,
{
    let count = reader.read_count()?;
    // Every element costs at least one byte, so this bounds the allocation.
    let mut values = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        values.push(read(reader)?);
    }
    Ok(values)
}

/// Write `value` framed by its family identifier.
///
/// # Examples
///
/// ```rust
/// use skilltree::codec::{read_value, write_value};
/// use skilltree::wire::{WireReader, WireWriter};
/// use skilltree::{ItemBonus, Operation, Registries};
///
/// let registries = Registries::builtin().unwrap();
/// let bonus = ItemBonus::Durability { amount: 10.0, operation: Operation::Add };
///
/// let mut writer = WireWriter::new();
/// write_value(&mut writer, &registries, &bonus).unwrap();
///
/// let mut reader = WireReader::new(writer.freeze());
/// let back: ItemBonus = read_value(&mut reader, &registries).unwrap();
/// assert_eq!(back, bonus);
/// ```
pub fn write_value<F: Family>(
    writer: &mut WireWriter,
    registries: &Registries,
    value: &F,
) -> Result<(), CodecError> {
    let id = F::registry(registries).identifier_of(value.kind())?;
    writer.write_id(id)?;
    value.write_payload(writer, registries)
}

/// Read one framed value.
///
/// An unknown identifier is an error here: the payload length is not
/// known, so the rest of the stream cannot be realigned.
pub fn read_value<F: Family>(
    reader: &mut WireReader,
    registries: &Registries,
) -> Result<F, CodecError> {
    let id = reader.read_id()?;
    let decoder = F::registry(registries).resolve(&id)?;
    (decoder.read)(reader, registries)
}

pub fn write_list<F: Family>(
    writer: &mut WireWriter,
    registries: &Registries,
    values: &[F],
) -> Result<(), CodecError> {
    write_counted(writer, values, |writer, value| {
        write_value(writer, registries, value)
    })
}

pub fn read_list<F: Family>(
    reader: &mut WireReader,
    registries: &Registries,
) -> Result<Vec<F>, CodecError> {
    read_counted(reader, |reader| read_value(reader, registries))
}

pub fn write_optional<F: Family>(
    writer: &mut WireWriter,
    registries: &Registries,
    value: Option<&F>,
) -> Result<(), CodecError> {
    writer.write_bool(value.is_some());
    match value {
        Some(value) => write_value(writer, registries, value),
        None => Ok(()),
    }
}

pub fn read_optional<F: Family>(
    reader: &mut WireReader,
    registries: &Registries,
) -> Result<Option<F>, CodecError> {
    if reader.read_bool()? {
        read_value(reader, registries).map(Some)
    } else {
        Ok(None)
    }
}

pub fn write_ids(writer: &mut WireWriter, ids: &[ResourceId]) -> Result<(), CodecError> {
    write_counted(writer, ids, |writer, id| writer.write_id(id))
}

pub fn read_ids(reader: &mut WireReader) -> Result<Vec<ResourceId>, CodecError> {
    read_counted(reader, WireReader::read_id)
}

pub fn write_optional_id(
    writer: &mut WireWriter,
    id: Option<&ResourceId>,
) -> Result<(), CodecError> {
    writer.write_bool(id.is_some());
    match id {
        Some(id) => writer.write_id(id),
        None => Ok(()),
    }
}

pub fn read_optional_id(reader: &mut WireReader) -> Result<Option<ResourceId>, CodecError> {
    if reader.read_bool()? {
        reader.read_id().map(Some)
    } else {
        Ok(None)
    }
}

pub fn write_optional_float(writer: &mut WireWriter, value: Option<f32>) {
    writer.write_bool(value.is_some());
    if let Some(value) = value {
        writer.write_float(value);
    }
}

pub fn read_optional_float(reader: &mut WireReader) -> Result<Option<f32>, CodecError> {
    if reader.read_bool()? {
        reader.read_float().map(Some)
    } else {
        Ok(None)
    }
}

/// Persist `value` as a record carrying its identifier under `type`.
pub fn save_value<F: Family>(
    registries: &Registries,
    value: &F,
) -> Result<CompoundTag, CodecError> {
    let id = F::registry(registries).identifier_of(value.kind())?;
    let mut tag = CompoundTag::new();
    value.save_payload(&mut tag, registries)?;
    tag.put_id(TYPE_KEY, id);
    Ok(tag)
}

pub fn load_value<F: Family>(tag: &CompoundTag, registries: &Registries) -> Result<F, CodecError> {
    let id = tag.get_id(TYPE_KEY)?;
    let decoder = F::registry(registries).resolve(&id)?;
    (decoder.load)(tag, registries)
}

pub fn save_list<F: Family>(
    registries: &Registries,
    values: &[F],
) -> Result<Vec<CompoundTag>, CodecError> {
    values
        .iter()
        .map(|value| save_value(registries, value))
        .collect()
}

/// Decode persisted records, dropping (and logging) any that fail.
///
/// # Examples
///
/// ```rust
/// use skilltree::codec::{load_list_lossy, save_value};
/// use skilltree::{CompoundTag, ItemBonus, Registries};
///
/// let registries = Registries::builtin().unwrap();
/// let good = save_value(&registries, &ItemBonus::Sockets { sockets: 1 }).unwrap();
/// let mut bad = CompoundTag::new();
/// bad.put_string("type", "mod:nonexistent");
///
/// let records: Vec<serde_json::Value> = vec![good.into(), bad.into()];
/// let bonuses: Vec<ItemBonus> = load_list_lossy(&records, &registries);
/// assert_eq!(bonuses, vec![ItemBonus::Sockets { sockets: 1 }]);
/// ```
pub fn load_list_lossy<F: Family>(records: &[Value], registries: &Registries) -> Vec<F> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let decoded = CompoundTag::from_value(record.clone())
                .and_then(|tag| load_value::<F>(&tag, registries));
            match decoded {
                Ok(value) => Some(value),
                Err(error) => {
                    tracing::warn!(
                        family = F::FAMILY,
                        index,
                        %error,
                        "dropping persisted record"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Store an optional nested value; `None` leaves the key absent.
pub fn save_optional<F: Family>(
    tag: &mut CompoundTag,
    key: &str,
    registries: &Registries,
    value: Option<&F>,
) -> Result<(), CodecError> {
    if let Some(value) = value {
        tag.put_compound(key, save_value(registries, value)?);
    }
    Ok(())
}

pub fn load_optional<F: Family>(
    tag: &CompoundTag,
    key: &str,
    registries: &Registries,
) -> Result<Option<F>, CodecError> {
    if tag.contains(key) {
        load_value(&tag.get_compound(key)?, registries).map(Some)
    } else {
        Ok(None)
    }
}

pub fn save_nested<F: Family>(
    tag: &mut CompoundTag,
    key: &str,
    registries: &Registries,
    value: &F,
) -> Result<(), CodecError> {
    tag.put_compound(key, save_value(registries, value)?);
    Ok(())
}

pub fn load_nested<F: Family>(
    tag: &CompoundTag,
    key: &str,
    registries: &Registries,
) -> Result<F, CodecError> {
    load_value(&tag.get_compound(key)?, registries)
}

/// Translation key for a value: `family.namespace.path[.sub_key]`.
///
/// # Examples
///
/// ```rust
/// use skilltree::codec::translation_key;
/// use skilltree::{ItemCondition, Registries};
/// use skilltree::condition::WeaponType;
///
/// let registries = Registries::builtin().unwrap();
/// let condition = ItemCondition::Weapon(WeaponType::Melee);
/// let key = translation_key(&registries, &condition, condition.sub_key()).unwrap();
/// assert_eq!(key, "item_condition.skilltree.weapon.melee");
/// ```
pub fn translation_key<F: Family>(
    registries: &Registries,
    value: &F,
    sub_key: Option<&str>,
) -> Result<String, CodecError> {
    let id = F::registry(registries).identifier_of(value.kind())?;
    let mut key = format!("{}.{}.{}", F::FAMILY, id.namespace(), id.path());
    if let Some(sub_key) = sub_key {
        key.push('.');
        key.push_str(sub_key);
    }
    Ok(key)
}
