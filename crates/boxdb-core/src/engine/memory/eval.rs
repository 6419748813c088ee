use crate::{
    buffer::{DecodeError, Table},
    engine::{NativeError, ParamValue},
    model::{ModelEntity, ModelProperty},
    query::Condition,
};
use boxdb_primitives::PropertyType;
use std::fmt::Write as _;

const fn is_integer(ty: PropertyType) -> bool {
    matches!(
        ty,
        PropertyType::Bool
            | PropertyType::Byte
            | PropertyType::Short
            | PropertyType::Char
            | PropertyType::Int
            | PropertyType::Long
            | PropertyType::Date
            | PropertyType::Relation
    )
}

fn property_of<'a>(
    entity: &'a ModelEntity,
    condition: &Condition,
) -> Result<(&'a ModelProperty, u16), NativeError> {
    let handle = condition.property();
    if handle.entity_id() != entity.id {
        return Err(NativeError::illegal_argument(format!(
            "condition property belongs to entity {}, query is for '{}'",
            handle.entity_id(),
            entity.name
        )));
    }

    let id = handle.property_id();
    entity
        .property(id)
        .zip(entity.slot_offset(id))
        .ok_or_else(|| {
            NativeError::illegal_argument(format!(
                "property {id} is not part of entity '{}'",
                entity.name
            ))
        })
}

/// Check a condition against the model before it is compiled.
pub(super) fn validate(entity: &ModelEntity, condition: &Condition) -> Result<(), NativeError> {
    let (prop, _) = property_of(entity, condition)?;
    let ty = prop.property_type;

    let fits = match condition {
        Condition::StringEquals { .. } | Condition::StringIn { .. } => ty == PropertyType::String,
        Condition::IntEquals { .. }
        | Condition::IntGreater { .. }
        | Condition::IntLess { .. }
        | Condition::IntBetween { .. }
        | Condition::Int64In { .. }
        | Condition::Int32In { .. } => is_integer(ty),
        Condition::DoubleGreater { .. }
        | Condition::DoubleLess { .. }
        | Condition::DoubleBetween { .. } => {
            matches!(ty, PropertyType::Float | PropertyType::Double)
        }
        Condition::BytesEquals { .. } => ty == PropertyType::ByteVector,
    };

    if fits {
        Ok(())
    } else {
        Err(NativeError::illegal_argument(format!(
            "condition on '{}' does not apply to a {ty} property",
            prop.name
        )))
    }
}

pub(super) fn matches_all(
    entity: &ModelEntity,
    table: &Table<'_>,
    conditions: &[Condition],
) -> Result<bool, NativeError> {
    for condition in conditions {
        if !matches(entity, table, condition)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn matches(
    entity: &ModelEntity,
    table: &Table<'_>,
    condition: &Condition,
) -> Result<bool, NativeError> {
    let (prop, vt) = property_of(entity, condition)?;
    let corrupt = |err: DecodeError| {
        NativeError::illegal_state(format!("property '{}' is unreadable: {err}", prop.name))
    };

    let int = || read_int(table, vt, prop).map_err(corrupt);
    let double = || read_double(table, vt, prop).map_err(corrupt);
    let text = || table.get_str_slot(vt).map_err(corrupt);

    let hit = match condition {
        Condition::StringEquals { value, .. } => text()? == value,
        Condition::StringIn { values, .. } => {
            let found = text()?;
            values.iter().any(|v| v == found)
        }
        Condition::IntEquals { value, .. } => int()? == i128::from(*value),
        Condition::IntGreater { value, .. } => int()? > i128::from(*value),
        Condition::IntLess { value, .. } => int()? < i128::from(*value),
        Condition::IntBetween { low, high, .. } => {
            (i128::from(*low)..=i128::from(*high)).contains(&int()?)
        }
        Condition::Int64In { values, .. } => {
            let found = int()?;
            values.iter().any(|v| i128::from(*v) == found)
        }
        Condition::Int32In { values, .. } => {
            let found = int()?;
            values.iter().any(|v| i128::from(*v) == found)
        }
        Condition::DoubleGreater { value, .. } => double()? > *value,
        Condition::DoubleLess { value, .. } => double()? < *value,
        Condition::DoubleBetween { low, high, .. } => {
            let found = double()?;
            *low <= found && found <= *high
        }
        Condition::BytesEquals { value, .. } => {
            table.get_bytes_slot(vt).map_err(corrupt)? == value.as_slice()
        }
    };

    Ok(hit)
}

fn read_int(table: &Table<'_>, vt: u16, prop: &ModelProperty) -> Result<i128, DecodeError> {
    let unsigned = prop.is_unsigned();

    let value = match prop.property_type {
        PropertyType::Bool => i128::from(table.get_slot::<bool>(vt, false)?),
        PropertyType::Byte if unsigned => i128::from(table.get_slot::<u8>(vt, 0)?),
        PropertyType::Byte => i128::from(table.get_slot::<i8>(vt, 0)?),
        PropertyType::Short if unsigned => i128::from(table.get_slot::<u16>(vt, 0)?),
        PropertyType::Short => i128::from(table.get_slot::<i16>(vt, 0)?),
        PropertyType::Char => i128::from(table.get_slot::<u32>(vt, 0)?),
        PropertyType::Int if unsigned => i128::from(table.get_slot::<u32>(vt, 0)?),
        PropertyType::Int => i128::from(table.get_slot::<i32>(vt, 0)?),
        PropertyType::Long if unsigned => i128::from(table.get_slot::<u64>(vt, 0)?),
        _ => i128::from(table.get_slot::<i64>(vt, 0)?),
    };

    Ok(value)
}

fn read_double(table: &Table<'_>, vt: u16, prop: &ModelProperty) -> Result<f64, DecodeError> {
    if prop.property_type == PropertyType::Float {
        Ok(f64::from(table.get_slot::<f32>(vt, 0.0)?))
    } else {
        table.get_slot::<f64>(vt, 0.0)
    }
}

/// Replace a condition's value if `value` has the matching shape.
pub(super) fn apply_param(condition: &mut Condition, value: &ParamValue) -> bool {
    match (condition, value) {
        (Condition::StringEquals { value, .. }, ParamValue::String(next)) => {
            value.clone_from(next);
        }
        (Condition::StringIn { values, .. }, ParamValue::StringIn(next)) => {
            values.clone_from(next);
        }
        (
            Condition::IntEquals { value, .. }
            | Condition::IntGreater { value, .. }
            | Condition::IntLess { value, .. },
            ParamValue::Int(next),
        ) => *value = *next,
        (Condition::IntBetween { low, high, .. }, ParamValue::IntPair(a, b)) => {
            *low = *a;
            *high = *b;
        }
        (Condition::Int64In { values, .. }, ParamValue::Int64In(next)) => values.clone_from(next),
        (Condition::Int32In { values, .. }, ParamValue::Int32In(next)) => values.clone_from(next),
        (
            Condition::DoubleGreater { value, .. } | Condition::DoubleLess { value, .. },
            ParamValue::Double(next),
        ) => *value = *next,
        (Condition::DoubleBetween { low, high, .. }, ParamValue::DoublePair(a, b)) => {
            *low = *a;
            *high = *b;
        }
        (Condition::BytesEquals { value, .. }, ParamValue::Bytes(next)) => value.clone_from(next),
        _ => return false,
    }

    true
}

/// Human-readable form of a compiled query, parameters included.
pub(super) fn describe(entity: &ModelEntity, conditions: &[Condition]) -> String {
    let mut out = format!("{} ", entity.name);
    if conditions.is_empty() {
        out.push_str("(all)");
        return out;
    }

    out.push_str("where ");
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            out.push_str(" AND ");
        }

        let id = condition.property().property_id();
        let name = entity.property(id).map_or("?", |p| p.name.as_str());

        let _ = match condition {
            Condition::StringEquals { value, .. } => write!(out, "{name} == {value:?}"),
            Condition::StringIn { values, .. } => write!(out, "{name} in {values:?}"),
            Condition::IntEquals { value, .. } => write!(out, "{name} == {value}"),
            Condition::IntGreater { value, .. } => write!(out, "{name} > {value}"),
            Condition::IntLess { value, .. } => write!(out, "{name} < {value}"),
            Condition::IntBetween { low, high, .. } => {
                write!(out, "{name} between {low} and {high}")
            }
            Condition::Int64In { values, .. } => write!(out, "{name} in {values:?}"),
            Condition::Int32In { values, .. } => write!(out, "{name} in {values:?}"),
            Condition::DoubleGreater { value, .. } => write!(out, "{name} > {value}"),
            Condition::DoubleLess { value, .. } => write!(out, "{name} < {value}"),
            Condition::DoubleBetween { low, high, .. } => {
                write!(out, "{name} between {low} and {high}")
            }
            Condition::BytesEquals { value, .. } => {
                write!(out, "{name} == byte[{}]", value.len())
            }
        };
    }

    out
}
