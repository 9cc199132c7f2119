//! DynamicBoneCollider settings and their schema table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::document::RecordKind;
use crate::schema::{Schema, Settings};
use crate::symbols::symbolic_enum;
use crate::value::Vec3;

symbolic_enum! {
    /// Axis the capsule is aligned to.
    pub enum Direction {
        X,
        Y,
        Z,
    }
}

symbolic_enum! {
    /// Whether bones are kept outside or inside the collider.
    pub enum Bound {
        Outside,
        Inside,
    }
}

/// Tunable parameters of one collider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderSettings {
    pub direction: Direction,
    pub center: Vec3,
    pub bound: Bound,
    pub radius: f32,
    pub height: f32,
}

impl Default for ColliderSettings {
    fn default() -> Self {
        Self {
            direction: Direction::Y,
            center: Vec3::ZERO,
            bound: Bound::Outside,
            radius: 0.5,
            height: 0.0,
        }
    }
}

static COLLIDER_SCHEMA: Lazy<Schema<ColliderSettings>> = Lazy::new(|| {
    Schema::<ColliderSettings>::builder(RecordKind::Collider)
        .enumeration("m_Direction", |c| c.direction, |c, v| c.direction = v)
        .vec3("m_Center", |c| c.center, |c, v| c.center = v)
        .enumeration("m_Bound", |c| c.bound, |c, v| c.bound = v)
        .number("m_Radius", |c| c.radius, |c, v| c.radius = v)
        .number("m_Height", |c| c.height, |c, v| c.height = v)
        .build()
});

impl Settings for ColliderSettings {
    fn schema() -> &'static Schema<Self> {
        &COLLIDER_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldKind, FieldValue};

    #[test]
    fn field_order_is_fixed() {
        let names: Vec<_> = ColliderSettings::schema().names().collect();
        assert_eq!(
            names,
            vec!["m_Direction", "m_Center", "m_Bound", "m_Radius", "m_Height"]
        );
        assert_eq!(ColliderSettings::record_kind(), RecordKind::Collider);
    }

    #[test]
    fn enum_fields_carry_symbol_tables() {
        let schema = ColliderSettings::schema();
        match schema.field("m_Bound").unwrap().kind() {
            FieldKind::Enum(symbols) => assert_eq!(symbols.symbols, &["Outside", "Inside"]),
            other => panic!("unexpected kind {other:?}"),
        }
        let c = ColliderSettings::default();
        assert_eq!(
            schema.field("m_Direction").unwrap().read(&c),
            FieldValue::Enum("Y".into())
        );
    }
}
