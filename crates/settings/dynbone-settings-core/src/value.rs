//! Value: the field values carried between target objects and the codec.
//! All numeric types use f32, matching the host component.

use serde::{Deserialize, Serialize};

use crate::collider::ColliderSettings;
use crate::symbols::EnumSymbols;

/// 3-component vector (x, y, z).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Extrapolation mode of a curve outside its key range. Stored as the host
/// engine's integer code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapMode {
    #[default]
    Default,
    Once,
    Loop,
    PingPong,
    ClampForever,
}

impl WrapMode {
    pub fn code(self) -> i32 {
        match self {
            WrapMode::Default => 0,
            WrapMode::Once => 1,
            WrapMode::Loop => 2,
            WrapMode::PingPong => 4,
            WrapMode::ClampForever => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(WrapMode::Default),
            1 => Some(WrapMode::Once),
            2 => Some(WrapMode::Loop),
            4 => Some(WrapMode::PingPong),
            8 => Some(WrapMode::ClampForever),
            _ => None,
        }
    }
}

/// One control point of a piecewise curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    pub in_tangent: f32,
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// Piecewise curve. Key order is significant and kept exactly as given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub pre_wrap_mode: WrapMode,
    pub post_wrap_mode: WrapMode,
    pub keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(keys: Vec<Keyframe>) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    /// Straight line from (t0, v0) to (t1, v1) with matching tangents.
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        let slope = if t1 != t0 { (v1 - v0) / (t1 - t0) } else { 0.0 };
        Self::new(vec![
            Keyframe::new(t0, v0, 0.0, slope),
            Keyframe::new(t1, v1, slope, 0.0),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Coarse kind of a value, used for dispatch and error reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Bool,
    Vec3,
    Curve,
    Enum,
    Colliders,
    Opaque,
}

/// Declared kind of a target field. Enumerations carry their symbol table so
/// the codec can validate stored names.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Bool,
    Vec3,
    Curve,
    Enum(&'static EnumSymbols),
    Colliders,
    Opaque,
}

impl FieldKind {
    #[inline]
    pub fn value_kind(&self) -> ValueKind {
        match self {
            FieldKind::Number => ValueKind::Number,
            FieldKind::Bool => ValueKind::Bool,
            FieldKind::Vec3 => ValueKind::Vec3,
            FieldKind::Curve => ValueKind::Curve,
            FieldKind::Enum(_) => ValueKind::Enum,
            FieldKind::Colliders => ValueKind::Colliders,
            FieldKind::Opaque => ValueKind::Opaque,
        }
    }
}

/// Runtime value of one field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum FieldValue {
    Number(f32),
    Bool(bool),
    Vec3(Vec3),
    Curve(Curve),
    /// Symbolic name of an enumeration value
    Enum(String),
    Colliders(Vec<ColliderSettings>),
    /// Default string form of a value of unsupported kind
    Opaque(String),
}

impl FieldValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Number(_) => ValueKind::Number,
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::Vec3(_) => ValueKind::Vec3,
            FieldValue::Curve(_) => ValueKind::Curve,
            FieldValue::Enum(_) => ValueKind::Enum,
            FieldValue::Colliders(_) => ValueKind::Colliders,
            FieldValue::Opaque(_) => ValueKind::Opaque,
        }
    }
}
