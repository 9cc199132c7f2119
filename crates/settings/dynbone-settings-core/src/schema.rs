//! Schema tables: the fixed, ordered list of stored fields of a target type,
//! each with its declared kind and a getter/setter pair.
//!
//! A table is built once per target type and replaces runtime reflection: the
//! typed constructors below tie every field's kind to accessors of the matching
//! Rust type, so a field can never be registered under the wrong kind.

use std::fmt;

use crate::collider::ColliderSettings;
use crate::document::RecordKind;
use crate::error::{Result, SettingsError};
use crate::symbols::SymbolicEnum;
use crate::value::{Curve, FieldKind, FieldValue, Vec3};

type Getter<T> = Box<dyn Fn(&T) -> FieldValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> Result<()> + Send + Sync>;

/// One stored field of a target type.
pub struct FieldDescriptor<T> {
    name: &'static str,
    kind: FieldKind,
    getter: Getter<T>,
    setter: Option<Setter<T>>,
}

fn mismatch(field: &str, expected: FieldKind, actual: &FieldValue) -> SettingsError {
    SettingsError::ValueKindMismatch {
        field: field.to_string(),
        expected: expected.value_kind(),
        actual: actual.kind(),
    }
}

impl<T: 'static> FieldDescriptor<T> {
    pub fn number(name: &'static str, get: fn(&T) -> f32, set: fn(&mut T, f32)) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
            getter: Box::new(move |t| FieldValue::Number(get(t))),
            setter: Some(Box::new(move |t, v| match v {
                FieldValue::Number(n) => {
                    set(t, n);
                    Ok(())
                }
                other => Err(mismatch(name, FieldKind::Number, &other)),
            })),
        }
    }

    pub fn boolean(name: &'static str, get: fn(&T) -> bool, set: fn(&mut T, bool)) -> Self {
        Self {
            name,
            kind: FieldKind::Bool,
            getter: Box::new(move |t| FieldValue::Bool(get(t))),
            setter: Some(Box::new(move |t, v| match v {
                FieldValue::Bool(b) => {
                    set(t, b);
                    Ok(())
                }
                other => Err(mismatch(name, FieldKind::Bool, &other)),
            })),
        }
    }

    pub fn vec3(name: &'static str, get: fn(&T) -> Vec3, set: fn(&mut T, Vec3)) -> Self {
        Self {
            name,
            kind: FieldKind::Vec3,
            getter: Box::new(move |t| FieldValue::Vec3(get(t))),
            setter: Some(Box::new(move |t, v| match v {
                FieldValue::Vec3(vec) => {
                    set(t, vec);
                    Ok(())
                }
                other => Err(mismatch(name, FieldKind::Vec3, &other)),
            })),
        }
    }

    pub fn curve(name: &'static str, get: fn(&T) -> Curve, set: fn(&mut T, Curve)) -> Self {
        Self {
            name,
            kind: FieldKind::Curve,
            getter: Box::new(move |t| FieldValue::Curve(get(t))),
            setter: Some(Box::new(move |t, v| match v {
                FieldValue::Curve(c) => {
                    set(t, c);
                    Ok(())
                }
                other => Err(mismatch(name, FieldKind::Curve, &other)),
            })),
        }
    }

    pub fn enumeration<E: SymbolicEnum>(
        name: &'static str,
        get: fn(&T) -> E,
        set: fn(&mut T, E),
    ) -> Self {
        let kind = FieldKind::Enum(E::SYMBOLS);
        Self {
            name,
            kind,
            getter: Box::new(move |t| FieldValue::Enum(get(t).symbol().to_string())),
            setter: Some(Box::new(move |t, v| match v {
                FieldValue::Enum(symbol) => {
                    let value =
                        E::from_symbol(&symbol).ok_or_else(|| SettingsError::InvalidEnumValue {
                            field: name.to_string(),
                            enum_name: E::SYMBOLS.name,
                            value: symbol.clone(),
                        })?;
                    set(t, value);
                    Ok(())
                }
                other => Err(mismatch(name, kind, &other)),
            })),
        }
    }

    pub fn colliders(
        name: &'static str,
        get: fn(&T) -> Vec<ColliderSettings>,
        set: fn(&mut T, Vec<ColliderSettings>),
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Colliders,
            getter: Box::new(move |t| FieldValue::Colliders(get(t))),
            setter: Some(Box::new(move |t, v| match v {
                FieldValue::Colliders(list) => {
                    set(t, list);
                    Ok(())
                }
                other => Err(mismatch(name, FieldKind::Colliders, &other)),
            })),
        }
    }

    /// A field of a kind the codec does not model. It is exported as its string
    /// form and never written back.
    pub fn opaque(name: &'static str, get: fn(&T) -> String) -> Self {
        Self {
            name,
            kind: FieldKind::Opaque,
            getter: Box::new(move |t| FieldValue::Opaque(get(t))),
            setter: None,
        }
    }
}

impl<T> FieldDescriptor<T> {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// False for fields that are exported but never imported.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn read(&self, target: &T) -> FieldValue {
        (self.getter)(target)
    }

    /// Write `value` onto `target`. Returns `Ok(false)` without touching the
    /// target when the field is read-only.
    pub fn write(&self, target: &mut T, value: FieldValue) -> Result<bool> {
        match &self.setter {
            Some(set) => set(target, value).map(|_| true),
            None => Ok(false),
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("writable", &self.setter.is_some())
            .finish()
    }
}

/// Ordered field table of one target type.
#[derive(Debug)]
pub struct Schema<T> {
    kind: RecordKind,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> Schema<T> {
    pub fn new(kind: RecordKind, fields: Vec<FieldDescriptor<T>>) -> Self {
        debug_assert!(
            {
                let mut names: Vec<_> = fields.iter().map(|f| f.name).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "duplicate field names in schema"
        );
        Self { kind, fields }
    }

    #[inline]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Fields in declared (export) order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

impl<T: 'static> Schema<T> {
    pub fn builder(kind: RecordKind) -> SchemaBuilder<T> {
        SchemaBuilder {
            kind,
            fields: Vec::new(),
        }
    }
}

/// Registers fields in declared order. Accessor closures are checked against
/// the concrete target type.
pub struct SchemaBuilder<T> {
    kind: RecordKind,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    pub fn number(mut self, name: &'static str, get: fn(&T) -> f32, set: fn(&mut T, f32)) -> Self {
        self.fields.push(FieldDescriptor::number(name, get, set));
        self
    }

    pub fn boolean(
        mut self,
        name: &'static str,
        get: fn(&T) -> bool,
        set: fn(&mut T, bool),
    ) -> Self {
        self.fields.push(FieldDescriptor::boolean(name, get, set));
        self
    }

    pub fn vec3(mut self, name: &'static str, get: fn(&T) -> Vec3, set: fn(&mut T, Vec3)) -> Self {
        self.fields.push(FieldDescriptor::vec3(name, get, set));
        self
    }

    pub fn curve(
        mut self,
        name: &'static str,
        get: fn(&T) -> Curve,
        set: fn(&mut T, Curve),
    ) -> Self {
        self.fields.push(FieldDescriptor::curve(name, get, set));
        self
    }

    pub fn enumeration<E: SymbolicEnum>(
        mut self,
        name: &'static str,
        get: fn(&T) -> E,
        set: fn(&mut T, E),
    ) -> Self {
        self.fields.push(FieldDescriptor::enumeration(name, get, set));
        self
    }

    pub fn colliders(
        mut self,
        name: &'static str,
        get: fn(&T) -> Vec<ColliderSettings>,
        set: fn(&mut T, Vec<ColliderSettings>),
    ) -> Self {
        self.fields.push(FieldDescriptor::colliders(name, get, set));
        self
    }

    pub fn opaque(mut self, name: &'static str, get: fn(&T) -> String) -> Self {
        self.fields.push(FieldDescriptor::opaque(name, get));
        self
    }

    pub fn build(self) -> Schema<T> {
        Schema::new(self.kind, self.fields)
    }
}

/// A target type with a registered schema table.
pub trait Settings: Clone + Sized + 'static {
    fn schema() -> &'static Schema<Self>;

    fn record_kind() -> RecordKind {
        Self::schema().kind()
    }
}
