//! Value codec: converts one field value to and from its `<Param>` element,
//! dispatching on the field's declared kind.
//!
//! Payload shapes:
//! - number, boolean, enumeration, opaque: element text
//! - 3-vector: `<x>`, `<y>`, `<z>` children
//! - curve: `<preWrapMode>`, `<postWrapMode>`, `<Keys>` of `<Key>`
//!   (`time`, `value`, `inTangent`, `outTangent`)
//! - collider list: `<Collider>` children holding collider `<Param>` entries
//!
//! Numbers are written with the shortest representation that parses back to the
//! same `f32`, so `decode(encode(v)) == v` for every finite value.

use log::{debug, warn};
use xmltree::{Element, XMLNode};

use crate::collider::ColliderSettings;
use crate::document::{child_elements, element_text, text_element, NAME_ATTRIBUTE, PARAM_ELEMENT};
use crate::error::{Result, SettingsError};
use crate::schema::{FieldDescriptor, Settings};
use crate::value::{Curve, FieldKind, FieldValue, Keyframe, Vec3, WrapMode};

const X: &str = "x";
const Y: &str = "y";
const Z: &str = "z";
const PRE_WRAP_MODE: &str = "preWrapMode";
const POST_WRAP_MODE: &str = "postWrapMode";
const KEYS: &str = "Keys";
const KEY: &str = "Key";
const TIME: &str = "time";
const VALUE: &str = "value";
const IN_TANGENT: &str = "inTangent";
const OUT_TANGENT: &str = "outTangent";
/// Element wrapping one embedded collider inside a collider-list parameter.
pub const EMBEDDED_COLLIDER: &str = "Collider";

/// Build the `<Param name="...">` element for `value`.
pub fn encode(name: &str, kind: FieldKind, value: &FieldValue) -> Result<Element> {
    let mut param = Element::new(PARAM_ELEMENT);
    param
        .attributes
        .insert(NAME_ATTRIBUTE.to_string(), name.to_string());

    match (kind, value) {
        (FieldKind::Number, FieldValue::Number(n)) => push_text(&mut param, format_f32(*n)),
        (FieldKind::Bool, FieldValue::Bool(b)) => push_text(&mut param, format_bool(*b)),
        (FieldKind::Enum(_), FieldValue::Enum(symbol)) => push_text(&mut param, symbol.clone()),
        (FieldKind::Opaque, FieldValue::Opaque(text)) => push_text(&mut param, text.clone()),
        (FieldKind::Vec3, FieldValue::Vec3(v)) => write_vec3(&mut param, v),
        (FieldKind::Curve, FieldValue::Curve(c)) => write_curve(&mut param, c),
        (FieldKind::Colliders, FieldValue::Colliders(list)) => {
            for collider in list {
                let mut embedded = Element::new(EMBEDDED_COLLIDER);
                encode_settings(collider, &mut embedded)?;
                param.children.push(XMLNode::Element(embedded));
            }
        }
        (kind, value) => {
            return Err(SettingsError::ValueKindMismatch {
                field: name.to_string(),
                expected: kind.value_kind(),
                actual: value.kind(),
            })
        }
    }
    Ok(param)
}

/// Decode the payload of a `<Param>` element according to `kind`.
pub fn decode(kind: FieldKind, param: &Element) -> Result<FieldValue> {
    let field = param
        .attributes
        .get(NAME_ATTRIBUTE)
        .map(String::as_str)
        .unwrap_or_default();
    let text = element_text(param);

    Ok(match kind {
        FieldKind::Number => FieldValue::Number(parse_f32(field, &text)?),
        FieldKind::Bool => FieldValue::Bool(parse_bool(field, &text)?),
        FieldKind::Enum(symbols) => {
            let symbol = text.trim();
            if !symbols.contains(symbol) {
                return Err(SettingsError::InvalidEnumValue {
                    field: field.to_string(),
                    enum_name: symbols.name,
                    value: symbol.to_string(),
                });
            }
            FieldValue::Enum(symbol.to_string())
        }
        FieldKind::Opaque => FieldValue::Opaque(text.into_owned()),
        FieldKind::Vec3 => FieldValue::Vec3(read_vec3(field, param)?),
        FieldKind::Curve => FieldValue::Curve(read_curve(field, param)?),
        FieldKind::Colliders => {
            let mut list = Vec::new();
            for embedded in child_elements(param).filter(|e| e.name == EMBEDDED_COLLIDER) {
                let mut collider = ColliderSettings::default();
                apply_params(params_of(embedded), &mut collider)?;
                list.push(collider);
            }
            FieldValue::Colliders(list)
        }
    })
}

/// Append one `<Param>` per schema field of `target` to `parent`, in declared order.
pub fn encode_settings<T: Settings>(target: &T, parent: &mut Element) -> Result<()> {
    for field in T::schema().fields() {
        let param = encode(field.name(), field.kind(), &field.read(target))?;
        parent.children.push(XMLNode::Element(param));
    }
    Ok(())
}

/// Decode `params` and apply them to `target`.
///
/// Every parameter is decoded before anything is written, and the writes go to
/// a staged copy that replaces `target` only when all of them succeed. A
/// decode error therefore leaves `target` untouched. Parameters without a
/// matching schema field are skipped; read-only (opaque) fields are never
/// decoded. Returns the number of fields written.
pub fn apply_params<'a, T, I>(params: I, target: &mut T) -> Result<usize>
where
    T: Settings,
    I: IntoIterator<Item = &'a Element>,
{
    let schema = T::schema();
    let mut decoded: Vec<(&FieldDescriptor<T>, FieldValue)> = Vec::new();

    for param in params {
        let Some(name) = param.attributes.get(NAME_ATTRIBUTE) else {
            warn!("skipping <{}> without a name attribute", param.name);
            continue;
        };
        let Some(field) = schema.field(name) else {
            warn!(
                "skipping unknown {} parameter '{}'",
                schema.kind().element_name(),
                name
            );
            continue;
        };
        if !field.is_writable() {
            debug!("field '{}' is not importable; left unchanged", name);
            continue;
        }
        decoded.push((field, decode(field.kind(), param)?));
    }

    let mut staged = target.clone();
    let mut written = 0;
    for (field, value) in decoded {
        if field.write(&mut staged, value)? {
            written += 1;
        }
    }
    *target = staged;
    Ok(written)
}

fn params_of(parent: &Element) -> impl Iterator<Item = &Element> {
    child_elements(parent).filter(|e| e.name == PARAM_ELEMENT)
}

fn push_text(parent: &mut Element, text: String) {
    parent.children.push(XMLNode::Text(text));
}

fn push_child(parent: &mut Element, name: &str, text: String) {
    parent
        .children
        .push(XMLNode::Element(text_element(name, text)));
}

fn format_f32(v: f32) -> String {
    v.to_string()
}

fn format_bool(b: bool) -> String {
    let text = if b { "True" } else { "False" };
    text.to_string()
}

fn parse_f32(field: &str, text: &str) -> Result<f32> {
    text.trim()
        .parse::<f32>()
        .map_err(|_| SettingsError::MalformedNumber {
            field: field.to_string(),
            value: text.to_string(),
        })
}

fn parse_bool(field: &str, text: &str) -> Result<bool> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if t.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(SettingsError::MalformedBoolean {
            field: field.to_string(),
            value: text.to_string(),
        })
    }
}

fn required<'a>(field: &str, parent: &'a Element, name: &'static str) -> Result<&'a Element> {
    parent
        .get_child(name)
        .ok_or_else(|| SettingsError::MissingElement {
            field: field.to_string(),
            element: name,
        })
}

fn child_f32(field: &str, parent: &Element, name: &'static str) -> Result<f32> {
    parse_f32(field, &element_text(required(field, parent, name)?))
}

fn write_vec3(parent: &mut Element, v: &Vec3) {
    push_child(parent, X, format_f32(v.x));
    push_child(parent, Y, format_f32(v.y));
    push_child(parent, Z, format_f32(v.z));
}

fn read_vec3(field: &str, param: &Element) -> Result<Vec3> {
    Ok(Vec3 {
        x: child_f32(field, param, X)?,
        y: child_f32(field, param, Y)?,
        z: child_f32(field, param, Z)?,
    })
}

fn write_curve(parent: &mut Element, curve: &Curve) {
    push_child(parent, PRE_WRAP_MODE, curve.pre_wrap_mode.code().to_string());
    push_child(parent, POST_WRAP_MODE, curve.post_wrap_mode.code().to_string());

    let mut keys = Element::new(KEYS);
    for key in &curve.keys {
        let mut k = Element::new(KEY);
        push_child(&mut k, TIME, format_f32(key.time));
        push_child(&mut k, VALUE, format_f32(key.value));
        push_child(&mut k, IN_TANGENT, format_f32(key.in_tangent));
        push_child(&mut k, OUT_TANGENT, format_f32(key.out_tangent));
        keys.children.push(XMLNode::Element(k));
    }
    parent.children.push(XMLNode::Element(keys));
}

fn read_wrap_mode(field: &str, param: &Element, name: &'static str) -> Result<WrapMode> {
    let text = element_text(required(field, param, name)?);
    let code = text
        .trim()
        .parse::<i32>()
        .map_err(|_| SettingsError::MalformedNumber {
            field: field.to_string(),
            value: text.to_string(),
        })?;
    WrapMode::from_code(code).ok_or_else(|| SettingsError::InvalidEnumValue {
        field: field.to_string(),
        enum_name: "WrapMode",
        value: code.to_string(),
    })
}

fn read_curve(field: &str, param: &Element) -> Result<Curve> {
    let pre_wrap_mode = read_wrap_mode(field, param, PRE_WRAP_MODE)?;
    let post_wrap_mode = read_wrap_mode(field, param, POST_WRAP_MODE)?;

    let mut keys = Vec::new();
    if let Some(list) = param.get_child(KEYS) {
        for key in child_elements(list).filter(|e| e.name == KEY) {
            keys.push(Keyframe {
                time: child_f32(field, key, TIME)?,
                value: child_f32(field, key, VALUE)?,
                in_tangent: child_f32(field, key, IN_TANGENT)?,
                out_tangent: child_f32(field, key, OUT_TANGENT)?,
            });
        }
    }

    Ok(Curve {
        pre_wrap_mode,
        post_wrap_mode,
        keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{Bound, Direction};
    use crate::symbols::SymbolicEnum;

    fn parse(text: &str) -> Element {
        Element::parse(text.as_bytes()).unwrap()
    }

    fn roundtrip(kind: FieldKind, value: FieldValue) {
        let param = encode("f", kind, &value).unwrap();
        assert_eq!(param.attributes.get("name").map(String::as_str), Some("f"));
        assert_eq!(decode(kind, &param).unwrap(), value);
    }

    #[test]
    fn scalar_kinds_roundtrip() {
        roundtrip(FieldKind::Number, FieldValue::Number(60.0));
        roundtrip(FieldKind::Number, FieldValue::Number(0.1));
        roundtrip(FieldKind::Number, FieldValue::Number(-1.0e-7));
        roundtrip(FieldKind::Number, FieldValue::Number(f32::MAX));
        roundtrip(FieldKind::Bool, FieldValue::Bool(true));
        roundtrip(FieldKind::Bool, FieldValue::Bool(false));
        roundtrip(
            FieldKind::Enum(Direction::SYMBOLS),
            FieldValue::Enum("Z".into()),
        );
        roundtrip(FieldKind::Opaque, FieldValue::Opaque("Transform (root)".into()));
    }

    #[test]
    fn number_and_bool_text_forms() {
        let p = encode("m_UpdateRate", FieldKind::Number, &FieldValue::Number(60.0)).unwrap();
        assert_eq!(element_text(&p), "60");
        let p = encode("m_DistantDisable", FieldKind::Bool, &FieldValue::Bool(true)).unwrap();
        assert_eq!(element_text(&p), "True");

        let p = parse(r#"<Param name="b"> false </Param>"#);
        assert_eq!(decode(FieldKind::Bool, &p).unwrap(), FieldValue::Bool(false));
        let p = parse(r#"<Param name="n"> 1.5 </Param>"#);
        assert_eq!(decode(FieldKind::Number, &p).unwrap(), FieldValue::Number(1.5));
    }

    #[test]
    fn vec3_layout() {
        let v = FieldValue::Vec3(Vec3::new(0.0, -9.8, 0.25));
        let p = encode("m_Gravity", FieldKind::Vec3, &v).unwrap();
        let names: Vec<_> = child_elements(&p).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert_eq!(element_text(p.get_child("y").unwrap()), "-9.8");
        roundtrip(FieldKind::Vec3, v);
    }

    #[test]
    fn curve_keeps_key_order_and_wrap_modes() {
        let curve = Curve {
            pre_wrap_mode: WrapMode::Loop,
            post_wrap_mode: WrapMode::PingPong,
            keys: vec![
                Keyframe::new(0.0, 1.0, 0.0, -0.5),
                Keyframe::new(0.5, 0.75, -0.5, -0.5),
                Keyframe::new(1.0, 0.5, -0.5, 0.0),
            ],
        };
        let p = encode("m_DampingDistrib", FieldKind::Curve, &FieldValue::Curve(curve.clone()))
            .unwrap();
        assert_eq!(element_text(p.get_child("preWrapMode").unwrap()), "2");
        assert_eq!(element_text(p.get_child("postWrapMode").unwrap()), "4");

        match decode(FieldKind::Curve, &p).unwrap() {
            FieldValue::Curve(c) => {
                let times: Vec<f32> = c.keys.iter().map(|k| k.time).collect();
                assert_eq!(times, vec![0.0, 0.5, 1.0]);
                assert_eq!(c, curve);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn curve_without_keys_decodes_empty() {
        let p = parse(
            r#"<Param name="c"><preWrapMode>8</preWrapMode><postWrapMode>0</postWrapMode></Param>"#,
        );
        assert_eq!(
            decode(FieldKind::Curve, &p).unwrap(),
            FieldValue::Curve(Curve {
                pre_wrap_mode: WrapMode::ClampForever,
                post_wrap_mode: WrapMode::Default,
                keys: vec![],
            })
        );
    }

    #[test]
    fn collider_list_roundtrip() {
        let list = vec![
            ColliderSettings {
                direction: Direction::X,
                center: Vec3::new(0.0, 0.1, 0.0),
                bound: Bound::Inside,
                radius: 0.2,
                height: 1.0,
            },
            ColliderSettings::default(),
        ];
        let p = encode("m_Colliders", FieldKind::Colliders, &FieldValue::Colliders(list.clone()))
            .unwrap();
        assert_eq!(child_elements(&p).count(), 2);
        assert_eq!(
            decode(FieldKind::Colliders, &p).unwrap(),
            FieldValue::Colliders(list)
        );
    }

    #[test]
    fn decode_errors() {
        let p = parse(r#"<Param name="m_Radius">abc</Param>"#);
        assert!(matches!(
            decode(FieldKind::Number, &p),
            Err(SettingsError::MalformedNumber { field, .. }) if field == "m_Radius"
        ));

        let p = parse(r#"<Param name="m_Bound">Sideways</Param>"#);
        assert!(matches!(
            decode(FieldKind::Enum(Bound::SYMBOLS), &p),
            Err(SettingsError::InvalidEnumValue { enum_name: "Bound", .. })
        ));

        let p = parse(r#"<Param name="m_Bound">inside</Param>"#);
        assert!(decode(FieldKind::Enum(Bound::SYMBOLS), &p).is_err());

        let p = parse(r#"<Param name="flag">yes</Param>"#);
        assert!(matches!(
            decode(FieldKind::Bool, &p),
            Err(SettingsError::MalformedBoolean { .. })
        ));

        let p = parse(r#"<Param name="m_Center"><x>0</x><z>0</z></Param>"#);
        assert!(matches!(
            decode(FieldKind::Vec3, &p),
            Err(SettingsError::MissingElement { element: "y", .. })
        ));

        let p = parse(
            r#"<Param name="c"><preWrapMode>3</preWrapMode><postWrapMode>0</postWrapMode></Param>"#,
        );
        assert!(matches!(
            decode(FieldKind::Curve, &p),
            Err(SettingsError::InvalidEnumValue { enum_name: "WrapMode", .. })
        ));
    }

    #[test]
    fn encode_rejects_mismatched_value() {
        let err = encode("m_Radius", FieldKind::Number, &FieldValue::Bool(true)).unwrap_err();
        assert!(matches!(err, SettingsError::ValueKindMismatch { .. }));
    }
}
