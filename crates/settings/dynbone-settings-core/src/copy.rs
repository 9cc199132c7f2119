//! In-memory copy/paste between two targets of the same type.

use crate::error::Result;
use crate::schema::Settings;

/// Copy every importable schema field from `source` onto `target`. Fields
/// outside the schema are left as they are. Returns the number of fields
/// written.
///
/// The copy source is passed explicitly; callers that offer "copy" and
/// "paste" as separate actions hold on to the source themselves.
pub fn copy_settings<T: Settings>(source: &T, target: &mut T) -> Result<usize> {
    let mut staged = target.clone();
    let mut written = 0;
    for field in T::schema().fields() {
        if field.write(&mut staged, field.read(source))? {
            written += 1;
        }
    }
    *target = staged;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bone::{BoneSettings, FreezeAxis};
    use crate::collider::ColliderSettings;
    use crate::document::RecordKind;
    use crate::schema::Schema;
    use crate::value::{Curve, Keyframe, Vec3};
    use once_cell::sync::Lazy;

    #[test]
    fn paste_copies_all_bone_fields() {
        let source = BoneSettings {
            damping: 0.3,
            damping_distrib: Curve::new(vec![Keyframe::new(0.0, 1.0, 0.0, 0.0)]),
            gravity: Vec3::new(0.0, -0.01, 0.0),
            freeze_axis: FreezeAxis::Z,
            colliders: vec![ColliderSettings::default()],
            ..Default::default()
        };
        let mut target = BoneSettings::default();
        let written = copy_settings(&source, &mut target).unwrap();
        assert_eq!(written, BoneSettings::schema().fields().len());
        assert_eq!(target, source);
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Partial {
        stored: f32,
        label: String,
        local: u32,
    }

    static PARTIAL: Lazy<Schema<Partial>> = Lazy::new(|| {
        Schema::<Partial>::builder(RecordKind::Bone)
            .number("stored", |p| p.stored, |p, v| p.stored = v)
            .opaque("label", |p| p.label.clone())
            .build()
    });

    impl Settings for Partial {
        fn schema() -> &'static Schema<Self> {
            &PARTIAL
        }
    }

    #[test]
    fn paste_skips_fields_outside_the_schema() {
        let source = Partial {
            stored: 2.0,
            label: "src".into(),
            local: 7,
        };
        let mut target = Partial {
            stored: 0.0,
            label: "dst".into(),
            local: 1,
        };
        assert_eq!(copy_settings(&source, &mut target).unwrap(), 1);
        assert_eq!(
            target,
            Partial {
                stored: 2.0,
                label: "dst".into(),
                local: 1,
            }
        );
    }
}
