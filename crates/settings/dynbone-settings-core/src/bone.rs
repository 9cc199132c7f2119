//! DynamicBone settings and their schema table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::collider::ColliderSettings;
use crate::document::RecordKind;
use crate::schema::{Schema, Settings};
use crate::symbols::symbolic_enum;
use crate::value::{Curve, Vec3};

symbolic_enum! {
    /// Timing source of the simulation step.
    pub enum UpdateMode {
        Normal,
        AnimatePhysics,
        UnscaledTime,
        Default,
    }
}

symbolic_enum! {
    /// Axis the bone chain is constrained to move within.
    pub enum FreezeAxis {
        None,
        X,
        Y,
        Z,
    }
}

/// Tunable parameters of one DynamicBone component. Each scalar with a
/// `*_distrib` companion is scaled along the chain by that curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneSettings {
    pub update_rate: f32,
    pub update_mode: UpdateMode,
    pub damping: f32,
    pub damping_distrib: Curve,
    pub elasticity: f32,
    pub elasticity_distrib: Curve,
    pub stiffness: f32,
    pub stiffness_distrib: Curve,
    pub inert: f32,
    pub inert_distrib: Curve,
    pub radius: f32,
    pub radius_distrib: Curve,
    pub end_length: f32,
    pub end_offset: Vec3,
    pub gravity: Vec3,
    pub force: Vec3,
    pub freeze_axis: FreezeAxis,
    pub distant_disable: bool,
    pub distance_to_object: f32,
    /// Colliders are stored by value inside the bone record.
    pub colliders: Vec<ColliderSettings>,
}

impl Default for BoneSettings {
    fn default() -> Self {
        Self {
            update_rate: 60.0,
            update_mode: UpdateMode::Default,
            damping: 0.1,
            damping_distrib: Curve::default(),
            elasticity: 0.1,
            elasticity_distrib: Curve::default(),
            stiffness: 0.1,
            stiffness_distrib: Curve::default(),
            inert: 0.0,
            inert_distrib: Curve::default(),
            radius: 0.0,
            radius_distrib: Curve::default(),
            end_length: 0.0,
            end_offset: Vec3::ZERO,
            gravity: Vec3::ZERO,
            force: Vec3::ZERO,
            freeze_axis: FreezeAxis::None,
            distant_disable: false,
            distance_to_object: 20.0,
            colliders: Vec::new(),
        }
    }
}

static BONE_SCHEMA: Lazy<Schema<BoneSettings>> = Lazy::new(|| {
    Schema::<BoneSettings>::builder(RecordKind::Bone)
        .number("m_UpdateRate", |b| b.update_rate, |b, v| b.update_rate = v)
        .enumeration("m_UpdateMode", |b| b.update_mode, |b, v| b.update_mode = v)
        .number("m_Damping", |b| b.damping, |b, v| b.damping = v)
        .curve(
            "m_DampingDistrib",
            |b| b.damping_distrib.clone(),
            |b, v| b.damping_distrib = v,
        )
        .number("m_Elasticity", |b| b.elasticity, |b, v| b.elasticity = v)
        .curve(
            "m_ElasticityDistrib",
            |b| b.elasticity_distrib.clone(),
            |b, v| b.elasticity_distrib = v,
        )
        .number("m_Stiffness", |b| b.stiffness, |b, v| b.stiffness = v)
        .curve(
            "m_StiffnessDistrib",
            |b| b.stiffness_distrib.clone(),
            |b, v| b.stiffness_distrib = v,
        )
        .number("m_Inert", |b| b.inert, |b, v| b.inert = v)
        .curve(
            "m_InertDistrib",
            |b| b.inert_distrib.clone(),
            |b, v| b.inert_distrib = v,
        )
        .number("m_Radius", |b| b.radius, |b, v| b.radius = v)
        .curve(
            "m_RadiusDistrib",
            |b| b.radius_distrib.clone(),
            |b, v| b.radius_distrib = v,
        )
        .number("m_EndLength", |b| b.end_length, |b, v| b.end_length = v)
        .vec3("m_EndOffset", |b| b.end_offset, |b, v| b.end_offset = v)
        .vec3("m_Gravity", |b| b.gravity, |b, v| b.gravity = v)
        .vec3("m_Force", |b| b.force, |b, v| b.force = v)
        .enumeration("m_FreezeAxis", |b| b.freeze_axis, |b, v| b.freeze_axis = v)
        .boolean(
            "m_DistantDisable",
            |b| b.distant_disable,
            |b, v| b.distant_disable = v,
        )
        .number(
            "m_DistanceToObject",
            |b| b.distance_to_object,
            |b, v| b.distance_to_object = v,
        )
        .colliders("m_Colliders", |b| b.colliders.clone(), |b, v| b.colliders = v)
        .build()
});

impl Settings for BoneSettings {
    fn schema() -> &'static Schema<Self> {
        &BONE_SCHEMA
    }
}
