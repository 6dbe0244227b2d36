use crate::foundation::core::{DEFAULT_PIXELS_PER_UNIT, InvertAxis};
use crate::foundation::error::{CemError, CemResult};
use crate::scene::skeleton::{Aabb, BaseTransform, BoneSpec, Skeleton};
use glam::DVec3;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Right-hand side of one layer entry, as authored.
#[derive(Debug, Clone, PartialEq)]
pub enum RawExpr {
    /// JSON number (booleans are accepted as `1`/`0`).
    Number(f64),
    /// Expression source text.
    Text(String),
}

impl From<f64> for RawExpr {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RawExpr {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawExpr {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl Serialize for RawExpr {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for RawExpr {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawVisitor;

        impl Visitor<'_> for RawVisitor {
            type Value = RawExpr;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an expression string or a number")
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<RawExpr, E> {
                Ok(RawExpr::Number(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<RawExpr, E> {
                Ok(RawExpr::Number(v as f64))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<RawExpr, E> {
                Ok(RawExpr::Number(v as f64))
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<RawExpr, E> {
                Ok(RawExpr::Number(if v { 1.0 } else { 0.0 }))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<RawExpr, E> {
                Ok(RawExpr::Text(v.to_owned()))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<RawExpr, E> {
                Ok(RawExpr::Text(v))
            }
        }

        deserializer.deserialize_any(RawVisitor)
    }
}

/// One animation layer: `"target.property" -> expression` entries in declared order.
///
/// Entry order is evaluation order, so the map is kept as a vector. A repeated key keeps its
/// first position and its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationLayer {
    entries: Vec<(String, RawExpr)>,
}

impl AnimationLayer {
    /// Empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, or overwrite the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawExpr>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Entries in declared order.
    pub fn entries(&self) -> &[(String, RawExpr)] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the layer has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawExpr>> FromIterator<(K, V)> for AnimationLayer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut layer = Self::new();
        for (k, v) in iter {
            layer.insert(k, v);
        }
        layer
    }
}

impl Serialize for AnimationLayer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnimationLayer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LayerVisitor;

        impl<'de> Visitor<'de> for LayerVisitor {
            type Value = AnimationLayer;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of \"target.property\": expression entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AnimationLayer, A::Error> {
                let mut layer = AnimationLayer::new();
                while let Some((k, v)) = access.next_entry::<String, RawExpr>()? {
                    layer.insert(k, v);
                }
                Ok(layer)
            }
        }

        deserializer.deserialize_map(LayerVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct Vec3Def {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
}

impl Vec3Def {
    const ZERO: Vec3Def = Vec3Def {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    const ONE: Vec3Def = Vec3Def {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl<'de> Deserialize<'de> for Vec3Def {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 3]),
            Obj { x: f64, y: f64, z: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y, z]) => Ok(Self { x, y, z }),
            Repr::Obj { x, y, z } => Ok(Self { x, y, z }),
        }
    }
}

fn zero3() -> Vec3Def {
    Vec3Def::ZERO
}

fn one3() -> Vec3Def {
    Vec3Def::ONE
}

fn yes() -> bool {
    true
}

/// A renderable box in bone-local pixels: `[x, y, z, width, height, depth]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct BoxDef {
    pub(crate) coordinates: [f64; 6],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct BoneDef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) parent: Option<String>,
    /// Parent-relative position, pixels.
    #[serde(default = "zero3")]
    pub(crate) translate: Vec3Def,
    /// Euler XYZ, radians.
    #[serde(default = "zero3")]
    pub(crate) rotate: Vec3Def,
    #[serde(default = "one3")]
    pub(crate) scale: Vec3Def,
    #[serde(default = "yes")]
    pub(crate) visible: bool,
    #[serde(default)]
    pub(crate) invert_axis: InvertAxis,
    #[serde(default)]
    pub(crate) origin_px: Option<Vec3Def>,
    #[serde(default)]
    pub(crate) boxes: Vec<BoxDef>,
}

/// JSON description of a skeleton plus its animation layers.
///
/// Bones are listed parents first. This is the loader-facing boundary; the engine consumes
/// the [`Skeleton`] and layers produced by [`ModelDef::into_parts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDef {
    pub(crate) bones: Vec<BoneDef>,
    #[serde(default)]
    pub(crate) animations: Vec<AnimationLayer>,
}

impl ModelDef {
    /// Parse a model from JSON text.
    pub fn from_json(src: &str) -> CemResult<Self> {
        serde_json::from_str(src).map_err(|e| CemError::serde(format!("parse model JSON: {e}")))
    }

    /// Parse a model from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CemResult<Self> {
        serde_json::from_reader(r).map_err(|e| CemError::serde(format!("parse model JSON: {e}")))
    }

    /// Number of bones declared.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Declared layers, in order.
    pub fn animations(&self) -> &[AnimationLayer] {
        &self.animations
    }

    /// Build the skeleton at the default 16 pixels per unit.
    pub fn into_parts(self) -> CemResult<(Skeleton, Vec<AnimationLayer>)> {
        self.into_parts_scaled(DEFAULT_PIXELS_PER_UNIT)
    }

    /// Build the skeleton, converting pixel geometry with `pixels_per_unit`.
    #[tracing::instrument(skip(self), fields(bones = self.bones.len()))]
    pub fn into_parts_scaled(
        self,
        pixels_per_unit: f64,
    ) -> CemResult<(Skeleton, Vec<AnimationLayer>)> {
        if !(pixels_per_unit.is_finite() && pixels_per_unit > 0.0) {
            return Err(CemError::validation(format!(
                "pixels_per_unit must be positive, got {pixels_per_unit}"
            )));
        }
        let mut skeleton = Skeleton::new();
        for def in self.bones {
            let boxes = def
                .boxes
                .iter()
                .map(|b| {
                    let [x, y, z, w, h, d] = b.coordinates;
                    let from = DVec3::new(x, y, z) / pixels_per_unit;
                    let to = DVec3::new(x + w, y + h, z + d) / pixels_per_unit;
                    Aabb::new(from, to)
                })
                .collect();
            skeleton.add_bone(BoneSpec {
                name: def.name,
                parent: def.parent,
                base: BaseTransform {
                    position: def.translate.to_dvec3() / pixels_per_unit,
                    rotation: def.rotate.to_dvec3(),
                    scale: def.scale.to_dvec3(),
                    visible: def.visible,
                },
                invert_axis: def.invert_axis,
                origin_px: def.origin_px.map(Vec3Def::to_dvec3),
                boxes,
            })?;
        }
        Ok((skeleton, self.animations))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
