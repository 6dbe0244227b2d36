//! Expression-driven skeletal animation runtime for OptiFine-style Custom Entity Models.
//!
//! A model is a [`Skeleton`] plus ordered [`AnimationLayer`]s of `"target.property": expression`
//! entries. The public API is engine-oriented:
//!
//! - Load a [`ModelDef`] from JSON (or build a [`Skeleton`] directly)
//! - Create an [`AnimationEngine`], which compiles the layers and calibrates every animated
//!   channel against the rest pose
//! - Call [`AnimationEngine::tick`] once per frame and read the posed skeleton back
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod compile;
pub(crate) mod eval;
pub(crate) mod expression;
pub(crate) mod normalize;
pub(crate) mod rig;
pub(crate) mod scene;
pub(crate) mod session;

pub use crate::foundation::core::{
    Axis, BoneIdx, Channel, ChannelKey, DEFAULT_PIXELS_PER_UNIT, InvertAxis,
};
pub use crate::foundation::error::{CemError, CemResult};

pub use crate::animation::pose::{PoseDef, poses};
pub use crate::animation::preset::{PresetDef, presets};
pub use crate::animation::trigger::{ActiveTrigger, RootOverlay, TriggerDef, triggers};
pub use crate::compile::compiler::{CompiledAnimation, CompiledLayers, TargetType, compile_layers};
pub use crate::eval::context::{AnimationContext, BoneValues};
pub use crate::eval::state::EntityState;
pub use crate::expression::ast::{BinaryOp, Expr, UnaryOp, VarRef, VarTarget};
pub use crate::expression::compile::{
    CompiledExpression, compile_expression, compile_source, safe_evaluate,
};
pub use crate::expression::error::{EvalError, ExprError};
pub use crate::expression::eval::evaluate;
pub use crate::expression::functions::Builtin;
pub use crate::expression::parser::parse_expression;
pub use crate::scene::model::{AnimationLayer, ModelDef, RawExpr};
pub use crate::scene::skeleton::{
    Aabb, AbsoluteSpace, BaseTransform, Bone, BoneSpec, Calibration, Skeleton,
};
pub use crate::session::engine::{AnimationEngine, EngineOpts};
