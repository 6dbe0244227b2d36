pub(crate) mod analysis;
pub(crate) mod baseline;
pub(crate) mod pass;
pub(crate) mod propagate;
pub(crate) mod rest;
pub(crate) mod rotation;
pub(crate) mod thresholds;
pub(crate) mod translation;
