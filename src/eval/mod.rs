pub(crate) mod context;
pub(crate) mod pass;
pub(crate) mod state;
