pub(crate) mod fallback;
pub(crate) mod pose;
pub(crate) mod preset;
pub(crate) mod seeding;
pub(crate) mod trigger;
pub(crate) mod vanilla;
