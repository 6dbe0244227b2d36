pub(crate) mod correction;
