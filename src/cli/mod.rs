pub(crate) mod contacts;
pub(crate) mod sequence;
