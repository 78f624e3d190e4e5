pub(crate) mod document;
pub(crate) mod remap;
pub(crate) mod styles;
