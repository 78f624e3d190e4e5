pub(crate) mod avatar_config;
pub(crate) mod selection;
