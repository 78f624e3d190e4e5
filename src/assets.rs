pub(crate) mod fs;
pub(crate) mod http;
pub(crate) mod memory;
pub(crate) mod source;
