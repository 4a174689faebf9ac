pub(crate) mod directory;
pub(crate) mod gateway;
pub(crate) mod memory;
