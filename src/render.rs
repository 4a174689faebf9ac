pub(crate) mod backend;
pub(crate) mod container;
pub(crate) mod gate;
pub(crate) mod hosted;
pub(crate) mod mask;
pub(crate) mod offscreen;
pub(crate) mod snapshot;
pub(crate) mod svg;
