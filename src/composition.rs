pub(crate) mod artifact;
pub(crate) mod factory;
pub(crate) mod model;
pub(crate) mod motion;
pub(crate) mod text;
