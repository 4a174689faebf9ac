pub(crate) mod orchestrator;
pub(crate) mod render;
pub(crate) mod result;
pub(crate) mod settings;
