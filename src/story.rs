pub(crate) mod decode;
pub(crate) mod engine;
pub(crate) mod frames;
pub(crate) mod loader;
pub(crate) mod scroll;
pub(crate) mod surface;
