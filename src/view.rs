pub(crate) mod controller;
pub(crate) mod markup;
pub(crate) mod model;
pub(crate) mod presenter;
