pub(crate) mod backend;
pub(crate) mod color;
pub(crate) mod cpu;
pub(crate) mod geometry;
pub(crate) mod pipeline;
