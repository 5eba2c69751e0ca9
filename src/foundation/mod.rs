pub(crate) mod color;
pub(crate) mod error;
pub(crate) mod geometry;
pub(crate) mod lru;
pub(crate) mod math;
pub(crate) mod policy;
