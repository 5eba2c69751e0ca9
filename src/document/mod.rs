pub(crate) mod layout;
pub(crate) mod metrics;
pub(crate) mod pdf;
pub(crate) mod text;
