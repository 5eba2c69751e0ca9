pub(crate) mod cache;
pub(crate) mod compose;
pub(crate) mod layout;
