pub(crate) mod image_ref;
pub(crate) mod storybook;
