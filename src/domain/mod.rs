pub mod entry;
pub mod validation;
pub mod view;
