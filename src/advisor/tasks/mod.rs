pub mod template;
pub mod spec;
