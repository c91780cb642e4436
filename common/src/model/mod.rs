pub mod place_holder;
pub mod template;
