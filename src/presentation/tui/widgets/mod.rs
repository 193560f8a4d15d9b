pub mod add_form;
pub mod target_grid;
