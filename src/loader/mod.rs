pub mod image_selection;
pub mod load_error;
pub mod load_plan;
pub mod loader;
pub mod memory_window;
