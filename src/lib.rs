pub mod analysis;
pub mod cartridge;
pub mod config;
pub mod loader;
pub mod logging;
pub mod memory;
pub mod prompt;
pub mod util;
