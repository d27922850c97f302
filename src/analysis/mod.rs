pub mod rom_scan;
