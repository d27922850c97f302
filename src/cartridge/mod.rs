pub mod cartridge_header;
pub mod crc16;
pub mod detect;
pub mod rom_file;
