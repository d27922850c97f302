use std::error::Error;
use std::fmt;

use crate::loader::image_selection::ImageSelection;

// Every variant is terminal for the load attempt. Picking the other image is the only way forward.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadError {
    TruncatedImage {
        selection: ImageSelection,
        rom_offset: u32,
        size: u32,
        file_length: u64,
    },
    IllegalMemoryRegion {
        selection: ImageSelection,
        start: u32,
        // None if ram_address + size doesn't fit in 32 bits.
        end: Option<u32>,
    },
}

impl LoadError {
    pub fn selection(&self) -> ImageSelection {
        match *self {
            LoadError::TruncatedImage { selection, .. } => selection,
            LoadError::IllegalMemoryRegion { selection, .. } => selection,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LoadError::TruncatedImage { selection, rom_offset, size, file_length } => write!(f,
                "{selection} image claims 0x{size:X} bytes at ROM offset 0x{rom_offset:08X}, \
                but the file is only 0x{file_length:X} bytes long."),
            LoadError::IllegalMemoryRegion { selection, start, end: Some(end) } => write!(f,
                "{selection} image destination 0x{start:08X}-0x{end:08X} lies outside every legal memory window."),
            LoadError::IllegalMemoryRegion { selection, start, end: None } => write!(f,
                "{selection} image destination starting at 0x{start:08X} runs past the end of the address space."),
        }
    }
}

impl Error for LoadError {}
