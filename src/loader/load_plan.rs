use std::fmt;
use std::ops::Range;

use crate::loader::image_selection::ImageSelection;
use crate::loader::memory_window::MemoryWindows;

// A validated load: everything the host needs to map, copy and annotate. Nothing has been copied
// yet when a plan exists, and a failed load never produces one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoadPlan {
    pub selection: ImageSelection,
    pub processor_type: &'static str,
    // The whitelist this plan was validated against. The host maps one segment per window.
    pub windows: MemoryWindows,
    pub range: AddressRange,
    pub copy: CopyInstruction,
    pub entry_address: u32,
    pub entry_differs_from_start: bool,
    pub annotations: Vec<Annotation>,
}

impl LoadPlan {
    pub fn annotations_at(&self, address: u32) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |annotation| annotation.address == address)
    }
}

impl fmt::Display for LoadPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processor: {} ({})", self.selection, self.processor_type)?;
        writeln!(f, "Copy: {}", self.copy)?;
        write!(f, "Entry: 0x{:08X}", self.entry_address)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AddressRange {
    pub start: u32,
    pub end: u32,
}

impl AddressRange {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn to_range(&self) -> Range<u32> {
        self.start..self.end
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}-0x{:08X}", self.start, self.end)
    }
}

// Copy `length` bytes from the file at `source_offset` to `destination` in the address space.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CopyInstruction {
    pub source_offset: u32,
    pub length: u32,
    pub destination: u32,
}

impl CopyInstruction {
    pub fn source_range(&self) -> Range<usize> {
        let start = self.source_offset as usize;
        start..start + self.length as usize
    }
}

impl fmt::Display for CopyInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X} bytes from ROM offset 0x{:08X} to 0x{:08X}",
            self.length, self.source_offset, self.destination)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Annotation {
    pub address: u32,
    pub text: String,
}

impl Annotation {
    pub fn new(address: u32, text: impl Into<String>) -> Annotation {
        Annotation { address, text: text.into() }
    }
}
