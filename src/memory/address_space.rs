use std::fmt::Write as _;

use log::info;

use crate::loader::load_plan::LoadPlan;
use crate::loader::memory_window::MemoryWindow;
use crate::memory::raw_memory::RawMemory;

pub const SEGMENT_NAME: &str = "RAM";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SegmentClass {
    Code,
    Data,
}

// The host environment a LoadPlan is installed into (a disassembler database, an emulator bus...).
pub trait AddressSpace {
    fn set_processor(&mut self, processor_type: &str) -> Result<(), String>;
    fn add_segment(&mut self, window: &MemoryWindow, name: &str, class: SegmentClass) -> Result<(), String>;
    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), String>;
    fn add_comment(&mut self, address: u32, text: &str) -> Result<(), String>;
    fn set_entry_point(&mut self, address: u32) -> Result<(), String>;
}

// Carries out a plan: processor, one code segment per window, the copy, the comments, the entry.
pub fn install(plan: &LoadPlan, rom: &[u8], space: &mut dyn AddressSpace) -> Result<(), String> {
    space.set_processor(plan.processor_type)?;
    for window in plan.windows.iter() {
        space.add_segment(window, SEGMENT_NAME, SegmentClass::Code)?;
    }

    let bytes = rom.get(plan.copy.source_range())
        .ok_or_else(|| format!("ROM is too short for the planned copy ({}).", plan.copy))?;
    space.write(plan.copy.destination, bytes)?;

    for annotation in &plan.annotations {
        space.add_comment(annotation.address, &annotation.text)?;
    }

    space.set_entry_point(plan.entry_address)?;
    info!("Installed {} image: {}.", plan.selection, plan.copy);
    Ok(())
}

#[derive(Clone, Debug)]
pub struct Segment {
    pub window: MemoryWindow,
    pub name: String,
    pub class: SegmentClass,
    pub memory: RawMemory,
}

// An in-memory AddressSpace: a set of non-overlapping segments plus a comment listing.
#[derive(Clone, Debug, Default)]
pub struct RawAddressSpace {
    processor_type: Option<String>,
    segments: Vec<Segment>,
    comments: Vec<(u32, String)>,
    entry_point: Option<u32>,
}

impl RawAddressSpace {
    pub fn new() -> RawAddressSpace {
        RawAddressSpace::default()
    }

    pub fn processor_type(&self) -> Option<&str> {
        self.processor_type.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn entry_point(&self) -> Option<u32> {
        self.entry_point
    }

    pub fn comments(&self) -> &[(u32, String)] {
        &self.comments
    }

    pub fn peek(&self, address: u32) -> Option<u8> {
        let segment = self.segment_containing(address)?;
        Some(segment.memory[address - segment.window.start()])
    }

    pub fn read(&self, address: u32, length: u32) -> Option<&[u8]> {
        let segment = self.segment_containing(address)?;
        let start = address - segment.window.start();
        segment.memory.maybe_slice(start..start.checked_add(length)?)
    }

    // Comments in insertion order, each prefixed the way a disassembly listing shows them.
    pub fn listing(&self) -> String {
        let mut listing = String::new();
        for (address, text) in &self.comments {
            // Writing to a String can't fail.
            let _ = writeln!(listing, "{address:08X}  ;   {text}");
        }

        listing
    }

    fn segment_containing(&self, address: u32) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.window.contains(address))
    }
}

impl AddressSpace for RawAddressSpace {
    fn set_processor(&mut self, processor_type: &str) -> Result<(), String> {
        self.processor_type = Some(processor_type.to_string());
        Ok(())
    }

    fn add_segment(&mut self, window: &MemoryWindow, name: &str, class: SegmentClass) -> Result<(), String> {
        let overlapping = self.segments.iter().find(|segment| {
            segment.window.start() < window.end() && window.start() < segment.window.end()
        });
        if let Some(segment) = overlapping {
            return Err(format!("Segment {window} overlaps existing segment {}.", segment.window));
        }

        self.segments.push(Segment {
            window: *window,
            name: name.to_string(),
            class,
            memory: RawMemory::new(window.size()),
        });
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), String> {
        if data.is_empty() {
            return Ok(());
        }

        let segment = self.segments.iter_mut()
            .find(|segment| segment.window.contains(address))
            .ok_or_else(|| format!("No segment is mapped at 0x{address:08X}."))?;
        let offset = address - segment.window.start();
        if segment.memory.write_at(offset, data) {
            Ok(())
        } else {
            Err(format!("Writing 0x{:X} bytes at 0x{address:08X} runs past the end of segment {}.",
                data.len(), segment.window))
        }
    }

    fn add_comment(&mut self, address: u32, text: &str) -> Result<(), String> {
        self.comments.push((address, text.to_string()));
        Ok(())
    }

    fn set_entry_point(&mut self, address: u32) -> Result<(), String> {
        self.entry_point = Some(address);
        Ok(())
    }
}
