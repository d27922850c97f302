use log::{info, warn};

use crate::cartridge::cartridge_header::CartridgeHeader;
use crate::loader::image_selection::ImageSelection;
use crate::loader::load_error::LoadError;
use crate::loader::load_plan::{AddressRange, Annotation, CopyInstruction, LoadPlan};
use crate::loader::memory_window::MemoryWindows;

pub const LOADER_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

pub const BEGINNING_OF_CONTENT: &str = "--- Beginning of ROM content ---";
pub const ENTRY_POINT: &str = "--- Entry point ---";
pub const END_OF_CONTENT: &str = "--- End of ROM content ---";

pub fn load(
    header: &CartridgeHeader,
    rom: &[u8],
    selection: ImageSelection,
) -> Result<LoadPlan, LoadError> {
    load_with_windows(header, rom, selection, &MemoryWindows::nds())
}

pub fn load_with_windows(
    header: &CartridgeHeader,
    rom: &[u8],
    selection: ImageSelection,
    windows: &MemoryWindows,
) -> Result<LoadPlan, LoadError> {
    let image = selection.image(header);

    let file_length = rom.len() as u64;
    if file_length < u64::from(image.rom_offset) + u64::from(image.size) {
        let err = LoadError::TruncatedImage {
            selection,
            rom_offset: image.rom_offset,
            size: image.size,
            file_length,
        };
        warn!("{err}");
        return Err(err);
    }

    let start = image.ram_address;
    let Some(end) = start.checked_add(image.size) else {
        let err = LoadError::IllegalMemoryRegion { selection, start, end: None };
        warn!("{err}");
        return Err(err);
    };

    if !windows.accepts(start, end) {
        let err = LoadError::IllegalMemoryRegion { selection, start, end: Some(end) };
        warn!("{err}");
        return Err(err);
    }

    let range = AddressRange { start, end };
    let copy = CopyInstruction {
        source_offset: image.rom_offset,
        length: image.size,
        destination: start,
    };
    let entry_address = image.entry_address;
    let plan = LoadPlan {
        selection,
        processor_type: selection.processor_type(),
        windows: windows.clone(),
        range,
        copy,
        entry_address,
        entry_differs_from_start: entry_address != start,
        annotations: annotations(header, selection, range, entry_address),
    };

    info!(target: "loadplan", "{plan}");
    Ok(plan)
}

#[rustfmt::skip]
fn annotations(
    header: &CartridgeHeader,
    selection: ImageSelection,
    range: AddressRange,
    entry_address: u32,
) -> Vec<Annotation> {
    let image = selection.image(header);
    let start = range.start;

    let mut annotations = vec![Annotation::new(start, format!("Created with NDS Loader {LOADER_VERSION}."))];
    for author in AUTHORS.split(':').map(str::trim).filter(|author| !author.is_empty()) {
        annotations.push(Annotation::new(start, format!("Author:             {author}")));
    }

    annotations.extend([
        Annotation::new(start, format!("Game Title:         {}", header.title())),
        Annotation::new(start, format!("Processor:          {selection}")),
        Annotation::new(start, format!("ROM Header size:    0x{:08X}", header.header_size())),
        Annotation::new(start, format!("Header CRC:         0x{:04X}", header.header_crc())),
        Annotation::new(start, format!("Offset in ROM:      0x{:08X}", image.rom_offset)),
        Annotation::new(start, format!("Array:              0x{:08X} - 0x{:08X} ({} bytes)", range.start, range.end, image.size)),
        Annotation::new(start, format!("Entry point:        0x{entry_address:08X}")),
        Annotation::new(start, BEGINNING_OF_CONTENT),
    ]);

    if entry_address != start {
        annotations.push(Annotation::new(entry_address, ENTRY_POINT));
    }

    annotations.push(Annotation::new(range.end, END_OF_CONTENT));
    annotations
}
