extern crate ndsloader;

use rayon::prelude::*;

use ndsloader::cartridge::cartridge_header::{HEADER_CRC_COVERAGE, HEADER_SIZE, ImageDescriptor, RawHeaderBuilder};
use ndsloader::cartridge::crc16::crc16;
use ndsloader::cartridge::detect::{detect, RejectReason};
use ndsloader::loader::image_selection::ImageSelection;
use ndsloader::loader::load_error::LoadError;
use ndsloader::loader::load_plan::CopyInstruction;
use ndsloader::loader::loader::{load, BEGINNING_OF_CONTENT, END_OF_CONTENT, ENTRY_POINT};
use ndsloader::memory::address_space::{install, RawAddressSpace, SegmentClass};

const ARM9: ImageDescriptor = ImageDescriptor {
    rom_offset: 0x4000,
    entry_address: 0x0200_0000,
    ram_address: 0x0200_0000,
    size: 0x100,
};

const ARM7: ImageDescriptor = ImageDescriptor {
    rom_offset: 0x4100,
    entry_address: 0x0380_0020,
    ram_address: 0x0380_0000,
    size: 0x100,
};

fn rom(length: usize) -> Vec<u8> {
    let header = RawHeaderBuilder::new()
        .title("SYNTHETIC")
        .game_code(*b"ASYE")
        .maker_code(*b"01")
        .arm9(ARM9)
        .arm7(ARM7)
        .build();

    let mut rom = vec![0; length];
    rom[..HEADER_SIZE].copy_from_slice(&header);
    for (i, byte) in rom.iter_mut().enumerate().skip(0x4000) {
        *byte = (i % 251) as u8;
    }

    rom
}

#[test]
fn short_buffers_are_never_recognized() {
    let rom = rom(0x4200);
    for length in [0, 1, 0x15E, 0x160, HEADER_SIZE - 1] {
        let err = detect(&rom[..length]).unwrap_err();
        assert_eq!(err.reason, RejectReason::TooShort { length });
    }
}

#[test]
fn valid_header_is_recognized_with_parsed_fields() {
    let rom = rom(0x4200);
    assert_eq!(crc16(&rom[..HEADER_CRC_COVERAGE]), u16::from_le_bytes([rom[0x15E], rom[0x15F]]));

    let detection = detect(&rom).unwrap();
    assert_eq!(detection.format_label, "Nintendo DS ROM");
    assert_eq!(detection.header.title(), "SYNTHETIC");
    assert_eq!(detection.header.game_code(), "ASYE");
    assert_eq!(detection.header.arm9(), ARM9);
    assert_eq!(detection.header.arm7(), ARM7);
}

#[test]
fn every_covered_byte_is_tamper_sensitive() {
    let rom = rom(0x4200);
    (0..HEADER_CRC_COVERAGE).into_par_iter().for_each(|index| {
        for flip in [0x01, 0x80, 0xFF] {
            let mut tampered = rom[..HEADER_SIZE].to_vec();
            tampered[index] ^= flip;
            assert!(detect(&tampered).is_err(), "Flipping 0x{flip:02X} at 0x{index:03X} went unnoticed.");
        }
    });
}

#[test]
fn primary_end_to_end() {
    let rom = rom(0x4200);
    let header = detect(&rom).unwrap().header;
    let plan = load(&header, &rom, ImageSelection::Arm9).unwrap();

    assert_eq!(plan.copy, CopyInstruction { source_offset: 0x4000, length: 0x100, destination: 0x0200_0000 });
    assert!(!plan.entry_differs_from_start);
    assert!(plan.annotations.iter().all(|annotation| annotation.text != ENTRY_POINT));

    let mut space = RawAddressSpace::new();
    install(&plan, &rom, &mut space).unwrap();
    assert_eq!(space.processor_type(), Some("ARM"));
    assert_eq!(space.entry_point(), Some(0x0200_0000));
    assert_eq!(space.segments().len(), plan.windows.len());
    assert!(space.segments().iter().all(|segment| segment.class == SegmentClass::Code && segment.name == "RAM"));
    assert_eq!(space.read(0x0200_0000, 0x100), Some(&rom[0x4000..0x4100]));
    assert_eq!(space.peek(0x0200_0100), Some(0));

    let comments = space.comments();
    assert_eq!(comments.len(), plan.annotations.len());
    assert_eq!(comments.last().unwrap(), &(0x0200_0100, END_OF_CONTENT.to_string()));
}

#[test]
fn primary_truncated_end_to_end() {
    let rom = rom(0x4050);
    let header = detect(&rom).unwrap().header;
    let err = load(&header, &rom, ImageSelection::Arm9).unwrap_err();
    assert_eq!(err, LoadError::TruncatedImage {
        selection: ImageSelection::Arm9,
        rom_offset: 0x4000,
        size: 0x100,
        file_length: 0x4050,
    });
}

#[test]
fn secondary_truncated_while_primary_fits() {
    let rom = rom(0x4180);
    let header = detect(&rom).unwrap().header;
    assert!(load(&header, &rom, ImageSelection::Arm9).is_ok());
    let err = load(&header, &rom, ImageSelection::Arm7).unwrap_err();
    assert!(matches!(err, LoadError::TruncatedImage { selection: ImageSelection::Arm7, .. }));
}

#[test]
fn secondary_with_separate_entry_point() {
    let rom = rom(0x4200);
    let header = detect(&rom).unwrap().header;
    let plan = load(&header, &rom, ImageSelection::Arm7).unwrap();
    assert!(plan.entry_differs_from_start);

    let mut space = RawAddressSpace::new();
    install(&plan, &rom, &mut space).unwrap();
    assert_eq!(space.processor_type(), Some("ARM710A"));
    assert_eq!(space.entry_point(), Some(0x0380_0020));

    let listing = space.listing();
    let beginning = listing.find(BEGINNING_OF_CONTENT).unwrap();
    let entry = listing.find(ENTRY_POINT).unwrap();
    let end = listing.find(END_OF_CONTENT).unwrap();
    assert!(beginning < entry && entry < end);
    assert!(listing.contains("03800020  ;   --- Entry point ---"));
    assert!(listing.contains("03800100  ;   --- End of ROM content ---"));
}

#[test]
fn illegal_destination() {
    let arm9 = ImageDescriptor { rom_offset: 0x200, entry_address: 0, ram_address: 0, size: 0x0400_0000 };
    let header = RawHeaderBuilder::new().arm9(arm9).arm7(ARM7).build();
    let mut rom = vec![0; 0x0400_0200];
    rom[..HEADER_SIZE].copy_from_slice(&header);

    let header = detect(&rom).unwrap().header;
    let err = load(&header, &rom, ImageSelection::Arm9).unwrap_err();
    assert_eq!(err, LoadError::IllegalMemoryRegion { selection: ImageSelection::Arm9, start: 0, end: Some(0x0400_0000) });
    // The other image is still loadable.
    assert!(load(&header, &rom, err.selection().other()).is_ok());
}

#[test]
fn loosely_accepted_destination_fails_at_install() {
    // Starts past every window's start, so it is accepted, but nothing is mapped there.
    let arm9 = ImageDescriptor { rom_offset: 0x200, entry_address: 0x0600_0000, ram_address: 0x0600_0000, size: 0x10 };
    let header = RawHeaderBuilder::new().arm9(arm9).build();
    let mut rom = vec![0; 0x400];
    rom[..HEADER_SIZE].copy_from_slice(&header);

    let header = detect(&rom).unwrap().header;
    let plan = load(&header, &rom, ImageSelection::Arm9).unwrap();
    let mut space = RawAddressSpace::new();
    assert!(install(&plan, &rom, &mut space).is_err());
}
