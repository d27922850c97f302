use std::fmt;

use crate::cartridge::crc16::crc16;
use crate::util::unit::KIBIBYTE;

// See https://problemkaputt.de/gbatek.htm#dscartridgeheader
pub const HEADER_SIZE: usize = 0x200;
// The header CRC covers everything before the header CRC field itself.
pub const HEADER_CRC_COVERAGE: usize = 0x15E;
pub const TITLE_LENGTH: usize = 12;
pub const LOGO_LENGTH: usize = 156;
pub const EXPECTED_LOGO_CRC: u16 = 0xCF56;

const TITLE_OFFSET: usize = 0x000;
const GAME_CODE_OFFSET: usize = 0x00C;
const MAKER_CODE_OFFSET: usize = 0x010;
const UNIT_CODE_OFFSET: usize = 0x012;
const ENCRYPTION_SEED_SELECT_OFFSET: usize = 0x013;
const DEVICE_CAPACITY_OFFSET: usize = 0x014;
const ROM_VERSION_OFFSET: usize = 0x01E;
const FLAGS_OFFSET: usize = 0x01F;
const ARM9_OFFSET: usize = 0x020;
const ARM7_OFFSET: usize = 0x030;
const FILE_NAME_TABLE_OFFSET: usize = 0x040;
const FILE_ALLOCATION_TABLE_OFFSET: usize = 0x048;
const ARM9_OVERLAY_OFFSET: usize = 0x050;
const ARM7_OVERLAY_OFFSET: usize = 0x058;
const BANNER_OFFSET_OFFSET: usize = 0x068;
const SECURE_AREA_CRC_OFFSET: usize = 0x06C;
const TOTAL_USED_ROM_SIZE_OFFSET: usize = 0x080;
const HEADER_SIZE_OFFSET: usize = 0x084;
const LOGO_OFFSET: usize = 0x0C0;
const LOGO_CRC_OFFSET: usize = 0x15C;
const HEADER_CRC_OFFSET: usize = 0x15E;

const AUTOSTART_FLAG: u8 = 0b0000_0100;

// Where one of the two executables lives in the ROM and where it goes in RAM.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ImageDescriptor {
    pub rom_offset: u32,
    pub entry_address: u32,
    pub ram_address: u32,
    pub size: u32,
}

impl ImageDescriptor {
    fn parse(raw: &[u8; HEADER_SIZE], start: usize) -> Self {
        Self {
            rom_offset: read_u32(raw, start),
            entry_address: read_u32(raw, start + 0x4),
            ram_address: read_u32(raw, start + 0x8),
            size: read_u32(raw, start + 0xC),
        }
    }

    fn write(&self, raw: &mut [u8; HEADER_SIZE], start: usize) {
        write_u32(raw, start, self.rom_offset);
        write_u32(raw, start + 0x4, self.entry_address);
        write_u32(raw, start + 0x8, self.ram_address);
        write_u32(raw, start + 0xC, self.size);
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TableLocation {
    pub offset: u32,
    pub size: u32,
}

impl TableLocation {
    fn parse(raw: &[u8; HEADER_SIZE], start: usize) -> Self {
        Self { offset: read_u32(raw, start), size: read_u32(raw, start + 4) }
    }
}

// The fixed 0x200 byte header at the start of every DS ROM. Only obtainable through detection, so
// a CartridgeHeader in hand always has a valid header CRC.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CartridgeHeader {
    title: [u8; TITLE_LENGTH],
    game_code: [u8; 4],
    maker_code: [u8; 2],
    unit_code: u8,
    encryption_seed_select: u8,
    device_capacity: u8,
    rom_version: u8,
    flags: u8,

    arm9: ImageDescriptor,
    arm7: ImageDescriptor,

    file_name_table: TableLocation,
    file_allocation_table: TableLocation,
    arm9_overlay: TableLocation,
    arm7_overlay: TableLocation,

    banner_offset: u32,
    secure_area_crc: u16,
    total_used_rom_size: u32,
    header_size: u32,
    logo_crc: u16,
    computed_logo_crc: u16,
    header_crc: u16,
}

impl CartridgeHeader {
    pub(crate) fn parse(raw: &[u8; HEADER_SIZE]) -> CartridgeHeader {
        CartridgeHeader {
            title: read_array(raw, TITLE_OFFSET),
            game_code: read_array(raw, GAME_CODE_OFFSET),
            maker_code: read_array(raw, MAKER_CODE_OFFSET),
            unit_code: raw[UNIT_CODE_OFFSET],
            encryption_seed_select: raw[ENCRYPTION_SEED_SELECT_OFFSET],
            device_capacity: raw[DEVICE_CAPACITY_OFFSET],
            rom_version: raw[ROM_VERSION_OFFSET],
            flags: raw[FLAGS_OFFSET],

            arm9: ImageDescriptor::parse(raw, ARM9_OFFSET),
            arm7: ImageDescriptor::parse(raw, ARM7_OFFSET),

            file_name_table: TableLocation::parse(raw, FILE_NAME_TABLE_OFFSET),
            file_allocation_table: TableLocation::parse(raw, FILE_ALLOCATION_TABLE_OFFSET),
            arm9_overlay: TableLocation::parse(raw, ARM9_OVERLAY_OFFSET),
            arm7_overlay: TableLocation::parse(raw, ARM7_OVERLAY_OFFSET),

            banner_offset: read_u32(raw, BANNER_OFFSET_OFFSET),
            secure_area_crc: read_u16(raw, SECURE_AREA_CRC_OFFSET),
            total_used_rom_size: read_u32(raw, TOTAL_USED_ROM_SIZE_OFFSET),
            header_size: read_u32(raw, HEADER_SIZE_OFFSET),
            logo_crc: read_u16(raw, LOGO_CRC_OFFSET),
            computed_logo_crc: crc16(&raw[LOGO_OFFSET..LOGO_OFFSET + LOGO_LENGTH]),
            header_crc: read_u16(raw, HEADER_CRC_OFFSET),
        }
    }

    // The title up to the first NUL. Non-ASCII bytes are mapped one-to-one onto chars.
    pub fn title(&self) -> String {
        self.title.iter()
            .take_while(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect()
    }

    pub fn game_code(&self) -> String {
        self.game_code.iter().map(|&b| char::from(b)).collect()
    }

    pub fn maker_code(&self) -> String {
        self.maker_code.iter().map(|&b| char::from(b)).collect()
    }

    pub fn unit_code(&self) -> u8 {
        self.unit_code
    }

    pub fn encryption_seed_select(&self) -> u8 {
        self.encryption_seed_select
    }

    // Chip size is 128KiB << device_capacity. Real carts stay far below a capacity of 32.
    pub fn chip_size(&self) -> Option<u64> {
        if self.device_capacity < 32 {
            Some(u64::from(128 * KIBIBYTE) << self.device_capacity)
        } else {
            None
        }
    }

    pub fn rom_version(&self) -> u8 {
        self.rom_version
    }

    pub fn autostart(&self) -> bool {
        self.flags & AUTOSTART_FLAG != 0
    }

    pub fn arm9(&self) -> ImageDescriptor {
        self.arm9
    }

    pub fn arm7(&self) -> ImageDescriptor {
        self.arm7
    }

    pub fn file_name_table(&self) -> TableLocation {
        self.file_name_table
    }

    pub fn file_allocation_table(&self) -> TableLocation {
        self.file_allocation_table
    }

    pub fn arm9_overlay(&self) -> TableLocation {
        self.arm9_overlay
    }

    pub fn arm7_overlay(&self) -> TableLocation {
        self.arm7_overlay
    }

    pub fn banner_offset(&self) -> u32 {
        self.banner_offset
    }

    pub fn secure_area_crc(&self) -> u16 {
        self.secure_area_crc
    }

    pub fn total_used_rom_size(&self) -> u32 {
        self.total_used_rom_size
    }

    // The declared size of the whole header area, not HEADER_SIZE.
    pub fn header_size(&self) -> u32 {
        self.header_size
    }

    pub fn logo_crc(&self) -> u16 {
        self.logo_crc
    }

    pub fn logo_is_authentic(&self) -> bool {
        self.logo_crc == EXPECTED_LOGO_CRC && self.computed_logo_crc == EXPECTED_LOGO_CRC
    }

    pub fn header_crc(&self) -> u16 {
        self.header_crc
    }
}

impl fmt::Display for CartridgeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {} ({}), Maker: {}, Version: {}",
            self.title(), self.game_code(), self.maker_code(), self.rom_version)?;
        writeln!(f, "ARM9: ROM 0x{:08X}, RAM 0x{:08X}, Entry 0x{:08X}, Size 0x{:08X}",
            self.arm9.rom_offset, self.arm9.ram_address, self.arm9.entry_address, self.arm9.size)?;
        writeln!(f, "ARM7: ROM 0x{:08X}, RAM 0x{:08X}, Entry 0x{:08X}, Size 0x{:08X}",
            self.arm7.rom_offset, self.arm7.ram_address, self.arm7.entry_address, self.arm7.size)?;
        writeln!(f, "FNT: 0x{:08X} (0x{:X} bytes), FAT: 0x{:08X} (0x{:X} bytes), Banner: 0x{:08X}",
            self.file_name_table.offset, self.file_name_table.size,
            self.file_allocation_table.offset, self.file_allocation_table.size,
            self.banner_offset,
        )?;
        match self.chip_size() {
            Some(chip_size) => write!(f, "Chip size: {}KiB", chip_size / u64::from(KIBIBYTE))?,
            None => write!(f, "Chip size: invalid (0x{:02X})", self.device_capacity)?,
        }
        writeln!(f, ", Used: 0x{:08X} bytes, Header size: 0x{:08X}", self.total_used_rom_size, self.header_size)?;
        write!(f, "Header CRC: 0x{:04X}, Logo CRC: 0x{:04X}{}",
            self.header_crc,
            self.logo_crc,
            if self.logo_is_authentic() { "" } else { " (not the Nintendo logo)" },
        )
    }
}

// Assembles raw header bytes with a correct header CRC. Used for homebrew images and for tests;
// the result still has to go through detection to become a CartridgeHeader.
#[derive(Clone, Debug)]
pub struct RawHeaderBuilder {
    raw: [u8; HEADER_SIZE],
    arm9: ImageDescriptor,
    arm7: ImageDescriptor,
}

impl RawHeaderBuilder {
    pub fn new() -> Self {
        let mut raw = [0; HEADER_SIZE];
        write_u32(&mut raw, HEADER_SIZE_OFFSET, 0x4000);
        Self { raw, arm9: ImageDescriptor::default(), arm7: ImageDescriptor::default() }
    }

    // Titles longer than the field are truncated.
    pub fn title(&mut self, title: &str) -> &mut Self {
        let field = &mut self.raw[TITLE_OFFSET..TITLE_OFFSET + TITLE_LENGTH];
        field.fill(0);
        for (dest, &src) in field.iter_mut().zip(title.as_bytes()) {
            *dest = src;
        }

        self
    }

    pub fn game_code(&mut self, game_code: [u8; 4]) -> &mut Self {
        self.raw[GAME_CODE_OFFSET..GAME_CODE_OFFSET + 4].copy_from_slice(&game_code);
        self
    }

    pub fn maker_code(&mut self, maker_code: [u8; 2]) -> &mut Self {
        self.raw[MAKER_CODE_OFFSET..MAKER_CODE_OFFSET + 2].copy_from_slice(&maker_code);
        self
    }

    pub fn device_capacity(&mut self, device_capacity: u8) -> &mut Self {
        self.raw[DEVICE_CAPACITY_OFFSET] = device_capacity;
        self
    }

    pub fn arm9(&mut self, arm9: ImageDescriptor) -> &mut Self {
        self.arm9 = arm9;
        self
    }

    pub fn arm7(&mut self, arm7: ImageDescriptor) -> &mut Self {
        self.arm7 = arm7;
        self
    }

    pub fn header_size(&mut self, header_size: u32) -> &mut Self {
        write_u32(&mut self.raw, HEADER_SIZE_OFFSET, header_size);
        self
    }

    pub fn total_used_rom_size(&mut self, total_used_rom_size: u32) -> &mut Self {
        write_u32(&mut self.raw, TOTAL_USED_ROM_SIZE_OFFSET, total_used_rom_size);
        self
    }

    pub fn build(&self) -> [u8; HEADER_SIZE] {
        let mut raw = self.raw;
        self.arm9.write(&mut raw, ARM9_OFFSET);
        self.arm7.write(&mut raw, ARM7_OFFSET);
        let header_crc = crc16(&raw[..HEADER_CRC_COVERAGE]);
        raw[HEADER_CRC_OFFSET..HEADER_CRC_OFFSET + 2].copy_from_slice(&header_crc.to_le_bytes());
        raw
    }
}

impl Default for RawHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn read_u16(raw: &[u8; HEADER_SIZE], start: usize) -> u16 {
    u16::from_le_bytes(read_array(raw, start))
}

fn read_u32(raw: &[u8; HEADER_SIZE], start: usize) -> u32 {
    u32::from_le_bytes(read_array(raw, start))
}

fn read_array<const N: usize>(raw: &[u8; HEADER_SIZE], start: usize) -> [u8; N] {
    let mut result = [0; N];
    result.copy_from_slice(&raw[start..start + N]);
    result
}

fn write_u32(raw: &mut [u8; HEADER_SIZE], start: usize, value: u32) {
    raw[start..start + 4].copy_from_slice(&value.to_le_bytes());
}
