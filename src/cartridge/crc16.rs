// The CRC-16 used by the DS header (reflected 0x8005, i.e. 0xA001), seeded with 0xFFFF and never
// inverted. The header CRC and the logo CRC are both computed this way.
pub const CRC16_INITIAL_VALUE: u16 = 0xFFFF;
const REFLECTED_POLYNOMIAL: u16 = 0xA001;

pub static CRC16_TABLE: [u16; 256] = crc16_table();

const fn crc16_table() -> [u16; 256] {
    let mut table = [0; 256];
    let mut index = 0;
    while index < 256 {
        let mut crc = index as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ REFLECTED_POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }

        table[index] = crc;
        index += 1;
    }

    table
}

pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(CRC16_INITIAL_VALUE, |crc, &byte| {
        (crc >> 8) ^ CRC16_TABLE[((crc ^ u16::from(byte)) & 0xFF) as usize]
    })
}
