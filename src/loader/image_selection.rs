use enum_iterator::Sequence;
use strum_macros::{Display, EnumString};

use crate::cartridge::cartridge_header::{CartridgeHeader, ImageDescriptor};

// Which of the two executables in the ROM to load. Chosen by the host for every load.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Sequence, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ImageSelection {
    #[strum(serialize = "arm9", serialize = "primary", to_string = "ARM9")]
    Arm9,
    #[strum(serialize = "arm7", serialize = "secondary", to_string = "ARM7")]
    Arm7,
}

impl ImageSelection {
    pub const PRIMARY: ImageSelection = ImageSelection::Arm9;
    pub const SECONDARY: ImageSelection = ImageSelection::Arm7;

    pub fn image(self, header: &CartridgeHeader) -> ImageDescriptor {
        match self {
            ImageSelection::Arm9 => header.arm9(),
            ImageSelection::Arm7 => header.arm7(),
        }
    }

    // The disassembler's processor module that matches this CPU.
    pub fn processor_type(self) -> &'static str {
        match self {
            ImageSelection::Arm9 => "ARM",
            ImageSelection::Arm7 => "ARM710A",
        }
    }

    pub fn other(self) -> ImageSelection {
        match self {
            ImageSelection::Arm9 => ImageSelection::Arm7,
            ImageSelection::Arm7 => ImageSelection::Arm9,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use enum_iterator::all;

    use super::*;
    use crate::cartridge::cartridge_header::test_data;

    #[test]
    fn parse_names() {
        assert_eq!(ImageSelection::from_str("arm9"), Ok(ImageSelection::Arm9));
        assert_eq!(ImageSelection::from_str("ARM7"), Ok(ImageSelection::Arm7));
        assert_eq!(ImageSelection::from_str("Primary"), Ok(ImageSelection::Arm9));
        assert_eq!(ImageSelection::from_str("secondary"), Ok(ImageSelection::Arm7));
        assert!(ImageSelection::from_str("arm11").is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(ImageSelection::Arm9.to_string(), "ARM9");
        assert_eq!(ImageSelection::Arm7.to_string(), "ARM7");
    }

    #[test]
    fn resolves_matching_header_fields() {
        let header = test_data::header();
        assert_eq!(ImageSelection::PRIMARY.image(&header), test_data::arm9());
        assert_eq!(ImageSelection::SECONDARY.image(&header), test_data::arm7());
    }

    #[test]
    fn exactly_two_choices() {
        let selections: Vec<_> = all::<ImageSelection>().collect();
        assert_eq!(selections, vec![ImageSelection::Arm9, ImageSelection::Arm7]);
        for selection in selections {
            assert_eq!(selection.other().other(), selection);
            assert_ne!(selection.other(), selection);
        }
    }
}
