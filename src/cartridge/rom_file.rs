use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use log::warn;
use memmap2::Mmap;

// The bytes of a ROM file on disk. Mapped read-only when possible, read into memory otherwise.
pub struct RomFile {
    path: PathBuf,
    bytes: RomBytes,
}

enum RomBytes {
    Mapped(Mmap),
    Read(Vec<u8>),
}

impl RomFile {
    pub fn open(path: &Path) -> Result<RomFile, String> {
        let file = File::open(path)
            .map_err(|err| format!("Failed to open ROM {}. {err}", path.display()))?;

        // SAFETY: Unsafe. We can't guarantee that another process doesn't modify the file.
        let bytes = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => RomBytes::Mapped(mmap),
            Err(err) => {
                warn!("Failed to map ROM {}, reading it instead. {err}", path.display());
                let bytes = std::fs::read(path)
                    .map_err(|err| format!("Failed to read ROM {}. {err}", path.display()))?;
                RomBytes::Read(bytes)
            }
        };

        Ok(RomFile { path: path.to_path_buf(), bytes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rom_file_name(&self) -> String {
        self.path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn full_hash(&self) -> u32 {
        crc32fast::hash(self)
    }
}

impl Deref for RomFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.bytes {
            RomBytes::Mapped(mmap) => &mmap[..],
            RomBytes::Read(bytes) => &bytes[..],
        }
    }
}
