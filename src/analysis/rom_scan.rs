use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;

use crate::cartridge::cartridge_header::HEADER_SIZE;
use crate::cartridge::detect::{detect, RejectReason};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ScanResult {
    Recognized { title: String, game_code: String, header_crc: u16 },
    NotRecognized(RejectReason),
    Unreadable(String),
}

impl ScanResult {
    pub fn is_recognized(&self) -> bool {
        matches!(self, ScanResult::Recognized { .. })
    }
}

// Probes every regular file beneath `base_path`, sorted by path. Only the header is read.
pub fn scan(base_path: &Path) -> Vec<(PathBuf, ScanResult)> {
    let mut paths: Vec<PathBuf> = WalkDir::new(base_path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable directory entry. {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    paths.sort();

    paths.into_iter()
        .map(|path| {
            let result = probe(&path);
            info!(target: "scan", "{}: {result:?}", path.display());
            (path, result)
        })
        .collect()
}

pub fn probe(path: &Path) -> ScanResult {
    let mut header = Vec::with_capacity(HEADER_SIZE);
    let read = File::open(path)
        .and_then(|file| file.take(HEADER_SIZE as u64).read_to_end(&mut header));
    if let Err(err) = read {
        return ScanResult::Unreadable(err.to_string());
    }

    match detect(&header) {
        Ok(detection) => ScanResult::Recognized {
            title: detection.header.title(),
            game_code: detection.header.game_code(),
            header_crc: detection.header.header_crc(),
        },
        Err(err) => ScanResult::NotRecognized(err.reason),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::cartridge::cartridge_header::test_data;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ndsloader-scan-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[test]
    fn finds_roms_in_nested_directories() {
        let dir = scratch_dir("nested");
        let mut rom = test_data::raw_header().to_vec();
        rom.resize(0x4200, 0);
        fs::write(dir.join("nested").join("homebrew.nds"), &rom).unwrap();
        fs::write(dir.join("notes.txt"), b"not a rom").unwrap();
        fs::write(dir.join("zeros.bin"), vec![0u8; 0x400]).unwrap();

        let results = scan(&dir);
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(results.len(), 3);
        let recognized: Vec<_> = results.iter().filter(|(_, result)| result.is_recognized()).collect();
        assert_eq!(recognized.len(), 1);
        assert!(recognized[0].0.ends_with("nested/homebrew.nds"));
        assert!(matches!(&recognized[0].1, ScanResult::Recognized { title, .. } if title == "HOMEBREW"));

        let short = results.iter().find(|(path, _)| path.ends_with("notes.txt")).unwrap();
        assert_eq!(short.1, ScanResult::NotRecognized(RejectReason::TooShort { length: 9 }));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let result = probe(Path::new("/definitely/not/a/real/path.nds"));
        assert!(matches!(result, ScanResult::Unreadable(_)));
    }
}
