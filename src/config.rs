use std::path::PathBuf;

use structopt::StructOpt;

use crate::cartridge::rom_file::RomFile;
use crate::loader::image_selection::ImageSelection;
use crate::logging::logger::Logger;

pub enum Mode {
    Load {
        rom: RomFile,
        // None means ask interactively.
        selection: Option<ImageSelection>,
        print_listing: bool,
    },
    Scan(PathBuf),
}

pub struct Config {
    mode: Mode,
}

impl Config {
    pub fn new(opt: &Opt) -> Result<Config, String> {
        let mode = match (&opt.scan, &opt.rom_path) {
            (Some(scan_path), None) => Mode::Scan(scan_path.clone()),
            (None, Some(rom_path)) => Mode::Load {
                rom: RomFile::open(rom_path)?,
                selection: opt.processor,
                print_listing: opt.listing,
            },
            (Some(_), Some(_)) => return Err("Specify either a ROM or --scan, not both.".to_string()),
            (None, None) => return Err("No ROM specified.".to_string()),
        };

        Ok(Config { mode })
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn logger(opt: &Opt) -> Logger {
        Logger {
            verbose: opt.verbose,
            log_header: opt.log_header,
            log_load_plan: opt.log_load_plan,
            log_scan: opt.log_scan || opt.scan.is_some(),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "ndsloader", about = "Detects Nintendo DS ROMs and loads their ARM9 or ARM7 executable.")]
pub struct Opt {
    #[structopt(name = "ROM", parse(from_os_str))]
    pub rom_path: Option<PathBuf>,

    /// Which executable to load: arm9 or arm7. Asks if omitted.
    #[structopt(short, long)]
    pub processor: Option<ImageSelection>,

    /// Probe every file beneath this directory instead of loading a ROM.
    #[structopt(long, parse(from_os_str))]
    pub scan: Option<PathBuf>,

    /// Print the annotated listing after loading.
    #[structopt(long)]
    pub listing: bool,

    #[structopt(short, long)]
    pub verbose: bool,

    #[structopt(long)]
    pub log_header: bool,

    #[structopt(long)]
    pub log_load_plan: bool,

    #[structopt(long)]
    pub log_scan: bool,
}

impl Opt {
    pub fn new(rom_path: Option<PathBuf>) -> Self {
        Opt {
            rom_path,
            processor: None,
            scan: None,
            listing: false,
            verbose: false,
            log_header: false,
            log_load_plan: false,
            log_scan: false,
        }
    }
}
