use std::io;
use std::process::ExitCode;

use log::{error, info};
use structopt::StructOpt;

use ndsloader::analysis::rom_scan::{self, ScanResult};
use ndsloader::cartridge::detect::detect;
use ndsloader::cartridge::rom_file::RomFile;
use ndsloader::config::{Config, Mode, Opt};
use ndsloader::loader::image_selection::ImageSelection;
use ndsloader::loader::loader::load;
use ndsloader::logging::logger;
use ndsloader::memory::address_space::{install, RawAddressSpace};
use ndsloader::prompt::ask_selection;

fn main() -> ExitCode {
    let opt = Opt::from_args();
    logger::init(Config::logger(&opt)).unwrap();

    let result = Config::new(&opt).and_then(|config| match config.mode() {
        Mode::Load { rom, selection, print_listing } => load_rom(rom, *selection, *print_listing),
        Mode::Scan(path) => {
            let results = rom_scan::scan(path);
            let recognized = results.iter().filter(|(_, result)| result.is_recognized()).count();
            for (path, result) in &results {
                if let ScanResult::Recognized { title, game_code, .. } = result {
                    println!("{}: {title} ({game_code})", path.display());
                }
            }

            info!("{recognized} of {} files are DS ROMs.", results.len());
            Ok(())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load_rom(rom: &RomFile, selection: Option<ImageSelection>, print_listing: bool) -> Result<(), String> {
    info!("Loading ROM '{}'.", rom.path().display());
    let detection = detect(rom).map_err(|err| format!("{}: {err}", rom.rom_file_name()))?;
    info!("{} detected. Full CRC32: {:08X}", detection.format_label, rom.full_hash());
    info!(target: "header", "\n{}", detection.header);

    let selection = match selection {
        Some(selection) => selection,
        None => match ask_selection(io::stdin().lock(), io::stdout())? {
            Some(selection) => selection,
            None => {
                info!("Load cancelled.");
                return Ok(());
            }
        },
    };

    let plan = load(&detection.header, rom, selection)
        .map_err(|err| format!("{err} Try loading the {} image instead.", selection.other()))?;

    let mut space = RawAddressSpace::new();
    install(&plan, rom, &mut space)?;
    if print_listing {
        print!("{}", space.listing());
    }

    Ok(())
}
