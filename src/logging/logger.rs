use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

pub fn init(logger: Logger) -> Result<(), SetLoggerError> {
    let max_level = if logger.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(max_level))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Logger {
    pub verbose: bool,
    pub log_header: bool,
    pub log_load_plan: bool,
    pub log_scan: bool,
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > Level::Info && !self.verbose {
            return false;
        }

        match metadata.target() {
            "" => true,
            "header" => self.log_header,
            "loadplan" => self.log_load_plan,
            "scan" => self.log_scan,
            target => {
                let chunks: Vec<&str> = target.split("::").collect();
                matches!(chunks[..], ["ndsloader", ..])
            }
        }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if record.level() != Level::Info {
                print!("{} - ", record.level());
            }

            match record.target() {
                "header" => print!("HEADER "),
                "loadplan" => print!("LOAD PLAN "),
                _ => {}
            }

            println!("{}", record.args());
        }
    }

    fn flush(&self) {}
}
