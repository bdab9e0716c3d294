//! `log` backend: the browser console on wasm, stderr everywhere else.

use log::{Level, LevelFilter, Log, Metadata, Record};

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use wasm_bindgen::prelude::*;

        #[wasm_bindgen]
        extern "C" {
            #[wasm_bindgen(js_namespace = console)]
            fn log(s: &str);

            #[wasm_bindgen(js_namespace = console, js_name = warn)]
            fn warn(s: &str);

            #[wasm_bindgen(js_namespace = console, js_name = error)]
            fn error(s: &str);
        }

        fn write(level: Level, line: &str) {
            match level {
                Level::Error => error(line),
                Level::Warn => warn(line),
                _ => log(line),
            }
        }
    } else {
        fn write(_level: Level, line: &str) {
            eprintln!("{}", line);
        }
    }
}

pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            write(record.level(), &format_record(record));
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[{} {}] {}", record.level(), record.target(), record.args())
}

/// Install the console logger. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_carry_level_and_target() {
        let line = format_record(
            &Record::builder()
                .level(Level::Warn)
                .target("pluckstring::audio")
                .args(format_args!("no device"))
                .build(),
        );
        assert_eq!(line, "[WARN pluckstring::audio] no device");
    }
}
