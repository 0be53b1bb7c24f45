use env_logger::Builder;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

// INFO and up to the console, the same lines appended to the log file;
// RUST_LOG overrides the filter. An unopenable log file degrades to
// console-only instead of refusing to start.
pub fn setup_logger(logs_path: &Path) {
    let mut builder = Builder::new();
    builder.filter(None, LevelFilter::Info);
    builder.parse_default_env();

    match OpenOptions::new()
        .create(true)
        .write(true)
        .append(true)
        .open(logs_path)
    {
        Ok(log_file) => {
            let log_file = Mutex::new(log_file);
            builder.format(move |buf, record| {
                let mut log_file = log_file.lock().unwrap();
                let _ = writeln!(log_file, "{} - {}", record.level(), record.args());
                writeln!(buf, "{} - {}", record.level(), record.args())
            });
        }
        Err(err) => {
            eprintln!("Could not open log file {:?}: {}", logs_path, err);
            builder.format(|buf, record| writeln!(buf, "{} - {}", record.level(), record.args()));
        }
    }

    builder.init();
}
