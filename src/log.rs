// Pixcade
// copyright pixcade contributors 2024～2026

//! Log module, a file appender per game under log/, reference
//! https://docs.rs/log4rs

use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// init the log system; failure to set up the appender (read-only dir,
/// double init in tests) leaves logging disabled rather than aborting
#[allow(unused)]
pub fn init_log(level: LevelFilter, file_path: &str) {
    let logfile = match FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(file_path)
    {
        Ok(f) => f,
        Err(_) => return,
    };
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level));
    if let Ok(config) = config {
        let _ = log4rs::init_config(config);
    }
}
