//! Shared utilities for the clock series
//!
//! Time zone handling, configuration persistence and the local key/value
//! store used by the individual clocks.

pub mod config;
pub mod storage;
pub mod time_engine;

pub use config::{config_dir, config_path, load_config, save_config, ConfigError};
pub use storage::{data_dir, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use time_engine::{
    compute_zone_time_at, format_live_time, format_local_clock, local_clock_at, parse_timezone,
    search_timezones, InvalidTimeZone, LocalClockText, Meridiem, ZoneTime,
};
