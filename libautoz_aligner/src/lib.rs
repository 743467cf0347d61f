//! # autoz_aligner
//!
//! autoz_aligner extracts wafer alignment ("AutoZ") measurements from semiconductor
//! tester logs. It takes a pair of text logs produced by a tester and its prober, finds
//! the calibration baseline ("standard point") and splits every later `ndlp-correct`
//! measurement into per-wafer X/Y/Z series.
//!
//! ## Supported testers
//!
//! - J750, J750EX, UFLEX
//! - ETS88, Accotest (the AutoZ completion marker must be configured)
//! - AG93000
//! - T2K
//!
//! ## Processing
//!
//! Analysis happens in two stages which must run in order:
//!
//! 1. The AutoZ log is scanned for a tester specific marker which gives the anchor
//!    timestamp (see [`locator`]).
//! 2. The ALL log is scanned for wafer declarations (`EX_G S : b<wafer>`) and
//!    measurements (`ndlp-correct: ( x, y, z )`). The first measurement at or after the
//!    anchor is the standard point; every measurement from there on is assigned to the
//!    wafer whose start time interval contains it (see [`extractor`]).
//!
//! ## Configuration
//!
//! The YAML format of a configuration file is as follows:
//!
//! ```yml
//! machine: J750
//! autoz_log_path: /path/to/AutoZLog.txt
//! all_log_path: /path/to/ALL.txt
//! report_path: /path/to/report.yml
//! ets88_marker: null
//! ```
//!
//! `report_path` is optional; when set a YAML report with the per-wafer series,
//! per-axis statistics and the wafer status dashboard is written there.
//! `ets88_marker` is only used for ETS88 and Accotest testers.
//!
//! ## Output
//!
//! ```text
//! report.yml
//! version, generated_at, machine, anchor_timestamp
//! standard - x, y, z, timestamp
//! total_wafers, total_points
//! axes
//! |---- axis, standard, starts_with_standard
//! |---- statistics - min, max, mean, median, std, count
//! |---- anomalies - total_points, normal_points, anomaly_points, anomaly_percent
//! wafer_status
//! |---- wafer_id, below_standard, below_count, total_count, percent_below
//! wafers
//! |---- wafer_id, start_time, x_values, y_values, z_values
//! ```
pub mod config;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod log_file;
pub mod machine;
pub mod process;
pub mod report;
pub mod session;
pub mod statistics;
pub mod timestamp;
pub mod wafer;
pub mod worker_status;
