//! Configuration and constants for the profiler.

use std::time::Duration;

/// Marker echoed by gdb before every `thread apply all bt`.
///
/// One occurrence in the capture log opens one sampling round.
pub const TRACE_SEPARATOR: &str = "=== pmprof trace separator ===";

/// Program used to capture backtraces
pub const DEFAULT_GDB: &str = "gdb";

/// Environment variable overriding the gdb program
pub const GDB_ENV_VAR: &str = "PMPROF_GDB";

/// Interval between rounds while monitoring a freshly spawned command
pub const DEFAULT_RUN_INTERVAL: Duration = Duration::from_secs(3);

/// Interval between rounds while attached to an existing process
pub const DEFAULT_ATTACH_INTERVAL: Duration = Duration::from_secs(1);

/// Default capture log path
pub const DEFAULT_CAPTURE_LOG: &str = "pmprof.log";

/// Current JSON report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

// Separator between frames in collapsed-stack output, as flamegraph tools expect
pub const FOLDED_FRAME_SEPARATOR: &str = ";";
