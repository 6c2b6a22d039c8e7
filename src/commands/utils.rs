use crate::utils::config::{REPORT_SCHEMA_VERSION, TRACE_SEPARATOR};

/// Display version information
pub fn display_version() {
    println!("pmprof v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!("Trace separator: {}", TRACE_SEPARATOR);
    println!();
    println!("A poor man's sampling profiler built on gdb backtraces.");
}
