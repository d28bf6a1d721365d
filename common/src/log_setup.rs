use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

/// Starts the process logger: everything goes to a rotating file under `logs/`,
/// warnings and errors are duplicated to stderr and `console` decides what
/// reaches stdout.
///
/// The returned handle must be kept alive for the lifetime of the program.
pub fn setup_logging(base_level: &str, console: bool) -> LoggerHandle {
    let stdout = if console {
        Duplicate::All
    } else {
        Duplicate::None
    };

    Logger::try_with_env_or_str(base_level)
        .unwrap_or_else(|e| panic!("Invalid log filter '{}': {}", base_level, e))
        .log_to_file(
            FileSpec::default()
                .directory("logs")
                .basename("craters"),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(stdout)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e))
}
