use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Diagnostics go to stderr as `[LEVEL] message`; stdout stays free for tool output.
pub fn init(verbose: bool) {
	let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
	let config = ConfigBuilder::new()
		.set_time_level(LevelFilter::Off)
		.set_thread_level(LevelFilter::Off)
		.set_target_level(LevelFilter::Off)
		.set_location_level(LevelFilter::Off)
		.build();
	// Only the first logger wins.
	let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
