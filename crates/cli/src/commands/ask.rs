use crmpilot_core::config::{AppConfig, LoadOptions};

use crate::bootstrap;
use crate::commands::CommandResult;

pub fn run(request: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure(error),
    };
    bootstrap::init_logging(&config);

    let app = match bootstrap::build_app(&config) {
        Ok(app) => app,
        Err(error) => return CommandResult::runtime_failure(error),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::runtime_failure(error),
    };

    CommandResult::success(runtime.block_on(app.dispatcher.process(request)))
}
