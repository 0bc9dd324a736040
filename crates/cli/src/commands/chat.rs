use std::io::{self, BufRead, Write};

use crmpilot_core::config::{AppConfig, LoadOptions};

use crate::bootstrap;
use crate::commands::CommandResult;

const BANNER: &str = "CRM Assistant ready. Type a request, or `quit` to exit.\n\
Examples:\n  \
- Create a contact for jane@example.com with first name Jane\n  \
- Update contact jane@example.com phone number to 555-123-4567\n  \
- Find contact jane@example.com\n  \
- Delete contact jane@example.com\n  \
- Create deal for Acme Corp with amount $50,000 for jane@example.com";

pub fn run() -> CommandResult {
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

    println!("{BANNER}");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => return CommandResult::runtime_failure(error),
        }

        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if matches!(request.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        let reply = runtime.block_on(app.dispatcher.process(request));
        println!("{reply}");
    }

    CommandResult::success("chat session ended")
}
