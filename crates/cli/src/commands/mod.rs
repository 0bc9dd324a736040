pub mod ask;
pub mod chat;
pub mod config;
pub mod doctor;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn config_failure(error: impl std::fmt::Display) -> Self {
        Self { exit_code: 2, output: format!("config validation failed: {error}") }
    }

    pub fn runtime_failure(error: impl std::fmt::Display) -> Self {
        Self { exit_code: 1, output: format!("startup failed: {error}") }
    }
}
