/// Exit code for usage/configuration problems (unknown keys, bad date ranges).
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for runtime failures (terminal I/O, rendering).
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// A usage/configuration error (exit code 2).
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    /// A runtime error (exit code 4).
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    /// A registry lookup miss. `kind` names the registry ("country", "indicator").
    pub fn unknown_key(kind: &str, key: &str, known: &[&str]) -> Self {
        Self::config(format!(
            "Unknown {kind} key '{key}'. Known keys: {}",
            known.join(", ")
        ))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
