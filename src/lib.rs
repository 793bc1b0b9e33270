/// JNE Plataforma Electoral types, parsers and service client.
pub mod jne;

/// Logging verbosity for SDK operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Emit verbose debug output.
    Debug,
    /// Emit standard informational output.
    Information,
}

impl Default for LogLevel {
    /// Defaults to `Information` logging.
    fn default() -> Self {
        LogLevel::Information
    }
}
