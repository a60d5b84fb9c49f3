use std::fmt;

/// Central error type for the photo frame binary
#[derive(Debug)]
pub enum AppError {
    /// Config file could not be read
    Filesystem(std::io::Error),
    /// Config file is not valid TOML for [`crate::config::FrameConfig`]
    ConfigFormat(toml::de::Error),
    /// Config values out of range
    Validation(String),
    /// HTTP client could not be set up
    Transport(frame_client::TransportError),
    /// Backend URL rejected by the client
    BackendUrl(frame_client::InvalidBaseUrl),
    /// Async runtime could not start
    Runtime(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::ConfigFormat(e) => write!(f, "Config format error: {}", e),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Transport(e) => write!(f, "Transport error: {}", e),
            AppError::BackendUrl(e) => write!(f, "{}", e),
            AppError::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::ConfigFormat(e)
    }
}

impl From<frame_client::TransportError> for AppError {
    fn from(e: frame_client::TransportError) -> Self {
        AppError::Transport(e)
    }
}

impl From<frame_client::InvalidBaseUrl> for AppError {
    fn from(e: frame_client::InvalidBaseUrl) -> Self {
        AppError::BackendUrl(e)
    }
}

impl AppError {
    /// Short text for the console when startup fails
    pub fn user_message(&self) -> String {
        match self {
            AppError::Filesystem(_) => {
                "Could not read the config file. Please check the path.".to_string()
            }
            AppError::ConfigFormat(_) => "The config file is not valid TOML.".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Transport(_) => "Could not set up the network client.".to_string(),
            AppError::BackendUrl(e) => format!("Please check backend_url: {}", e.reason),
            AppError::Runtime(_) => "Could not start. Please try again.".to_string(),
        }
    }
}
