use crate::models::ImageRecord;
use crate::transport::{HttpResponse, TransportError};
use serde_json::Value;

/// Error type for a single fetch attempt
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// No usable response: connection failure or a non-success status
    Transport(String),
    /// The backend answered with `{"error": ...}`
    Application(String),
    /// The body was not one of the two known shapes
    Parse(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "{}", msg),
            FetchError::Application(msg) => write!(f, "{}", msg),
            FetchError::Parse(msg) => write!(f, "Invalid response from backend: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::Transport(err.message().to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// One page of images as returned by `GET /images`
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePage {
    pub images: Vec<ImageRecord>,
    /// Total number of images the backend holds, when it says so
    pub total_count: Option<usize>,
}

/// Turn a raw backend reply into a page of records.
///
/// A non-success status is a transport failure unless the body carries an
/// `error` message, in which case that message wins.
pub fn parse_images_response(response: &HttpResponse) -> Result<ImagePage, FetchError> {
    let parsed = serde_json::from_slice::<Value>(&response.body);

    if !response.status.is_success() {
        if let Some(message) = parsed.as_ref().ok().and_then(error_message) {
            return Err(FetchError::Application(message));
        }
        return Err(FetchError::Transport(format!(
            "HTTP {} {}",
            response.status.as_u16(),
            response.status.canonical_reason().unwrap_or("Error")
        )));
    }

    parse_images_body(&parsed?)
}

/// Interpret an already decoded JSON body
pub fn parse_images_body(root: &Value) -> Result<ImagePage, FetchError> {
    let Some(object) = root.as_object() else {
        return Err(FetchError::Parse("expected a JSON object".to_string()));
    };

    if let Some(message) = error_message(root) {
        return Err(FetchError::Application(message));
    }

    let Some(images) = object.get("images") else {
        return Err(FetchError::Parse(
            "missing both \"images\" and \"error\"".to_string(),
        ));
    };

    // `null` is how some encoders write an empty list
    let images: Vec<ImageRecord> = match images {
        Value::Array(items) => items.iter().map(ImageRecord::from_json).collect(),
        Value::Null => Vec::new(),
        _ => return Err(FetchError::Parse("\"images\" is not an array".to_string())),
    };

    let total_count = object
        .get("total_count")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok());

    Ok(ImagePage {
        images,
        total_count,
    })
}

/// Extract the `error` field as display text, if present
fn error_message(root: &Value) -> Option<String> {
    let field = root.as_object()?.get("error")?;
    let message = match field {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if message.is_empty() {
        Some("Backend reported an unspecified error".to_string())
    } else {
        Some(message)
    }
}
