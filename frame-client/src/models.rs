use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Sort modes understood by the photo frame backend
pub const KNOWN_ORDERINGS: [&str; 5] = [
    "name_asc",
    "name_desc",
    "date_asc",
    "date_desc",
    "random",
];

/// Modification time of an image, or the invalid sentinel when the backend
/// sent something that is not an ISO-8601 timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    pub const INVALID: Timestamp = Timestamp(None);

    pub fn new(value: DateTime<Utc>) -> Self {
        Timestamp(Some(value))
    }

    /// Parse an ISO-8601 string.
    ///
    /// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC) with
    /// optional fractional seconds, and a bare date. Anything else yields
    /// [`Timestamp::INVALID`].
    pub fn parse_iso8601(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::INVALID;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Self::new(dt.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Self::new(naive.and_utc());
            }
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self::new(naive.and_utc()))
            .unwrap_or(Self::INVALID)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn value(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "invalid"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

/// Metadata for one image served by the backend.
///
/// Records are immutable; a refresh replaces whole records.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImageRecord {
    filename: String,
    file_path: String,
    url: String,
    mime_type: String,
    size_bytes: i64,
    width: i32,
    height: i32,
    modified_at: Timestamp,
}

impl ImageRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        filename: impl Into<String>,
        file_path: impl Into<String>,
        url: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: i64,
        width: i32,
        height: i32,
        modified_at: Timestamp,
    ) -> Self {
        Self {
            filename: filename.into(),
            file_path: file_path.into(),
            url: url.into(),
            mime_type: mime_type.into(),
            size_bytes: size_bytes.max(0),
            width: width.max(0),
            height: height.max(0),
            modified_at,
        }
    }

    /// Build a record from one element of the backend's `images` array.
    ///
    /// Missing or wrongly typed fields fall back to an empty string, zero or
    /// [`Timestamp::INVALID`]; this never fails.
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self::new(
            text("filename"),
            text("file_path"),
            text("url"),
            text("mime_type"),
            integer_field(value, "size"),
            clamp_i32(integer_field(value, "width")),
            clamp_i32(integer_field(value, "height")),
            value
                .get("modified_date")
                .and_then(Value::as_str)
                .map(Timestamp::parse_iso8601)
                .unwrap_or_default(),
        )
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> i64 {
        self.size_bytes
    }

    /// Width in pixels, 0 when unknown
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels, 0 when unknown
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn modified_at(&self) -> Timestamp {
        self.modified_at
    }
}

/// Read a non-negative integer field; integral floats are accepted
fn integer_field(value: &Value, key: &str) -> i64 {
    let Some(field) = value.get(key) else {
        return 0;
    };
    let parsed = field.as_i64().or_else(|| {
        field
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    });
    parsed.unwrap_or(0).max(0)
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(0)
}

/// Request parameters for one page of images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParameters {
    pub count: u32,
    pub ordering: String,
}

impl Default for FetchParameters {
    fn default() -> Self {
        Self {
            count: 20,
            ordering: "random".to_string(),
        }
    }
}
