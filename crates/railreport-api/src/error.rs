use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error(
        "Error ({status}) during {method} to endpoint: ({endpoint}){}\nResponse Content: {body}",
        payload_line(.payload)
    )]
    Status {
        method: &'static str,
        endpoint: String,
        payload: Option<String>,
        status: u16,
        body: String,
    },

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected page from {endpoint}: {message}")]
    Pagination { endpoint: String, message: String },

    #[error("invalid TestRail base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn payload_line(payload: &Option<String>) -> String {
    match payload {
        Some(data) => format!("\nWith data: {data}"),
        None => String::new(),
    }
}
