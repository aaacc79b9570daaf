use thiserror::Error;

/// Top-level error type for the `cardstats-api` crate.
///
/// Covers every failure mode of both HTTP surfaces (statistics backend and
/// card-image provider). `cardstats-core` maps these into view-facing state;
/// tests discriminate on [`ErrorKind`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Protocol ────────────────────────────────────────────────────
    /// Non-2xx response from the server.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Machine-checkable classification of an [`Error`].
///
/// The three kinds the data layer distinguishes: transport-level failures,
/// non-2xx statuses, and malformed payloads. URL construction errors are
/// programming errors and classify as `Network` for lack of a better bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http(u16),
    Decode,
}

impl Error {
    /// Classify this error for machine consumption.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(e) => match e.status() {
                Some(status) => ErrorKind::Http(status.as_u16()),
                None => ErrorKind::Network,
            },
            Self::InvalidUrl(_) => ErrorKind::Network,
            Self::Http { status, .. } => ErrorKind::Http(*status),
            Self::Deserialization { .. } => ErrorKind::Decode,
        }
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::Http(404))
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Truncate a response body for error messages, backing off to the
/// nearest char boundary so multibyte text never splits mid-character.
pub(crate) fn body_preview(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_preview_respects_char_boundaries() {
        // 'é' is two bytes; byte 200 falls inside it.
        let body = format!("{}ééé", "x".repeat(199));
        let preview = body_preview(&body);
        assert_eq!(preview.len(), 199);
        assert!(preview.ends_with('x'));

        let short = "kürzer als das Limit";
        assert_eq!(body_preview(short), short);
    }
}
