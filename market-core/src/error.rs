use thiserror::Error;

/// Failure of a single upstream call.
///
/// Every variant is recovered by the source that produced it; none of them
/// reaches the caller of [`crate::ContextAggregator`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{upstream} request timed out")]
    Timeout { upstream: &'static str },

    #[error("{upstream} request failed with status {status}: {body}")]
    BadStatus {
        upstream: &'static str,
        status: u16,
        body: String,
    },

    #[error("{upstream} returned a malformed payload: {reason}")]
    MalformedPayload {
        upstream: &'static str,
        reason: String,
    },

    #[error("no API key configured for {upstream}")]
    MissingCredential { upstream: &'static str },

    #[error("{upstream} request could not be sent: {message}")]
    Transport {
        upstream: &'static str,
        message: String,
    },
}

impl UpstreamError {
    /// Classify a `reqwest` error raised while sending or reading a request.
    pub fn from_reqwest(upstream: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { upstream }
        } else if err.is_decode() {
            Self::MalformedPayload {
                upstream,
                reason: err.to_string(),
            }
        } else {
            Self::Transport {
                upstream,
                message: err.to_string(),
            }
        }
    }

    pub fn malformed(upstream: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            upstream,
            reason: reason.into(),
        }
    }

    pub fn upstream(&self) -> &'static str {
        match self {
            Self::Timeout { upstream }
            | Self::BadStatus { upstream, .. }
            | Self::MalformedPayload { upstream, .. }
            | Self::MissingCredential { upstream }
            | Self::Transport { upstream, .. } => upstream,
        }
    }
}

/// Failure of the aggregation pipeline as a whole.
///
/// Only ever observed inside the aggregator, which swaps it for the
/// last-resort context.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("every upstream source failed")]
    AllUpstreamsFailed,
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
