use serde::Serialize;
use thiserror::Error;

/// Which layer of the upstream exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpstreamErrorKind {
    /// No response at all (connect failure, timeout).
    Transport,
    /// Non-2xx status, or a body that is not a GraphQL envelope.
    Protocol,
    /// 200 OK carrying a non-empty `errors` list.
    Query,
}

/// Failure talking to the catalog API.
///
/// `status` is `None` for transport failures. `detail` keeps the raw error
/// text so the presentation layer can surface it unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{:?} failure{}: {}", .kind, http_status(.status), .detail)]
pub struct UpstreamError {
    pub kind: UpstreamErrorKind,
    pub status: Option<u16>,
    pub detail: String,
}

impl UpstreamError {
    pub fn new(kind: UpstreamErrorKind, status: Option<u16>, detail: String) -> Self {
        Self {
            kind,
            status,
            detail,
        }
    }

    pub fn transport(detail: String) -> Self {
        Self::new(UpstreamErrorKind::Transport, None, detail)
    }

    pub fn protocol(status: u16, detail: String) -> Self {
        Self::new(UpstreamErrorKind::Protocol, Some(status), detail)
    }

    pub fn query(status: Option<u16>, detail: String) -> Self {
        Self::new(UpstreamErrorKind::Query, status.or(Some(200)), detail)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

fn http_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}
