//! Error taxonomy for the fetch → adapt → layout → render chain.
//!
//! Every variant is terminal for the render attempt that raised it; nothing
//! is retried.

use thiserror::Error;

/// Hint logged when the backend cannot be reached or the panel goes away.
pub const MISSING_SERVER_HINT: &str =
    "The pachyderm-jupyterlab-extension server extension appears to be missing.";

/// Network or HTTP failure while reaching the `dag` endpoint.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode the node list from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// The supplied node list does not describe a DAG.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("node '{id}' is listed more than once")]
    DuplicateNode { id: String },

    #[error("node '{node}' names parent '{parent}', which is not in the graph")]
    DanglingParent { node: String, parent: String },

    #[error("parent links form a cycle through node '{node}'")]
    Cycle { node: String },
}

/// The drawing surface was torn down before or during a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("drawing surface of panel '{panel}' is no longer attached")]
pub struct RenderTargetError {
    pub panel: String,
}

/// Failure opening or reconnecting a terminal session.
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("no terminal session named '{0}'")]
    UnknownSession(String),

    #[error("could not start terminal session: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Any failure raised by a command.
#[derive(Error, Debug)]
pub enum DagError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    RenderTarget(#[from] RenderTargetError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error("malformed node list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

impl DagError {
    /// Whether the failure points at a missing or unreachable backend,
    /// as opposed to a malformed graph.
    pub fn suggests_missing_server(&self) -> bool {
        matches!(self, DagError::Fetch(_) | DagError::RenderTarget(_))
    }
}
