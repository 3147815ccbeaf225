use std::fmt;

/// Where a dispatcher is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatcherState {
    /// Not started yet.
    #[default]
    Disconnected,
    /// Request sent, waiting for response headers.
    Connecting,
    /// Reading and dispatching lines.
    Streaming,
    /// The last run ended with an error.
    Failed,
    /// The last run was shut down by the caller.
    Stopped,
}

impl DispatcherState {
    /// Whether a run is in progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Streaming)
    }
}

impl fmt::Display for DispatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Streaming => "streaming",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
