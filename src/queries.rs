//! Ways of selecting the first block of a header window.

/// Where a block header window starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderQuery {
    /// Start at a block height.
    Height(u64),
    /// Start at a block id.
    Id(String),
    /// Start at the first block at or after a timestamp (milliseconds).
    Start(i64),
}

impl HeaderQuery {
    pub fn height(height: u64) -> Self {
        Self::Height(height)
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn start(timestamp: i64) -> Self {
        Self::Start(timestamp)
    }
}

impl From<String> for HeaderQuery {
    fn from(value: String) -> Self {
        Self::Id(value)
    }
}

impl From<&str> for HeaderQuery {
    fn from(value: &str) -> Self {
        Self::Id(value.to_string())
    }
}
