use std::fmt;
use std::str::FromStr;

/// ULID identifying one execution context in log lines.
///
/// A well-formed id forwarded by the transport (the `HTTP_X_REQUEST_ID`
/// server variable) is kept so kernel logs line up with the proxy's.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ContextId(ulid::Ulid);

impl ContextId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Parse `forwarded`, minting a fresh id when it is absent or not a ULID.
    #[must_use]
    pub fn forwarded_or_new(forwarded: Option<&str>) -> Self {
        forwarded
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default()
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ContextId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s).map(Self)
    }
}
