//! Sentinel messages the node uses to report missing entities.
//!
//! The JSON-RPC layer only carries an error code and a free-form message, so a
//! missing transaction or asset cannot be told apart from other handler errors
//! by code alone. The node renders these exact strings and the client matches
//! on them; both sides must agree on the text.

/// Message the node returns when a transaction id is unknown.
pub const TX_NOT_FOUND: &str = "tx not found";

/// Message the node returns when an asset id is unknown.
pub const ASSET_NOT_FOUND: &str = "asset not found";

/// An entity kind whose absence is reported as a result rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotFound {
    Tx,
    Asset,
}

impl NotFound {
    /// The sentinel the node embeds in its error message for this kind.
    pub const fn sentinel(self) -> &'static str {
        match self {
            Self::Tx => TX_NOT_FOUND,
            Self::Asset => ASSET_NOT_FOUND,
        }
    }

    /// Returns `true` if a rendered error message reports this kind as missing.
    pub fn matches(self, message: &str) -> bool {
        message.contains(self.sentinel())
    }

    /// Classify a rendered error message, if it carries any known sentinel.
    pub fn classify(message: &str) -> Option<Self> {
        [Self::Tx, Self::Asset]
            .into_iter()
            .find(|kind| kind.matches(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_pinned() {
        assert_eq!(NotFound::Tx.sentinel(), "tx not found");
        assert_eq!(NotFound::Asset.sentinel(), "asset not found");
    }

    #[test]
    fn matches_inside_wrapped_messages() {
        let rendered = "RPC error: RPC error -32000: tx not found";
        assert!(NotFound::Tx.matches(rendered));
        assert!(!NotFound::Asset.matches(rendered));
        assert_eq!(NotFound::classify(rendered), Some(NotFound::Tx));
    }

    #[test]
    fn kinds_do_not_overlap() {
        assert_eq!(
            NotFound::classify("problem: asset not found"),
            Some(NotFound::Asset)
        );
        assert_eq!(NotFound::classify("transaction not found"), None);
        assert_eq!(NotFound::classify("connection refused"), None);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!NotFound::Tx.matches("TX NOT FOUND"));
    }
}
