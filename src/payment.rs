//! Micropayment gating
//!
//! The wallet/payment flow itself lives in the host page. The core only knows
//! what is being paid for, what it costs, and whether the last attempt is
//! pending or failed.

use core::fmt;

use serde::{Deserialize, Serialize};

/// What a payment buys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentKind {
    /// Entry fee for a new run
    NewGame,
    /// One extra life, restarting the level from wave 1
    ExtraLife,
    /// Full lives after a game over, keeping score and level
    Continue,
}

impl PaymentKind {
    /// Identifier passed to the host payment bridge
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::NewGame => "new-game",
            PaymentKind::ExtraLife => "extra-life",
            PaymentKind::Continue => "continue",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PaymentKind::NewGame => "Start New Game",
            PaymentKind::ExtraLife => "Buy Extra Life",
            PaymentKind::Continue => "Continue Playing",
        }
    }
}

/// Prices in the payment token's display units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub price_per_game: String,
    pub price_per_life: String,
    pub price_to_continue: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            price_per_game: "0.10".to_string(),
            price_per_life: "0.05".to_string(),
            price_to_continue: "0.15".to_string(),
        }
    }
}

impl PaymentConfig {
    pub fn price(&self, kind: PaymentKind) -> &str {
        match kind {
            PaymentKind::NewGame => &self.price_per_game,
            PaymentKind::ExtraLife => &self.price_per_life,
            PaymentKind::Continue => &self.price_to_continue,
        }
    }
}

/// Why a payment did not go through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentError {
    /// No wallet could be connected
    WalletUnavailable,
    /// The player dismissed the signature request
    Cancelled,
    /// The facilitator refused the payment
    Declined(String),
    /// Transport failure talking to the facilitator
    Network(String),
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalletUnavailable => write!(f, "no wallet available"),
            Self::Cancelled => write!(f, "payment cancelled"),
            Self::Declined(reason) => write!(f, "payment declined: {reason}"),
            Self::Network(reason) => write!(f, "payment network error: {reason}"),
        }
    }
}

impl std::error::Error for PaymentError {}

impl PaymentError {
    /// Map a message from the host bridge onto an error kind
    pub fn from_host_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("wallet") {
            Self::WalletUnavailable
        } else if lower.contains("cancel") || lower.contains("reject") {
            Self::Cancelled
        } else if lower.contains("network") || lower.contains("fetch") {
            Self::Network(message.to_string())
        } else {
            Self::Declined(message.to_string())
        }
    }
}

/// Payment progress shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Idle,
    Pending(PaymentKind),
    /// Last attempt failed; the player may retry
    Failed {
        kind: PaymentKind,
        error: PaymentError,
    },
}

impl PaymentStatus {
    /// Kind of the attempt in flight or last failed
    pub fn kind(&self) -> Option<PaymentKind> {
        match self {
            PaymentStatus::Idle => None,
            PaymentStatus::Pending(kind) => Some(*kind),
            PaymentStatus::Failed { kind, .. } => Some(*kind),
        }
    }

    pub fn is_pending(&self, kind: PaymentKind) -> bool {
        *self == PaymentStatus::Pending(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices() {
        let config = PaymentConfig::default();
        assert_eq!(config.price(PaymentKind::NewGame), "0.10");
        assert_eq!(config.price(PaymentKind::ExtraLife), "0.05");
        assert_eq!(config.price(PaymentKind::Continue), "0.15");
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            PaymentError::from_host_message("No wallet found"),
            PaymentError::WalletUnavailable
        );
        assert_eq!(
            PaymentError::from_host_message("User rejected the request"),
            PaymentError::Cancelled
        );
        assert!(matches!(
            PaymentError::from_host_message("Failed to fetch"),
            PaymentError::Network(_)
        ));
        assert_eq!(
            PaymentError::Declined("insufficient funds".into()).to_string(),
            "payment declined: insufficient funds"
        );
    }

    #[test]
    fn test_status_kind() {
        let status = PaymentStatus::Failed {
            kind: PaymentKind::Continue,
            error: PaymentError::Cancelled,
        };
        assert_eq!(status.kind(), Some(PaymentKind::Continue));
        assert!(!status.is_pending(PaymentKind::Continue));
        assert!(PaymentStatus::Pending(PaymentKind::NewGame).is_pending(PaymentKind::NewGame));
    }
}
