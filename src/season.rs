//! Season golden tickets and leaderboard
//!
//! Clearing the final level during an active season earns a golden ticket.
//! Tickets feed a score-sorted leaderboard and the season raffle, where
//! higher scores buy more entries. `LocalLedger` keeps everything in
//! LocalStorage; a hosted backend would implement `SeasonLedger` instead.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::platform;

/// A leaderboard season
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    pub id: &'static str,
    pub name: &'static str,
    /// ISO dates, inclusive
    pub start_date: &'static str,
    pub end_date: &'static str,
    pub is_active: bool,
}

pub const CURRENT_SEASON: Season = Season {
    id: "season-01",
    name: "Season 01: Genesis Hunt",
    start_date: "2025-01-01",
    end_date: "2025-02-28",
    is_active: true,
};

/// Raffle entries by minimum score, ascending
pub const RAFFLE_TIERS: [(u64, u32); 5] = [
    (0, 1),
    (5_000, 2),
    (10_000, 3),
    (20_000, 5),
    (50_000, 10),
];

/// Raffle entries a finishing score is worth
pub fn raffle_entries(score: u64) -> u32 {
    RAFFLE_TIERS
        .iter()
        .rev()
        .find(|(min, _)| score >= *min)
        .map(|(_, entries)| *entries)
        .unwrap_or(1)
}

/// Title shown on the victory screen
pub fn hunter_title(accuracy: f32) -> &'static str {
    if accuracy >= 95.0 {
        "Legendary Hunter"
    } else if accuracy >= 85.0 {
        "Master Hunter"
    } else if accuracy >= 70.0 {
        "Skilled Hunter"
    } else {
        "Victorious Hunter"
    }
}

/// Proof of finishing every level in a season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenTicket {
    pub id: String,
    pub season_id: String,
    pub wallet_address: String,
    /// Unix timestamp (ms)
    pub earned_at: u64,
    pub final_score: u64,
    pub total_ducks_shot: u32,
    pub completion_time_ms: u64,
}

impl GoldenTicket {
    pub fn raffle_entries(&self) -> u32 {
        raffle_entries(self.final_score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub wallet_address: String,
    pub score: u64,
    /// Unix timestamp (ms)
    pub completed_at: u64,
    pub has_golden_ticket: bool,
}

/// Aggregate numbers for the current season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonStats {
    pub total_finishers: usize,
    pub total_raffle_entries: u32,
    pub highest_score: u64,
    /// Rounded to the nearest point
    pub average_score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Completions must be attributed to a wallet
    MissingWallet,
    /// The current season has closed
    SeasonClosed,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWallet => write!(f, "no wallet address to attribute the ticket to"),
            Self::SeasonClosed => write!(f, "{} is no longer active", CURRENT_SEASON.name),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Where season completions are recorded
pub trait SeasonLedger {
    /// Record a full-game completion and award its golden ticket
    fn record_completion(
        &mut self,
        wallet_address: &str,
        final_score: u64,
        total_ducks_shot: u32,
        completion_time_ms: u64,
        now: u64,
    ) -> Result<GoldenTicket, LedgerError>;

    /// Best `count` finishers, highest score first
    fn top_players(&self, count: usize) -> Vec<LeaderboardEntry>;
}

/// Ledger persisted in LocalStorage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalLedger {
    pub tickets: Vec<GoldenTicket>,
    /// Sorted by score, descending
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl LocalLedger {
    /// LocalStorage keys
    const TICKETS_KEY: &'static str = "duck_hunt_golden_tickets";
    const LEADERBOARD_KEY: &'static str = "duck_hunt_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Self {
        let tickets: Vec<GoldenTicket> = platform::load_json(Self::TICKETS_KEY).unwrap_or_default();
        let leaderboard = platform::load_json(Self::LEADERBOARD_KEY).unwrap_or_default();
        log::info!("Loaded {} golden tickets", tickets.len());
        Self {
            tickets,
            leaderboard,
        }
    }

    pub fn save(&self) {
        platform::save_json(Self::TICKETS_KEY, &self.tickets);
        platform::save_json(Self::LEADERBOARD_KEY, &self.leaderboard);
        log::debug!("Season ledger saved ({} tickets)", self.tickets.len());
    }

    /// Tickets earned by one wallet
    pub fn wallet_tickets<'a>(
        &'a self,
        wallet_address: &'a str,
    ) -> impl Iterator<Item = &'a GoldenTicket> + 'a {
        self.tickets
            .iter()
            .filter(move |t| t.wallet_address == wallet_address)
    }

    /// Rank a score would take on the leaderboard (1-based)
    pub fn potential_rank(&self, score: u64) -> usize {
        self.leaderboard
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.leaderboard.len())
            + 1
    }

    pub fn season_stats(&self) -> SeasonStats {
        let current: Vec<&GoldenTicket> = self
            .tickets
            .iter()
            .filter(|t| t.season_id == CURRENT_SEASON.id)
            .collect();
        if current.is_empty() {
            return SeasonStats::default();
        }
        let total: u64 = current.iter().map(|t| t.final_score).sum();
        SeasonStats {
            total_finishers: current.len(),
            total_raffle_entries: current.iter().map(|t| t.raffle_entries()).sum(),
            highest_score: current.iter().map(|t| t.final_score).max().unwrap_or(0),
            average_score: (total as f64 / current.len() as f64).round() as u64,
        }
    }

    /// Clear tickets and leaderboard for a new season
    pub fn reset(&mut self) {
        self.tickets.clear();
        self.leaderboard.clear();
        platform::remove(Self::TICKETS_KEY);
        platform::remove(Self::LEADERBOARD_KEY);
        log::info!("Season data reset");
    }

    fn insert_entry(&mut self, entry: LeaderboardEntry) {
        // Ties keep the earlier finisher ahead
        let pos = self
            .leaderboard
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.leaderboard.len());
        self.leaderboard.insert(pos, entry);
        for (i, e) in self.leaderboard.iter_mut().enumerate() {
            e.rank = i + 1;
        }
    }
}

impl SeasonLedger for LocalLedger {
    fn record_completion(
        &mut self,
        wallet_address: &str,
        final_score: u64,
        total_ducks_shot: u32,
        completion_time_ms: u64,
        now: u64,
    ) -> Result<GoldenTicket, LedgerError> {
        if wallet_address.trim().is_empty() {
            return Err(LedgerError::MissingWallet);
        }
        if !CURRENT_SEASON.is_active {
            return Err(LedgerError::SeasonClosed);
        }

        let ticket = GoldenTicket {
            id: format!("GT-{}-{:04}", now, self.tickets.len() + 1),
            season_id: CURRENT_SEASON.id.to_string(),
            wallet_address: wallet_address.to_string(),
            earned_at: now,
            final_score,
            total_ducks_shot,
            completion_time_ms,
        };
        self.tickets.push(ticket.clone());
        self.insert_entry(LeaderboardEntry {
            rank: 0,
            wallet_address: wallet_address.to_string(),
            score: final_score,
            completed_at: now,
            has_golden_ticket: true,
        });

        log::info!(
            "Golden ticket {} awarded ({} raffle entries)",
            ticket.id,
            ticket.raffle_entries()
        );
        Ok(ticket)
    }

    fn top_players(&self, count: usize) -> Vec<LeaderboardEntry> {
        self.leaderboard.iter().take(count).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ledger: &mut LocalLedger, wallet: &str, score: u64, now: u64) -> GoldenTicket {
        ledger
            .record_completion(wallet, score, 40, 300_000, now)
            .expect("recorded")
    }

    #[test]
    fn test_raffle_tiers() {
        assert_eq!(raffle_entries(0), 1);
        assert_eq!(raffle_entries(4_999), 1);
        assert_eq!(raffle_entries(5_000), 2);
        assert_eq!(raffle_entries(19_999), 3);
        assert_eq!(raffle_entries(20_000), 5);
        assert_eq!(raffle_entries(1_000_000), 10);
    }

    #[test]
    fn test_hunter_titles() {
        assert_eq!(hunter_title(100.0), "Legendary Hunter");
        assert_eq!(hunter_title(85.0), "Master Hunter");
        assert_eq!(hunter_title(70.0), "Skilled Hunter");
        assert_eq!(hunter_title(12.5), "Victorious Hunter");
    }

    #[test]
    fn test_leaderboard_sorted_and_ranked() {
        let mut ledger = LocalLedger::new();
        record(&mut ledger, "0xa", 8_000, 1);
        record(&mut ledger, "0xb", 30_000, 2);
        record(&mut ledger, "0xc", 8_000, 3);

        let top = ledger.top_players(10);
        let order: Vec<_> = top.iter().map(|e| e.wallet_address.as_str()).collect();
        assert_eq!(order, vec!["0xb", "0xa", "0xc"]);
        let ranks: Vec<_> = top.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(ledger.top_players(1).len(), 1);
        assert_eq!(ledger.potential_rank(10_000), 2);
    }

    #[test]
    fn test_ticket_fields() {
        let mut ledger = LocalLedger::new();
        let ticket = record(&mut ledger, "0xa", 12_000, 1_700_000_000_000);
        assert_eq!(ticket.id, "GT-1700000000000-0001");
        assert_eq!(ticket.season_id, "season-01");
        assert_eq!(ticket.raffle_entries(), 3);
        assert_eq!(ledger.wallet_tickets("0xa").count(), 1);
        assert_eq!(ledger.wallet_tickets("0xb").count(), 0);
    }

    #[test]
    fn test_missing_wallet_rejected() {
        let mut ledger = LocalLedger::new();
        assert_eq!(
            ledger.record_completion("  ", 100, 1, 1, 1),
            Err(LedgerError::MissingWallet)
        );
        assert!(ledger.tickets.is_empty());
    }

    #[test]
    fn test_season_stats() {
        let mut ledger = LocalLedger::new();
        assert_eq!(ledger.season_stats(), SeasonStats::default());
        record(&mut ledger, "0xa", 4_000, 1);
        record(&mut ledger, "0xb", 21_001, 2);
        let stats = ledger.season_stats();
        assert_eq!(stats.total_finishers, 2);
        assert_eq!(stats.total_raffle_entries, 1 + 5);
        assert_eq!(stats.highest_score, 21_001);
        assert_eq!(stats.average_score, 12_501);

        ledger.reset();
        assert_eq!(ledger.season_stats().total_finishers, 0);
        assert!(ledger.top_players(10).is_empty());
    }
}
