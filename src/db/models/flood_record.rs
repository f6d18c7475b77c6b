use chrono::{DateTime, Utc};

/// Flood limit and consecutive-message counter of one chat
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FloodRecord {
    pub chat_id: i64,
    /// 0 means flood protection is off
    pub flood_limit: i32,
    pub last_user_id: Option<i64>,
    pub consecutive_count: i32,
    pub updated_at: DateTime<Utc>,
}

impl FloodRecord {
    /// Record of a chat that was never configured
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            flood_limit: 0,
            last_user_id: None,
            consecutive_count: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.flood_limit.max(0) as u32
    }

    pub fn count(&self) -> u32 {
        self.consecutive_count.max(0) as u32
    }

    pub fn is_enabled(&self) -> bool {
        self.flood_limit > 0
    }

    /// Change the limit and drop any running streak
    pub fn set_limit(&mut self, limit: u32) {
        self.flood_limit = limit.min(i32::MAX as u32) as i32;
        self.last_user_id = None;
        self.consecutive_count = 0;
        self.updated_at = Utc::now();
    }

    /// Count one message and report whether it tripped the limit.
    ///
    /// `None` marks a message from an admin: the streak is broken and nothing
    /// trips. A trip zeroes the count so the same sender needs a full new
    /// streak to trip again.
    pub fn advance(&mut self, sender: Option<i64>) -> bool {
        self.updated_at = Utc::now();

        let Some(user_id) = sender else {
            self.last_user_id = None;
            self.consecutive_count = 0;
            return false;
        };

        if self.last_user_id == Some(user_id) {
            self.consecutive_count = self.consecutive_count.saturating_add(1);
        } else {
            self.last_user_id = Some(user_id);
            self.consecutive_count = 1;
        }

        if !self.is_enabled() {
            self.consecutive_count = 0;
            return false;
        }

        if self.consecutive_count >= self.flood_limit {
            self.consecutive_count = 0;
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn record(limit: u32) -> FloodRecord {
        let mut record = FloodRecord::new(-100);
        record.set_limit(limit);
        record
    }

    #[test]
    fn test_trips_on_limit_th_message_only() {
        for limit in 3..=8 {
            let mut record = record(limit);
            let trips: Vec<bool> = (0..limit).map(|_| record.advance(Some(ALICE))).collect();

            assert_eq!(trips.iter().filter(|t| **t).count(), 1, "limit {}", limit);
            assert!(trips[limit as usize - 1]);
            assert_eq!(record.count(), 0);
        }
    }

    #[test]
    fn test_three_in_a_row_trips_and_resets() {
        let mut record = record(3);

        assert!(!record.advance(Some(ALICE)));
        assert!(!record.advance(Some(ALICE)));
        assert!(record.advance(Some(ALICE)));
        assert_eq!(record.count(), 0);

        // A fresh streak is needed before the next trip
        assert!(!record.advance(Some(ALICE)));
        assert!(!record.advance(Some(ALICE)));
        assert!(record.advance(Some(ALICE)));
    }

    #[test]
    fn test_other_sender_breaks_streak() {
        let mut record = record(3);

        assert!(!record.advance(Some(ALICE)));
        assert!(!record.advance(Some(BOB)));
        assert!(!record.advance(Some(ALICE)));
        assert!(!record.advance(Some(ALICE)));
        assert_eq!(record.count(), 2);
        assert_eq!(record.last_user_id, Some(ALICE));
    }

    #[test]
    fn test_admin_message_resets_streak() {
        let mut record = record(3);

        record.advance(Some(ALICE));
        record.advance(Some(ALICE));
        assert!(!record.advance(None));
        assert_eq!(record.count(), 0);
        assert_eq!(record.last_user_id, None);

        assert!(!record.advance(Some(ALICE)));
        assert!(!record.advance(Some(ALICE)));
        assert!(record.advance(Some(ALICE)));
    }

    #[test]
    fn test_disabled_never_trips() {
        let mut record = record(0);

        for _ in 0..100 {
            assert!(!record.advance(Some(ALICE)));
            assert_eq!(record.count(), 0);
        }
    }

    #[test]
    fn test_set_limit_drops_streak() {
        let mut record = record(5);
        record.advance(Some(ALICE));
        record.advance(Some(ALICE));

        record.set_limit(3);

        assert_eq!(record.count(), 0);
        assert!(!record.advance(Some(ALICE)));
        assert!(!record.advance(Some(ALICE)));
        assert!(record.advance(Some(ALICE)));
    }
}
