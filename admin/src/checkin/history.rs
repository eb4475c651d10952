//! Bounded rolling history of recent check-ins.

use crate::constants::HISTORY_CAPACITY;
use arenaticket_client::types::Ticket;
use std::collections::VecDeque;

/// Last [`HISTORY_CAPACITY`] validated tickets, most recent first.
///
/// Never holds more than its capacity: pushing onto a full history drops the
/// oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketHistory {
    entries: VecDeque<Ticket>,
    capacity: usize,
}

impl Default for TicketHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl TicketHistory {
    /// History holding at most `capacity` tickets (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a validated ticket as the most recent entry.
    pub fn push(&mut self, ticket: Ticket) {
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(ticket);
    }

    /// Replace the entry with the same id. Returns `false` if none matched.
    pub fn replace(&mut self, ticket: Ticket) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == ticket.id) {
            Some(entry) => {
                *entry = ticket;
                true
            },
            None => false,
        }
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Ticket> {
        self.entries.iter()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&Ticket> {
        self.entries.front()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arenaticket_client::types::TicketStatus;
    use proptest::prelude::*;

    fn ticket(n: usize) -> Ticket {
        Ticket {
            id: format!("b{n}"),
            order_id: "p1".into(),
            event_id: "e1".into(),
            batch_id: "l1".into(),
            code: format!("CODE{n}"),
            compact_code: None,
            qr_image: None,
            holder_name: None,
            holder_phone: None,
            status: TicketStatus::Used,
            sold_at: None,
            used_at: None,
        }
    }

    #[test]
    fn replace_matches_by_id() {
        let mut history = TicketHistory::default();
        history.push(ticket(1));
        history.push(ticket(2));

        let mut confirmed = ticket(1);
        confirmed.holder_name = Some("Ana".into());
        assert!(history.replace(confirmed));
        assert_eq!(history.iter().nth(1).and_then(|t| t.holder_name.as_deref()), Some("Ana"));

        assert!(!history.replace(ticket(9)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = TicketHistory::with_capacity(0);
        history.push(ticket(1));
        history.push(ticket(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|t| t.id.as_str()), Some("b2"));
    }

    proptest! {
        #[test]
        fn keeps_most_recent_entries_first(pushes in 0usize..40) {
            let mut history = TicketHistory::default();
            for n in 0..pushes {
                history.push(ticket(n));
            }

            prop_assert_eq!(history.len(), pushes.min(HISTORY_CAPACITY));
            let ids: Vec<String> = history.iter().map(|t| t.id.clone()).collect();
            let expected: Vec<String> = (0..pushes).rev().take(HISTORY_CAPACITY).map(|n| format!("b{n}")).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
