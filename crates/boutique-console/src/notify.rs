use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::Order;

/// How many notifications the feed keeps before dropping the oldest.
pub const FEED_CAPACITY: usize = 10;

struct MessageRule {
    patterns: &'static [&'static str],
    family: &'static str,
    phrase: &'static str,
}

/// Ordered message rules, first match wins. Patterns are matched against the
/// lower-cased, accent-folded status text, so `"Livrée"` and `"delivered"`
/// land on the same rule.
const MESSAGE_RULES: &[MessageRule] = &[
    MessageRule {
        patterns: &["annul", "cancel", "refus"],
        family: "cancelled",
        phrase: "was cancelled",
    },
    MessageRule {
        patterns: &["livr", "deliver"],
        family: "delivered",
        phrase: "was delivered",
    },
    MessageRule {
        patterns: &["exped", "ship", "transit"],
        family: "shipped",
        phrase: "was shipped",
    },
    MessageRule {
        patterns: &["prepar", "en cours"],
        family: "preparing",
        phrase: "is being prepared",
    },
    MessageRule {
        patterns: &["valid", "confirm", "accept"],
        family: "confirmed",
        phrase: "was confirmed",
    },
    MessageRule {
        patterns: &["attente", "pending", "nouvel", "new"],
        family: "pending",
        phrase: "is awaiting processing",
    },
];

/// Lower-cases and strips the French diacritics the backend uses in status
/// labels, so substring rules match regardless of spelling.
pub fn fold_status(status: &str) -> String {
    status
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn matching_rule(status: &str) -> Option<&'static MessageRule> {
    let folded = fold_status(status);
    MESSAGE_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| folded.contains(p)))
}

fn status_phrase(status: &str) -> Option<&'static str> {
    matching_rule(status).map(|rule| rule.phrase)
}

/// Coarse status bucket used to group orders on the dashboard chart.
pub fn status_family(status: &str) -> &'static str {
    matching_rule(status).map(|rule| rule.family).unwrap_or("other")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The record id had never been seen before.
    Created,
    /// The record was seen before with a different status.
    StatusChanged,
}

/// A derived notification. Identity is `(order_id, status, timestamp)`;
/// only the `read` flag ever changes after creation.
#[derive(Debug, Clone)]
pub struct Notification {
    pub order_id: String,
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub kind: NotificationKind,
    pub read: bool,
}

impl Notification {
    fn derive(order: &Order, kind: NotificationKind, timestamp: DateTime<Utc>) -> Self {
        let message = match (kind, status_phrase(&order.status)) {
            (NotificationKind::Created, Some(phrase)) => {
                format!("New order #{} {}", order.id, phrase)
            }
            (NotificationKind::Created, None) => {
                format!("New order #{} received ({})", order.id, order.status)
            }
            (NotificationKind::StatusChanged, Some(phrase)) => {
                format!("Order #{} {}", order.id, phrase)
            }
            (NotificationKind::StatusChanged, None) => {
                format!("Order #{} moved to \"{}\"", order.id, order.status)
            }
        };

        Self {
            order_id: order.id.clone(),
            status: order.status.clone(),
            message,
            timestamp,
            kind,
            read: false,
        }
    }

    pub fn key(&self) -> (&str, &str, DateTime<Utc>) {
        (&self.order_id, &self.status, self.timestamp)
    }
}

/// Ids and statuses from the most recent successful fetch. The first
/// observation only seeds the state; every later one is diffed against it.
#[derive(Debug, Default)]
pub struct SeenState {
    ids: HashSet<String>,
    statuses: HashMap<String, String>,
    primed: bool,
}

impl SeenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs `records` against the previous fetch and replaces the state
    /// wholesale. Returns one notification per newly appeared record and one
    /// per record whose status changed, in record order. New records keep
    /// their own creation time when the backend provides one; status changes
    /// are stamped with `detected_at`.
    pub fn observe(&mut self, records: &[Order], detected_at: DateTime<Utc>) -> Vec<Notification> {
        let mut emitted = Vec::new();

        if self.primed {
            for order in records {
                if !self.ids.contains(&order.id) {
                    let timestamp = order.created_at.unwrap_or(detected_at);
                    emitted.push(Notification::derive(
                        order,
                        NotificationKind::Created,
                        timestamp,
                    ));
                } else if self.statuses.get(&order.id) != Some(&order.status) {
                    emitted.push(Notification::derive(
                        order,
                        NotificationKind::StatusChanged,
                        detected_at,
                    ));
                }
            }
        }

        self.ids = records.iter().map(|o| o.id.clone()).collect();
        self.statuses = records
            .iter()
            .map(|o| (o.id.clone(), o.status.clone()))
            .collect();
        self.primed = true;

        emitted
    }
}

/// Bounded, most-recent-first notification feed. Lives only for the console
/// session; restarting the console starts from an empty feed and a cold
/// detector.
#[derive(Debug)]
pub struct NotificationFeed {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepends a detection batch, skipping entries already present under
    /// the same identity key, then drops the oldest entries past capacity.
    pub fn extend_front(&mut self, batch: Vec<Notification>) {
        for notification in batch {
            let duplicate = self
                .entries
                .iter()
                .any(|existing| existing.key() == notification.key());
            if !duplicate {
                self.entries.push_front(notification);
            }
        }
        self.entries.truncate(self.capacity);
    }

    /// Flips every entry to read, in place, without reordering or removing.
    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.read).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(id: &str, status: &str) -> Order {
        Order {
            id: id.to_string(),
            status: status.to_string(),
            customer: None,
            total: None,
            created_at: None,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn first_fetch_emits_nothing() {
        let mut seen = SeenState::new();
        let emitted = seen.observe(&[order("1", "En attente"), order("2", "Livrée")], at(0));
        assert!(emitted.is_empty());
    }

    #[test]
    fn new_id_emits_exactly_one_notification() {
        let mut seen = SeenState::new();
        seen.observe(&[order("1", "En attente")], at(0));

        let emitted = seen.observe(&[order("1", "En attente"), order("2", "En attente")], at(30));
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].order_id, "2");
        assert_eq!(emitted[0].kind, NotificationKind::Created);
    }

    #[test]
    fn changed_status_emits_exactly_one_notification() {
        let mut seen = SeenState::new();
        seen.observe(&[order("1", "En attente")], at(0));

        let emitted = seen.observe(&[order("1", "Livrée")], at(30));
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].kind, NotificationKind::StatusChanged);
        assert_eq!(emitted[0].message, "Order #1 was delivered");

        let unchanged = seen.observe(&[order("1", "Livrée")], at(60));
        assert!(unchanged.is_empty());
    }

    #[test]
    fn state_is_replaced_wholesale() {
        let mut seen = SeenState::new();
        seen.observe(&[order("1", "En attente"), order("2", "En attente")], at(0));
        seen.observe(&[order("1", "En attente")], at(30));

        // Order 2 disappeared from the previous fetch, so it reads as new.
        let emitted = seen.observe(&[order("1", "En attente"), order("2", "En attente")], at(60));
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].order_id, "2");
        assert_eq!(emitted[0].kind, NotificationKind::Created);
    }

    #[test]
    fn new_records_keep_their_own_creation_time() {
        let mut seen = SeenState::new();
        seen.observe(&[], at(0));

        let mut created = order("7", "En attente");
        created.created_at = Some(at(-3600));
        let emitted = seen.observe(&[created], at(30));
        assert_eq!(emitted[0].timestamp, at(-3600));
    }

    #[test]
    fn status_changes_are_stamped_with_detection_time() {
        let mut seen = SeenState::new();
        let mut existing = order("7", "En attente");
        existing.created_at = Some(at(-3600));
        seen.observe(&[existing.clone()], at(0));

        existing.status = "Expédiée".to_string();
        let emitted = seen.observe(&[existing], at(30));
        assert_eq!(emitted[0].timestamp, at(30));
    }

    #[test]
    fn message_rules_are_accent_tolerant_and_ordered() {
        let cases = [
            ("Livrée", "was delivered"),
            ("LIVREE", "was delivered"),
            ("delivered", "was delivered"),
            ("Annulée", "was cancelled"),
            ("Expédiée", "was shipped"),
            ("Validée", "was confirmed"),
            ("En attente", "is awaiting processing"),
        ];
        for (status, phrase) in cases {
            assert_eq!(status_phrase(status), Some(phrase), "status: {}", status);
        }
        // "Livraison annulée" mentions delivery, but cancellation wins by rule order.
        assert_eq!(status_phrase("Livraison annulée"), Some("was cancelled"));
        assert_eq!(status_phrase("archived"), None);
    }

    #[test]
    fn status_families_group_spellings_together() {
        assert_eq!(status_family("Livrée"), "delivered");
        assert_eq!(status_family("delivered"), "delivered");
        assert_eq!(status_family("En cours de préparation"), "preparing");
        assert_eq!(status_family("archived"), "other");
    }

    #[test]
    fn unmatched_status_falls_back_to_a_generic_message() {
        let mut seen = SeenState::new();
        seen.observe(&[order("1", "archived")], at(0));
        let emitted = seen.observe(&[order("1", "frozen")], at(30));
        assert_eq!(emitted[0].message, "Order #1 moved to \"frozen\"");
    }

    #[test]
    fn feed_is_bounded_and_drops_oldest_first() {
        let mut seen = SeenState::new();
        seen.observe(&[], at(0));
        let mut feed = NotificationFeed::with_capacity(3);

        for i in 0..5 {
            let emitted = seen.observe(&[order(&i.to_string(), "En attente")], at(30 * (i + 1)));
            feed.extend_front(emitted);
        }

        assert_eq!(feed.len(), 3);
        let ids: Vec<&str> = feed.iter().map(|n| n.order_id.as_str()).collect();
        assert_eq!(ids, ["4", "3", "2"]);
    }

    #[test]
    fn feed_deduplicates_by_identity_key() {
        let mut feed = NotificationFeed::new();
        let entry = Notification::derive(&order("1", "Livrée"), NotificationKind::Created, at(0));
        feed.extend_front(vec![entry.clone()]);
        feed.extend_front(vec![entry.clone()]);
        assert_eq!(feed.len(), 1);

        // Same order and status at a different time is a distinct entry.
        let later = Notification::derive(&order("1", "Livrée"), NotificationKind::Created, at(60));
        feed.extend_front(vec![later]);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn mark_all_read_preserves_order_and_count() {
        let mut feed = NotificationFeed::new();
        feed.extend_front(vec![
            Notification::derive(&order("1", "Livrée"), NotificationKind::Created, at(0)),
            Notification::derive(&order("2", "Annulée"), NotificationKind::Created, at(0)),
        ]);
        assert_eq!(feed.unread_count(), 2);

        feed.mark_all_read();
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.len(), 2);
        let ids: Vec<&str> = feed.iter().map(|n| n.order_id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }
}
