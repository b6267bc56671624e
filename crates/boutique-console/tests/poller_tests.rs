#[cfg(test)]
pub mod tests {
    use boutique_console::{
        ApiClient, NotificationFeed, NotificationKind, PollEvent, Poller, SeenState,
    };
    use boutique_console_mock::MockBackend;
    use chrono::Utc;
    use serde_json::json;
    use std::time::Duration;

    fn wait_fetch(poller: &Poller) -> Vec<boutique_console::Order> {
        for _ in 0..10 {
            match poller.recv_timeout(Duration::from_secs(2)) {
                Some(PollEvent::Fetched(orders)) => return orders,
                Some(PollEvent::Failed(_)) | None => {}
            }
        }
        panic!("no successful poll within the timeout");
    }

    #[test]
    fn cold_start_is_silent_then_changes_notify() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());
        let poller = Poller::spawn(client, Duration::from_millis(200));

        let mut seen = SeenState::new();
        let mut feed = NotificationFeed::new();

        // First successful poll seeds the detector without notifications.
        let first = wait_fetch(&poller);
        assert_eq!(first.len(), 6);
        assert!(seen.observe(&first, Utc::now()).is_empty());

        backend.set_order_status("101", "Livrée");
        backend.push_order(json!({
            "id": 200,
            "status": "En attente",
            "customer": "Nouveau Client",
            "total": 10,
        }));

        // Keep draining polls until one reflects both changes.
        let mut emitted = Vec::new();
        for _ in 0..20 {
            let orders = wait_fetch(&poller);
            emitted = seen.observe(&orders, Utc::now());
            if !emitted.is_empty() {
                break;
            }
        }

        assert_eq!(emitted.len(), 2);
        let delivered = emitted
            .iter()
            .find(|n| n.order_id == "101")
            .expect("status change notification");
        assert_eq!(delivered.kind, NotificationKind::StatusChanged);
        assert_eq!(delivered.message, "Order #101 was delivered");
        let created = emitted
            .iter()
            .find(|n| n.order_id == "200")
            .expect("new order notification");
        assert_eq!(created.kind, NotificationKind::Created);

        feed.extend_front(emitted);
        assert_eq!(feed.unread_count(), 2);

        // The same snapshot polled again emits nothing further.
        let steady = wait_fetch(&poller);
        assert!(seen.observe(&steady, Utc::now()).is_empty());

        poller.stop();
    }

    #[test]
    fn failed_fetches_leave_state_at_last_known_good() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let orders = client.poll_orders().expect("Failed to poll orders");
        let mut seen = SeenState::new();
        assert!(seen.observe(&orders, Utc::now()).is_empty());

        // Backend gone: the fetch errors out and never reaches the
        // detector, so the previous snapshot still compares clean.
        drop(backend);
        std::thread::sleep(Duration::from_millis(100));
        assert!(client.poll_orders().is_err());
        assert!(seen.observe(&orders, Utc::now()).is_empty());
    }

    #[test]
    fn stopping_the_poller_clears_the_timer() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());
        let poller = Poller::spawn(client, Duration::from_millis(200));

        let _ = wait_fetch(&poller);
        poller.stop();

        // Let the worker notice the flag, then drain whatever was already
        // in flight.
        std::thread::sleep(Duration::from_millis(500));
        while poller.try_recv().is_some() {}

        std::thread::sleep(Duration::from_millis(700));
        assert!(poller.try_recv().is_none());
        drop(backend);
    }
}
