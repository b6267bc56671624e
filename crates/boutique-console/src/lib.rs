pub mod api;
pub mod form;
pub mod model;
pub mod notify;
pub mod pagination;
pub mod poller;

pub use api::{ApiClient, Listing};
pub use model::{Admin, BoutiqueUser, Commune, Franchise, Order, Product};
pub use notify::{Notification, NotificationFeed, NotificationKind, SeenState, FEED_CAPACITY};
pub use pagination::{page_window, PageEntry};
pub use poller::{PollEvent, Poller, DEFAULT_POLL_INTERVAL};
