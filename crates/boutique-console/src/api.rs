use eyre::{eyre, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::form::{AdminPayload, BoutiqueUserPayload, FranchisePayload, ProductPayload};
use crate::model::{Admin, BoutiqueUser, Commune, Franchise, Order, Product};

/// A paginated listing response: `{ data: [...], page, total_pages }`.
/// Older backend deployments omit the paging fields, so both default to 1.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub page: u64,
    #[serde(default = "first_page")]
    pub total_pages: u64,
}

fn first_page() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
struct Detail<T> {
    data: T,
}

/// Mutation envelope: `{ success, error? }`.
#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the management REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_millis(2000)))
            .timeout_global(Some(Duration::from_millis(10_000)))
            .build();

        Self {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.agent.get(self.url(path)).call()?.body_mut().read_json()?;
        Ok(value)
    }

    fn read_ack(&self, mut response: ureq::http::Response<ureq::Body>) -> Result<()> {
        let ack: Ack = response.body_mut().read_json()?;
        if ack.success {
            Ok(())
        } else {
            Err(eyre!(ack
                .error
                .unwrap_or_else(|| "the server rejected the request".to_string())))
        }
    }

    fn post_ack<P: Serialize>(&self, path: &str, payload: &P) -> Result<()> {
        let response = self.agent.post(self.url(path)).send_json(payload)?;
        self.read_ack(response)
    }

    fn put_ack<P: Serialize>(&self, path: &str, payload: &P) -> Result<()> {
        let response = self.agent.put(self.url(path)).send_json(payload)?;
        self.read_ack(response)
    }

    fn delete_ack(&self, path: &str) -> Result<()> {
        let response = self.agent.delete(self.url(path)).call()?;
        self.read_ack(response)
    }

    /// One page of the order listing.
    pub fn list_orders(&self, page: u64) -> Result<Listing<Order>> {
        self.get_json(&format!("/orders?page={}", page))
    }

    /// The unfiltered order listing, as called by the notification poller.
    pub fn poll_orders(&self) -> Result<Vec<Order>> {
        let listing: Listing<Order> = self.get_json("/orders")?;
        Ok(listing.data)
    }

    /// Detail route for a single order.
    pub fn get_order(&self, id: &str) -> Result<Order> {
        let detail: Detail<Order> = self.get_json(&format!("/orders/{}", id))?;
        Ok(detail.data)
    }

    pub fn list_franchises(&self) -> Result<Vec<Franchise>> {
        let listing: Listing<Franchise> = self.get_json("/franchises")?;
        Ok(listing.data)
    }

    pub fn create_franchise(&self, payload: &FranchisePayload) -> Result<()> {
        self.post_ack("/franchises", payload)
    }

    pub fn update_franchise(&self, id: &str, payload: &FranchisePayload) -> Result<()> {
        self.put_ack(&format!("/franchises/{}", id), payload)
    }

    pub fn delete_franchise(&self, id: &str) -> Result<()> {
        self.delete_ack(&format!("/franchises/{}", id))
    }

    pub fn list_admins(&self) -> Result<Vec<Admin>> {
        let listing: Listing<Admin> = self.get_json("/admins")?;
        Ok(listing.data)
    }

    pub fn create_admin(&self, payload: &AdminPayload) -> Result<()> {
        self.post_ack("/admins", payload)
    }

    pub fn update_admin(&self, id: &str, payload: &AdminPayload) -> Result<()> {
        self.put_ack(&format!("/admins/{}", id), payload)
    }

    pub fn delete_admin(&self, id: &str) -> Result<()> {
        self.delete_ack(&format!("/admins/{}", id))
    }

    pub fn list_boutique_users(&self) -> Result<Vec<BoutiqueUser>> {
        let listing: Listing<BoutiqueUser> = self.get_json("/boutique-users")?;
        Ok(listing.data)
    }

    pub fn create_boutique_user(&self, payload: &BoutiqueUserPayload) -> Result<()> {
        self.post_ack("/boutique-users", payload)
    }

    pub fn update_boutique_user(&self, id: &str, payload: &BoutiqueUserPayload) -> Result<()> {
        self.put_ack(&format!("/boutique-users/{}", id), payload)
    }

    pub fn delete_boutique_user(&self, id: &str) -> Result<()> {
        self.delete_ack(&format!("/boutique-users/{}", id))
    }

    pub fn list_products(&self) -> Result<Vec<Product>> {
        let listing: Listing<Product> = self.get_json("/products")?;
        Ok(listing.data)
    }

    pub fn create_product(&self, payload: &ProductPayload) -> Result<()> {
        self.post_ack("/products", payload)
    }

    pub fn update_product(&self, id: &str, payload: &ProductPayload) -> Result<()> {
        self.put_ack(&format!("/products/{}", id), payload)
    }

    pub fn delete_product(&self, id: &str) -> Result<()> {
        self.delete_ack(&format!("/products/{}", id))
    }

    /// Commune lookup list for the franchise form.
    pub fn list_communes(&self) -> Result<Vec<Commune>> {
        let listing: Listing<Commune> = self.get_json("/communes")?;
        Ok(listing.data)
    }
}
