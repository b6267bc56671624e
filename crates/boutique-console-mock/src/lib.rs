use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Read;
use std::sync::{Arc, LazyLock, Mutex};
use tiny_http::{Header, Method, Request, Response, Server};

const ORDERS_PAGE_SIZE: usize = 4;

static RE_COLLECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(franchises|admins|boutique-users|products)(?:/([^/]+))?$").unwrap()
});
static RE_ORDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/orders/([^/]+)$").unwrap());

/// Loose in-memory fixtures, kept as raw JSON on purpose: the real backend
/// mixes numeric ids, `"1"` string flags and nested objects, and the mock
/// serves the same shapes.
pub struct Store {
    pub orders: Vec<Value>,
    pub franchises: Vec<Value>,
    pub admins: Vec<Value>,
    pub boutique_users: Vec<Value>,
    pub products: Vec<Value>,
    pub communes: Vec<Value>,
    next_id: u64,
    reject_next: Option<String>,
}

impl Store {
    pub fn seed() -> Self {
        Self {
            orders: vec![
                json!({ "id": 101, "status": "En attente", "customer": "Claire Fontaine", "total": "49.90", "created_at": "2024-05-01 10:30:00" }),
                json!({ "id": 102, "status": "Validée", "customer": "Marc Aurel", "total": 129.5, "created_at": "2024-05-01 11:00:00" }),
                json!({ "id": 103, "status": "Livrée", "customer": "Iris Bonnet", "total": "19.90", "created_at": "2024-05-01 11:20:00" }),
                json!({ "id": 104, "status": "Annulée", "customer": "Hugo Blanc", "total": 75, "created_at": "2024-05-01 12:00:00" }),
                json!({ "id": 105, "status": "En cours de préparation", "customer": "Lena Morel", "total": "210.00", "created_at": "2024-05-01 12:40:00" }),
                json!({ "id": 106, "status": "Expédiée", "customer": "Paul Verne", "total": 32.0, "created_at": "2024-05-01 13:10:00" }),
            ],
            franchises: vec![
                json!({ "id": 1, "name": "Atelier Nord", "email": "nord@example.com", "phone": "0612345678", "address": "12 rue des Arts", "active": "1", "commune": { "id": 59, "name": "Lille" } }),
                json!({ "id": 2, "name": "Atelier Sud", "email": "sud@example.com", "phone": "0498765432", "address": "3 place du Port", "active": 0, "commune_id": "13" }),
            ],
            admins: vec![
                json!({ "id": 1, "name": "Root Admin", "email": "root@example.com", "phone": "0611111111", "active": 1 }),
            ],
            boutique_users: vec![
                json!({ "id": 7, "name": "Zoé Petit", "email": "zoe@example.com", "phone": "0622222222", "boutique": { "id": 1, "name": "Atelier Nord" }, "active": "actif" }),
            ],
            products: vec![
                json!({ "id": 11, "name": "Tote bag", "price": "19.90", "weight": 0.4, "active": "1" }),
                json!({ "id": 12, "name": "Mug", "price": 12.5, "weight": "0.35", "active": "0" }),
            ],
            communes: vec![
                json!({ "id": 59, "name": "Lille" }),
                json!({ "id": 13, "name": "Marseille" }),
                json!({ "id": 75, "name": "Paris" }),
            ],
            next_id: 1000,
            reject_next: None,
        }
    }

    fn collection_mut(&mut self, name: &str) -> &mut Vec<Value> {
        match name {
            "franchises" => &mut self.franchises,
            "admins" => &mut self.admins,
            "boutique-users" => &mut self.boutique_users,
            "products" => &mut self.products,
            _ => unreachable!("unknown collection {}", name),
        }
    }
}

/// Backend mock bound to an ephemeral port, serving until dropped. The
/// store is shared so tests can mutate fixtures between client calls.
pub struct MockBackend {
    server: Arc<Server>,
    store: Arc<Mutex<Store>>,
    url: String,
}

impl MockBackend {
    pub fn spawn() -> Self {
        let server = Server::http("127.0.0.1:0").expect("Failed to bind mock backend");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("mock backend has a tcp address");
        let url = format!("http://{}", addr);

        let server = Arc::new(server);
        let store = Arc::new(Mutex::new(Store::seed()));

        let server_loop = Arc::clone(&server);
        let store_loop = Arc::clone(&store);
        std::thread::Builder::new()
            .name("mock-backend".into())
            .spawn(move || {
                for request in server_loop.incoming_requests() {
                    handle_request(request, &store_loop);
                }
            })
            .expect("Failed to spawn mock-backend thread");

        Self { server, store, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn store(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub fn set_order_status(&self, id: &str, status: &str) {
        let mut store = self.store();
        for order in &mut store.orders {
            if id_of(order) == Some(id.to_string()) {
                order["status"] = json!(status);
            }
        }
    }

    pub fn push_order(&self, order: Value) {
        self.store().orders.push(order);
    }

    /// The next mutation (create/update/delete) answers
    /// `{ success: false, error }` instead of applying.
    pub fn reject_next_mutation(&self, message: &str) {
        self.store().reject_next = Some(message.to_string());
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

/// Serves the mock forever on a fixed address; the standalone binary entry
/// point for poking at the console by hand.
pub fn run(addr: &str) {
    let server = Server::http(addr)
        .unwrap_or_else(|e| panic!("Failed to bind mock backend to {}: {}", addr, e));
    println!("Mock backend listening on http://{}", addr);

    let store = Arc::new(Mutex::new(Store::seed()));
    for request in server.incoming_requests() {
        handle_request(request, &store);
    }
}

fn id_of(record: &Value) -> Option<String> {
    match &record["id"] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn query_page(url: &str) -> Option<usize> {
    url.split_once('?')
        .map(|(_, query)| query)
        .and_then(|query| {
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("page="))
                .and_then(|raw| raw.parse().ok())
        })
}

fn handle_request(mut request: Request, store: &Arc<Mutex<Store>>) {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or("/").to_string();
    let method = request.method().clone();

    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);

    let mut store = store.lock().unwrap();

    match (&method, path.as_str()) {
        (Method::Get, "/orders") => {
            let total_pages = store.orders.len().div_ceil(ORDERS_PAGE_SIZE).max(1);
            // Without a page argument the full listing comes back; that is
            // what the notification poller consumes.
            let Some(page) = query_page(&url) else {
                return respond_json(
                    request,
                    &json!({ "data": store.orders, "page": 1, "total_pages": total_pages }),
                );
            };
            let page = page.clamp(1, total_pages);
            let start = (page - 1) * ORDERS_PAGE_SIZE;
            let slice: Vec<Value> = store
                .orders
                .iter()
                .skip(start)
                .take(ORDERS_PAGE_SIZE)
                .cloned()
                .collect();
            respond_json(
                request,
                &json!({ "data": slice, "page": page, "total_pages": total_pages }),
            );
        }
        (Method::Get, "/communes") => {
            respond_json(request, &json!({ "data": store.communes }));
        }
        _ => {
            if let Some(caps) = RE_ORDER.captures(&path) {
                if method == Method::Get {
                    let id = &caps[1];
                    return match store.orders.iter().find(|o| id_of(o).as_deref() == Some(id)) {
                        Some(order) => respond_json(request, &json!({ "data": order })),
                        None => respond_error(request, 404, "Order not found"),
                    };
                }
                return respond_error(request, 405, "Method not allowed");
            }

            if let Some(caps) = RE_COLLECTION.captures(&path) {
                let collection = caps.get(1).unwrap().as_str().to_string();
                let id = caps.get(2).map(|m| m.as_str().to_string());
                return handle_collection(request, &mut store, &collection, id, &method, &body);
            }

            respond_error(request, 404, "Not found");
        }
    }
}

fn handle_collection(
    request: Request,
    store: &mut Store,
    collection: &str,
    id: Option<String>,
    method: &Method,
    body: &str,
) {
    match (method, id) {
        (Method::Get, None) => {
            let records = store.collection_mut(collection).clone();
            respond_json(request, &json!({ "data": records }));
        }
        (Method::Post, None) => {
            if let Some(error) = store.reject_next.take() {
                return respond_json(request, &json!({ "success": false, "error": error }));
            }
            let mut record: Value = match serde_json::from_str(body) {
                Ok(value) if matches!(&value, Value::Object(_)) => value,
                _ => {
                    return respond_json(
                        request,
                        &json!({ "success": false, "error": "invalid payload" }),
                    )
                }
            };
            store.next_id += 1;
            record["id"] = json!(store.next_id);
            store.collection_mut(collection).push(record);
            respond_json(request, &json!({ "success": true }));
        }
        (Method::Put, Some(id)) => {
            if let Some(error) = store.reject_next.take() {
                return respond_json(request, &json!({ "success": false, "error": error }));
            }
            let update: Value = match serde_json::from_str(body) {
                Ok(value) => value,
                Err(_) => {
                    return respond_json(
                        request,
                        &json!({ "success": false, "error": "invalid payload" }),
                    )
                }
            };
            let records = store.collection_mut(collection);
            let Some(record) = records
                .iter_mut()
                .find(|r| id_of(r).as_deref() == Some(id.as_str()))
            else {
                return respond_json(
                    request,
                    &json!({ "success": false, "error": "record not found" }),
                );
            };
            if let (Some(target), Some(fields)) = (record.as_object_mut(), update.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            respond_json(request, &json!({ "success": true }));
        }
        (Method::Delete, Some(id)) => {
            if let Some(error) = store.reject_next.take() {
                return respond_json(request, &json!({ "success": false, "error": error }));
            }
            let records = store.collection_mut(collection);
            let before = records.len();
            records.retain(|r| id_of(r).as_deref() != Some(id.as_str()));
            if records.len() == before {
                return respond_json(
                    request,
                    &json!({ "success": false, "error": "record not found" }),
                );
            }
            respond_json(request, &json!({ "success": true }));
        }
        _ => respond_error(request, 405, "Method not allowed"),
    }
}

fn respond_json<T: Serialize>(request: Request, value: &T) {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut response = Response::from_data(body);
            response.add_header(
                Header::from_bytes(b"Content-Type".as_slice(), b"application/json".as_slice())
                    .unwrap(),
            );
            let _ = request.respond(response);
        }
        Err(e) => {
            let _ = request.respond(
                Response::from_string(format!("Internal server error: {}", e))
                    .with_status_code(500),
            );
        }
    }
}

fn respond_error(request: Request, code: u16, msg: &str) {
    let _ = request.respond(Response::from_string(msg).with_status_code(code));
}
