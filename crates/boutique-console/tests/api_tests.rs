#[cfg(test)]
pub mod tests {
    use boutique_console::form::{AdminForm, FranchiseForm, ProductForm};
    use boutique_console::ApiClient;
    use boutique_console_mock::MockBackend;

    fn valid_franchise_form() -> FranchiseForm {
        FranchiseForm {
            name: "Atelier Ouest".to_string(),
            email: "Ouest@Example.COM".to_string(),
            phone: "07 00 11 22 33".to_string(),
            address: "8 quai des Brumes".to_string(),
            commune_id: "75".to_string(),
            active: true,
        }
    }

    #[test]
    fn order_listing_is_paginated() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let page1 = client.list_orders(1).expect("Failed to fetch orders");
        assert_eq!(page1.page, 1);
        assert_eq!(page1.total_pages, 2);
        assert_eq!(page1.data.len(), 4);
        assert_eq!(page1.data[0].id, "101");
        // Loose payloads decode: "49.90" arrives as a string.
        assert_eq!(page1.data[0].total, Some(49.90));

        let page2 = client.list_orders(2).expect("Failed to fetch orders");
        assert_eq!(page2.data.len(), 2);
        assert_eq!(page2.data[0].id, "105");
    }

    #[test]
    fn polling_returns_the_full_listing() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let orders = client.poll_orders().expect("Failed to poll orders");
        assert_eq!(orders.len(), 6);
    }

    #[test]
    fn order_detail_route() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let order = client.get_order("103").expect("Failed to fetch order");
        assert_eq!(order.status, "Livrée");
        assert_eq!(order.customer.as_deref(), Some("Iris Bonnet"));
    }

    #[test]
    fn franchise_crud_round_trip() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let before = client.list_franchises().unwrap().len();

        let form = valid_franchise_form();
        client
            .create_franchise(&form.to_payload())
            .expect("Failed to create franchise");

        let franchises = client.list_franchises().unwrap();
        assert_eq!(franchises.len(), before + 1);
        let created = franchises
            .iter()
            .find(|f| f.name == "Atelier Ouest")
            .expect("created franchise is listed");
        // The payload went over the wire in backend representation and
        // came back through the loose decoder.
        assert_eq!(created.email.as_deref(), Some("ouest@example.com"));
        assert_eq!(created.phone.as_deref(), Some("0700112233"));
        assert_eq!(created.active, Some(true));

        let mut updated_form = form;
        updated_form.active = false;
        updated_form.name = "Atelier Ouest Bis".to_string();
        client
            .update_franchise(&created.id, &updated_form.to_payload())
            .expect("Failed to update franchise");

        let franchises = client.list_franchises().unwrap();
        let updated = franchises
            .iter()
            .find(|f| f.id == created.id)
            .expect("updated franchise is listed");
        assert_eq!(updated.name, "Atelier Ouest Bis");
        assert_eq!(updated.active, Some(false));

        client
            .delete_franchise(&updated.id)
            .expect("Failed to delete franchise");
        assert_eq!(client.list_franchises().unwrap().len(), before);
    }

    #[test]
    fn admin_and_product_mutations_round_trip() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let admin = AdminForm {
            name: "Second Admin".to_string(),
            email: "second@example.com".to_string(),
            phone: "0655555555".to_string(),
            active: true,
        };
        client.create_admin(&admin.to_payload()).unwrap();
        assert_eq!(client.list_admins().unwrap().len(), 2);

        let product = ProductForm {
            name: "Poster".to_string(),
            price: "9,90".to_string(),
            weight: "0.1".to_string(),
            description: "A2 print".to_string(),
            active: true,
        };
        client.create_product(&product.to_payload()).unwrap();
        let products = client.list_products().unwrap();
        let created = products.iter().find(|p| p.name == "Poster").unwrap();
        // "9,90" normalized to a decimal string on submit.
        assert_eq!(created.price, Some(9.90));
    }

    #[test]
    fn backend_rejection_surfaces_the_server_message() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        backend.reject_next_mutation("email already taken");
        let error = client
            .create_franchise(&valid_franchise_form().to_payload())
            .expect_err("mutation should be rejected");
        assert_eq!(error.to_string(), "email already taken");

        // The rejection was a one-off; the store was left unchanged.
        assert_eq!(client.list_franchises().unwrap().len(), 2);
    }

    #[test]
    fn unknown_record_mutations_are_rejected() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let error = client
            .delete_product("9999")
            .expect_err("unknown record should be rejected");
        assert_eq!(error.to_string(), "record not found");
    }

    #[test]
    fn commune_lookup_is_available_for_the_franchise_form() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());

        let communes = client.list_communes().unwrap();
        assert_eq!(communes.len(), 3);
        assert!(communes.iter().any(|c| c.id == "59" && c.name == "Lille"));
    }

    #[test]
    fn invalid_forms_never_reach_the_network() {
        let backend = MockBackend::spawn();
        let client = ApiClient::new(backend.url());
        let before = client.list_franchises().unwrap().len();

        // The console submits only when validation passes; a blank form
        // accumulates one error per required field and stops here.
        let blank = FranchiseForm::default();
        let errors = blank.validate();
        assert_eq!(errors.len(), 5);
        if errors.is_empty() {
            client.create_franchise(&blank.to_payload()).unwrap();
        }

        assert_eq!(client.list_franchises().unwrap().len(), before);
    }
}
