use boutique_console::form::{AdminForm, BoutiqueUserForm, FranchiseForm, ProductForm};
use boutique_console::{
    ApiClient, Commune, NotificationFeed, Order, PollEvent, Poller, SeenState,
};
use chrono::Utc;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
    widgets::{Paragraph, TableState},
    DefaultTerminal, Frame,
};
use std::io;
use std::time::{Duration, Instant};

use super::state::{Alert, Focus, FormField, FormSession, Tab};
use super::views::bottom_bar::render_bottom_bar;
use super::views::dashboard::render_dashboard;
use super::views::detail::render_order_detail;
use super::views::form::render_form_popup;
use super::views::notifications::render_notifications_panel;
use super::views::records::{
    admin_headers, admin_rows, franchise_headers, franchise_rows, order_headers, order_rows,
    product_headers, product_rows, render_records_panel, user_headers, user_rows,
};
use super::widgets::formatters::page_line;

#[derive(Debug, Parser)]
pub struct ConsoleArgs {
    /// Base url of the management backend
    #[arg(long, env = "BOUTIQUE_CONSOLE_API_URL", default_value = "http://127.0.0.1:8990")]
    pub api_url: String,

    /// Seconds between notification polls of the order listing
    #[arg(long, default_value = "30")]
    pub poll_interval: u64,
}

impl ConsoleArgs {
    pub fn run(&self) -> Result<()> {
        let client = ApiClient::new(&self.api_url);
        let poller = Poller::spawn(
            client.clone(),
            Duration::from_secs(self.poll_interval.max(1)),
        );

        let mut app = App {
            client,
            poller,
            seen: SeenState::new(),
            feed: NotificationFeed::new(),
            tab: Tab::Orders,
            orders: Vec::new(),
            orders_page: 1,
            orders_total_pages: 1,
            latest_orders: Vec::new(),
            franchises: Vec::new(),
            admins: Vec::new(),
            users: Vec::new(),
            products: Vec::new(),
            communes: Vec::new(),
            table_state: TableState::default().with_selected(0),
            focus: Focus::Records,
            show_notifications: false,
            show_dashboard: false,
            form: None,
            detail: None,
            alert: None,
            poll_error: None,
            last_poll_ok: None,
            exit: false,
        };

        let mut terminal = ratatui::init();
        let app_result = app.run(&mut terminal);
        ratatui::restore();
        app_result.map_err(|e| eyre::eyre!("TUI error: {}", e))
    }
}

pub(crate) struct App {
    client: ApiClient,
    poller: Poller,
    seen: SeenState,
    feed: NotificationFeed,
    tab: Tab,
    orders: Vec<Order>,
    orders_page: u64,
    orders_total_pages: u64,
    /// Snapshot from the most recent successful poll, drives the dashboard.
    latest_orders: Vec<Order>,
    franchises: Vec<boutique_console::Franchise>,
    admins: Vec<boutique_console::Admin>,
    users: Vec<boutique_console::BoutiqueUser>,
    products: Vec<boutique_console::Product>,
    communes: Vec<Commune>,
    table_state: TableState,
    focus: Focus,
    show_notifications: bool,
    show_dashboard: bool,
    form: Option<FormSession>,
    detail: Option<Order>,
    alert: Option<Alert>,
    poll_error: Option<String>,
    last_poll_ok: Option<Instant>,
    exit: bool,
}

impl App {
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        self.refresh_records();

        while !self.exit {
            self.process_poll_events();

            if self.alert.as_ref().is_some_and(|a| a.expired()) {
                self.alert = None;
            }

            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Drains the poller channel and runs every fetched snapshot through
    /// the change detector. A failed poll only flags staleness; the seen
    /// state stays at last-known-good.
    fn process_poll_events(&mut self) {
        while let Some(event) = self.poller.try_recv() {
            match event {
                PollEvent::Fetched(orders) => {
                    let fresh = self.seen.observe(&orders, Utc::now());
                    self.feed.extend_front(fresh);
                    self.latest_orders = orders;
                    self.poll_error = None;
                    self.last_poll_ok = Some(Instant::now());
                }
                PollEvent::Failed(message) => {
                    self.poll_error = Some(message);
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.render_ui(frame);
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    self.handle_key_event(key_event);
                }
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match self.focus {
            Focus::Form => self.handle_form_key(key_event),
            Focus::Detail => match key_event.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.detail = None;
                    self.focus = Focus::Records;
                }
                _ => {}
            },
            Focus::Records | Focus::Notifications => self.handle_browse_key(key_event),
        }
    }

    fn handle_browse_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit = true,
            KeyCode::Tab => self.switch_tab(1),
            KeyCode::BackTab => self.switch_tab(-1),
            KeyCode::Char(c @ '1'..='5') => {
                let index = (c as usize) - ('1' as usize);
                self.set_tab(Tab::ALL[index]);
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.toggle_notifications(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.show_notifications {
                    self.feed.mark_all_read();
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.show_dashboard = !self.show_dashboard;
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next_record(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous_record(),
            KeyCode::Char('[') => self.change_order_page(-1),
            KeyCode::Char(']') => self.change_order_page(1),
            KeyCode::Char('a') | KeyCode::Char('A') => self.open_create_form(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.open_edit_form(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.delete_selected(),
            KeyCode::Enter => self.open_order_detail(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.form = None;
                self.focus = Focus::Records;
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Up | KeyCode::BackTab => {
                if let Some(session) = self.form.as_mut() {
                    session.select_previous();
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                if let Some(session) = self.form.as_mut() {
                    session.select_next();
                }
            }
            KeyCode::Char(' ') => {
                if let Some(session) = self.form.as_mut() {
                    session.toggle_flag();
                }
            }
            KeyCode::Backspace => {
                if let Some(session) = self.form.as_mut() {
                    session.pop_char();
                }
            }
            KeyCode::Char(c) => {
                if let Some(session) = self.form.as_mut() {
                    session.push_char(c);
                }
            }
            _ => {}
        }
    }

    fn switch_tab(&mut self, step: i64) {
        let current = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0) as i64;
        let count = Tab::ALL.len() as i64;
        let next = (current + step).rem_euclid(count) as usize;
        self.set_tab(Tab::ALL[next]);
    }

    fn set_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.table_state.select(Some(0));
            self.refresh_records();
        }
    }

    fn toggle_notifications(&mut self) {
        self.show_notifications = !self.show_notifications;
        self.focus = if self.show_notifications {
            Focus::Notifications
        } else {
            Focus::Records
        };
    }

    fn record_count(&self) -> usize {
        match self.tab {
            Tab::Orders => self.orders.len(),
            Tab::Franchises => self.franchises.len(),
            Tab::Admins => self.admins.len(),
            Tab::Users => self.users.len(),
            Tab::Products => self.products.len(),
        }
    }

    fn selected_index(&self) -> Option<usize> {
        self.table_state
            .selected()
            .filter(|i| *i < self.record_count())
    }

    fn select_previous_record(&mut self) {
        if self.record_count() > 0 {
            let i = match self.table_state.selected() {
                Some(i) => i.saturating_sub(1),
                None => 0,
            };
            self.table_state.select(Some(i));
        }
    }

    fn select_next_record(&mut self) {
        let count = self.record_count();
        if count > 0 {
            let i = match self.table_state.selected() {
                Some(i) => (i + 1).min(count - 1),
                None => 0,
            };
            self.table_state.select(Some(i));
        }
    }

    fn change_order_page(&mut self, step: i64) {
        if self.tab != Tab::Orders {
            return;
        }
        let next = (self.orders_page as i64 + step).clamp(1, self.orders_total_pages.max(1) as i64);
        if next as u64 != self.orders_page {
            self.orders_page = next as u64;
            self.refresh_records();
        }
    }

    /// Fetches the active tab's listing. A failure keeps the previous rows
    /// and raises an alert with the transport or server message.
    fn refresh_records(&mut self) {
        let outcome = match self.tab {
            Tab::Orders => match self.client.list_orders(self.orders_page) {
                Ok(listing) => {
                    self.orders = listing.data;
                    self.orders_page = listing.page;
                    self.orders_total_pages = listing.total_pages.max(1);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Tab::Franchises => self.client.list_franchises().map(|f| self.franchises = f),
            Tab::Admins => self.client.list_admins().map(|a| self.admins = a),
            Tab::Users => self.client.list_boutique_users().map(|u| self.users = u),
            Tab::Products => self.client.list_products().map(|p| self.products = p),
        };

        if let Err(e) = outcome {
            self.alert = Some(Alert::error(format!(
                "Failed to fetch {}: {}",
                self.tab.title().to_lowercase(),
                e
            )));
        }

        if let Some(selected) = self.table_state.selected() {
            let count = self.record_count();
            if selected >= count && count > 0 {
                self.table_state.select(Some(count - 1));
            }
        }
    }

    fn open_order_detail(&mut self) {
        if self.tab != Tab::Orders {
            return;
        }
        let Some(order) = self.selected_index().and_then(|i| self.orders.get(i)) else {
            return;
        };
        match self.client.get_order(&order.id) {
            Ok(detail) => {
                self.detail = Some(detail);
                self.focus = Focus::Detail;
            }
            Err(e) => {
                self.alert = Some(Alert::error(format!("Failed to fetch order: {}", e)));
            }
        }
    }

    fn open_create_form(&mut self) {
        if !self.tab.editable() {
            return;
        }
        let title = format!("New {}", singular(self.tab));
        let mut session = FormSession::new(title, self.tab, None);
        session.fields = blank_fields(self.tab);
        self.prepare_form(session);
    }

    fn open_edit_form(&mut self) {
        if !self.tab.editable() {
            return;
        }
        let Some(index) = self.selected_index() else {
            return;
        };

        let session = match self.tab {
            Tab::Franchises => self.franchises.get(index).map(|franchise| {
                let form = FranchiseForm::from_remote(franchise);
                let mut session = FormSession::new(
                    format!("Edit franchise #{}", franchise.id),
                    self.tab,
                    Some(franchise.id.clone()),
                );
                session.fields = franchise_fields(&form);
                session
            }),
            Tab::Admins => self.admins.get(index).map(|admin| {
                let form = AdminForm::from_remote(admin);
                let mut session = FormSession::new(
                    format!("Edit admin #{}", admin.id),
                    self.tab,
                    Some(admin.id.clone()),
                );
                session.fields = admin_fields(&form);
                session
            }),
            Tab::Users => self.users.get(index).map(|user| {
                let form = BoutiqueUserForm::from_remote(user);
                let mut session = FormSession::new(
                    format!("Edit user #{}", user.id),
                    self.tab,
                    Some(user.id.clone()),
                );
                session.fields = user_fields(&form);
                session
            }),
            Tab::Products => self.products.get(index).map(|product| {
                let form = ProductForm::from_remote(product);
                let mut session = FormSession::new(
                    format!("Edit product #{}", product.id),
                    self.tab,
                    Some(product.id.clone()),
                );
                session.fields = product_fields(&form);
                session
            }),
            Tab::Orders => None,
        };

        if let Some(session) = session {
            self.prepare_form(session);
        }
    }

    fn prepare_form(&mut self, session: FormSession) {
        // The franchise form validates its commune against the lookup list.
        if session.entity == Tab::Franchises {
            match self.client.list_communes() {
                Ok(communes) => self.communes = communes,
                Err(e) => {
                    self.alert =
                        Some(Alert::error(format!("Failed to fetch communes: {}", e)));
                }
            }
        }
        self.form = Some(session);
        self.focus = Focus::Form;
    }

    /// Validates the open form and submits it. Validation errors keep the
    /// modal open and never reach the network; a backend rejection surfaces
    /// the server message verbatim.
    fn submit_form(&mut self) {
        let Some(mut session) = self.form.take() else {
            return;
        };

        let (errors, request): (Vec<String>, Option<eyre::Result<()>>) = match session.entity {
            Tab::Franchises => {
                let form = FranchiseForm {
                    name: session.value("name").to_string(),
                    email: session.value("email").to_string(),
                    phone: session.value("phone").to_string(),
                    address: session.value("address").to_string(),
                    commune_id: session.value("commune").to_string(),
                    active: session.flag("active"),
                };
                let mut errors = render_errors(&form.validate());
                if errors.is_empty() && !self.communes.is_empty() {
                    let known = self.communes.iter().any(|c| c.id == form.commune_id.trim());
                    if !known {
                        errors.push(format!("commune: no commune with id {}", form.commune_id));
                    }
                }
                let request = errors.is_empty().then(|| {
                    let payload = form.to_payload();
                    match &session.target_id {
                        Some(id) => self.client.update_franchise(id, &payload),
                        None => self.client.create_franchise(&payload),
                    }
                });
                (errors, request)
            }
            Tab::Admins => {
                let form = AdminForm {
                    name: session.value("name").to_string(),
                    email: session.value("email").to_string(),
                    phone: session.value("phone").to_string(),
                    active: session.flag("active"),
                };
                let errors = render_errors(&form.validate());
                let request = errors.is_empty().then(|| {
                    let payload = form.to_payload();
                    match &session.target_id {
                        Some(id) => self.client.update_admin(id, &payload),
                        None => self.client.create_admin(&payload),
                    }
                });
                (errors, request)
            }
            Tab::Users => {
                let form = BoutiqueUserForm {
                    name: session.value("name").to_string(),
                    email: session.value("email").to_string(),
                    phone: session.value("phone").to_string(),
                    boutique_id: session.value("boutique").to_string(),
                    active: session.flag("active"),
                };
                let errors = render_errors(&form.validate());
                let request = errors.is_empty().then(|| {
                    let payload = form.to_payload();
                    match &session.target_id {
                        Some(id) => self.client.update_boutique_user(id, &payload),
                        None => self.client.create_boutique_user(&payload),
                    }
                });
                (errors, request)
            }
            Tab::Products => {
                let form = ProductForm {
                    name: session.value("name").to_string(),
                    price: session.value("price").to_string(),
                    weight: session.value("weight").to_string(),
                    description: session.value("description").to_string(),
                    active: session.flag("active"),
                };
                let errors = render_errors(&form.validate());
                let request = errors.is_empty().then(|| {
                    let payload = form.to_payload();
                    match &session.target_id {
                        Some(id) => self.client.update_product(id, &payload),
                        None => self.client.create_product(&payload),
                    }
                });
                (errors, request)
            }
            Tab::Orders => (Vec::new(), None),
        };

        if !errors.is_empty() {
            session.errors = errors;
            self.form = Some(session);
            self.alert = Some(Alert::error("Fix the highlighted fields"));
            return;
        }

        match request {
            Some(Ok(())) => {
                let saved = format!("{} saved", singular(session.entity));
                self.form = None;
                self.focus = Focus::Records;
                self.alert = Some(Alert::info(saved));
                self.refresh_records();
            }
            Some(Err(e)) => {
                self.form = Some(session);
                self.alert = Some(Alert::error(e.to_string()));
            }
            None => {
                self.form = None;
                self.focus = Focus::Records;
            }
        }
    }

    fn delete_selected(&mut self) {
        if !self.tab.editable() {
            return;
        }
        let Some(index) = self.selected_index() else {
            return;
        };

        let result = match self.tab {
            Tab::Franchises => self
                .franchises
                .get(index)
                .map(|f| self.client.delete_franchise(&f.id)),
            Tab::Admins => self.admins.get(index).map(|a| self.client.delete_admin(&a.id)),
            Tab::Users => self
                .users
                .get(index)
                .map(|u| self.client.delete_boutique_user(&u.id)),
            Tab::Products => self
                .products
                .get(index)
                .map(|p| self.client.delete_product(&p.id)),
            Tab::Orders => None,
        };

        match result {
            Some(Ok(())) => {
                self.alert = Some(Alert::info(format!("{} deleted", singular(self.tab))));
                self.refresh_records();
            }
            Some(Err(e)) => {
                self.alert = Some(Alert::error(e.to_string()));
            }
            None => {}
        }
    }
}

fn singular(tab: Tab) -> &'static str {
    match tab {
        Tab::Orders => "Order",
        Tab::Franchises => "Franchise",
        Tab::Admins => "Admin",
        Tab::Users => "User",
        Tab::Products => "Product",
    }
}

fn render_errors(errors: &boutique_console::form::FieldErrors) -> Vec<String> {
    errors
        .iter()
        .map(|(field, message)| format!("{} {}", field, message))
        .collect()
}

fn franchise_fields(form: &FranchiseForm) -> Vec<FormField> {
    vec![
        FormField::text("name", "Name", form.name.clone()),
        FormField::text("email", "Email", form.email.clone()),
        FormField::text("phone", "Phone", form.phone.clone()),
        FormField::text("address", "Address", form.address.clone()),
        FormField::text("commune", "Commune id", form.commune_id.clone()),
        FormField::toggle("active", "Active", form.active),
    ]
}

fn admin_fields(form: &AdminForm) -> Vec<FormField> {
    vec![
        FormField::text("name", "Name", form.name.clone()),
        FormField::text("email", "Email", form.email.clone()),
        FormField::text("phone", "Phone", form.phone.clone()),
        FormField::toggle("active", "Active", form.active),
    ]
}

fn user_fields(form: &BoutiqueUserForm) -> Vec<FormField> {
    vec![
        FormField::text("name", "Name", form.name.clone()),
        FormField::text("email", "Email", form.email.clone()),
        FormField::text("phone", "Phone", form.phone.clone()),
        FormField::text("boutique", "Boutique id", form.boutique_id.clone()),
        FormField::toggle("active", "Active", form.active),
    ]
}

fn product_fields(form: &ProductForm) -> Vec<FormField> {
    vec![
        FormField::text("name", "Name", form.name.clone()),
        FormField::text("price", "Price", form.price.clone()),
        FormField::text("weight", "Weight", form.weight.clone()),
        FormField::text("description", "Description", form.description.clone()),
        FormField::toggle("active", "Active", form.active),
    ]
}

fn blank_fields(tab: Tab) -> Vec<FormField> {
    match tab {
        Tab::Franchises => franchise_fields(&FranchiseForm {
            active: true,
            ..FranchiseForm::default()
        }),
        Tab::Admins => admin_fields(&AdminForm {
            active: true,
            ..AdminForm::default()
        }),
        Tab::Users => user_fields(&BoutiqueUserForm {
            active: true,
            ..BoutiqueUserForm::default()
        }),
        Tab::Products => product_fields(&ProductForm {
            active: true,
            ..ProductForm::default()
        }),
        Tab::Orders => Vec::new(),
    }
}

impl App {
    fn render_ui(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [tabs_area, main_area, bottom_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        // Tab bar with the unread badge on the left, poll status on the right.
        let mut tab_spans = vec![" Boutique Console ".bold()];
        if self.feed.unread_count() > 0 {
            tab_spans.push(format!("🔔 {} ", self.feed.unread_count()).yellow().bold());
        }
        tab_spans.push("| ".dark_gray());
        for tab in Tab::ALL {
            if tab == self.tab {
                tab_spans.push(format!(" {} ", tab.title()).yellow().bold().reversed());
            } else {
                tab_spans.push(format!(" {} ", tab.title()).into());
            }
        }
        frame.render_widget(Paragraph::new(Line::from(tab_spans)), tabs_area);

        let poll_status = if let Some(message) = &self.poll_error {
            format!("⚠ poll failed: {} ", truncate_status(message))
                .red()
                .into()
        } else if let Some(last_ok) = self.last_poll_ok {
            format!("🔄 {}s ago ", last_ok.elapsed().as_secs())
                .dark_gray()
                .into()
        } else {
            Line::default()
        };
        frame.render_widget(
            Paragraph::new(poll_status).right_aligned(),
            tabs_area,
        );

        if self.show_dashboard {
            render_dashboard(&self.latest_orders, main_area, frame);
        } else {
            let (records_area, notifications_area) = if self.show_notifications {
                let [left, right] =
                    Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                        .areas(main_area);
                (left, Some(right))
            } else {
                (main_area, None)
            };

            let footer = if self.tab == Tab::Orders {
                page_line(self.orders_page, self.orders_total_pages)
            } else {
                Line::default()
            };

            let (headers, rows) = match self.tab {
                Tab::Orders => (order_headers(), order_rows(&self.orders)),
                Tab::Franchises => (franchise_headers(), franchise_rows(&self.franchises)),
                Tab::Admins => (admin_headers(), admin_rows(&self.admins)),
                Tab::Users => (user_headers(), user_rows(&self.users)),
                Tab::Products => (product_headers(), product_rows(&self.products)),
            };

            render_records_panel(
                self.tab.title(),
                headers,
                rows,
                footer,
                records_area,
                frame,
                &mut self.table_state,
                self.show_notifications && self.focus != Focus::Records,
            );

            if let Some(notifications_area) = notifications_area {
                render_notifications_panel(
                    &self.feed,
                    notifications_area,
                    frame,
                    self.focus == Focus::Notifications,
                );
            }
        }

        render_bottom_bar(frame, bottom_area, self.focus, self.alert.as_ref());

        if let Some(session) = &self.form {
            render_form_popup(session, area, frame);
        }
        if let Some(order) = &self.detail {
            render_order_detail(order, area, frame);
        }
    }
}

fn truncate_status(message: &str) -> String {
    let mut short: String = message.chars().take(40).collect();
    if short.len() < message.len() {
        short.push_str("...");
    }
    short
}
