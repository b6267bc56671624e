use std::time::{Duration, Instant};

/// Resource tab shown in the records panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Orders,
    Franchises,
    Admins,
    Users,
    Products,
}

impl Tab {
    pub(crate) const ALL: [Tab; 5] = [
        Tab::Orders,
        Tab::Franchises,
        Tab::Admins,
        Tab::Users,
        Tab::Products,
    ];

    pub(crate) fn title(&self) -> &'static str {
        match self {
            Tab::Orders => "Orders",
            Tab::Franchises => "Franchises",
            Tab::Admins => "Admins",
            Tab::Users => "Users",
            Tab::Products => "Products",
        }
    }

    /// Tabs whose records can be created, edited and deleted from the
    /// console. Orders are read-only, they change on the backend side.
    pub(crate) fn editable(&self) -> bool {
        !matches!(self, Tab::Orders)
    }
}

/// Which part of the UI receives key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Records,
    Notifications,
    Form,
    Detail,
}

/// Auto-expiring status line message.
pub(crate) struct Alert {
    pub(crate) message: String,
    pub(crate) is_error: bool,
    raised_at: Instant,
}

impl Alert {
    const TTL: Duration = Duration::from_secs(5);

    pub(crate) fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            raised_at: Instant::now(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            raised_at: Instant::now(),
        }
    }

    pub(crate) fn expired(&self) -> bool {
        self.raised_at.elapsed() >= Self::TTL
    }
}

/// One editable line of the form modal. `flag` fields toggle with space
/// instead of taking text input.
pub(crate) struct FormField {
    pub(crate) key: &'static str,
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) flag: Option<bool>,
}

impl FormField {
    pub(crate) fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
            flag: None,
        }
    }

    pub(crate) fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            flag: Some(on),
        }
    }
}

/// An open create/edit modal. `target_id` is `None` for create flows.
pub(crate) struct FormSession {
    pub(crate) title: String,
    pub(crate) entity: Tab,
    pub(crate) target_id: Option<String>,
    pub(crate) fields: Vec<FormField>,
    pub(crate) cursor: usize,
    pub(crate) errors: Vec<String>,
}

impl FormSession {
    pub(crate) fn new(title: String, entity: Tab, target_id: Option<String>) -> Self {
        Self {
            title,
            entity,
            target_id,
            fields: Vec::new(),
            cursor: 0,
            errors: Vec::new(),
        }
    }

    pub(crate) fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub(crate) fn flag(&self, key: &str) -> bool {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.flag)
            .unwrap_or(false)
    }

    pub(crate) fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn select_next(&mut self) {
        if !self.fields.is_empty() {
            self.cursor = (self.cursor + 1).min(self.fields.len() - 1);
        }
    }

    pub(crate) fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            if field.flag.is_none() {
                field.value.push(c);
            }
        }
    }

    pub(crate) fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            if field.flag.is_none() {
                field.value.pop();
            }
        }
    }

    pub(crate) fn toggle_flag(&mut self) {
        if let Some(field) = self.fields.get_mut(self.cursor) {
            if let Some(on) = field.flag {
                field.flag = Some(!on);
            }
        }
    }
}
