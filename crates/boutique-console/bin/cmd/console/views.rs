pub(crate) mod bottom_bar;
pub(crate) mod dashboard;
pub(crate) mod detail;
pub(crate) mod form;
pub(crate) mod notifications;
pub(crate) mod records;
