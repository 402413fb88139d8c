pub(crate) mod dashboard;
pub(crate) mod form;
pub(crate) mod records;
pub(crate) mod settings;
