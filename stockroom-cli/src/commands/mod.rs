pub(crate) mod books;
pub(crate) mod config;
pub(crate) mod grades;
pub(crate) mod items;
pub(crate) mod records;
pub(crate) mod shell;
pub(crate) mod stats;
