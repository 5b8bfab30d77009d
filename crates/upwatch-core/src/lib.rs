pub mod config;
pub mod logging;

pub mod form;
pub mod poller;
pub mod status;
pub mod view;
