mod app;
mod config;
mod effects;
mod logging;
mod render;

pub(crate) use app::run_app;
pub(crate) use config::CONFIG_FILENAME;
