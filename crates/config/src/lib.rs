// Configuration loading

pub mod settings;

pub use settings::{
    Settings, CONFIG_ENV, DEFAULT_DOWNLOAD_NAME, DEFAULT_ENDPOINT, ENDPOINT_ENV,
};
