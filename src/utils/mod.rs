pub mod http;
pub mod logging;
pub mod settings;
pub mod url;
