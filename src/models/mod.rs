pub mod project;
pub mod query;
pub mod settings;
pub mod template;

pub use project::*;
pub use query::*;
pub use settings::*;
pub use template::*;
