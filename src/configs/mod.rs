pub mod base;
pub mod bilibili;
pub mod http;
pub mod logging;
pub mod output;

pub use base::*;
pub use bilibili::*;
pub use http::*;
pub use logging::*;
pub use output::*;
