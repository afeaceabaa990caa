//! Runtime entry points called by generated accessors.

mod dao;
mod request;
pub use dao::DaoService;
pub use request::RequestService;
