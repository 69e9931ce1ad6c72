pub mod config;
pub mod date;
pub mod error;
pub mod query;
pub mod register;
pub mod store;

pub use config::Config;
pub use error::{Result, VisitError};
pub use query::{export_csv, FilterOptions, Selection, VisitFilter};
pub use register::{add_client, register_visit, Registration, VisitForm};
pub use store::{Client, ClientStore, Visit, VisitStore};
