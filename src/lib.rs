//! dao-synth: descriptor-driven data-access layer generator with a SQLite execution runtime.

pub mod accessor;
pub mod case;
pub mod codegen;
pub mod config;
pub mod error;
pub mod facade;
pub mod logging;
pub mod record;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod status;
pub mod store;
pub mod stream;
pub mod transport;
pub mod trigger;

pub use accessor::{Accessor, EntityAccessor, LocalAccessor, RemoteAccessor, RequestAccessor};
pub use codegen::{generate, generate_from_declarations, GeneratedCode, GeneratorOptions};
pub use config::{load_from_path, load_from_str, resolve, DeclarationSet, ResolvedSchema};
pub use error::{QueryError, SchemaError, StoreError};
pub use facade::{DatabaseFacade, ProviderRegistry};
pub use logging::init_logging;
pub use record::{FieldDef, FieldType, Record, Row};
pub use service::{DaoService, RequestService};
pub use settings::Settings;
pub use state::Provider;
pub use status::ExecutionStatus;
pub use store::{QueryExecutor, SqliteExecutor};
pub use stream::{flowable, StreamOptions};
pub use transport::{ParamMap, RemoteTransport};
