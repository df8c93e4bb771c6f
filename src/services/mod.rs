mod http;
pub mod archive;
pub mod generator;
pub mod metadata;
pub mod quotes;
pub mod registry;

pub use archive::HistoricalArchive;
pub use metadata::MetadataStore;
pub use quotes::QuoteClient;
pub use registry::RegistryClient;
