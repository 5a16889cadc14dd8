mod config;
mod extract;

pub use config::{
    ApiBindingOptions, ApiConfig, ErrorHandling, HttpMethod, LoadingState, OptionsMapping,
    ResponseMapping, TableDataMapping, ValueMapping,
};
pub use extract::{
    BindingProbe, DataFetcher, ExtractOutcome, execute, extract, probe, value_by_path,
};
