pub mod classify;
pub mod config;
pub mod converter;
pub mod copier;
pub mod exclude;
pub mod mapper;
pub mod pool;
pub mod sync;
pub mod testing;

pub use classify::MediaKind;
pub use config::{
    default_config_path, load_config, load_config_from_str, validate_config, Config, ConfigError,
    SyncConfig,
};
pub use converter::{Converter, ConverterConfig, ConverterError, MagickConverter};
pub use copier::{CopyError, VerbatimCopier};
pub use exclude::ExclusionMatcher;
pub use mapper::PathMapper;
pub use pool::{ConversionPool, PoolConfig, PoolStatus};
pub use sync::{
    FailurePolicy, SyncError, SyncOptions, SyncOrchestrator, SyncProgress, SyncReport,
    SyncSettings,
};
