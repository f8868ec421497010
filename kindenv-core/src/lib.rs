pub mod config;
pub mod constants;
pub mod engine;
pub mod env;
pub mod errors;
pub mod logging;
pub mod topology;

pub mod prelude {
    pub use crate::config::{
        ClusterEnvironmentConfig,
        DisplayOptions,
        EnvOverrides,
        TeardownPolicy,
    };
    pub use crate::constants::*;
    pub use crate::engine::{
        CreateOptions,
        KindEngine,
        ProvisioningEngine,
    };
    pub use crate::env::ClusterEnvironment;
    pub use crate::errors::{
        ClusterEnvError,
        EmptyResult,
    };
}

#[cfg(test)]
mod tests;
