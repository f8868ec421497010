pub use anyhow::{
    Context,
    anyhow,
    bail,
    ensure,
};
pub use paste::paste;
pub use thiserror::Error;

pub type EmptyResult = anyhow::Result<()>;

// This macro creates an enum which derives from thiserror::Error, and also
// creates constructor functions in snake case for each of the enum variants
#[macro_export]
macro_rules! err_impl {
    (@hidden $errtype:ident, $item:ident, String) => {
        paste! {
            pub fn [<$item:snake>](in_: &str) -> anyhow::Error {
                anyhow!{$errtype::$item(in_.into())}
            }
        }
    };

    (@hidden $errtype:ident, $item:ident, $($dtype:tt)::+) => {
        paste! {
            pub fn [<$item:snake>](in_: &$($dtype)::+) -> anyhow::Error {
                anyhow!{$errtype::$item(in_.clone())}
            }
        }
    };

    ($vis:vis $errtype:ident,
        $(#[$errinfo:meta] $item:ident($($dtype:tt)::+),)+
    ) => {
        #[derive(Debug, Error, PartialEq, Eq)]
        $vis enum $errtype {
            $(#[$errinfo] $item($($dtype)::+)),+
        }

        impl $errtype {
            $(err_impl! {@hidden $errtype, $item, $($dtype)::+})+
        }
    };
}

pub use err_impl;

// Every failure coming out of a ClusterEnvironment carries one of these as context, so callers
// can tell which lifecycle phase broke with `err.downcast_ref::<ClusterEnvError>()` while the
// underlying engine or filesystem error stays available as the root cause.
err_impl! {pub ClusterEnvError,
    #[error("could not resolve cluster environment configuration: {0}")]
    ConfigResolution(String),

    #[error("failed to create cluster {0}")]
    ClusterCreation(String),

    #[error("failed to extract kubeconfig for cluster {0}")]
    CredentialExtraction(String),

    #[error("failed to load image into cluster: {0}")]
    ImageLoad(String),

    #[error("failed to tear down cluster environment {0}")]
    Teardown(String),
}

pub fn phase_of(err: &anyhow::Error) -> Option<&ClusterEnvError> {
    err.downcast_ref::<ClusterEnvError>()
}
