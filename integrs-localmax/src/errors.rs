use integrs_assembly::AssemblyError;
use integrs_core::errors::RepliconError;
use integrs_core::models::Window;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalMaxError {
    #[error("Exhaustive search failed on {replicon_id} window {window}: {reason}")]
    ExternalSearch {
        replicon_id: String,
        window: Window,
        reason: String,
    },

    #[error("Replicon {0} has no sequence loaded, the exhaustive search needs one")]
    MissingSequence(String),

    #[error("No covariance model configured for the exhaustive search")]
    MissingModel,

    #[error("Can't parse search output: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Replicon(#[from] RepliconError),
}
