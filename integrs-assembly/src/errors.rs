use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AssemblyError {
    #[error("{kind} hits of replicon {replicon_id} are not sorted by position (row {index})")]
    UnsortedInput {
        kind: &'static str,
        replicon_id: String,
        index: usize,
    },

    #[error("Hit from replicon {found} passed to the analysis of replicon {expected}")]
    MixedReplicons { expected: String, found: String },

    #[error("{0} already owns an integrase")]
    DuplicateIntegrase(String),

    #[error("An attC array can't be empty")]
    EmptyArray,

    #[error("An attC array can't mix strands")]
    MixedStrands,
}
