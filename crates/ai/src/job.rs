use crate::result::AiError;

/// A self-contained inference unit.
///
/// Jobs consume a snapshot via their `Input` type and never perform IO; loading
/// the snapshot is the caller's (infra's) concern.
pub trait AiJob: Send + Sync + 'static {
    type Input: Send + Sync + 'static;
    type Output: Send + 'static;

    /// The input snapshot the job will run inference on.
    fn input(&self) -> &Self::Input;

    /// Execute inference.
    ///
    /// Must not mutate inventory state.
    fn run(&self) -> Result<Self::Output, AiError>;
}
