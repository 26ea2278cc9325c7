use chess_core::RulesError;

#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    #[error("Invalid move: {0}")]
    IllegalMove(#[source] RulesError),

    #[error("Could not read game notation: {0}")]
    MalformedNotation(#[source] RulesError),

    #[error("Variations are disabled; only the main line can be played")]
    BranchingDisabled,
}
