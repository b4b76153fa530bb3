use thiserror::Error;

/// Rejected wizard transitions. The session is never modified when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("'{response}' is not a valid answer for stage '{stage}' (expected one of: {})", .allowed.join(", "))]
    InvalidResponse {
        stage: String,
        response: String,
        allowed: Vec<String>,
    },

    #[error("Stage '{stage}' rejected the answer: {reason}")]
    InvalidResponseFormat { stage: String, reason: String },

    #[error("Already at the first stage; there is nothing to go back to")]
    NoPreviousStage,

    #[error("Stage '{stage}' is the final stage; restart to begin a new build")]
    AlreadyComplete { stage: String },

    #[error("The questionnaire is not finished yet (currently at '{stage}')")]
    NotComplete { stage: String },

    #[error("No answer recorded for stage '{stage}'")]
    MissingResponse { stage: String },

    #[error("Unknown stage '{0}'")]
    UnknownStage(String),
}

/// Problems with a stage table, detected when the graph is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageGraphError {
    #[error("Duplicate stage id '{0}'")]
    DuplicateStage(String),

    #[error("Stage table has no '{0}' stage")]
    MissingInitial(String),

    #[error("Stage table must have exactly one final stage, found {0}")]
    FinalStageCount(usize),

    #[error("Final stage '{0}' must not point to a next stage")]
    FinalWithNext(String),

    #[error("Stage '{0}' is not final but has no next stage")]
    DanglingStage(String),

    #[error("Stage '{stage}' points to unknown stage '{next}'")]
    UnknownNext { stage: String, next: String },

    #[error("Stage '{0}' is visited twice; stage tables must form a simple path")]
    Cycle(String),

    #[error("Stages not reachable from the initial stage: {}", .0.join(", "))]
    Unreachable(Vec<String>),

    #[error("Failed to parse stage table: {0}")]
    Parse(String),
}
