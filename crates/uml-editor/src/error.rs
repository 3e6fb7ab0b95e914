/// Rejected editor operations.
///
/// None of these leave the canvas in a partial state: the operation simply
/// did not happen.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("class name must not be empty")]
    EmptyClassName,

    #[error("no class form is open")]
    NoOpenForm,

    #[error("no member `{0}` in the class form")]
    UnknownMember(String),

    #[error("unknown handle side `{0}`")]
    UnknownHandle(String),

    #[error("unknown member property `{0}`")]
    UnknownEditKey(String),

    #[error("invalid canvas config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
