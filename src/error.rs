use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("{_0}")]
    Custom(String),

    #[display("Missing API key: pass --api-key or set {env_var}")]
    MissingApiKey { env_var: &'static str },

    #[from]
    #[display("IO error: {_0}")]
    Io(std::io::Error),

    #[from]
    #[display("OpenAI client error: {_0}")]
    OpenAI(async_openai::error::OpenAIError),

    #[from]
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    #[from]
    #[display("{_0}")]
    Failure(crate::core::Failure),
}

impl Error {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

impl std::error::Error for Error {}
