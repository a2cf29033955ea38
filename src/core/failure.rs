use derive_more::Display;

/// Outcome of a session operation that did not produce a value.
///
/// Sessions never propagate service errors; they reduce them to a
/// description here and leave the wording of the user-facing message to
/// whoever renders it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Failure {
    /// Required text was missing, nothing was sent.
    #[display("{_0}")]
    EmptyInput(&'static str),

    /// Another request is still waiting for its reply.
    #[display("Busy: wait for the current request")]
    Busy,

    /// The transcript or completion service failed.
    #[display("{_0}")]
    Service(String),
}

impl Failure {
    pub fn service(err: impl std::fmt::Display) -> Self {
        Self::Service(err.to_string())
    }
}

impl std::error::Error for Failure {}

/// Run a service call under an optional deadline, collapsing every error
/// into [`Failure::Service`].
pub async fn bounded<T, E, F>(timeout: Option<std::time::Duration>, call: F) -> Result<T, Failure>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                return Err(Failure::Service(format!(
                    "request timed out after {}s",
                    limit.as_secs()
                )));
            }
        },
        None => call.await,
    };

    result.map_err(Failure::service)
}
