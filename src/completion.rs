use crate::error::ServiceError;

/// Single-shot text completion: one prompt in, one reply out.
/// Timeouts and retries are the implementor's business.
pub trait Completion: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

impl<F> Completion for F
where
    F: Fn(&str) -> Result<String, ServiceError> + Send + Sync,
{
    fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self(prompt)
    }
}
