#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Delivery error: {0}")]
    Delivery(String),
}
