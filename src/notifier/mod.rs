use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::extension::ClientId;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpConfig;
use crate::error::DigestError;
use crate::report::{BodyKind, RenderedDigest};

#[async_trait]
pub trait DigestMailer: Send + Sync {
    /// Sends exactly one message. No retry.
    async fn deliver(&self, recipient: &str, digest: &RenderedDigest) -> Result<(), DigestError>;
}

/// STARTTLS relay with PLAIN authentication.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    relay: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, DigestError> {
        let sender = parse_mailbox(config.sender())?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| DigestError::Delivery(format!("smtp relay {}: {}", config.host, e)))?
            .port(config.port)
            .hello_name(ClientId::Domain(config.domain.clone()))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain])
            .build();

        Ok(Self {
            transport,
            sender,
            relay: format!("{}:{}", config.host, config.port),
        })
    }
}

#[async_trait]
impl DigestMailer for SmtpMailer {
    async fn deliver(&self, recipient: &str, digest: &RenderedDigest) -> Result<(), DigestError> {
        let message = build_message(&self.sender, recipient, digest)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DigestError::Delivery(format!("send via {} failed: {}", self.relay, e)))?;

        info!(
            %recipient,
            relay = %self.relay,
            code = %response.code(),
            "Successfully sent HyperDigest"
        );
        Ok(())
    }
}

pub fn build_message(
    sender: &Mailbox,
    recipient: &str,
    digest: &RenderedDigest,
) -> Result<Message, DigestError> {
    let content_type = match digest.kind {
        BodyKind::Html => ContentType::TEXT_HTML,
        BodyKind::PlainText => ContentType::TEXT_PLAIN,
    };

    Message::builder()
        .from(sender.clone())
        .to(parse_mailbox(recipient)?)
        .subject(digest.subject.clone())
        .header(content_type)
        .body(digest.body.clone())
        .map_err(|e| DigestError::Delivery(format!("failed to build message: {}", e)))
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, DigestError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| DigestError::Delivery(format!("invalid address {:?}: {}", raw, e)))
}
