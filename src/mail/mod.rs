mod smtp;

use std::fmt::Display;

use lettre::{
    message::{header::ContentType, Mailbox, Mailboxes},
    Address, Message,
};
use log::{debug, info, warn};

pub use smtp::SmtpMailer;

use crate::{config::Config, template, template::TemplateChoice, utils::make_single_line};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid {role} address {address:?}: {source}")]
    InvalidAddress {
        role: &'static str,
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(String),
}

/// Everything the user entered for one email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    subject: String,
    body: String,
    recipient: String,
    template: TemplateChoice,
}

impl EmailDraft {
    pub fn new(subject: String, body: String, recipient: String, template: TemplateChoice) -> Self {
        Self {
            subject,
            body,
            recipient,
            template,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn render(&self) -> String {
        template::render(self.template, &self.subject, &self.body)
    }
}

/// The envelope and content handed to a [`MailTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub sender_name: String,
    pub sender_address: String,
    pub recipient: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingMail {
    pub fn new(config: &Config, draft: &EmailDraft, html: String) -> Self {
        Self {
            sender_name: config.username.clone(),
            sender_address: config.email.clone(),
            recipient: draft.recipient.clone(),
            subject: draft.subject.clone(),
            html,
        }
    }

    fn sender(&self) -> Result<Mailbox, MailError> {
        let address: Address =
            self.sender_address
                .trim()
                .parse()
                .map_err(|source| MailError::InvalidAddress {
                    role: "sender",
                    address: self.sender_address.clone(),
                    source,
                })?;
        let name = Some(self.sender_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Ok(Mailbox::new(name, address))
    }

    /// Accepts a comma separated list of receivers
    fn recipients(&self) -> Result<Mailboxes, MailError> {
        self.recipient
            .trim()
            .parse()
            .map_err(|source| MailError::InvalidAddress {
                role: "recipient",
                address: self.recipient.clone(),
                source,
            })
    }
}

impl TryFrom<&OutgoingMail> for Message {
    type Error = MailError;

    fn try_from(mail: &OutgoingMail) -> Result<Self, Self::Error> {
        let mut builder = Message::builder().from(mail.sender()?);
        for recipient in mail.recipients()? {
            builder = builder.to(recipient);
        }
        let message = builder
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())?;
        Ok(message)
    }
}

/// Delivers a single message, returning the provider's response text
pub trait MailTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<String, MailError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { response: String },
    Failed { reason: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

impl Display for SendOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sent { response } => write!(f, "\n✅ Email sent successfully! {response}"),
            Self::Failed { reason } => write!(f, "❌ Error sending email: {reason}"),
        }
    }
}

/// Makes exactly one send attempt, a failure is reported in the outcome and never retried
pub fn dispatch<T: MailTransport + ?Sized>(
    transport: &T,
    config: &Config,
    draft: &EmailDraft,
    html: String,
) -> SendOutcome {
    let mail = OutgoingMail::new(config, draft, html);
    info!(
        "Sending {:?} to {:?} via {}:{}",
        make_single_line(&mail.subject),
        mail.recipient,
        config.host,
        config.port
    );
    debug!("Message body: {}", make_single_line(draft.body()));
    match transport.send(&mail) {
        Ok(response) => {
            info!("Email accepted: {response}");
            SendOutcome::Sent { response }
        }
        Err(e) => {
            warn!("Failed to send email: {e}");
            SendOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
