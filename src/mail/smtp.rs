use anyhow::Context;
use lettre::{
    transport::smtp::{authentication::Credentials, response::Response},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::debug;
use tokio::runtime::Runtime;

use super::{MailError, MailTransport, OutgoingMail};
use crate::config::Config;

/// Sends over a STARTTLS submission session authenticated with the configured login
pub struct SmtpMailer {
    rt: Runtime,
    host: String,
    port: u16,
    credentials: Credentials,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
        Ok(Self {
            rt,
            host: config.host.clone(),
            port: config.port,
            credentials: Credentials::new(config.email.clone(), config.password.clone()),
        })
    }

    async fn do_send(&self, message: Message) -> Result<String, MailError> {
        // Built per send so a bad host is reported as a failed send, not at startup
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| MailError::Transport(format!("Failed to create SMTP transport: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build();
        debug!("Connecting to {}:{}", self.host, self.port);
        let response = transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(describe_response(&response))
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
        let message = Message::try_from(mail)?;
        self.rt.block_on(self.do_send(message))
    }
}

/// Formats the reply like `250 2.0.0 OK queued`
fn describe_response(response: &Response) -> String {
    let lines: Vec<&str> = response.message().collect();
    format!("{} {}", response.code(), lines.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mail::{EmailDraft, OutgoingMail},
        template::TemplateChoice,
    };
    use lettre::transport::smtp::response::{Category, Code, Detail, Severity};

    #[test]
    fn response_text() {
        let response = Response::new(
            Code::new(
                Severity::PositiveCompletion,
                Category::MailSystem,
                Detail::Zero,
            ),
            vec!["2.0.0 OK".to_string(), "queued as 1234".to_string()],
        );

        assert_eq!(describe_response(&response), "250 2.0.0 OK queued as 1234");
    }

    #[test]
    fn invalid_recipient_fails_before_connecting() {
        // Arrange
        let config = Config {
            email: "me@example.com".into(),
            password: String::new(),
            host: String::new(),
            username: String::new(),
            port: 587,
        };
        let mailer = SmtpMailer::new(&config).unwrap();
        let draft = EmailDraft::new(
            "s".into(),
            "b".into(),
            "nobody".into(),
            TemplateChoice::Default,
        );
        let mail = OutgoingMail::new(&config, &draft, draft.render());

        // Act
        let actual = mailer.send(&mail).unwrap_err();

        // Assert
        assert!(matches!(actual, MailError::InvalidAddress { .. }));
    }
}
