mod cli;
mod config;
mod line_reader;
mod logging;
mod mail;
mod template;
mod terminal;
mod utils;

use std::io::{stdout, Write};

use anyhow::Context;
use log::{debug, warn};

pub use cli::{Cli, LogLevel};
pub use config::Config;
pub use line_reader::{Console, Edit, InputInterrupted, Key, LineEditor, LineState};
pub use logging::init_logging;
pub use mail::{
    dispatch, EmailDraft, MailError, MailTransport, OutgoingMail, SendOutcome, SmtpMailer,
};
pub use template::{render, render_selector, TemplateChoice};
pub use terminal::{KeySource, RawModeGuard, TerminalKeys};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.get_config_path() {
        Some(path) => Config::load_from(&path)?,
        None => Config::from_env(),
    };
    let mailer = SmtpMailer::new(&config).context("Failed to set up mailer")?;
    let mut console = Console::new(TerminalKeys::new(), stdout());
    let outcome = run_session(&mut console, &mailer, &config)?;
    debug!("Session finished: {outcome:?}");
    Ok(())
}

/// Collects one email from the user and makes a single attempt to send it
///
/// A failed send is part of the returned outcome, only input and output problems are errors.
pub fn run_session<K, W, T>(
    console: &mut Console<K, W>,
    transport: &T,
    config: &Config,
) -> anyhow::Result<SendOutcome>
where
    K: KeySource,
    W: Write,
    T: MailTransport + ?Sized,
{
    console.say("Welcome to the Email Sender!")?;
    console.say("Please select an email template:")?;
    for choice in TemplateChoice::ALL {
        console.say(&choice.to_string())?;
    }

    let selector = console.read_line("Enter choice (1/2/3): ")?;
    let template = match TemplateChoice::parse(&selector) {
        Some(choice) => choice,
        None => {
            warn!("Invalid template choice {selector:?}");
            console.say("Invalid choice. Defaulting to Template 1.")?;
            TemplateChoice::Default
        }
    };

    console.say(
        "\nPlease enter the email details.\nUse Ctrl+J or paste for new lines. Press Enter to submit.\n",
    )?;
    let subject = console.read_line("Subject: ")?;
    let message = console.read_line("Message (multi-line): ")?;
    let recipient = console.read_line("Recipient email: ")?;

    let draft = EmailDraft::new(subject, message, recipient, template);
    let html = draft.render();
    let outcome = dispatch(transport, config, &draft, html);
    console.say(&outcome.to_string())?;
    Ok(outcome)
}
