use std::fmt::Display;

use log::debug;

const BRAND: &str = "Siraj-RG";
const BRAND_URL: &str = "https://siraj-rg.com";
const COPYRIGHT_YEAR: u16 = 2025;

/// HTML layout wrapped around the message
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TemplateChoice {
    /// Accent banner with a call to action link
    #[default]
    Default,
    /// Plain card
    Normal,
    /// Card with the subject prefixed by "RE:"
    Reply,
}

impl TemplateChoice {
    pub const ALL: [TemplateChoice; 3] = [Self::Default, Self::Normal, Self::Reply];

    /// Recognises exactly the menu selectors "1", "2" and "3"
    pub fn parse(selector: &str) -> Option<Self> {
        match selector {
            "1" => Some(Self::Default),
            "2" => Some(Self::Normal),
            "3" => Some(Self::Reply),
            _ => None,
        }
    }

    pub fn from_selector(selector: &str) -> Self {
        Self::parse(selector).unwrap_or_default()
    }

    pub fn selector(&self) -> &'static str {
        match self {
            Self::Default => "1",
            Self::Normal => "2",
            Self::Reply => "3",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Default => "Default (with button)",
            Self::Normal => "Normal (simple)",
            Self::Reply => "Reply (for responses)",
        }
    }
}

impl Display for TemplateChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.selector(), self.description())
    }
}

/// Builds the complete HTML document for the email
///
/// Subject and message are inserted as is, markup in them is NOT escaped and
/// ends up in the document. Line breaks in the message become `<br>`.
pub fn render(choice: TemplateChoice, subject: &str, message: &str) -> String {
    debug!("Rendering template {choice}");
    let body = message.replace('\n', "<br>");
    match choice {
        TemplateChoice::Default => default_layout(subject, &body),
        TemplateChoice::Normal => normal_layout(subject, &body),
        TemplateChoice::Reply => reply_layout(subject, &body),
    }
}

/// Same as [`render`] but takes the raw menu input, unknown values use the default layout
pub fn render_selector(selector: &str, subject: &str, message: &str) -> String {
    render(TemplateChoice::from_selector(selector), subject, message)
}

fn default_layout(subject: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{subject}</title>
</head>
<body style="margin:0; padding:0; background-color:#000000; font-family:Arial, sans-serif; color:#ffffff;">
  <table align="center" border="0" cellpadding="0" cellspacing="0" width="100%" style="max-width:600px;">
    <tr>
      <td align="center" style="padding:40px 20px; background:linear-gradient(135deg, #2b0033, #1a002e); border-bottom:4px solid #ff00ff;">
        <h1 style="font-size:28px; color:#00ffff; text-shadow: 0 0 5px #00ffff, 0 0 10px #ff00ff;">{subject}</h1>
        <p style="font-size:16px; line-height:1.6; color:#cccccc;">
          {body}
        </p>
        <a href="{BRAND_URL}" style="display:inline-block; margin-top:25px; padding:12px 30px; background-color:#ff00ff; color:#000000; text-decoration:none; font-weight:bold; border-radius:5px; box-shadow:0 0 10px #ff00ff;">
          🌐 Visit Our Website
        </a>
      </td>
    </tr>
    <tr>
      <td align="center" style="padding:15px; font-size:12px; background-color:#0d001a; color:#888888;">
        &copy; {COPYRIGHT_YEAR} {BRAND}. All rights reserved.
      </td>
    </tr>
  </table>
</body>
</html>
"##
    )
}

fn normal_layout(subject: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{subject}</title>
</head>
<body style="margin:0; padding:0; background-color:#000000; font-family:Arial, sans-serif; color:#ffffff;">
  <table align="center" border="0" cellpadding="0" cellspacing="0" width="100%" style="max-width:600px;">
    <tr>
      <td align="center" style="padding:30px 20px; background-color:#1a1a1a;">
        <h2 style="color:#ffffff; margin-bottom: 10px;">{subject}</h2>
        <p style="font-size:16px; line-height:1.5; color:#cccccc; margin:0;">
          {body}
        </p>
      </td>
    </tr>
    <tr>
      <td align="center" style="padding:15px; font-size:12px; color:#555555;">
        &copy; {COPYRIGHT_YEAR} {BRAND}. All rights reserved.
      </td>
    </tr>
  </table>
</body>
</html>
"##
    )
}

fn reply_layout(subject: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{subject}</title>
</head>
<body style="margin:0; padding:0; background-color:#000000; font-family:Arial, sans-serif; color:#ffffff;">
  <table align="center" border="0" cellpadding="0" cellspacing="0" width="100%" style="max-width:600px;">
    <tr>
      <td align="center" style="padding:25px 20px; background-color:#1c1c1c;">
        <h2 style="color:#ff4444; margin-bottom: 5px;">RE: {subject}</h2>
        <p style="font-size:16px; line-height:1.5; color:#cccccc; border-top: 1px solid #333; padding-top: 15px;">
          {body}
        </p>
      </td>
    </tr>
    <tr>
      <td align="center" style="padding:10px; font-size:12px; color:#444444;">
        &copy; {COPYRIGHT_YEAR} {BRAND}. <em>Confidential</em>
      </td>
    </tr>
  </table>
</body>
</html>
"##
    )
}
