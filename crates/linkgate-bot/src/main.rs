use dotenvy::dotenv;
use linkgate_core::config::GateSettings;
use linkgate_transport_telegram::runner::run_bot;
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting the bot token from log output
struct RedactionPatterns {
    api_url: Regex,
    bare_token: Regex,
}

impl RedactionPatterns {
    /// Initialize all regex patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // https://api.telegram.org/bot<token>/getChatMember
            api_url: Regex::new(r"(https?://[^/\s]+/bot)[0-9]+:[A-Za-z0-9_-]+")?,
            // No trailing \b: the secret may end in '-'
            bare_token: Regex::new(r"\b[0-9]{8,10}:[A-Za-z0-9_-]{35}")?,
        })
    }

    fn redact(&self, input: &str) -> String {
        let output = self.api_url.replace_all(input, "$1[TELEGRAM_TOKEN]");
        self.bare_token
            .replace_all(&output, "[TELEGRAM_TOKEN]")
            .into_owned()
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // Report the original length even though the redacted text may differ
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<F> RedactingMakeWriter<F> {
    const fn new(make_inner: F, patterns: Arc<RedactionPatterns>) -> Self {
        Self {
            make_inner,
            patterns,
        }
    }
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Redaction must be ready before the first log line
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting Linkgate TG Bot...");

    let settings = init_settings();

    if let Err(e) = run_bot(settings).await {
        error!("Bot failed to start: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(patterns: Arc<RedactionPatterns>) {
    let make_writer = RedactingMakeWriter::new(io::stderr, patterns);

    let debug_mode = std::env::var("DEBUG_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let filter = if debug_mode {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "linkgate_core=info,linkgate_transport_telegram=info,linkgate_bot=info,teloxide=warn,hyper=warn,reqwest=warn,tokio=warn",
            )
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

fn init_settings() -> Arc<GateSettings> {
    match GateSettings::new() {
        Ok(settings) => {
            info!("Configuration loaded successfully.");
            Arc::new(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "1234567890:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw1";

    #[test]
    fn test_redacts_token_in_api_url() -> Result<(), regex::Error> {
        let patterns = RedactionPatterns::new()?;
        let line = format!("error sending request for url (https://api.telegram.org/bot{TOKEN}/getChatMember)");

        let redacted = patterns.redact(&line);

        assert!(!redacted.contains(TOKEN));
        assert!(redacted.contains("https://api.telegram.org/bot[TELEGRAM_TOKEN]/getChatMember"));
        Ok(())
    }

    #[test]
    fn test_redacts_bare_token() -> Result<(), regex::Error> {
        let patterns = RedactionPatterns::new()?;
        let redacted = patterns.redact(&format!("BOT_TOKEN={TOKEN} loaded"));

        assert_eq!(redacted, "BOT_TOKEN=[TELEGRAM_TOKEN] loaded");
        Ok(())
    }

    #[test]
    fn test_redacts_token_ending_in_dash() -> Result<(), regex::Error> {
        let patterns = RedactionPatterns::new()?;
        let token = "1234567890:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw-";

        let mid_line = patterns.redact(&format!("BOT_TOKEN={token} loaded"));
        let end_of_line = patterns.redact(&format!("BOT_TOKEN={token}"));

        assert_eq!(mid_line, "BOT_TOKEN=[TELEGRAM_TOKEN] loaded");
        assert_eq!(end_of_line, "BOT_TOKEN=[TELEGRAM_TOKEN]");
        Ok(())
    }

    #[test]
    fn test_leaves_plain_text_alone() -> Result<(), regex::Error> {
        let patterns = RedactionPatterns::new()?;
        let line = "User 7918849670 initiated /start command.";

        assert_eq!(patterns.redact(line), line);
        Ok(())
    }

    #[test]
    fn test_redacting_writer_passes_through() -> Result<(), Box<dyn std::error::Error>> {
        let patterns = Arc::new(RedactionPatterns::new()?);
        let mut writer = RedactingWriter::new(Vec::new(), patterns);

        let input = format!("token {TOKEN}\n");
        let written = writer.write(input.as_bytes())?;

        assert_eq!(written, input.len());
        assert_eq!(String::from_utf8(writer.inner)?, "token [TELEGRAM_TOKEN]\n");
        Ok(())
    }
}
