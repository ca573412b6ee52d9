//! Echo bot example
//!
//! Connects to the server named in a TOML settings file, joins the listed
//! channels and echoes anything addressed to it.
//!
//! ```text
//! cargo run --example echo_bot -- bot.toml
//! ```
//!
//! with `bot.toml` like:
//!
//! ```toml
//! uri = "irc://irc.libera.chat:+6697/slirc-test"
//!
//! [identity]
//! nick = "slirc_echo"
//! ident = "echo"
//! gecos = "slirc echo bot"
//!
//! [client]
//! callback_timeout = 300
//! log_raw_sockets = true
//! ```

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use slirc_client::{
    async_trait, logging, Client, ClientConfig, ClientIdentity, Commands, Message, MessageHandler,
};

#[derive(Debug, Deserialize)]
struct Settings {
    uri: String,
    identity: ClientIdentity,
    #[serde(default)]
    client: ClientConfig,
}

struct EchoBot {
    nick: String,
    echoed: usize,
}

#[async_trait]
impl MessageHandler for EchoBot {
    async fn on_message(&mut self, commands: &mut Commands<'_>, message: Option<&Message>) {
        let Some(msg) = message else {
            println!("idle, {} lines echoed so far", self.echoed);
            return;
        };

        let result = match msg.command.as_str() {
            "PRIVMSG" => {
                let (Some(target), Some(text)) = (msg.param(0), msg.param(1)) else {
                    return;
                };
                // Private messages go back to the sender.
                let reply_to = if target == self.nick { msg.nick() } else { target };

                if let Some(rest) = text.strip_prefix("!echo ") {
                    let sent = commands.privmsg(reply_to, rest).await;
                    if sent.is_ok() {
                        self.echoed += 1;
                    }
                    sent
                } else if text == "!channels" {
                    let mut joined: Vec<&str> =
                        commands.channels().current().iter().map(String::as_str).collect();
                    joined.sort_unstable();
                    let line = format!("in: {}", joined.join(" "));
                    commands.notice(reply_to, &line).await
                } else if text == "!quit" {
                    commands.quit("asked to leave").await
                } else {
                    Ok(())
                }
            }
            "INVITE" => match msg.param(1) {
                Some(channel) => commands.join(channel).await,
                None => Ok(()),
            },
            "KICK" if msg.param(1) == Some(self.nick.as_str()) => match msg.param(0) {
                Some(channel) => commands.join(channel).await,
                None => Ok(()),
            },
            _ => Ok(()),
        };

        if let Err(e) = result {
            warn!(command = %msg.command, from = %msg.nick(), error = %e, "reply failed");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bot.toml".to_string());
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let settings: Settings =
        toml::from_str(&content).with_context(|| format!("parsing {}", path))?;

    logging::init(&settings.client)
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))?;

    let bot = EchoBot {
        nick: settings.identity.nick.clone(),
        echoed: 0,
    };
    let client = Client::new(&settings.uri, settings.identity, settings.client, bot)?;
    let session = client.connect().await?;
    session.run().await?;

    Ok(())
}
