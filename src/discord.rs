//! Discord gateway glue: routes message events to the forecast service and
//! renders replies as plain messages or embeds.

use crate::AppService;
use anyhow::Context as _;
use async_trait::async_trait;
use serenity::all::{
    ChannelId, Context, CreateEmbed, CreateMessage, EventHandler, GatewayIntents, Http, Message,
    Ready,
};
use serenity::Client;
use std::sync::Arc;
use surf_bot_lib::handler::{DayReport, Replier, Reply, SurfCommand};

/// Discord's limit for an embed field value
const EMBED_FIELD_LIMIT: usize = 1024;

/// Separator between forecast windows in the composed text
const BLOCK_SEPARATOR: &str = "\n\n";

/// Replies into the channel the command came from
struct ChannelReplier {
    http: Arc<Http>,
    channel: ChannelId,
}

#[async_trait]
impl Replier for ChannelReplier {
    async fn send(&self, reply: Reply) -> anyhow::Result<()> {
        match reply {
            Reply::Text(text) => {
                self.channel.say(&self.http, text).await?;
            }
            Reply::Day(day) => {
                let message = CreateMessage::new().embed(day_embed(day));
                self.channel.send_message(&self.http, message).await?;
            }
        }
        Ok(())
    }
}

fn day_embed(day: DayReport) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(day.title)
        .field("Tides", truncate_field(day.tides), false);

    forecast_fields(&day.forecast)
        .into_iter()
        .fold(embed, |embed, chunk| embed.field("Surf forecast", chunk, false))
}

/// Pack the forecast's per-window blocks into field values within the limit.
///
/// Blocks are never split across fields, so every window is posted whole.
pub(crate) fn forecast_fields(forecast: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();

    for block in forecast.split(BLOCK_SEPARATOR) {
        let block = truncate_field(block.to_string());
        let joined_len = current.chars().count() + BLOCK_SEPARATOR.len() + block.chars().count();

        if current.is_empty() {
            current = block;
        } else if joined_len <= EMBED_FIELD_LIMIT {
            current.push_str(BLOCK_SEPARATOR);
            current.push_str(&block);
        } else {
            fields.push(std::mem::replace(&mut current, block));
        }
    }

    if !current.is_empty() {
        fields.push(current);
    }
    fields
}

/// Cut a field value to Discord's limit on a line boundary
pub(crate) fn truncate_field(value: String) -> String {
    if value.chars().count() <= EMBED_FIELD_LIMIT {
        return value;
    }

    let mut out = String::new();
    for line in value.lines() {
        // +1 for the newline, +1 for the trailing ellipsis
        if out.chars().count() + line.chars().count() + 2 > EMBED_FIELD_LIMIT {
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.push('…');
    out
}

struct Handler {
    service: Arc<AppService>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let prefix = &self.service.config().bot.command_prefix;
        let Some(command) = SurfCommand::parse(&msg.content, prefix) else {
            return;
        };

        tracing::info!(
            author = %msg.author.name,
            channel = %msg.channel_id,
            ?command,
            "surf command received"
        );

        let replier = ChannelReplier {
            http: ctx.http.clone(),
            channel: msg.channel_id,
        };
        self.service.handle(command, &replier).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "connected to Discord"
        );
    }
}

/// Connect to the gateway and serve commands until Ctrl-C.
pub async fn run(token: String, service: Arc<AppService>) -> anyhow::Result<()> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler { service })
        .await
        .context("failed to create Discord client")?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not listen for Ctrl-C");
            return;
        }
        tracing::info!("shutdown requested, closing gateway connections");
        shard_manager.shutdown_all().await;
    });

    client
        .start()
        .await
        .context("Discord client stopped with an error")?;

    tracing::info!("bot stopped");
    Ok(())
}
