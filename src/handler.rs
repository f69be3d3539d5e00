//! # Surf Command Handling
//!
//! Parses the chat command and runs the forecast pipeline for it:
//! search → first spot → forecast → group by day → tides per day → compose.
//!
//! Every failure is caught here, logged, and turned into one chat message. Nothing
//! in this module panics or tears down the bot on a bad API response.

use crate::aggregate::{group_by_day, tide_windows};
use crate::compose::{compose_day_title, compose_forecast_text, compose_tide_text};
use crate::config::Config;
use crate::msw_client::{ClientError, SurfApi};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failures while building a surf report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Network failure or non-success HTTP status from the forecast API
    #[error("remote service error: {0}")]
    RemoteService(String),

    /// Forecast API answered with an unexpected JSON shape
    #[error("malformed {endpoint} response: {detail}")]
    MalformedResponse {
        endpoint: &'static str,
        detail: String,
    },

    /// Spot search matched nothing
    #[error("no spots found for {0:?}")]
    NoResults(String),

    /// Tide response held zero or several result sets.
    ///
    /// Only raised by `compose::single_result_set`; `compose_tide_text` turns it
    /// into the tide placeholder, so it is logged but never reaches `handle`.
    #[error("expected one tide result set, got {0}")]
    AnomalousTideData(usize),

    /// The chat platform rejected a reply
    #[error("sending reply failed: {0}")]
    Reply(String),
}

impl From<ClientError> for ReportError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::RemoteService(msg) => ReportError::RemoteService(msg),
            ClientError::MalformedResponse { endpoint, source } => ReportError::MalformedResponse {
                endpoint,
                detail: source.to_string(),
            },
        }
    }
}

impl ReportError {
    /// Text shown in chat for this error
    pub fn user_message(&self) -> String {
        match self {
            ReportError::NoResults(query) => format!("No spots found for \"{query}\""),
            ReportError::RemoteService(_) => {
                "The surf forecast service isn't responding right now, try again later".to_string()
            }
            ReportError::MalformedResponse { .. } => {
                "The surf forecast service sent back something I couldn't read".to_string()
            }
            ReportError::AnomalousTideData(_) => "Tide data for that spot looks wrong".to_string(),
            ReportError::Reply(_) => "Couldn't send the forecast".to_string(),
        }
    }
}

/// A chat message addressed to the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfCommand {
    /// Prefix with nothing after it
    Usage,
    /// Prefix followed by a spot name
    Lookup(String),
}

impl SurfCommand {
    /// Parse a message, returning `None` when it isn't for the bot.
    ///
    /// The prefix must be followed by whitespace or the end of the message, so
    /// "!surfing" doesn't trigger "!surf".
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let rest = content.trim().strip_prefix(prefix)?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }

        let query = rest.trim();
        if query.is_empty() {
            Some(SurfCommand::Usage)
        } else {
            Some(SurfCommand::Lookup(query.to_string()))
        }
    }
}

/// Structured reply for one forecast day.
#[derive(Clone, Debug, PartialEq)]
pub struct DayReport {
    pub title: String,
    /// "Tides" field
    pub tides: String,
    /// "Surf forecast" field
    pub forecast: String,
}

/// Something the handler sends back to the chat.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Text(String),
    Day(DayReport),
}

/// Where replies go: a chat channel, stdout, or a test recorder.
#[async_trait]
pub trait Replier: Send + Sync {
    async fn send(&self, reply: Reply) -> anyhow::Result<()>;
}

/// Runs surf commands against a forecast API.
///
/// Holds only immutable state, so one instance can serve concurrent commands.
pub struct ForecastService<A> {
    api: A,
    config: Arc<Config>,
}

impl<A: SurfApi> ForecastService<A> {
    pub fn new(api: A, config: Arc<Config>) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Usage hint for an empty command
    pub fn usage(&self) -> String {
        format!(
            "Usage: {} <spot name>, e.g. {} porthcawl",
            self.config.bot.command_prefix, self.config.bot.command_prefix
        )
    }

    /// Run one command to completion, replying through `replier`.
    ///
    /// Errors are logged and reported to the user; they are never returned.
    pub async fn handle(&self, command: SurfCommand, replier: &dyn Replier) {
        let result = match &command {
            SurfCommand::Usage => send(replier, Reply::Text(self.usage())).await,
            SurfCommand::Lookup(query) => self.report(query, replier).await,
        };

        let Err(err) = result else {
            return;
        };

        match &err {
            ReportError::NoResults(query) => tracing::info!(%query, "no spots matched"),
            ReportError::Reply(_) => {
                tracing::error!(error = %err, ?command, "could not reply");
                return;
            }
            _ => tracing::error!(error = %err, ?command, "surf report failed"),
        }

        if let Err(e) = send(replier, Reply::Text(err.user_message())).await {
            tracing::error!(error = %e, "could not report failure to chat");
        }
    }

    async fn report(&self, query: &str, replier: &dyn Replier) -> Result<(), ReportError> {
        send(replier, Reply::Text(format!("Searching for {query}..."))).await?;

        let spots = self.api.search_spots(query).await?;
        let spot = spots
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::NoResults(query.to_string()))?;
        tracing::info!(spot_id = spot.id, spot = %spot.name, score = spot.score, "spot selected");

        send(replier, Reply::Text(format!("Showing forecast for {}", spot.name))).await?;

        let entries = self.api.get_forecast(spot.id).await?;
        let days = group_by_day(&entries);
        tracing::debug!(entries = entries.len(), days = days.len(), "forecast grouped");

        if days.is_empty() {
            return send(
                replier,
                Reply::Text(format!("No forecast available for {}", spot.name)),
            )
            .await;
        }

        for (day, (start, end)) in days.iter().zip(tide_windows(&days)) {
            let tides = self.api.get_tides(spot.id, start, end).await?;

            let report = DayReport {
                title: compose_day_title(day),
                tides: compose_tide_text(&tides),
                forecast: compose_forecast_text(day, &self.config.emoji),
            };
            send(replier, Reply::Day(report)).await?;
        }

        Ok(())
    }
}

async fn send(replier: &dyn Replier, reply: Reply) -> Result<(), ReportError> {
    replier
        .send(reply)
        .await
        .map_err(|e| ReportError::Reply(format!("{e:#}")))
}
