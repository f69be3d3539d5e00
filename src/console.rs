//! Development mode: run one lookup and print the replies instead of posting
//! them to Discord.

use crate::AppService;
use async_trait::async_trait;
use surf_bot_lib::handler::{DayReport, Replier, Reply, SurfCommand};

struct StdoutReplier;

#[async_trait]
impl Replier for StdoutReplier {
    async fn send(&self, reply: Reply) -> anyhow::Result<()> {
        println!("{}", render(&reply));
        Ok(())
    }
}

pub(crate) fn render(reply: &Reply) -> String {
    match reply {
        Reply::Text(text) => text.clone(),
        Reply::Day(DayReport {
            title,
            tides,
            forecast,
        }) => format!("== {title} ==\nTides: {tides}\n\nSurf forecast:\n{forecast}\n"),
    }
}

/// Run the pipeline for `spot` and print every reply to stdout
pub async fn run_lookup(service: &AppService, spot: &str) {
    let command = match spot.trim() {
        "" => SurfCommand::Usage,
        query => SurfCommand::Lookup(query.to_string()),
    };
    service.handle(command, &StdoutReplier).await;
}
