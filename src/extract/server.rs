//! Server list fragment (`/ajax/episode/list` and `/ajax/episode/servers`).

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::field::{selector, Chain};
use crate::model::ServerEntry;

static SERVER_LINK: LazyLock<Selector> = LazyLock::new(|| selector(".nav-item a"));

// Movie lists use `data-linkid`, episode lists `data-id`.
static SERVER_ID: LazyLock<Chain> = LazyLock::new(|| {
    Chain::new()
        .own_attr("data-id")
        .own_attr("data-linkid")
});
static SERVER_NAME: LazyLock<Chain> =
    LazyLock::new(|| Chain::new().own_attr("title").all_text("span"));

pub fn extract_servers(document: &Html) -> Vec<ServerEntry> {
    document
        .select(&SERVER_LINK)
        .filter_map(|link| {
            let server_id = SERVER_ID.first_match(link)?;
            let name = SERVER_NAME.first_match(link).unwrap_or_default();
            Some(ServerEntry {
                server_id,
                name: strip_server_prefix(&name),
            })
        })
        .collect()
}

fn strip_server_prefix(name: &str) -> String {
    name.strip_prefix("Server ").unwrap_or(name).trim().to_string()
}
