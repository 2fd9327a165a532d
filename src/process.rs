use std::fmt::Write;

use chrono::Local;
use reqwest::Client;

use crate::parse::parse_quotes;
use crate::request::fetch_page;
use crate::{error_time, info_time, Result};

pub use crate::parse::Quote;

/// Scrapes up to `max_pages` listing pages starting at `url`, following the "Next" link.
/// Zero pages means nothing is fetched.
///
/// Never returns an error: a failed request or parse is logged and ends the walk with
/// whatever was collected before it, so a failure on the first page gives an empty `Vec`.
/// "No quotes" is a normal result, not a failure.
pub async fn scrape_quotes(url: &str, max_pages: usize) -> Vec<Quote> {
    let start_time = Local::now();
    let client = Client::new();

    info_time!("Started scraping {url}");

    let mut quotes = Vec::new();
    let mut next = Some(url.to_string());
    let mut page_num = 0;

    while let Some(page_url) = next.take() {
        if page_num >= max_pages {
            break;
        }
        page_num += 1;

        match scrape_page(&client, &page_url).await {
            Ok((found, next_url)) => {
                info_time!("Page {page_num}: {} quotes", found.len());
                quotes.extend(found);
                next = next_url;
            }
            Err(e) => {
                error_time!("Error fetching {}: {}", page_url, e);
                break;
            }
        }
    }

    info_time!(start_time, "Finished scraping, {} quotes total.", quotes.len());
    quotes
}

async fn scrape_page(client: &Client, url: &str) -> Result<(Vec<Quote>, Option<String>)> {
    let html = fetch_page(client, url).await?;
    let page = parse_quotes(html, url).await?;
    Ok((page.quotes, page.next.map(String::from)))
}

/// Numbered, one quote per line. An empty list gets a single "nothing found" line.
pub fn display_quotes(quotes: &[Quote]) -> String {
    if quotes.is_empty() {
        return "No quotes found or an error occurred.\n".to_string();
    }

    let mut out = String::from("\nExtracted Quotes:\n\n");
    for (i, q) in quotes.iter().enumerate() {
        let _ = writeln!(out, "{}. \"{}\" — {}", i + 1, q.text, q.author);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_numbers_from_one() {
        let quotes = vec![
            Quote {
                text: "A".into(),
                author: "X".into(),
            },
            Quote {
                text: "B".into(),
                author: "Y".into(),
            },
        ];
        assert_eq!(
            display_quotes(&quotes),
            "\nExtracted Quotes:\n\n1. \"A\" — X\n2. \"B\" — Y\n"
        );
    }

    #[test]
    fn display_empty() {
        assert_eq!(display_quotes(&[]), "No quotes found or an error occurred.\n");
    }

    #[tokio::test]
    async fn network_failure_degrades_to_empty() {
        let quotes = scrape_quotes("http://127.0.0.1:9/", 3).await;
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn zero_pages_fetches_nothing() {
        let quotes = scrape_quotes(crate::DEFAULT_QUOTES_URL, 0).await;
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn malformed_url_degrades_to_empty() {
        let quotes = scrape_quotes("definitely not a url", 1).await;
        assert!(quotes.is_empty());
    }
}
