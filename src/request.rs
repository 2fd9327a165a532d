use reqwest::Client;

use crate::{info_time, Result};

/// Requests a page and returns a `Result<String>` containing the HTML.
/// One attempt only, a non-2xx status counts as an error.
pub(crate) async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    info_time!("Requesting page: {url}");
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let client = Client::new();
        // Port 9 (discard) is closed on any sane test box.
        let res = fetch_page(&client, "http://127.0.0.1:9/").await;
        assert!(res.is_err());
    }
}
