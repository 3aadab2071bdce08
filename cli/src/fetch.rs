//! Page retrieval for the `url` subcommand.

use docmark::{Error, FetchedPage, Result};

const USER_AGENT: &str = concat!("docmark/", env!("CARGO_PKG_VERSION"));

/// Fetch a page over HTTP and wrap it for conversion.
///
/// Network failures map onto the library's error taxonomy so the top-level
/// handler can print a specific message: DNS resolution, refused
/// connections, and non-success HTTP statuses each get their own case.
pub fn fetch_page(url: &str) -> Result<FetchedPage> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::Input(format!(
            "URL must use the http or https scheme: {}",
            url
        )));
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Retrieval(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| classify_request_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let html = response
        .text()
        .map_err(|e| Error::Retrieval(e.to_string()))?;
    log::debug!("fetched {} bytes from {}", html.len(), url);

    Ok(FetchedPage {
        url: url.to_string(),
        html,
        // Article extraction is an external concern; the conversion falls
        // back to rendering the whole document.
        article: None,
    })
}

fn classify_request_error(url: &str, err: &reqwest::Error) -> Error {
    // Walk the source chain looking for the underlying socket error.
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            if io_err.kind() == std::io::ErrorKind::ConnectionRefused {
                return Error::ConnectionRefused(url.to_string());
            }
        }
        source = cause.source();
    }

    let message = err.to_string();
    if message.contains("dns") || message.contains("resolve") {
        Error::DnsFailure(url.to_string())
    } else if message.contains("refused") {
        Error::ConnectionRefused(url.to_string())
    } else {
        Error::Retrieval(message)
    }
}
