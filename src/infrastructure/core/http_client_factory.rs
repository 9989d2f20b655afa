use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the shared HTTP client for feed and quote requests.
    ///
    /// No retry middleware: a failed request is simply retried on the next run.
    pub fn create_client(timeout: Duration) -> Client {
        Client::builder()
            .user_agent(concat!("stocknews/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        // Building must not panic even for a zero timeout
        let _client = HttpClientFactory::create_client(Duration::from_secs(0));
        let _client = HttpClientFactory::create_client(Duration::from_secs(30));
    }
}
