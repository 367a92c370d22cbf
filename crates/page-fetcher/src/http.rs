use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use routerwatch_core::config::RouterConfig;
use routerwatch_core::RouterWatchError;

use crate::{split_lines, PageSource};

/// Reads pages from the router's web UI using HTTP Basic Auth.
pub struct HttpPageReader {
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
    client: Option<Client>,
}

impl HttpPageReader {
    pub fn new(config: &RouterConfig) -> Self {
        let mut base_url = config.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            client: None,
        }
    }

    pub fn page_url(&self, page: &str) -> String {
        format!("{}{}", self.base_url, page.trim_start_matches('/'))
    }

    fn fetch(&self, client: &Client, page: &str) -> Result<String> {
        let url = self.page_url(page);
        let response = client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        let body = response.text().with_context(|| format!("read body of {url}"))?;
        Ok(body)
    }
}

impl PageSource for HttpPageReader {
    fn open(&mut self) -> Result<()> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| RouterWatchError::Connection(err.to_string()))?;
        debug!(base_url = %self.base_url, "router client ready");
        self.client = Some(client);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.client.is_some()
    }

    fn close(&mut self) {
        self.client = None;
    }

    fn read_page(&mut self, page: &str) -> Result<Vec<String>> {
        let Some(client) = self.client.as_ref() else {
            return Err(RouterWatchError::Connection("not connected".to_string()).into());
        };
        match self.fetch(client, page) {
            Ok(body) => Ok(split_lines(&body)),
            Err(err) => {
                warn!(page, error = %format!("{err:#}"), "page fetch failed; dropping connection");
                self.close();
                Err(RouterWatchError::Connection(format!("{err:#}")).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn config_for(base_url: &str) -> RouterConfig {
        RouterConfig {
            base_url: base_url.to_string(),
            username: "admin".to_string(),
            password: "sky".to_string(),
            timeout_secs: 5,
        }
    }

    /// Serves one canned response and hands back the raw request head.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = stream.read(&mut buf).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_page_url_joins_with_single_slash() {
        let reader = HttpPageReader::new(&config_for("http://192.168.0.1"));
        assert_eq!(reader.page_url("sky_system.html"), "http://192.168.0.1/sky_system.html");

        let reader = HttpPageReader::new(&config_for("http://192.168.0.1/"));
        assert_eq!(reader.page_url("/sky_system.html"), "http://192.168.0.1/sky_system.html");
    }

    #[test]
    fn test_read_before_open_fails() {
        let mut reader = HttpPageReader::new(&config_for("http://192.168.0.1"));
        assert!(!reader.is_open());
        assert!(reader.read_page("sky_system.html").is_err());
    }

    #[test]
    fn test_fetch_sends_basic_auth_and_splits_lines() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 12\r\nConnection: close\r\n\r\nline1\nline2\n",
        );
        let mut reader = HttpPageReader::new(&config_for(&base));
        reader.open().unwrap();

        let lines = reader.read_page("sky_system.html").unwrap();
        assert_eq!(lines, vec!["line1", "line2"]);
        assert!(reader.is_open());

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /sky_system.html "));
        // base64("admin:sky")
        assert!(request.to_lowercase().contains("authorization: basic ywrtaw46c2t5"));
    }

    #[test]
    fn test_auth_failure_drops_connection() {
        let (base, server) = serve_once(
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let mut reader = HttpPageReader::new(&config_for(&base));
        reader.open().unwrap();

        assert!(reader.read_page("sky_system.html").is_err());
        assert!(!reader.is_open());
        server.join().unwrap();
    }
}
