//! FTP / FTPS upload sink
//!
//! Each delivery opens its own session: connect, optionally upgrade to
//! explicit TLS, log in, make sure the remote directory exists, upload,
//! quit. Sessions run on the blocking pool and are retried with a linear
//! backoff.

use anyhow::Context;
use async_trait::async_trait;
use feedsync_common::{FeedError, Result};
use std::io::Cursor;
use std::time::Duration;
use suppaftp::native_tls::TlsConnector;
use suppaftp::types::FileType;
use suppaftp::{Mode, NativeTlsConnector, NativeTlsFtpStream};
use tracing::{debug, info, warn};

use super::Sink;
use crate::config::FtpConfig;

/// Base delay between upload attempts; multiplied by the attempt number
pub const RETRY_DELAY_SECS: u64 = 5;

pub struct FtpSink {
    config: FtpConfig,
    retry_delay: Duration,
}

impl FtpSink {
    pub fn new(config: FtpConfig) -> Self {
        Self {
            config,
            retry_delay: Duration::from_secs(RETRY_DELAY_SECS),
        }
    }

    /// Override the base retry delay (tests use zero)
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn upload_sync(config: &FtpConfig, content: &[u8], name: &str) -> anyhow::Result<u64> {
        let address = config.address();
        debug!("Connecting to FTP server: {}", address);

        let mut ftp_stream =
            NativeTlsFtpStream::connect(&address).context("Failed to connect to FTP server")?;

        if config.secure {
            let tls = TlsConnector::new().context("Failed to build TLS connector")?;
            ftp_stream = ftp_stream
                .into_secure(NativeTlsConnector::from(tls), config.host.trim())
                .context("Failed to negotiate explicit TLS")?;
        }

        ftp_stream.set_mode(if config.extended_passive {
            Mode::ExtendedPassive
        } else {
            Mode::Passive
        });

        debug!("Logging in as: {}", config.user);
        ftp_stream
            .login(&config.user, &config.password)
            .context("Failed to login to FTP server")?;

        ftp_stream
            .transfer_type(FileType::Binary)
            .context("Failed to set binary mode")?;

        if let Some(dir) = config.remote_dir() {
            Self::ensure_dir(&mut ftp_stream, dir)?;
        }

        debug!("Uploading {} ({} bytes)", name, content.len());
        let mut reader = Cursor::new(content);
        let written = ftp_stream
            .put_file(name, &mut reader)
            .with_context(|| format!("Failed to upload {}", name))?;

        if let Err(e) = ftp_stream.quit() {
            warn!("Failed to quit FTP session gracefully: {}", e);
        }

        Ok(written)
    }

    /// Walk into `dir` one component at a time, creating what is missing.
    fn ensure_dir(ftp_stream: &mut NativeTlsFtpStream, dir: &str) -> anyhow::Result<()> {
        if dir.starts_with('/') {
            ftp_stream.cwd("/").context("Failed to change to root directory")?;
        }

        for part in dir_components(dir) {
            if ftp_stream.cwd(part).is_ok() {
                continue;
            }
            debug!("Creating remote directory: {}", part);
            ftp_stream
                .mkdir(part)
                .with_context(|| format!("Failed to create remote directory {}", part))?;
            ftp_stream
                .cwd(part)
                .with_context(|| format!("Failed to change to remote directory {}", part))?;
        }

        Ok(())
    }
}

fn dir_components(dir: &str) -> impl Iterator<Item = &str> {
    dir.split('/').map(str::trim).filter(|part| !part.is_empty() && *part != ".")
}

#[async_trait]
impl Sink for FtpSink {
    async fn deliver(&self, content: &str, destination_name: &str) -> Result<()> {
        let max_retries = self.config.max_retries.max(1);
        let data = content.as_bytes().to_vec();
        let name = destination_name.to_string();

        for attempt in 1..=max_retries {
            debug!("Upload attempt {}/{} for: {}", attempt, max_retries, name);

            match tokio::task::spawn_blocking({
                let config = self.config.clone();
                let data = data.clone();
                let name = name.clone();
                move || Self::upload_sync(&config, &data, &name)
            })
            .await
            {
                Ok(Ok(bytes)) => {
                    info!("Uploaded {} to {} ({} bytes)", name, self.describe(), bytes);
                    return Ok(());
                },
                Ok(Err(e)) => {
                    if attempt < max_retries {
                        let delay = self.retry_delay * attempt;
                        warn!(
                            "Upload attempt {}/{} failed: {:#}. Retrying in {:?}...",
                            attempt, max_retries, e, delay
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        return Err(FeedError::delivery(format!(
                            "{} after {} attempts: {:#}",
                            name, max_retries, e
                        )));
                    }
                },
                Err(e) => {
                    return Err(FeedError::delivery(format!("FTP upload task panicked: {}", e)));
                },
            }
        }

        Err(FeedError::delivery(format!("{}: no upload attempt was made", name)))
    }

    fn describe(&self) -> String {
        let scheme = if self.config.secure { "ftps" } else { "ftp" };
        match self.config.remote_dir() {
            Some(dir) => format!("{}://{}/{}", scheme, self.config.address(), dir.trim_start_matches('/')),
            None => format!("{}://{}", scheme, self.config.address()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn config(host: &str) -> FtpConfig {
        FtpConfig {
            host: host.to_string(),
            ..FtpConfig::default()
        }
    }

    #[test]
    fn test_dir_components() {
        let parts: Vec<_> = dir_components("/public_html//xml/./feeds/").collect();
        assert_eq!(parts, vec!["public_html", "xml", "feeds"]);
        assert_eq!(dir_components("").count(), 0);
    }

    #[test]
    fn test_describe() {
        let sink = FtpSink::new(FtpConfig {
            remote_dir: Some("/public_html/xml".to_string()),
            ..config("ftp.example.com")
        });
        assert_eq!(sink.describe(), "ftp://ftp.example.com:21/public_html/xml");

        let sink = FtpSink::new(FtpConfig {
            secure: true,
            port: 990,
            ..config("ftp.example.com")
        });
        assert_eq!(sink.describe(), "ftps://ftp.example.com:990");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_delivery_error() {
        // Port 9 on loopback is discard; nothing listens there in CI.
        let sink = FtpSink::new(FtpConfig {
            port: 9,
            max_retries: 2,
            ..config("127.0.0.1")
        })
        .with_retry_delay(Duration::ZERO);

        let err = sink.deliver("<products/>", "katalog.xml").await.unwrap_err();
        match err {
            FeedError::Delivery(msg) => assert!(msg.contains("after 2 attempts"), "{msg}"),
            other => panic!("expected delivery error, got {other:?}"),
        }
    }
}
