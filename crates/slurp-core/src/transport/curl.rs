//! libcurl-backed streaming transport.

use super::StreamTransport;
use crate::config::SlurpConfig;
use crate::request::{Method, SignedRequest};
use crate::retry::{StreamError, TransferStats};
use crate::watchdog::{IdleWatchdog, TickVerdict};
use curl::easy::Easy;
use std::io::Write;
use std::time::{Duration, Instant};

/// Per-handle transfer options.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self::from_config(&SlurpConfig::default())
    }
}

impl CurlOptions {
    pub fn from_config(cfg: &SlurpConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: cfg.connect_timeout(),
        }
    }
}

/// Owns one curl easy handle. The handle is reused across attempts until
/// `recreate` is called after a socket-level failure.
pub struct CurlTransport {
    easy: Easy,
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self {
            easy: Easy::new(),
            options,
        }
    }

    fn configure(&mut self, request: &SignedRequest) -> Result<(), curl::Error> {
        let easy = &mut self.easy;
        easy.url(&request.url)?;
        easy.useragent(&self.options.user_agent)?;
        // HTTP >= 400 becomes an error so the status can be classified.
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        // No overall timeout: a healthy stream runs for hours.
        easy.timeout(Duration::ZERO)?;
        easy.progress(true)?;
        match request.method {
            Method::Get => easy.get(true)?,
            Method::Post => {
                easy.post(true)?;
                easy.post_fields_copy(request.body.as_deref().unwrap_or("").as_bytes())?;
            }
        }
        Ok(())
    }
}

impl StreamTransport for CurlTransport {
    fn perform(
        &mut self,
        request: &SignedRequest,
        sink: &mut dyn Write,
        watchdog: &mut IdleWatchdog,
    ) -> Result<TransferStats, StreamError> {
        self.configure(request).map_err(StreamError::Curl)?;

        let mut bytes = 0u64;
        let mut sink_error: Option<std::io::Error> = None;
        let mut idle_abort: Option<Duration> = None;
        let mut last_dlnow = 0.0f64;

        let perform_result = {
            let mut transfer = self.easy.transfer();
            transfer
                .write_function(|data| {
                    match sink.write_all(data).and_then(|()| sink.flush()) {
                        Ok(()) => {
                            bytes += data.len() as u64;
                            Ok(data.len())
                        }
                        Err(e) => {
                            sink_error = Some(e);
                            Ok(0) // abort transfer
                        }
                    }
                })
                .map_err(StreamError::Curl)?;
            transfer
                .progress_function(|_dltotal, dlnow, _ultotal, _ulnow| {
                    // libcurl reports a running total; the watchdog wants per-tick bytes.
                    let delta = (dlnow - last_dlnow).max(0.0) as u64;
                    last_dlnow = dlnow;
                    match watchdog.on_progress_tick(delta, Instant::now()) {
                        TickVerdict::Continue => true,
                        TickVerdict::Abort { idle } => {
                            idle_abort = Some(idle);
                            false
                        }
                    }
                })
                .map_err(StreamError::Curl)?;
            transfer.perform()
        };

        if let Err(e) = perform_result {
            if e.is_aborted_by_callback() {
                if let Some(idle) = idle_abort {
                    return Err(StreamError::IdleTimeout { idle });
                }
            }
            if e.is_write_error() {
                if let Some(io_err) = sink_error {
                    return Err(StreamError::Sink(io_err));
                }
            }
            if e.is_http_returned_error() {
                let code = self.easy.response_code().map_err(StreamError::Curl)?;
                return Err(StreamError::Http(code));
            }
            return Err(StreamError::Curl(e));
        }

        let status = self.easy.response_code().map_err(StreamError::Curl)?;
        if !(200..300).contains(&status) {
            return Err(StreamError::Http(status));
        }
        Ok(TransferStats { bytes, status })
    }

    fn recreate(&mut self) {
        tracing::debug!("discarding transport handle");
        self.easy = Easy::new();
    }
}
