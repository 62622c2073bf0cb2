//! Asynchronous acquisition of the parsing engine.
//!
//! The engine is built off the async runtime and handed out as a shared handle. A
//! [`ParserHandle`] makes sure that happens at most once per process, retrying failed
//! loads according to [`BridgeConfig`].

use crate::config::{BridgeConfig, ParserConfig};
use crate::error::{FountviewError, Result};
use crate::parser::engine::{FountainParser, ScreenplayParser};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Smoke-test document parsed once at load time.
const SELF_TEST: &str = "INT. LAB - DAY\n\nKANE\nHello.\n";

/// Source of a ready-to-use parser.
#[async_trait]
pub trait ParserLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn ScreenplayParser>>;
}

/// Builds a [`FountainParser`] on the blocking pool and verifies it on a known document.
pub struct FountainLoader {
    config: ParserConfig,
    delay: Duration,
}

impl FountainLoader {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            delay: Duration::ZERO,
        }
    }

    /// Hold the engine back for `delay` before handing it out.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ParserLoader for FountainLoader {
    async fn load(&self) -> Result<Arc<dyn ScreenplayParser>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let config = self.config.clone();
        let parser = tokio::task::spawn_blocking(move || {
            let parser = FountainParser::new(config);
            parser.parse(SELF_TEST).map(|_| parser)
        })
        .await
        .map_err(|e| FountviewError::parser_load(format!("loader task failed: {e}")))?
        .map_err(|e| FountviewError::parser_load(format!("self-test failed: {e}")))?;

        Ok(Arc::new(parser))
    }
}

/// Process-wide, load-once parser slot.
pub struct ParserHandle {
    cell: OnceCell<Arc<dyn ScreenplayParser>>,
    loader: Arc<dyn ParserLoader>,
    retries: u32,
    backoff: Duration,
}

impl ParserHandle {
    pub fn new(loader: Arc<dyn ParserLoader>, config: &BridgeConfig) -> Self {
        Self {
            cell: OnceCell::new(),
            loader,
            retries: config.load_retries,
            backoff: config.retry_backoff(),
        }
    }

    /// The parser, if it has been loaded.
    pub fn get(&self) -> Option<Arc<dyn ScreenplayParser>> {
        self.cell.get().cloned()
    }

    /// Return the loaded parser, loading it first if nobody has yet.
    ///
    /// Concurrent callers share a single load. A failed load leaves the slot empty.
    pub async fn get_or_load(&self) -> Result<Arc<dyn ScreenplayParser>> {
        self.cell
            .get_or_try_init(|| self.load_with_retry())
            .await
            .cloned()
    }

    async fn load_with_retry(&self) -> Result<Arc<dyn ScreenplayParser>> {
        let mut attempt = 0;
        loop {
            match self.loader.load().await {
                Ok(parser) => {
                    log::info!(
                        "parser '{}' loaded after {} attempt(s)",
                        parser.name(),
                        attempt + 1
                    );
                    return Ok(parser);
                }
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    let wait = self.backoff * attempt;
                    log::warn!("parser load attempt {attempt} failed: {err}; retrying in {wait:?}");
                    tokio::time::sleep(wait).await;
                }
                Err(err) => {
                    return Err(FountviewError::parser_load(format!(
                        "gave up after {} attempt(s): {err}",
                        attempt + 1
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyLoader {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ParserLoader for FlakyLoader {
        async fn load(&self) -> Result<Arc<dyn ScreenplayParser>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(FountviewError::parser_load("not yet"))
            } else {
                Ok(Arc::new(FountainParser::default()))
            }
        }
    }

    fn config(retries: u32) -> BridgeConfig {
        BridgeConfig {
            load_retries: retries,
            retry_backoff_ms: 1,
            load_delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn fountain_loader_produces_working_parser() {
        let parser = FountainLoader::new(ParserConfig::default())
            .load()
            .await
            .unwrap();
        assert_eq!(parser.name(), "fountain");
        assert!(parser.parse("KANE\nHi.\n").unwrap().contains("character"));
    }

    #[tokio::test]
    async fn handle_loads_once() {
        let loader = Arc::new(FlakyLoader {
            failures: 0,
            calls: AtomicU32::new(0),
        });
        let handle = ParserHandle::new(loader.clone(), &config(0));

        assert!(handle.get().is_none());
        let first = handle.get_or_load().await.unwrap();
        let second = handle.get_or_load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(handle.get().is_some());
    }

    #[tokio::test]
    async fn handle_retries_until_success() {
        let loader = Arc::new(FlakyLoader {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let handle = ParserHandle::new(loader.clone(), &config(2));

        assert!(handle.get_or_load().await.is_ok());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn handle_gives_up_after_retries() {
        let loader = Arc::new(FlakyLoader {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        });
        let handle = ParserHandle::new(loader.clone(), &config(1));

        let err = handle.get_or_load().await.err().unwrap();
        assert!(matches!(err, FountviewError::ParserLoad { .. }));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
        assert!(handle.get().is_none());
    }
}
