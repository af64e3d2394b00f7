//! chromiumoxide-backed sessions
//!
//! One Chrome process per session, each with its own profile directory.
//! Teardown order matters: close, wait for the process to exit, abort the
//! CDP handler, and only then remove the profile (Windows keeps files
//! locked until the process is gone).

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{BrowserSession, ListingHandle, SessionFactory};
use crate::browser_profile::create_unique_profile;
use crate::browser_setup::{WEBDRIVER_MASK_JS, launch_browser};
use crate::config::BrowserOptions;
use crate::error::SessionError;
use crate::model::Source;
use crate::utils::constants::DEFAULT_NAVIGATION_TIMEOUT;

const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Launches a fresh Chrome for every acquired session
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    cdp_timeout: Duration,
}

impl ChromeSessionFactory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cdp_timeout: DEFAULT_NAVIGATION_TIMEOUT,
        }
    }

    /// Timeout for individual CDP commands (navigation included)
    #[must_use]
    pub fn with_cdp_timeout(mut self, timeout: Duration) -> Self {
        self.cdp_timeout = timeout;
        self
    }
}

impl Default for ChromeSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn acquire(
        &self,
        source: Source,
        options: &BrowserOptions,
    ) -> Result<Box<dyn BrowserSession>, SessionError> {
        let session = ChromeSession::launch(source, options, self.cdp_timeout).await?;
        Ok(Box::new(session))
    }
}

/// Live Chrome session
pub struct ChromeSession {
    source: Source,
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    page: Option<Page>,
    user_data_dir: Option<PathBuf>,
}

impl ChromeSession {
    /// Launch Chrome and open a blank page with the webdriver mask installed
    pub async fn launch(
        source: Source,
        options: &BrowserOptions,
        cdp_timeout: Duration,
    ) -> Result<Self, SessionError> {
        let profile =
            create_unique_profile().map_err(|e| SessionError::Acquisition(format!("{e:#}")))?;

        let (browser, handler) = launch_browser(options, profile.path(), cdp_timeout)
            .await
            .map_err(|e| SessionError::Acquisition(format!("{e:#}")))?;

        let mut session = Self {
            source,
            browser: Some(browser),
            handler: Some(handler),
            page: None,
            user_data_dir: Some(profile.into_path()),
        };

        match session.open_page().await {
            Ok(page) => {
                session.page = Some(page);
                debug!(%source, "Chrome session ready");
                Ok(session)
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!(%source, "Failed to close half-initialized session: {}", close_err);
                }
                Err(SessionError::Acquisition(e.to_string()))
            }
        }
    }

    async fn open_page(&self) -> Result<Page, SessionError> {
        let browser = self.browser.as_ref().ok_or(SessionError::Closed)?;
        let page = browser.new_page("about:blank").await?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams {
            source: WEBDRIVER_MASK_JS.to_string(),
            include_command_line_api: None,
            world_name: None,
            run_immediately: None,
        })
        .await?;

        Ok(page)
    }

    fn page(&self) -> Result<&Page, SessionError> {
        self.page.as_ref().ok_or(SessionError::Closed)
    }

    fn cleanup_profile_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take()
            && let Err(e) = std::fs::remove_dir_all(&path)
        {
            warn!(
                "Failed to clean up profile directory {}: {}. Manual cleanup may be required.",
                path.display(),
                e
            );
        }
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        let page = self.page()?;
        page.goto(url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError> {
        self.page()?.evaluate(SCROLL_TO_BOTTOM_JS).await?;
        Ok(())
    }

    async fn has_element(&mut self, selector: &str) -> bool {
        match self.page() {
            Ok(page) => page.find_element(selector).await.is_ok(),
            Err(_) => false,
        }
    }

    async fn find_listings(
        &mut self,
        selector: &str,
    ) -> Result<Vec<Box<dyn ListingHandle>>, SessionError> {
        let elements = self.page()?.find_elements(selector).await?;
        Ok(elements
            .into_iter()
            .map(|element| Box::new(ChromeListing { element }) as Box<dyn ListingHandle>)
            .collect())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.page = None;

        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        let mut outcome = Ok(());

        if let Err(e) = browser.close().await {
            outcome = Err(SessionError::Driver(format!("close failed: {e}")));
        }

        // Wait for the process so the profile directory is no longer locked
        if let Err(e) = browser.wait().await
            && outcome.is_ok()
        {
            outcome = Err(SessionError::Driver(format!("wait failed: {e}")));
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        self.cleanup_profile_dir();
        debug!(source = %self.source, "Chrome session closed");
        outcome
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        // Browser's own Drop only signals the process, so Chrome can still
        // be writing to the profile. Leave it for the startup sweep.
        if self.browser.take().is_some() {
            if let Some(path) = self.user_data_dir.take() {
                warn!(
                    source = %self.source,
                    "ChromeSession dropped without close - leaving profile {} for stale cleanup",
                    path.display()
                );
            }
            return;
        }

        self.cleanup_profile_dir();
    }
}

/// Listing container backed by a live DOM element
struct ChromeListing {
    element: Element,
}

#[async_trait]
impl ListingHandle for ChromeListing {
    async fn text(&self, selector: &str) -> Option<String> {
        let child = self.element.find_element(selector).await.ok()?;
        child.inner_text().await.ok().flatten()
    }

    async fn attribute(&self, selector: &str, name: &str) -> Option<String> {
        let child = self.element.find_element(selector).await.ok()?;
        child.attribute(name).await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser_profile::{cleanup_stale_profiles_in, create_unique_profile_in};

    fn session_without_browser(user_data_dir: PathBuf) -> ChromeSession {
        ChromeSession {
            source: Source::Croma,
            browser: None,
            handler: None,
            page: None,
            user_data_dir: Some(user_data_dir),
        }
    }

    #[test]
    fn drop_removes_profile_once_no_browser_holds_it() {
        let root = tempfile::tempdir().unwrap();
        let path = create_unique_profile_in(root.path(), "test_chrome")
            .unwrap()
            .into_path();

        drop(session_without_browser(path.clone()));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn close_without_browser_is_a_noop() {
        let root = tempfile::tempdir().unwrap();
        let path = create_unique_profile_in(root.path(), "test_chrome")
            .unwrap()
            .into_path();

        let mut session = session_without_browser(path.clone());
        session.close().await.unwrap();
        assert!(path.exists(), "close only removes profiles it shut down");

        drop(session);
        assert!(!path.exists());
        assert_eq!(
            cleanup_stale_profiles_in(root.path(), "test_chrome", Duration::ZERO).unwrap(),
            0
        );
    }
}
