use crate::config::BrowserConfig;
use crate::scrapers::traits::{PageError, RoomPage};
use anyhow::{Context, Result};
use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::util::Timeout;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// One headless Chrome process with a single tab on a loaded page.
///
/// Dropping the session closes the tab and shuts the browser down.
pub struct BrowserSession {
    tab: Arc<Tab>,
    _browser: Browser,
    wait: Duration,
}

impl BrowserSession {
    /// Launch Chrome and navigate to `url`
    pub fn open(config: &BrowserConfig, url: &str, wait: Duration) -> Result<Self> {
        let browser = launch(config, wait).map_err(|e| {
            error!("Error initializing browser: {e:#}");
            e
        })?;

        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(wait);

        navigate(&tab, url).map_err(|e| {
            error!("Error navigating to {url}: {e:#}");
            e
        })?;
        info!("Browser initialized and navigated to {url}");

        Ok(Self {
            tab,
            _browser: browser,
            wait,
        })
    }

    /// Save the rendered HTML and a screenshot as `<dir>/<name>.html|.png`
    pub fn capture_debug(&self, dir: &Path, name: &str) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create debug dir {}", dir.display()))?;

        let html = self.tab.get_content().context("Failed to read page HTML")?;
        let html_path = dir.join(format!("{name}.html"));
        std::fs::write(&html_path, &html)?;
        info!("Saved page HTML to {} ({} bytes)", html_path.display(), html.len());

        let png = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .context("Failed to capture screenshot")?;
        let png_path = dir.join(format!("{name}.png"));
        std::fs::write(&png_path, png)?;
        info!("Saved screenshot to {}", png_path.display());

        Ok(())
    }

    fn classify(&self, selector: &str, err: anyhow::Error) -> PageError {
        if err.downcast_ref::<Timeout>().is_some() {
            PageError::Timeout {
                selector: selector.to_string(),
                waited: self.wait,
            }
        } else if err.downcast_ref::<NoElementFound>().is_some() {
            PageError::NotFound {
                selector: selector.to_string(),
            }
        } else {
            PageError::Other(err)
        }
    }
}

impl RoomPage for BrowserSession {
    fn text_of(&self, selector: &str) -> Result<String, PageError> {
        let element = self
            .tab
            .wait_for_element(selector)
            .map_err(|e| self.classify(selector, e))?;
        element
            .get_inner_text()
            .map_err(|e| self.classify(selector, e))
    }

    fn texts_of(&self, selector: &str) -> Result<Vec<String>, PageError> {
        let elements = self
            .tab
            .wait_for_elements(selector)
            .map_err(|e| self.classify(selector, e))?;
        elements
            .iter()
            .map(|el| el.get_inner_text().map_err(|e| self.classify(selector, e)))
            .collect()
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        match self.tab.close(false) {
            Ok(_) => debug!("Browser tab closed"),
            Err(e) => warn!("Failed to close browser tab: {e:#}"),
        }
    }
}

/// Chrome command-line switches beyond what `LaunchOptions` covers
fn launch_args(config: &BrowserConfig) -> Vec<String> {
    let mut args = vec![
        "--disable-dev-shm-usage".to_string(),
        "--start-maximized".to_string(),
        "--disable-gpu".to_string(),
        "--disable-extensions".to_string(),
        format!("--user-agent={}", config.user_agent),
    ];
    args.extend(config.extra_args.iter().cloned());
    args
}

fn launch(config: &BrowserConfig, wait: Duration) -> Result<Browser> {
    info!("Launching headless Chrome...");

    let args = launch_args(config);
    let args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();

    let options = LaunchOptions::default_builder()
        .headless(config.headless)
        .sandbox(config.sandbox)
        .window_size(Some((config.window_width, config.window_height)))
        .path(config.chrome_path.clone())
        .args(args)
        // element waits must not trip the idle watchdog
        .idle_browser_timeout(wait + Duration::from_secs(60))
        .build()
        .context("Failed to build launch options")?;

    Browser::new(options).context("Failed to launch Chrome browser")
}

fn navigate(tab: &Tab, url: &str) -> Result<()> {
    tab.navigate_to(url)
        .with_context(|| format!("Failed to navigate to {url}"))?;
    tab.wait_until_navigated()
        .context("Page never finished navigating")?;
    Ok(())
}
