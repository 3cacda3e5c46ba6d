use crate::config::{PairingPolicy, ScoutConfig};
use crate::models::{RoomRecord, StayDates};
use crate::scrapers::browser::BrowserSession;
use crate::scrapers::traits::{PageError, RoomPage, Selectors};
use crate::scrapers::types::SearchRequest;
use anyhow::Result;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Read every room offer off a loaded rate page.
///
/// Never fails: page errors are logged and yield no records.
pub fn extract_rooms(
    page: &impl RoomPage,
    request: &SearchRequest,
    selectors: &Selectors,
    pairing: PairingPolicy,
) -> Vec<RoomRecord> {
    match try_extract_rooms(page, request, selectors, pairing) {
        Ok(records) => records,
        Err(e) => {
            error!(
                "Error getting data for hotel code {} ({}): {}",
                request.hotel_code,
                e.kind(),
                e
            );
            Vec::new()
        }
    }
}

fn try_extract_rooms(
    page: &impl RoomPage,
    request: &SearchRequest,
    selectors: &Selectors,
    pairing: PairingPolicy,
) -> Result<Vec<RoomRecord>, PageError> {
    let title = page.text_of(&selectors.title)?;
    let hotel_name = title.lines().last().unwrap_or_default().trim().to_string();
    info!("Hotel name found: {hotel_name}");

    let room_names = page.texts_of(&selectors.room_name)?;
    info!("Room names found: {room_names:?}");

    let room_prices = page.texts_of(&selectors.price)?;
    info!("Room prices found: {room_prices:?}");

    if room_names.len() != room_prices.len() {
        match pairing {
            PairingPolicy::Truncate => warn!(
                "Hotel code {}: {} room names but {} prices, keeping the first {} pairs",
                request.hotel_code,
                room_names.len(),
                room_prices.len(),
                room_names.len().min(room_prices.len())
            ),
            PairingPolicy::Strict => {
                error!(
                    "Hotel code {}: {} room names but {} prices, discarding hotel",
                    request.hotel_code,
                    room_names.len(),
                    room_prices.len()
                );
                return Ok(Vec::new());
            }
        }
    }

    let check_in_date = request.stay.check_in_display();
    let check_out_date = request.stay.check_out_display();

    let records: Vec<RoomRecord> = room_names
        .into_iter()
        .zip(room_prices)
        .map(|(room_name, room_price)| RoomRecord {
            destination: request.destination.clone(),
            hotel_name: hotel_name.clone(),
            check_in_date: check_in_date.clone(),
            check_out_date: check_out_date.clone(),
            room_name,
            room_price,
        })
        .collect();

    info!(
        "Room data collected for hotel code {}: {} rooms",
        request.hotel_code,
        records.len()
    );
    debug!("{records:?}");
    Ok(records)
}

/// Look up one hotel in its own browser session.
/// The session is released before this returns.
pub fn scrape_hotel(config: &ScoutConfig, request: &SearchRequest) -> Result<Vec<RoomRecord>> {
    let url = request.url(&config.base_url).map_err(|e| {
        error!("Error generating URL: {e:#}");
        e
    })?;

    let session = BrowserSession::open(&config.browser, &url, config.wait_timeout())?;
    let records = extract_rooms(&session, request, &config.selectors, config.pairing);

    if records.is_empty() {
        if let Some(dir) = &config.debug_dir {
            if let Err(e) = session.capture_debug(dir, &request.hotel_code) {
                warn!("Failed to capture debug snapshot for {}: {e:#}", request.hotel_code);
            }
        }
    }

    Ok(records)
}

/// Room-rate scraper for a list of IHG properties
pub struct IhgScraper {
    config: Arc<ScoutConfig>,
}

impl IhgScraper {
    pub fn new(config: ScoutConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// One request per configured hotel code, all for the same stay
    pub fn requests(&self, run_date: NaiveDate) -> Result<Vec<SearchRequest>> {
        let stay = StayDates::starting(run_date, self.config.nights)?;
        Ok(self
            .config
            .hotel_codes
            .iter()
            .map(|code| SearchRequest::new(self.config.destination.clone(), stay, code.clone()))
            .collect())
    }

    /// Scrape every configured hotel with a live browser
    pub async fn run(&self, run_date: NaiveDate) -> Result<Vec<RoomRecord>> {
        let requests = self.requests(run_date)?;
        Ok(self.run_with(requests, scrape_hotel).await)
    }

    /// Drive `lookup` over `requests` on blocking worker threads.
    ///
    /// Records come back in request order. Once a lookup fails, lookups that
    /// have not started yet are skipped unless `continue_on_session_error`
    /// is set; lookups already running are awaited and their records kept.
    pub async fn run_with<F>(&self, requests: Vec<SearchRequest>, lookup: F) -> Vec<RoomRecord>
    where
        F: Fn(&ScoutConfig, &SearchRequest) -> Result<Vec<RoomRecord>> + Send + Sync + 'static,
    {
        let lookup = Arc::new(lookup);
        let aborted = Arc::new(AtomicBool::new(false));
        let total = requests.len();

        let mut outcomes = stream::iter(requests.into_iter().map(|request| {
            let config = Arc::clone(&self.config);
            let lookup = Arc::clone(&lookup);
            let aborted = Arc::clone(&aborted);
            async move {
                let code = request.hotel_code.clone();
                if aborted.load(Ordering::SeqCst) {
                    return (code, None);
                }
                let stop_on_error = !config.continue_on_session_error;
                let outcome =
                    tokio::task::spawn_blocking(move || (*lookup)(&*config, &request)).await;
                if stop_on_error && !matches!(outcome, Ok(Ok(_))) {
                    aborted.store(true, Ordering::SeqCst);
                }
                (code, Some(outcome))
            }
        }))
        .buffered(self.config.max_concurrent_sessions);

        let mut all_records = Vec::new();
        let mut done = 0;
        let mut skipped = 0;

        while let Some((code, outcome)) = outcomes.next().await {
            done += 1;
            let failure = match outcome {
                None => {
                    debug!("Skipping hotel code {code} after an earlier failure");
                    skipped += 1;
                    continue;
                }
                Some(Ok(Ok(records))) => {
                    info!("[{done}/{total}] {code}: {} rooms", records.len());
                    all_records.extend(records);
                    continue;
                }
                Some(Ok(Err(e))) => format!("{e:#}"),
                Some(Err(e)) => format!("lookup task failed: {e}"),
            };
            error!("Error scraping hotel code {code}: {failure}");
        }

        if skipped > 0 {
            warn!("Stopped early: skipped {skipped} of {total} hotel codes");
        }

        all_records
    }
}
