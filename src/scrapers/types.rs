use crate::models::StayDates;
use anyhow::{Context, Result};
use chrono::Datelike;
use tracing::debug;
use url::Url;

/// Rate search landing page on ihg.com
pub const DEFAULT_BASE_URL: &str = "https://www.ihg.com/hotels/gb/en/find-hotels/select-roomrate";

/// Brand filter sent with every search
const BRANDS: &str = "6c.hi.ex.sb.ul.ic.cp.cw.in.vn.cv.rs.ki.ma.sp.va.re.vx.nd.sx.we.lx.rn.sn.nu";

/// Search parameters for a single hotel property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text destination, also copied into every record
    pub destination: String,
    pub stay: StayDates,
    /// Property code, e.g. `AUOAU`
    pub hotel_code: String,
}

impl SearchRequest {
    pub fn new(
        destination: impl Into<String>,
        stay: StayDates,
        hotel_code: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            stay,
            hotel_code: hotel_code.into(),
        }
    }

    /// Build the room-rate search URL for this request
    pub fn url(&self, base: &str) -> Result<String> {
        let mut url = Url::parse(base).with_context(|| format!("Invalid base URL: {base}"))?;

        let check_in_day = self.stay.check_in.day().to_string();
        let check_out_day = self.stay.check_out.day().to_string();
        let check_in_my = self.stay.check_in_token().to_string();
        let check_out_my = self.stay.check_out_token().to_string();

        url.query_pairs_mut()
            .append_pair("qDest", &self.destination)
            .append_pair("qPt", "CASH")
            .append_pair("qCiD", &check_in_day)
            .append_pair("qCoD", &check_out_day)
            .append_pair("qCiMy", &check_in_my)
            .append_pair("qCoMy", &check_out_my)
            .append_pair("qAdlt", "1")
            .append_pair("qChld", "0")
            .append_pair("qRms", "1")
            .append_pair("qAAR", "6CBARC")
            .append_pair("qSlH", &self.hotel_code)
            .append_pair("qAkamaiCC", "IN")
            .append_pair("srb_u", "1")
            .append_pair("qExpndSrch", "false")
            .append_pair("qSrt", "sAV")
            .append_pair("qBrs", BRANDS)
            .append_pair("qWch", "0")
            .append_pair("qSmP", "0")
            .append_pair("qRad", "30")
            .append_pair("qRdU", "mi")
            .append_pair("setPMCookies", "true")
            .append_pair("qpMbw", "0")
            .append_pair("qErm", "false")
            .append_pair("qpMn", "0")
            .append_pair("qLoSe", "false")
            .append_pair("qChAge", "")
            .append_pair("qRmFltr", "");

        let url = String::from(url);
        debug!("Generated URL for {}: {}", self.hotel_code, url);
        Ok(url)
    }
}
