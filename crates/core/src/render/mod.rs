//! Text renderings of flow state. Each view is a plain struct of formatted
//! strings so callers (and tests) can inspect it; `Display` lays it out.

pub mod about;
pub mod history;
pub mod result;

pub(crate) fn two_decimals(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// `$42.50 per MWh`
pub fn price_per_mwh(price: f64) -> String {
    format!("${price:.2} per MWh")
}
