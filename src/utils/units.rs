const HASHRATE_UNITS: [&str; 7] = ["H/s", "KH/s", "MH/s", "GH/s", "TH/s", "PH/s", "EH/s"];

/// Scale a raw H/s figure to the largest unit that keeps it at or above 1.
pub fn format_hashrate(hashrate: f64) -> String {
    let mut value = hashrate;
    let mut unit = 0;
    while value >= 1000.0 && unit < HASHRATE_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.2} {}", value, HASHRATE_UNITS[unit])
}

/// One-line status like the old header labels ("Error Fetching ..." when a value is missing).
pub fn describe_reading(price: f64, hashrate: f64) -> String {
    let price = if price > 0.0 {
        format!("Price: ${:.4}", price)
    } else {
        "Error Fetching Price".to_string()
    };
    let hashrate = if hashrate > 0.0 {
        format!("Hashrate: {}", format_hashrate(hashrate))
    } else {
        "Error Fetching Hashrate".to_string()
    };
    format!("{}  {}", price, hashrate)
}
