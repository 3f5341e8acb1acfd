use {
    super::entities::Amount,
    ethers::utils::{
        format_ether,
        parse_ether,
    },
};

/// Converts a decimal ether string ("0.25") into base units.
pub fn to_base_units(value: &str) -> Result<Amount, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("empty amount".to_string());
    }
    if value.starts_with('-') {
        return Err(format!("negative amount {}", value));
    }
    parse_ether(value).map_err(|e| format!("{} is not a valid ether amount: {}", value, e))
}

/// Formats base units as a decimal ether string without trailing zeros.
pub fn to_display(amount: Amount) -> String {
    let formatted = format_ether(amount);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => formatted,
    }
}
