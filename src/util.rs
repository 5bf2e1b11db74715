// Text formatting for the read-out, the map label and exports.

/// Distance with two decimals, as shown in the read-out.
pub fn format_distance(d: f64) -> String {
    format!("{:.2}", d)
}

/// Text of the on-map label.
pub fn distance_label(d: f64) -> String {
    format!("Total: {} px", format_distance(d))
}

/// Fixed info line written in the corner of exported images.
pub fn export_info_line(d: f64) -> String {
    format!("Distance (info): {} px", format_distance(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_two_decimals() {
        assert_eq!(format_distance(20.0), "20.00");
        assert_eq!(distance_label(1234.5678), "Total: 1234.57 px");
        assert_eq!(export_info_line(0.0), "Distance (info): 0.00 px");
    }
}
