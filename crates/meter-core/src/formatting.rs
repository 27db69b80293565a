/// Format a floating-point number with a fixed number of decimal places and
/// `,` as the decimal marker. No thousands grouping is applied.
///
/// The result depends only on `value` and `decimals`, so formatting the same
/// value twice always yields the same text.
///
/// # Examples
///
/// ```
/// use meter_core::formatting::format_decimal_comma;
///
/// assert_eq!(format_decimal_comma(1234.5, 2), "1234,50");
/// assert_eq!(format_decimal_comma(0.0, 2), "0,00");
/// assert_eq!(format_decimal_comma(-3.456, 2), "-3,46");
/// assert_eq!(format_decimal_comma(12.0, 0), "12");
/// ```
pub fn format_decimal_comma(value: f64, decimals: usize) -> String {
    format!("{:.prec$}", value, prec = decimals).replacen('.', ",", 1)
}

/// Two-decimal decimal-comma rendering used by every report column.
///
/// # Examples
///
/// ```
/// use meter_core::formatting::format_kwh;
///
/// assert_eq!(format_kwh(2.126), "2,13");
/// assert_eq!(format_kwh(17.0), "17,00");
/// ```
pub fn format_kwh(value: f64) -> String {
    format_decimal_comma(value, 2)
}

/// Two-decimal decimal-comma value followed by a unit symbol.
///
/// # Examples
///
/// ```
/// use meter_core::formatting::format_with_unit;
///
/// assert_eq!(format_with_unit(3.0, "kWh"), "3,00 kWh");
/// assert_eq!(format_with_unit(-1.5, "°C"), "-1,50 °C");
/// ```
pub fn format_with_unit(value: f64, unit: &str) -> String {
    format!("{} {}", format_kwh(value), unit)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
