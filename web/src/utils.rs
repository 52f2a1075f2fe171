/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Zero-padded counter text, saturating at the largest value the digits can show.
pub(crate) fn format_for_counter(value: u32, digits: u32) -> String {
    let max = 10u32.saturating_pow(digits) - 1;
    let width = digits as usize;
    format!("{:0width$}", value.min(max), width = width)
}
