/// Strings the spreadsheet reader treats as a missing value.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na_token(s: &str) -> bool {
    NA_TOKENS.contains(&s)
}

/// Render a numeric cell as text: whole numbers lose their fractional part
/// (`2013.0` → `"2013"`), everything else uses the shortest float form.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Parse a header such as `"2013"` into a year within `[lo, hi]`.
pub fn parse_year_header(header: &str, lo: i32, hi: i32) -> Option<i32> {
    let year: i32 = header.trim().parse().ok()?;
    (lo..=hi).contains(&year).then_some(year)
}
