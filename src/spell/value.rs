//! Resolved spell values and their display formatting.

/// Decimal places shown when a calculation does not set `mPrecision`.
pub const DEFAULT_PRECISION: u32 = 2;

const MAX_PRECISION: u32 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayFormat {
    /// Show as a percentage: value × 100 with a `%` suffix.
    pub percent: bool,
    pub precision: Option<u32>,
}

/// One value per star level, in star order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellValue {
    pub ranks: Vec<f64>,
    pub format: DisplayFormat,
}

impl SpellValue {
    pub fn scalar(value: f64) -> Self {
        Self::by_rank(vec![value])
    }

    pub fn by_rank(ranks: Vec<f64>) -> Self {
        Self {
            ranks,
            format: DisplayFormat::default(),
        }
    }

    pub fn with_format(mut self, format: DisplayFormat) -> Self {
        self.format = format;
        self
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            ranks: self.ranks.iter().map(|value| value * factor).collect(),
            format: self.format,
        }
    }

    /// The value shown to players: one number when every rank reads the same, else `a/b/c`.
    pub fn display(&self) -> String {
        let mut shown: Vec<String> = self
            .ranks
            .iter()
            .map(|&value| self.format_one(value))
            .collect();
        if shown.windows(2).all(|pair| pair[0] == pair[1]) {
            shown.truncate(1);
        }
        shown.join("/")
    }

    fn format_one(&self, value: f64) -> String {
        if self.format.percent {
            format!("{}%", format_number(value * 100.0, self.format.precision))
        } else {
            format_number(value, self.format.precision)
        }
    }
}

/// Round half away from zero to `precision` decimals and drop trailing zeros.
pub fn format_number(value: f64, precision: Option<u32>) -> String {
    let precision = precision.unwrap_or(DEFAULT_PRECISION).min(MAX_PRECISION);
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    let mut text = format!("{:.*}", precision as usize, rounded);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_rounds_and_trims() {
        assert_eq!(format_number(150.0, None), "150");
        assert_eq!(format_number(0.125, None), "0.13");
        assert_eq!(format_number(2.5, Some(0)), "3");
        assert_eq!(format_number(1.10, Some(3)), "1.1");
        assert_eq!(format_number(-0.0001, None), "0");
    }

    #[test]
    fn display_collapses_uniform_ranks() {
        assert_eq!(SpellValue::by_rank(vec![3.0, 3.0, 3.0]).display(), "3");
        assert_eq!(
            SpellValue::by_rank(vec![200.0, 300.0, 450.0]).display(),
            "200/300/450"
        );
    }

    #[test]
    fn display_percent_scales_by_hundred() {
        let value = SpellValue::by_rank(vec![0.2, 0.25, 0.3]).with_format(DisplayFormat {
            percent: true,
            precision: Some(0),
        });
        assert_eq!(value.display(), "20%/25%/30%");
    }

    #[test]
    fn scaled_keeps_format() {
        let value = SpellValue::scalar(0.15).scaled(100.0);
        assert_eq!(value.display(), "15");
    }
}
