/// Granularity of a Wikidata time value (`wikibase:timePrecision`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Year,
    Month,
    Day,
}

impl Precision {
    /// Coarser codes (decade, century, ...) and finer ones (hour and up)
    /// have no usable date form here.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "9" => Some(Precision::Year),
            "10" => Some(Precision::Month),
            "11" => Some(Precision::Day),
            _ => None,
        }
    }

    /// Number of leading characters of `YYYY-MM-DDThh:mm:ssZ` that carry meaning.
    pub fn width(self) -> usize {
        match self {
            Precision::Year => 4,
            Precision::Month => 7,
            Precision::Day => 10,
        }
    }
}

/// A raw time value paired with its precision code.
#[derive(Debug, Clone, Copy)]
pub struct Wikidate<'a> {
    date: Option<&'a str>,
    precision: Option<&'a str>,
}

impl<'a> Wikidate<'a> {
    pub fn new(date: Option<&'a str>, precision: Option<&'a str>) -> Self {
        Self { date, precision }
    }

    /// The date truncated to its precision, or `None` when either half is
    /// missing or the precision is not year, month or day.
    ///
    /// No calendar validation is done. Input shorter than the precision
    /// width comes back unchanged.
    pub fn as_string(&self) -> Option<String> {
        let date = self.date?;
        let precision = Precision::from_code(self.precision?)?;
        Some(date.chars().take(precision.width()).collect())
    }
}

pub fn normalize(date: Option<&str>, precision: Option<&str>) -> Option<String> {
    Wikidate::new(date, precision).as_string()
}
