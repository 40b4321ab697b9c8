use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ChartError, Result};

/// One of the four data-to-visual mappings of a bubble chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Horizontal position
    X,
    /// Vertical position
    Y,
    /// Bubble area, rescaled into the configured pixel range
    Size,
    /// Colormap value
    Color,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::X, Channel::Y, Channel::Size, Channel::Color];

    /// Name used in labels when the caller did not provide one.
    pub fn default_name(self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
            Channel::Size => "size",
            Channel::Color => "color",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Channel::X => 0,
            Channel::Y => 1,
            Channel::Size => 2,
            Channel::Color => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

/// Accepts the short and plural spellings (`c`, `colors`, `s`, `sizes`), case-insensitive.
impl FromStr for Channel {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Channel::X),
            "y" => Ok(Channel::Y),
            "s" | "size" | "sizes" => Ok(Channel::Size),
            "c" | "color" | "colors" | "colour" => Ok(Channel::Color),
            other => Err(ChartError::InvalidConfig(format!("unknown channel `{other}`"))),
        }
    }
}

/// A complete point set: four index-aligned arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub size: Vec<f64>,
    pub color: Vec<f64>,
}

impl PointSet {
    /// Build from rows, e.g. the output of a file reader.
    pub fn from_rows(rows: &[PointRow]) -> Self {
        let mut set = PointSet::default();
        for r in rows {
            set.x.push(r.x);
            set.y.push(r.y);
            set.size.push(r.size);
            set.color.push(r.color);
        }
        set
    }

    pub fn values(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::Size => &self.size,
            Channel::Color => &self.color,
        }
    }

    /// Length shared by all four arrays, or `ShapeMismatch` naming the first offender.
    pub fn len(&self) -> Result<usize> {
        let expected = self.x.len();
        for channel in Channel::ALL {
            let found = self.values(channel).len();
            if found != expected {
                return Err(ChartError::ShapeMismatch {
                    channel,
                    expected,
                    found,
                });
            }
        }
        Ok(expected)
    }

    pub fn rows(&self) -> Vec<PointRow> {
        (0..self.x.len().min(self.y.len()).min(self.size.len()).min(self.color.len()))
            .map(|i| PointRow {
                x: self.x[i],
                y: self.y[i],
                size: self.size[i],
                color: self.color[i],
            })
            .collect()
    }
}

/// One observation with all four channels (JSON/CSV row shape).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRow {
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub x: f64,
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub y: f64,
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub size: f64,
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub color: f64,
}

/// Serde helper: parse `f64` from either a JSON number or a string.
/// Spreadsheet exports frequently quote numeric cells.
fn de_f64_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a number or a string containing a number")
        }

        fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_str<E>(self, s: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<f64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_aliases() {
        assert_eq!("C".parse::<Channel>().unwrap(), Channel::Color);
        assert_eq!("sizes".parse::<Channel>().unwrap(), Channel::Size);
        assert_eq!(" x ".parse::<Channel>().unwrap(), Channel::X);
        assert!("z".parse::<Channel>().is_err());
    }

    #[test]
    fn rows_accept_quoted_numbers() {
        let rows: Vec<PointRow> =
            serde_json::from_str(r#"[{"x":1,"y":"2.5","size":3,"color":"-4"}]"#).unwrap();
        assert_eq!(
            rows[0],
            PointRow {
                x: 1.0,
                y: 2.5,
                size: 3.0,
                color: -4.0
            }
        );
    }

    #[test]
    fn point_set_len_reports_mismatch() {
        let set = PointSet {
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
            size: vec![1.0],
            color: vec![1.0, 2.0],
        };
        assert_eq!(
            set.len(),
            Err(ChartError::ShapeMismatch {
                channel: Channel::Size,
                expected: 2,
                found: 1
            })
        );
    }
}
