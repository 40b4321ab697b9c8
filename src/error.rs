//! Error taxonomy for the chart engine.
//!
//! Every variant is caller-correctable: the engine never retries and never
//! leaves partially applied state behind when it returns one of these.

use crate::models::Channel;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// A channel array does not match the length recorded for the other channels.
    #[error("channel `{channel}` has {found} values, expected {expected}")]
    ShapeMismatch {
        channel: Channel,
        expected: usize,
        found: usize,
    },

    /// `draw()` was called before every channel was set.
    #[error("cannot draw, missing channel(s): {}", join_channels(.missing))]
    IncompleteState { missing: Vec<Channel> },

    /// A selection index lies outside `[0, len)`.
    #[error("selection index {index} out of range for {len} point(s)")]
    InvalidSelection { index: usize, len: usize },

    /// The input of a linear rescale has zero variance.
    #[error("cannot rescale values with zero span (min = max = {value})")]
    DegenerateScale { value: f64 },

    #[error("unknown colormap `{0}`")]
    UnknownColormap(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A region handle does not belong to the surface it was used with.
    #[error("region {0} does not exist on this surface")]
    UnknownRegion(usize),

    /// The drawing surface failed to render.
    #[error("drawing surface error: {0}")]
    Surface(String),
}

fn join_channels(channels: &[Channel]) -> String {
    channels
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_state_lists_channels() {
        let e = ChartError::IncompleteState {
            missing: vec![Channel::Size, Channel::Color],
        };
        assert_eq!(e.to_string(), "cannot draw, missing channel(s): size, color");
    }
}
