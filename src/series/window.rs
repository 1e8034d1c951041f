use chrono::{DateTime, Utc};

use super::types::SampleGrid;

/// The display window `[from, to]` plus the earlier fetch start that seeds
/// the rolling-mean window with history.
#[derive(Debug, Clone, Copy)]
pub struct DisplayWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub fetch_from: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("fetch window must start at or before the display window (fetch_from {fetch_from} > from {from})")]
    FetchAfterDisplay {
        fetch_from: DateTime<Utc>,
        from: DateTime<Utc>,
    },

    #[error("display window is inverted (from {from} > to {to})")]
    InvertedWindow {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl DisplayWindow {
    /// Reject misordered windows before any resampling happens.
    ///
    /// # Errors
    ///
    /// `FetchAfterDisplay` if the fetch window starts after the display
    /// window, `InvertedWindow` if `from > to`. Neither is silently corrected.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if self.from > self.to {
            return Err(SeriesError::InvertedWindow {
                from: self.from,
                to: self.to,
            });
        }
        if self.fetch_from > self.from {
            return Err(SeriesError::FetchAfterDisplay {
                fetch_from: self.fetch_from,
                from: self.from,
            });
        }
        Ok(())
    }
}

/// Drop every grid row with `timestamp < from`, in all columns.
///
/// The rows removed here existed solely to seed the rolling window; they must
/// not appear in the displayed series or its statistics. Returns the number
/// of rows removed so the caller can shift any row-indexed annotations.
pub fn truncate(grid: &mut SampleGrid, from: DateTime<Utc>) -> usize {
    let keep_from = grid.timestamps.partition_point(|t| *t < from);
    if keep_from > 0 {
        grid.timestamps.drain(..keep_from);
        grid.temperature.drain(..keep_from);
        grid.humidity.drain(..keep_from);
    }
    keep_from
}
