//! Positional column layouts of the two bonded channel tables
//!
//! The device page has no per-row header lookup: the column index alone
//! identifies the field. If the firmware reorders columns, only these tables
//! need to change.

use super::numeric::{parse_float_prefix, parse_int_prefix};
use crate::models::{DownstreamChannelReading, UpstreamChannelReading};

/// Writes one cell's text into the matching field of a reading
pub type ColumnSetter<T> = fn(&mut T, &str);

/// Number of leading `tr` rows that make up a table's header
pub const HEADER_ROWS: usize = 2;

pub const UPSTREAM_COLUMNS: [ColumnSetter<UpstreamChannelReading>; 7] = [
    |r, v| r.channel = v.trim().to_string(),
    |r, v| r.channel_id = v.trim().to_string(),
    |r, v| r.lock_status = v.trim().to_string(),
    |r, v| r.us_channel_type = v.trim().to_string(),
    |r, v| r.frequency = parse_int_prefix(v),
    |r, v| r.width = parse_int_prefix(v),
    |r, v| r.power = parse_float_prefix(v),
];

pub const DOWNSTREAM_COLUMNS: [ColumnSetter<DownstreamChannelReading>; 8] = [
    |r, v| r.channel_id = v.trim().to_string(),
    |r, v| r.lock_status = v.trim().to_string(),
    |r, v| r.modulation = v.trim().to_string(),
    |r, v| r.frequency = parse_int_prefix(v),
    |r, v| r.power = parse_float_prefix(v),
    |r, v| r.snr = parse_float_prefix(v),
    |r, v| r.corrected = parse_int_prefix(v),
    |r, v| r.uncorrectables = parse_int_prefix(v),
];

/// Build a reading from a row's cell texts; extra cells are ignored and
/// missing cells keep their default
pub fn apply_columns<'a, T, I>(columns: &[ColumnSetter<T>], cells: I) -> T
where
    T: Default,
    I: IntoIterator<Item = &'a str>,
{
    let mut reading = T::default();
    for (setter, cell) in columns.iter().zip(cells) {
        setter(&mut reading, cell);
    }
    reading
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_row_maps_positionally() {
        let cells = [
            "1",
            "3",
            "Locked",
            "SC-QAM",
            "35600000 Hz",
            "6400000 Hz",
            "44.0 dBmV",
        ];
        let reading: UpstreamChannelReading = apply_columns(&UPSTREAM_COLUMNS, cells);
        assert_eq!(reading.channel, "1");
        assert_eq!(reading.channel_id, "3");
        assert_eq!(reading.lock_status, "Locked");
        assert_eq!(reading.us_channel_type, "SC-QAM");
        assert_eq!(reading.frequency, 35_600_000);
        assert_eq!(reading.width, 6_400_000);
        assert_eq!(reading.power, 44.0);
    }

    #[test]
    fn test_short_row_keeps_defaults() {
        let reading: DownstreamChannelReading =
            apply_columns(&DOWNSTREAM_COLUMNS, ["7", "Locked", "QAM256"]);
        assert_eq!(reading.channel_id, "7");
        assert_eq!(reading.modulation, "QAM256");
        assert_eq!(reading.frequency, 0);
        assert_eq!(reading.power, 0.0);
        assert_eq!(reading.uncorrectables, 0);
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let cells = ["1", "Locked", "QAM256", "1 Hz", "2 dBmV", "3 dB", "4", "5", "extra"];
        let reading: DownstreamChannelReading = apply_columns(&DOWNSTREAM_COLUMNS, cells);
        assert_eq!(reading.uncorrectables, 5);
    }
}
