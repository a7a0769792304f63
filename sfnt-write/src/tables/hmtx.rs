//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use sfnt_read::tables::hmtx::LongMetric;

use crate::table_writer::{FontWrite, TableWriter};

/// The [hmtx] table.
///
/// [hmtx]: https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hmtx {
    pub h_metrics: Vec<LongMetric>,
    pub left_side_bearings: Vec<i16>,
}

impl Hmtx {
    /// A table where every glyph has a full metric record.
    pub fn all_long(h_metrics: Vec<LongMetric>) -> Self {
        Hmtx {
            h_metrics,
            left_side_bearings: Vec::new(),
        }
    }

    /// The value of `hhea.numberOfHMetrics` for this table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.h_metrics.len() as u16
    }

    /// The largest advance, for `hhea.advanceWidthMax`.
    pub fn advance_width_max(&self) -> u16 {
        self.h_metrics
            .iter()
            .map(|metric| metric.advance)
            .max()
            .unwrap_or_default()
    }
}

impl FontWrite for LongMetric {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(&self.advance);
        writer.write(&self.side_bearing);
    }
}

impl FontWrite for Hmtx {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write(&self.h_metrics);
        writer.write(&self.left_side_bearings);
    }
}
