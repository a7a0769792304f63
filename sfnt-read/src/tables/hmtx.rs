//! The [hmtx](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use sfnt_types::{GlyphId, Tag};

use crate::{font_data::FontData, read::ReadError};

pub const TAG: Tag = Tag::new(b"hmtx");

/// An advance width and left side bearing pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LongMetric {
    pub advance: u16,
    pub side_bearing: i16,
}

/// Horizontal metrics.
///
/// The first `numberOfHMetrics` glyphs have a full [`LongMetric`]; the rest
/// share the last advance and store only a side bearing.
#[derive(Clone, Copy, Debug)]
pub struct Hmtx<'a> {
    data: FontData<'a>,
    number_of_h_metrics: u16,
}

impl<'a> Hmtx<'a> {
    pub fn new(
        data: FontData<'a>,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Self, ReadError> {
        if number_of_h_metrics == 0 && num_glyphs > 0 {
            return Err(ReadError::MalformedData("numberOfHMetrics is zero"));
        }
        let long_len = number_of_h_metrics as usize * 4;
        let short_len = num_glyphs.saturating_sub(number_of_h_metrics) as usize * 2;
        if data.len() < long_len {
            return Err(ReadError::OutOfBounds);
        }
        if data.len() < long_len + short_len {
            log::warn!("hmtx is missing trailing side bearings");
        }
        Ok(Hmtx {
            data,
            number_of_h_metrics,
        })
    }

    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }

    /// The metric for `gid`. Missing trailing side bearings read as zero.
    pub fn metric(&self, gid: GlyphId) -> Result<LongMetric, ReadError> {
        let n = self.number_of_h_metrics;
        if n == 0 {
            return Ok(LongMetric::default());
        }
        let idx = gid.to_u16();
        if idx < n {
            let offset = idx as usize * 4;
            return Ok(LongMetric {
                advance: self.data.read_at(offset)?,
                side_bearing: self.data.read_at(offset + 2)?,
            });
        }
        let advance = self.data.read_at((n as usize - 1) * 4)?;
        let offset = n as usize * 4 + (idx - n) as usize * 2;
        Ok(LongMetric {
            advance,
            side_bearing: self.data.read_at(offset).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn trailing_glyphs_share_last_advance() {
        let buf = BeBuffer::new()
            .extend([500u16, 10, 600, 20])
            .extend([30i16, -40]);
        let hmtx = Hmtx::new(FontData::new(&buf), 2, 4).unwrap();
        let metric = |gid: u16| hmtx.metric(GlyphId::new(gid)).unwrap();
        assert_eq!(
            metric(0),
            LongMetric {
                advance: 500,
                side_bearing: 10
            }
        );
        assert_eq!(metric(1).advance, 600);
        assert_eq!(
            metric(3),
            LongMetric {
                advance: 600,
                side_bearing: -40
            }
        );
        assert_eq!(metric(9).side_bearing, 0);
    }

    #[test]
    fn zero_long_metrics() {
        assert!(Hmtx::new(FontData::new(&[]), 0, 3).is_err());
    }
}
