use serde::{Deserialize, Serialize};

use crate::layout::LayoutError;
use crate::model::Interval;

/// Map a year to a horizontal pixel offset.
///
/// Years outside `[start_year, end_year]` are extrapolated linearly, which
/// can produce offsets left of the margin or past the drawable width.
/// The caller guarantees `end_year > start_year`.
pub fn year_to_x(
    year: f64,
    start_year: f64,
    end_year: f64,
    drawable_width_px: f64,
    left_margin_px: f64,
    zoom: f64,
) -> f64 {
    let ratio = (year - start_year) / (end_year - start_year);
    left_margin_px + ratio * drawable_width_px * zoom
}

/// The year range that spans the drawable width at zoom 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    start: i32,
    end: i32,
}

impl Domain {
    pub fn new(start: i32, end: i32) -> Result<Self, LayoutError> {
        if end <= start {
            return Err(LayoutError::DegenerateDomain { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Width in years. Widened so the full `i32` range cannot overflow.
    pub fn range(&self) -> i64 {
        i64::from(self.end) - i64::from(self.start)
    }
}

impl Default for Domain {
    /// Creation to the close of the Old Testament narrative.
    fn default() -> Self {
        Self {
            start: -4004,
            end: -400,
        }
    }
}

/// Horizontal scale factor. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Zoom(f64);

impl Zoom {
    pub const ONE: Zoom = Zoom(1.0);

    pub fn new(value: f64) -> Result<Self, LayoutError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(LayoutError::InvalidZoom(value));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// Clamp into `[min, max]`. Bounds are assumed valid.
    pub fn clamp(self, min: Zoom, max: Zoom) -> Zoom {
        Zoom(self.0.clamp(min.0, max.0))
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::ONE
    }
}

impl<'de> Deserialize<'de> for Zoom {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Zoom::new(value).map_err(serde::de::Error::custom)
    }
}

/// [`year_to_x`] bound to one domain, width, margin and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub domain: Domain,
    pub drawable_width: f64,
    pub left_margin: f64,
    pub zoom: Zoom,
    /// Width given to intervals with no end year. Not scaled by zoom.
    pub open_ended_width: f64,
}

impl CoordinateMapper {
    pub fn year_to_x(&self, year: i32) -> f64 {
        year_to_x(
            f64::from(year),
            f64::from(self.domain.start()),
            f64::from(self.domain.end()),
            self.drawable_width,
            self.left_margin,
            self.zoom.get(),
        )
    }

    /// Inverse of [`Self::year_to_x`], as a fractional year.
    pub fn x_to_year(&self, x: f64) -> f64 {
        let px_per_year = self.px_per_year();
        f64::from(self.domain.start()) + (x - self.left_margin) / px_per_year
    }

    pub fn px_per_year(&self) -> f64 {
        self.drawable_width * self.zoom.get() / self.domain.range() as f64
    }

    pub fn interval_width(&self, interval: &Interval) -> f64 {
        match interval.span_years() {
            Some(years) => years as f64 * self.px_per_year(),
            None => self.open_ended_width,
        }
    }

    /// Right edge of the domain end, plus the left margin as padding.
    pub fn content_width(&self) -> f64 {
        self.year_to_x(self.domain.end()) + self.left_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mapper(zoom: f64) -> CoordinateMapper {
        CoordinateMapper {
            domain: Domain::default(),
            drawable_width: 4800.0,
            left_margin: 100.0,
            zoom: Zoom::new(zoom).unwrap_or_default(),
            open_ended_width: 240.0,
        }
    }

    #[test]
    fn domain_edges_and_midpoint() {
        let m = mapper(1.0);
        assert_eq!(m.year_to_x(-4004), 100.0);
        assert_eq!(m.year_to_x(-400), 4900.0);
        assert_eq!(m.year_to_x(-2202), 2500.0);
    }

    #[test]
    fn out_of_domain_years_extrapolate() {
        let m = mapper(1.0);
        assert!(m.year_to_x(-5000) < 100.0);
        assert!(m.year_to_x(30) > 4900.0);
    }

    #[test]
    fn zoom_scales_offset_from_margin() {
        assert_eq!(mapper(2.0).year_to_x(-2202), 100.0 + 2.0 * 2400.0);
    }

    #[test]
    fn interval_widths() {
        let m = mapper(1.5);
        let david = Interval::new(-1085, Some(-1015)).unwrap_or(Interval::instant(0));
        let expected = m.year_to_x(-1015) - m.year_to_x(-1085);
        assert!((m.interval_width(&david) - expected).abs() < 1e-9);
        assert_eq!(m.interval_width(&Interval::open(-1260)), 240.0);
        assert_eq!(m.interval_width(&Interval::instant(-1491)), 0.0);
    }

    #[test]
    fn x_to_year_inverts() {
        let m = mapper(1.3);
        let x = m.year_to_x(-1491);
        assert!((m.x_to_year(x) + 1491.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_degenerate_domain_and_zoom() {
        assert!(Domain::new(-400, -400).is_err());
        assert!(Domain::new(-400, -4004).is_err());
        assert!(Zoom::new(0.0).is_err());
        assert!(Zoom::new(-1.0).is_err());
        assert!(Zoom::new(f64::NAN).is_err());
        assert!(Zoom::new(f64::INFINITY).is_err());
    }

    #[test]
    fn full_i32_domain_maps_without_overflow() {
        let m = CoordinateMapper {
            domain: Domain::new(i32::MIN, i32::MAX).unwrap_or_default(),
            ..mapper(1.0)
        };
        assert_eq!(m.domain.range(), i64::from(u32::MAX));
        assert_eq!(m.year_to_x(i32::MIN), 100.0);
        assert!((m.year_to_x(i32::MAX) - 4900.0).abs() < 1e-6);
        let everything = Interval::new(i32::MIN, Some(i32::MAX)).unwrap_or(Interval::instant(0));
        assert!((m.interval_width(&everything) - 4800.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_deserialize_validates() {
        assert!(serde_json::from_str::<Zoom>("1.3").is_ok());
        assert!(serde_json::from_str::<Zoom>("0").is_err());
    }

    proptest! {
        #[test]
        fn strictly_monotonic(a in -6000i32..2000, b in -6000i32..2000, zoom in 0.01f64..10.0) {
            prop_assume!(a < b);
            let m = mapper(zoom);
            prop_assert!(m.year_to_x(a) < m.year_to_x(b));
        }

        #[test]
        fn offset_linear_in_zoom(year in -6000i32..2000, zoom in 0.01f64..10.0, k in 0.1f64..5.0) {
            let base = mapper(zoom).year_to_x(year) - 100.0;
            let scaled = mapper(zoom * k).year_to_x(year) - 100.0;
            prop_assert!((scaled - k * base).abs() <= 1e-6 * base.abs().max(1.0));
        }
    }
}
