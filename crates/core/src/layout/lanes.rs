use serde::{Deserialize, Serialize};

/// Horizontal extent of one item to place, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneSpan {
    pub x: f64,
    pub width: f64,
}

impl LaneSpan {
    pub fn new(x: f64, width: f64) -> Self {
        Self { x, width }
    }

    pub fn end(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneParams {
    /// Top of lane 0.
    pub base_top: f64,
    pub lane_height: f64,
    /// Number of lanes tried before giving up.
    pub max_probes: u32,
}

/// Where the assigner put one span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanePlacement {
    pub lane: u32,
    pub left: f64,
    pub width: f64,
    pub top: f64,
    /// Every probed lane collided; the span sits in the last one and may
    /// overlap a neighbour.
    pub exhausted: bool,
}

impl LanePlacement {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Greedy first-fit lane assignment.
///
/// Spans are placed in input order, each into the lowest lane whose top
/// is at least `lane_height` away from every horizontally overlapping span
/// already placed. Edges that touch count as overlapping. The output is
/// aligned with `spans`.
pub fn assign_lanes(spans: &[LaneSpan], params: &LaneParams) -> Vec<LanePlacement> {
    let mut placed: Vec<LanePlacement> = Vec::with_capacity(spans.len());
    let probes = params.max_probes.max(1);

    for (index, span) in spans.iter().enumerate() {
        let (start, end) = (span.x, span.end());
        let free = (0..probes).find(|&lane| {
            let top = params.base_top + f64::from(lane) * params.lane_height;
            !placed.iter().any(|p| {
                (p.top - top).abs() < params.lane_height && !(end < p.left || start > p.right())
            })
        });

        let placement = match free {
            Some(lane) => LanePlacement {
                lane,
                left: span.x,
                width: span.width,
                top: params.base_top + f64::from(lane) * params.lane_height,
                exhausted: false,
            },
            None => {
                let lane = probes - 1;
                tracing::debug!(index, lane, x = span.x, "lane budget exhausted, overlapping");
                LanePlacement {
                    lane,
                    left: span.x,
                    width: span.width,
                    top: params.base_top + f64::from(lane) * params.lane_height,
                    exhausted: true,
                }
            }
        };
        placed.push(placement);
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PARAMS: LaneParams = LaneParams {
        base_top: 250.0,
        lane_height: 40.0,
        max_probes: 50,
    };

    #[test]
    fn identical_spans_stack() {
        let spans = [LaneSpan::new(100.0, 100.0), LaneSpan::new(100.0, 100.0)];
        let placed = assign_lanes(&spans, &PARAMS);
        assert_eq!(placed[0].lane, 0);
        assert_eq!(placed[0].top, 250.0);
        assert_eq!(placed[1].lane, 1);
        assert_eq!(placed[1].top, 290.0);
    }

    #[test]
    fn disjoint_spans_share_lane_zero() {
        let spans = [LaneSpan::new(0.0, 50.0), LaneSpan::new(60.0, 50.0)];
        let placed = assign_lanes(&spans, &PARAMS);
        assert!(placed.iter().all(|p| p.lane == 0 && !p.exhausted));
    }

    #[test]
    fn touching_edges_collide() {
        let spans = [LaneSpan::new(0.0, 50.0), LaneSpan::new(50.0, 50.0)];
        let placed = assign_lanes(&spans, &PARAMS);
        assert_eq!(placed[1].lane, 1);
    }

    #[test]
    fn gap_in_lower_lane_is_reused() {
        let spans = [
            LaneSpan::new(0.0, 100.0),
            LaneSpan::new(0.0, 300.0),
            LaneSpan::new(200.0, 50.0),
        ];
        let placed = assign_lanes(&spans, &PARAMS);
        assert_eq!(placed.iter().map(|p| p.lane).collect::<Vec<_>>(), vec![0, 1, 0]);
    }

    #[test]
    fn exhausted_budget_lands_in_last_lane() {
        let params = LaneParams {
            max_probes: 2,
            ..PARAMS
        };
        let spans = [LaneSpan::new(0.0, 10.0); 3];
        let placed = assign_lanes(&spans, &params);
        assert!(!placed[1].exhausted);
        assert!(placed[2].exhausted);
        assert_eq!(placed[2].lane, 1);
        assert_eq!(placed[2].top, 290.0);
    }

    #[test]
    fn order_dependent() {
        let wide = LaneSpan::new(0.0, 300.0);
        let narrow = LaneSpan::new(400.0, 10.0);
        let short = LaneSpan::new(250.0, 100.0);
        let a = assign_lanes(&[wide, narrow, short], &PARAMS);
        let b = assign_lanes(&[short, narrow, wide], &PARAMS);
        assert_eq!(a[2].lane, 1);
        assert_eq!(b[0].lane, 0);
    }

    proptest! {
        #[test]
        fn same_lane_never_overlaps_without_exhaustion(
            raw in prop::collection::vec((0.0f64..1000.0, 0.0f64..300.0), 0..40),
            probes in 1u32..8,
        ) {
            let spans: Vec<LaneSpan> = raw.iter().map(|&(x, w)| LaneSpan::new(x, w)).collect();
            let params = LaneParams { max_probes: probes, ..PARAMS };
            let placed = assign_lanes(&spans, &params);
            prop_assert_eq!(placed.len(), spans.len());
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    let overlap = !(a.right() < b.left || a.left > b.right());
                    if a.lane == b.lane && overlap {
                        prop_assert!(a.exhausted || b.exhausted);
                    }
                }
            }
        }
    }
}
