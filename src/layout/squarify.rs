use super::Weighted;

/// An input item with its share of the target area attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWithArea<T> {
    pub item: T,
    pub area: f64,
}

/// A positioned rectangle in the treemap layout.
///
/// Coordinates live in the space of the target rectangle passed to
/// [`squarify`] (origin top-left, y grows downwards).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRect<T> {
    pub item: T,
    pub area: f64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl<T> LayoutRect<T> {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Bare geometry of one placed item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Lay out `items` as a squarified treemap inside `(x, y, width, height)`.
///
/// Returns one rectangle per item, ordered row by row with the largest area
/// first. An empty vector means there is nothing to draw: no items, a zero
/// total weight, or a non-positive target dimension.
pub fn squarify<T: Weighted + Clone>(
    items: &[T],
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<LayoutRect<T>> {
    let Some(allocated) = allocate_areas(items, width, height) else {
        return Vec::new();
    };

    let areas: Vec<f64> = allocated.iter().map(|a| a.area).collect();
    let placements = layout_areas(&areas, x, y, width, height);
    debug_assert_eq!(placements.len(), allocated.len());

    tracing::debug!(
        "Squarified {} items into {:.1}x{:.1} at ({:.1}, {:.1})",
        placements.len(),
        width,
        height,
        x,
        y
    );

    allocated
        .into_iter()
        .zip(placements)
        .map(|(ItemWithArea { item, area }, p)| LayoutRect {
            item,
            area,
            x: p.x,
            y: p.y,
            w: p.w,
            h: p.h,
        })
        .collect()
}

/// Convert weights into absolute areas and sort them largest first.
///
/// `None` when the layout is degenerate (no items, zero total weight or a
/// non-positive dimension). Negative and NaN weights count as zero.
pub fn allocate_areas<T: Weighted + Clone>(
    items: &[T],
    width: f64,
    height: f64,
) -> Option<Vec<ItemWithArea<T>>> {
    if items.is_empty() || !(width > 0.0) || !(height > 0.0) {
        return None;
    }

    let total_weight: f64 = items.iter().map(|i| i.weight().max(0.0)).sum();
    if !(total_weight > 0.0) || !total_weight.is_finite() {
        return None;
    }

    let total_area = width * height;
    let mut allocated: Vec<ItemWithArea<T>> = items
        .iter()
        .map(|item| ItemWithArea {
            area: item.weight().max(0.0) / total_weight * total_area,
            item: item.clone(),
        })
        .collect();

    // Stable, so equal areas keep their input order
    allocated.sort_by(|a, b| b.area.total_cmp(&a.area));
    Some(allocated)
}

/// Place pre-sorted (descending) areas inside the target rectangle.
///
/// Always returns exactly `areas.len()` placements when both dimensions are
/// positive. Items left over once the free rectangle has collapsed (zero
/// areas, rounding residue) become zero-sized rectangles on its far edge.
pub fn layout_areas(areas: &[f64], x: f64, y: f64, width: f64, height: f64) -> Vec<Placement> {
    let mut placed = Vec::with_capacity(areas.len());
    if !(width > 0.0) || !(height > 0.0) {
        return placed;
    }

    let mut free = Placement {
        x,
        y,
        w: width,
        h: height,
    };
    let mut start = 0;

    while start < areas.len() {
        if free.w <= 0.0 || free.h <= 0.0 {
            let edge = Placement {
                x: free.x,
                y: free.y,
                w: 0.0,
                h: 0.0,
            };
            placed.extend(std::iter::repeat(edge).take(areas.len() - start));
            break;
        }

        // Wider than tall: the row is a column spanning the full height
        let along_x = free.w >= free.h;
        let fixed = if along_x { free.h } else { free.w };

        let queue = &areas[start..];
        let row = &queue[..build_row(queue, fixed)];
        // Clamp to the free rect so rounding residue never pushes a box outside
        let room = if along_x { free.w } else { free.h };
        let row_length = safe_div(row.iter().sum(), fixed).min(room);

        let mut offset = 0.0;
        for &area in row {
            let extent = safe_div(area, row_length).min((fixed - offset).max(0.0));
            let pos = if along_x {
                Placement {
                    x: free.x,
                    y: free.y + offset,
                    w: row_length,
                    h: extent,
                }
            } else {
                Placement {
                    x: free.x + offset,
                    y: free.y,
                    w: extent,
                    h: row_length,
                }
            };
            placed.push(pos);
            offset += extent;
        }

        // Shrink remaining space
        if along_x {
            free.x += row_length;
            free.w = (free.w - row_length).max(0.0);
        } else {
            free.y += row_length;
            free.h = (free.h - row_length).max(0.0);
        }

        start += row.len();
    }

    placed
}

/// Length of the row to take from the front of `queue`.
///
/// Grows the row while the worst aspect ratio does not get strictly worse.
/// At least one item is always taken, even if it is a poor fit.
pub fn build_row(queue: &[f64], fixed_dimension: f64) -> usize {
    if queue.is_empty() {
        return 0;
    }

    let mut best = worst_aspect_ratio(&queue[..1], fixed_dimension);
    let mut len = 1;
    while len < queue.len() {
        let candidate = worst_aspect_ratio(&queue[..=len], fixed_dimension);
        if candidate > best {
            break;
        }
        best = candidate;
        len += 1;
    }
    len
}

/// Worst aspect ratio over a row laid against a side of `fixed_dimension`.
///
/// Infinite for an empty row, a zero row area or a zero side.
pub fn worst_aspect_ratio(row: &[f64], fixed_dimension: f64) -> f64 {
    let row_area: f64 = row.iter().sum();
    if row.is_empty() || row_area == 0.0 || fixed_dimension == 0.0 {
        return f64::INFINITY;
    }

    let max_area = row.iter().copied().fold(0.0, f64::max);
    let min_area = row.iter().copied().fold(f64::INFINITY, f64::min);
    let side_sq = fixed_dimension * fixed_dimension;
    let area_sq = row_area * row_area;

    let a = (side_sq * max_area) / area_sq;
    let b = area_sq / (side_sq * min_area);
    a.max(b)
}

/// Division that collapses to zero instead of producing NaN or infinity.
fn safe_div(n: f64, d: f64) -> f64 {
    if d > 0.0 {
        let q = n / d;
        if q.is_finite() {
            return q.max(0.0);
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::WeightedItem;

    const EPS: f64 = 1e-9;

    fn items(weights: &[f64]) -> Vec<WeightedItem> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| WeightedItem::new(format!("item {}", i + 1), w))
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * b.abs().max(1.0)
    }

    fn assert_rect<T>(r: &LayoutRect<T>, x: f64, y: f64, w: f64, h: f64) {
        assert!(
            (r.x - x).abs() < EPS && (r.y - y).abs() < EPS && (r.w - w).abs() < EPS && (r.h - h).abs() < EPS,
            "expected ({x}, {y}, {w}, {h}), got ({}, {}, {}, {})",
            r.x,
            r.y,
            r.w,
            r.h
        );
    }

    fn sample_weights() -> Vec<f64> {
        vec![
            4284.46, 11302.35, 5593.49, 4152.07, 4191.26, 19626.7, 8408.9, 6735.78, 4871.43,
            10671.34, 4904.49, 12800.49, 6696.19, 8464.85, 8929.69, 8450.47, 4834.25, 3008.32,
            4924.57, 5296.5, 15635.25, 4771.61, 3801.76, 1468.54, 6187.39, 4549.22, 4808.58,
            4834.73,
        ]
    }

    #[test]
    fn three_items_in_square_match_reference_layout() {
        let rects = squarify(&items(&[50.0, 30.0, 20.0]), 0.0, 0.0, 100.0, 100.0);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].item.name, "item 1");
        assert_rect(&rects[0], 0.0, 0.0, 50.0, 100.0);
        assert_eq!(rects[1].item.name, "item 2");
        assert_rect(&rects[1], 50.0, 0.0, 50.0, 60.0);
        assert_eq!(rects[2].item.name, "item 3");
        assert_rect(&rects[2], 50.0, 60.0, 50.0, 40.0);
    }

    #[test]
    fn row_builder_stops_when_ratio_worsens() {
        // 2.0 alone, ~2.13 with the second item
        assert_eq!(build_row(&[5000.0, 3000.0, 2000.0], 100.0), 1);
        assert!(close(worst_aspect_ratio(&[5000.0], 100.0), 2.0));
        assert!(close(worst_aspect_ratio(&[5000.0, 3000.0], 100.0), 64.0 / 30.0));
    }

    #[test]
    fn row_builder_accepts_equal_items() {
        // Four equal squares against a side of 2: ratio improves then holds
        assert_eq!(build_row(&[1.0, 1.0, 1.0, 1.0], 2.0), 2);
    }

    #[test]
    fn worst_ratio_is_infinite_for_degenerate_rows() {
        assert_eq!(worst_aspect_ratio(&[], 10.0), f64::INFINITY);
        assert_eq!(worst_aspect_ratio(&[0.0, 0.0], 10.0), f64::INFINITY);
        assert_eq!(worst_aspect_ratio(&[5.0], 0.0), f64::INFINITY);
        assert_eq!(worst_aspect_ratio(&[5.0, 0.0], 10.0), f64::INFINITY);
    }

    #[test]
    fn zero_area_suffix_forms_one_row() {
        assert_eq!(build_row(&[0.0, 0.0, 0.0], 10.0), 3);
    }

    #[test]
    fn single_item_fills_viewport_without_axis_swap() {
        let rects = squarify(&items(&[7.0]), 0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(rects.len(), 1);
        assert_rect(&rects[0], 0.0, 0.0, 1920.0, 1080.0);

        let rects = squarify(&items(&[7.0]), 0.0, 0.0, 300.0, 800.0);
        assert_rect(&rects[0], 0.0, 0.0, 300.0, 800.0);
    }

    #[test]
    fn degenerate_inputs_produce_empty_layout() {
        assert!(squarify(&items(&[]), 0.0, 0.0, 100.0, 100.0).is_empty());
        assert!(squarify(&items(&[1.0, 2.0]), 0.0, 0.0, 0.0, 100.0).is_empty());
        assert!(squarify(&items(&[1.0, 2.0]), 0.0, 0.0, 100.0, 0.0).is_empty());
        assert!(squarify(&items(&[1.0, 2.0]), 0.0, 0.0, -5.0, 100.0).is_empty());
        assert!(squarify(&items(&[0.0, 0.0]), 0.0, 0.0, 100.0, 100.0).is_empty());
        assert!(squarify(&items(&[1.0]), 0.0, 0.0, f64::NAN, 100.0).is_empty());
    }

    #[test]
    fn layout_preserves_area_and_proportions() {
        let weights = sample_weights();
        let total: f64 = weights.iter().sum();
        let (w, h) = (1024.0, 576.0);
        let rects = squarify(&items(&weights), 0.0, 0.0, w, h);
        assert_eq!(rects.len(), weights.len());

        let covered: f64 = rects.iter().map(|r| r.w * r.h).sum();
        assert!(close(covered, w * h), "covered {covered} of {}", w * h);

        for r in &rects {
            assert!(close(r.w * r.h, r.area));
            assert!(close(r.area / (w * h), r.item.weight / total));
        }
    }

    #[test]
    fn rects_stay_inside_target_and_do_not_overlap() {
        let weights = sample_weights();
        let (w, h) = (800.0, 800.0);
        let rects = squarify(&items(&weights), 0.0, 0.0, w, h);
        let tol = 1e-6;

        for r in &rects {
            assert!(r.x >= -tol && r.y >= -tol);
            assert!(r.right() <= w + tol && r.bottom() <= h + tol);
            assert!(r.w >= 0.0 && r.h >= 0.0);
        }

        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let ix = a.right().min(b.right()) - a.x.max(b.x);
                let iy = a.bottom().min(b.bottom()) - a.y.max(b.y);
                assert!(
                    ix <= tol || iy <= tol,
                    "{} overlaps {}",
                    a.item.name,
                    b.item.name
                );
            }
        }
    }

    #[test]
    fn mixed_magnitudes_stay_inside_target() {
        // xorshift keeps the weight sets reproducible without a rand dependency
        let mut state = 0x9E37_79B9_7F4A_7C15_u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };

        for _ in 0..2_000 {
            let count = 1 + (next() * 40.0) as usize;
            let weights: Vec<f64> = (0..count).map(|_| 10f64.powf(next() * 6.0 - 3.0)).collect();
            let (x, y) = (next() * 50.0, next() * 50.0);
            let (w, h) = (1.0 + next() * 2_000.0, 1.0 + next() * 2_000.0);
            let rects = squarify(&items(&weights), x, y, w, h);
            assert_eq!(rects.len(), count);

            let tol = 1e-9 * w.max(h);
            for r in &rects {
                assert!(r.w >= 0.0 && r.h >= 0.0);
                assert!(r.x >= x - tol && r.y >= y - tol);
                assert!(
                    r.right() <= x + w + tol && r.bottom() <= y + h + tol,
                    "{} at ({}, {}, {}, {}) leaves {w}x{h} at ({x}, {y})",
                    r.item.name,
                    r.x,
                    r.y,
                    r.w,
                    r.h
                );
            }

            let covered: f64 = rects.iter().map(|r| r.w * r.h).sum();
            assert!(close(covered, w * h), "covered {covered} of {}", w * h);
        }
    }

    #[test]
    fn output_is_sorted_by_area_descending() {
        let rects = squarify(&items(&sample_weights()), 0.0, 0.0, 640.0, 360.0);
        for pair in rects.windows(2) {
            assert!(pair[0].area >= pair[1].area);
        }
    }

    #[test]
    fn offset_origin_shifts_geometry() {
        let base = squarify(&items(&[50.0, 30.0, 20.0]), 0.0, 0.0, 100.0, 100.0);
        let shifted = squarify(&items(&[50.0, 30.0, 20.0]), 10.0, 20.0, 100.0, 100.0);
        for (a, b) in base.iter().zip(&shifted) {
            assert_rect(b, a.x + 10.0, a.y + 20.0, a.w, a.h);
        }
    }

    #[test]
    fn scaling_weights_keeps_geometry() {
        let weights = sample_weights();
        let scaled: Vec<f64> = weights.iter().map(|w| w * 37.5).collect();
        let a = squarify(&items(&weights), 0.0, 0.0, 500.0, 300.0);
        let b = squarify(&items(&scaled), 0.0, 0.0, 500.0, 300.0);
        assert_eq!(a.len(), b.len());
        for (ra, rb) in a.iter().zip(&b) {
            assert_eq!(ra.item.name, rb.item.name);
            assert!(close(ra.x, rb.x) && close(ra.y, rb.y));
            assert!(close(ra.w, rb.w) && close(ra.h, rb.h));
        }
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let input = items(&sample_weights());
        let a = squarify(&input, 0.0, 0.0, 333.0, 777.0);
        let b = squarify(&input, 0.0, 0.0, 333.0, 777.0);
        assert_eq!(a, b);
    }

    #[test]
    fn equal_weights_keep_input_order() {
        let rects = squarify(&items(&[1.0, 1.0, 1.0, 1.0]), 0.0, 0.0, 2.0, 2.0);
        let names: Vec<&str> = rects.iter().map(|r| r.item.name.as_str()).collect();
        assert_eq!(names, ["item 1", "item 2", "item 3", "item 4"]);
        assert_rect(&rects[0], 0.0, 0.0, 1.0, 1.0);
        assert_rect(&rects[1], 0.0, 1.0, 1.0, 1.0);
        assert_rect(&rects[2], 1.0, 0.0, 1.0, 1.0);
        assert_rect(&rects[3], 1.0, 1.0, 1.0, 1.0);
    }

    #[test]
    fn zero_weight_items_collapse_but_stay_in_output() {
        let rects = squarify(&items(&[0.0, 3.0, 0.0, 1.0]), 0.0, 0.0, 100.0, 100.0);
        assert_eq!(rects.len(), 4);

        let covered: f64 = rects.iter().map(|r| r.w * r.h).sum();
        assert!(close(covered, 10_000.0));

        for r in rects.iter().filter(|r| r.item.weight == 0.0) {
            assert_eq!(r.area, 0.0);
            assert_eq!(r.w * r.h, 0.0);
            assert!(r.x.is_finite() && r.y.is_finite());
            assert!(r.x <= 100.0 && r.y <= 100.0);
        }
    }

    #[test]
    fn negative_and_nan_weights_count_as_zero() {
        let rects = squarify(&items(&[-4.0, f64::NAN, 2.0]), 0.0, 0.0, 10.0, 10.0);
        assert_eq!(rects.len(), 3);
        assert_rect(&rects[0], 0.0, 0.0, 10.0, 10.0);
        for r in &rects[1..] {
            assert_eq!(r.w, 0.0);
            assert_eq!(r.h, 0.0);
        }
    }

    #[test]
    fn geometry_is_never_nan_or_negative() {
        let cases: [&[f64]; 4] = [
            &[1e-300, 1.0],
            &[1e300, 1.0, 0.0],
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            &[1000.0, 1e-9, 1e-9, 1e-9],
        ];
        for weights in cases {
            for r in squarify(&items(weights), 0.0, 0.0, 1.0, 0.001) {
                for v in [r.x, r.y, r.w, r.h] {
                    assert!(v.is_finite() && v >= 0.0, "bad geometry {v} for {weights:?}");
                }
            }
        }
    }

    #[test]
    fn allocation_sorts_and_scales_areas() {
        let allocated = allocate_areas(&items(&[1.0, 3.0]), 4.0, 2.0).unwrap();
        assert_eq!(allocated[0].item.name, "item 2");
        assert!(close(allocated[0].area, 6.0));
        assert!(close(allocated[1].area, 2.0));
        assert!(allocate_areas(&items(&[1.0]), 0.0, 2.0).is_none());
    }

    #[test]
    fn payload_is_carried_through() {
        #[derive(Clone, Debug, PartialEq)]
        struct Quote {
            symbol: &'static str,
            cap: f64,
            change: f64,
        }
        impl Weighted for Quote {
            fn weight(&self) -> f64 {
                self.cap
            }
        }

        let quotes = [
            Quote { symbol: "A", cap: 1.0, change: -0.4 },
            Quote { symbol: "B", cap: 2.0, change: 1.9 },
        ];
        let rects = squarify(&quotes, 0.0, 0.0, 30.0, 10.0);
        assert_eq!(rects[0].item, quotes[1]);
        assert_eq!(rects[1].item, quotes[0]);
    }
}
