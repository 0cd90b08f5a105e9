use crate::geom::Point;

/// Positions for `count` nodes on a square grid whose first cell sits at
/// `(max_radius + margin, max_radius + margin)`, filled row by row.
pub fn grid_positions(count: usize, max_radius: f64, margin: f64, spacing: f64) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let side = (count as f64).sqrt().ceil() as usize;
    let origin = max_radius + margin;
    (0..count)
        .map(|idx| {
            Point::new(
                origin + (idx % side) as f64 * spacing,
                origin + (idx / side) as f64 * spacing,
            )
        })
        .collect()
}
