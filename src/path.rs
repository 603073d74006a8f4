use crate::geometry::Point;

/// Screen geometry of a drawn edge: a straight line between the two node
/// circles and a triangular arrowhead at the target end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    /// Where the line leaves the source circle
    pub start: Point,
    /// Where the line meets the target circle (arrow tip)
    pub end: Point,
    /// The two back corners of the arrowhead
    pub arrow_left: Point,
    pub arrow_right: Point,
}

/// Compute the line between two node circles, clipped to their boundaries.
///
/// # Arguments
/// * `source`, `target` - Node centers
/// * `source_radius`, `target_radius` - Node circle radii
/// * `arrow_size` - Length of the arrowhead sides
/// * `arrow_angle_deg` - Half-angle of the arrowhead
///
/// Coincident centers produce a zero-length line at the source center.
pub fn compute_edge_geometry(
    source: Point,
    source_radius: f32,
    target: Point,
    target_radius: f32,
    arrow_size: f32,
    arrow_angle_deg: f32,
) -> EdgeGeometry {
    let dx = target.x - source.x;
    let dy = target.y - source.y;

    if dx * dx + dy * dy <= f32::EPSILON {
        return EdgeGeometry {
            start: source,
            end: source,
            arrow_left: source,
            arrow_right: source,
        };
    }

    let angle = dy.atan2(dx);
    let (sin, cos) = angle.sin_cos();

    let start = source.offset(source_radius * cos, source_radius * sin);
    let end = target.offset(-target_radius * cos, -target_radius * sin);

    let (arrow_left, arrow_right) = arrowhead(end, angle, arrow_size, arrow_angle_deg);

    EdgeGeometry {
        start,
        end,
        arrow_left,
        arrow_right,
    }
}

/// Back corners of an arrowhead whose tip sits at `tip`, pointing along `angle` (radians).
pub fn arrowhead(tip: Point, angle: f32, arrow_size: f32, arrow_angle_deg: f32) -> (Point, Point) {
    let spread = arrow_angle_deg.to_radians();
    let left = Point::new(
        tip.x - arrow_size * (angle - spread).cos(),
        tip.y - arrow_size * (angle - spread).sin(),
    );
    let right = Point::new(
        tip.x - arrow_size * (angle + spread).cos(),
        tip.y - arrow_size * (angle + spread).sin(),
    );
    (left, right)
}

/// Generate SVG path commands for an edge: the line followed by a closed arrowhead.
///
/// # Returns
/// SVG path command string (e.g., "M 25 0 L 75 0 M 75 0 L 64.6 -6 L 64.6 6 Z")
pub fn generate_edge_path(geometry: &EdgeGeometry) -> String {
    let EdgeGeometry {
        start,
        end,
        arrow_left,
        arrow_right,
    } = geometry;
    format!(
        "M {} {} L {} {} M {} {} L {} {} L {} {} Z",
        start.x,
        start.y,
        end.x,
        end.y,
        end.x,
        end.y,
        arrow_left.x,
        arrow_left.y,
        arrow_right.x,
        arrow_right.y
    )
}

/// Generate SVG path commands for the rubber-band line shown while dragging a new edge.
pub fn generate_preview_path(start: Point, end: Point) -> String {
    format!("M {} {} L {} {}", start.x, start.y, end.x, end.y)
}
