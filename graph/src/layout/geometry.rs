use crate::config::GraphStyle;

/// Vertical offset of both Bézier control points, as a fraction of row height
pub const CURVE_CONTROL_RATIO: f32 = 0.8;

/// A point in renderer coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Connector geometry between two row centres
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Straight {
        from: Point,
        to: Point,
    },
    /// Cubic curve `M from C c1 c2 to`
    Curved {
        from: Point,
        c1: Point,
        c2: Point,
        to: Point,
    },
}

impl Segment {
    pub fn from(&self) -> Point {
        match self {
            Segment::Straight { from, .. } | Segment::Curved { from, .. } => *from,
        }
    }

    pub fn to(&self) -> Point {
        match self {
            Segment::Straight { to, .. } | Segment::Curved { to, .. } => *to,
        }
    }

    /// SVG path data. Angular style replaces the curve by a diagonal.
    pub fn to_path(&self, style: GraphStyle) -> String {
        match (self, style) {
            (Segment::Curved { from, c1, c2, to }, GraphStyle::Rounded) => format!(
                "M {:.2},{:.2} C {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                from.x, from.y, c1.x, c1.y, c2.x, c2.y, to.x, to.y
            ),
            _ => {
                let (from, to) = (self.from(), self.to());
                format!("M {:.2},{:.2} L {:.2},{:.2}", from.x, from.y, to.x, to.y)
            }
        }
    }
}

/// Chooses between a straight segment and an S-curve for a column change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometryResolver {
    column_width: f32,
    offset_x: f32,
}

impl EdgeGeometryResolver {
    pub fn new(column_width: f32, offset_x: f32) -> Self {
        Self {
            column_width,
            offset_x,
        }
    }

    /// Centre x of a column
    pub fn column_x(&self, column: usize) -> f32 {
        self.offset_x + column as f32 * self.column_width
    }

    /// Connect `from_column` at `y1` to `to_column` one row below.
    pub fn resolve(
        &self,
        from_column: usize,
        to_column: usize,
        y1: f32,
        row_height: f32,
    ) -> Segment {
        let x1 = self.column_x(from_column);
        let x2 = self.column_x(to_column);
        let y2 = y1 + row_height;
        if from_column == to_column {
            return Segment::Straight {
                from: Point::new(x1, y1),
                to: Point::new(x2, y2),
            };
        }
        let d = row_height * CURVE_CONTROL_RATIO;
        Segment::Curved {
            from: Point::new(x1, y1),
            c1: Point::new(x1, y1 + d),
            c2: Point::new(x2, y2 - d),
            to: Point::new(x2, y2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_column_is_straight() {
        let geometry = EdgeGeometryResolver::new(16.0, 8.0);
        let segment = geometry.resolve(1, 1, 12.0, 24.0);
        assert_eq!(
            segment,
            Segment::Straight {
                from: Point::new(24.0, 12.0),
                to: Point::new(24.0, 36.0),
            }
        );
        assert_eq!(segment.to_path(GraphStyle::Rounded), "M 24.00,12.00 L 24.00,36.00");
    }

    #[test]
    fn column_change_is_s_curve() {
        let geometry = EdgeGeometryResolver::new(10.0, 0.0);
        let segment = geometry.resolve(0, 2, 0.0, 10.0);
        match segment {
            Segment::Curved { c1, c2, .. } => {
                assert_eq!(c1, Point::new(0.0, 8.0));
                assert_eq!(c2, Point::new(20.0, 2.0));
            }
            other => panic!("expected curve, got {:?}", other),
        }
        assert_eq!(
            segment.to_path(GraphStyle::Rounded),
            "M 0.00,0.00 C 0.00,8.00 20.00,2.00 20.00,10.00"
        );
        assert_eq!(segment.to_path(GraphStyle::Angular), "M 0.00,0.00 L 20.00,10.00");
    }
}
