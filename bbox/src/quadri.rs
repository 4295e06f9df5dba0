use super::TLBR;
use crate::{common::*, Element, Transform};

/// Number of scalars describing one quadrilateral.
pub const QUADRI_BOX_DIM: usize = 8;

/// An oriented quadrilateral given by four `[x, y]` corners.
///
/// The corners are kept in their input order. Geometry that depends on
/// the winding, such as [QuadriBox::width], assumes consecutive corners
/// are connected by an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadriBox<T> {
    pub(crate) corners: [[T; 2]; 4],
}

impl<T> QuadriBox<T>
where
    T: Element,
{
    pub fn from_corners(corners: [[T; 2]; 4]) -> Self {
        Self { corners }
    }

    /// Build from interleaved `[x1, y1, x2, y2, x3, y3, x4, y4]`.
    pub fn from_xy(xy: [T; QUADRI_BOX_DIM]) -> Self {
        let [x1, y1, x2, y2, x3, y3, x4, y4] = xy;
        Self {
            corners: [[x1, y1], [x2, y2], [x3, y3], [x4, y4]],
        }
    }

    pub fn try_from_slice(xy: &[T]) -> Result<Self> {
        ensure!(
            xy.len() == QUADRI_BOX_DIM,
            "expect {} coordinates, but get {}",
            QUADRI_BOX_DIM,
            xy.len()
        );
        let mut buf = [T::zero(); QUADRI_BOX_DIM];
        buf.copy_from_slice(xy);
        Ok(Self::from_xy(buf))
    }

    pub(crate) fn from_lane(lane: ArrayView1<'_, T>) -> Self {
        let mut buf = [T::zero(); QUADRI_BOX_DIM];
        buf.iter_mut().zip(lane.iter()).for_each(|(dst, &src)| *dst = src);
        Self::from_xy(buf)
    }

    /// The corners of an axis-aligned rectangle, clockwise on screen from top-left.
    pub fn from_tlbr(tlbr: &TLBR<T>) -> Self {
        Self::from_corners(tlbr.corners())
    }

    pub fn corners(&self) -> &[[T; 2]; 4] {
        &self.corners
    }

    pub fn to_xy(&self) -> [T; QUADRI_BOX_DIM] {
        let [[x1, y1], [x2, y2], [x3, y3], [x4, y4]] = self.corners;
        [x1, y1, x2, y2, x3, y3, x4, y4]
    }

    pub fn map_corners<F>(&self, mut f: F) -> Self
    where
        F: FnMut([T; 2]) -> [T; 2],
    {
        let [c1, c2, c3, c4] = self.corners;
        Self {
            corners: [f(c1), f(c2), f(c3), f(c4)],
        }
    }

    pub fn transform(&self, transform: &Transform<T>) -> Self {
        self.map_corners(|point| transform.apply(point))
    }

    /// The mean of the corners.
    pub fn center(&self) -> [T; 2] {
        let two = T::one() + T::one();
        let four = two + two;
        let [sx, sy] = self
            .corners
            .iter()
            .fold([T::zero(), T::zero()], |[sx, sy], &[x, y]| [sx + x, sy + y]);
        [sx / four, sy / four]
    }

    /// The enclosed area by the shoelace formula.
    pub fn area(&self) -> T {
        let two = T::one() + T::one();
        let twice_area = self
            .edges()
            .fold(T::zero(), |sum, ([x1, y1], [x2, y2])| sum + x1 * y2 - x2 * y1);
        twice_area.abs() / two
    }

    /// The length of the edge from the first to the second corner.
    pub fn width(&self) -> T {
        let [[x1, y1], [x2, y2], _, _] = self.corners;
        (x2 - x1).hypot(y2 - y1)
    }

    /// The extent perpendicular to the first edge, that is the area over the width.
    pub fn height(&self) -> T {
        let width = self.width();
        if width == T::zero() {
            return T::zero();
        }
        self.area() / width
    }

    pub fn bounding_rect(&self) -> TLBR<T> {
        let [[x, y], ..] = self.corners;
        let init = TLBR {
            t: y,
            l: x,
            b: y,
            r: x,
        };
        self.corners.iter().fold(init, |rect, &[x, y]| TLBR {
            t: rect.t.min(y),
            l: rect.l.min(x),
            b: rect.b.max(y),
            r: rect.r.max(x),
        })
    }

    /// Test whether a point lies strictly inside a convex quadrilateral.
    ///
    /// The edge function `A x + B y + C` of every edge line must have the
    /// same sign with magnitude at least `eps` at the point, so points on
    /// the border are outside. Either winding order is accepted.
    pub fn contains_point(&self, [px, py]: [T; 2], eps: T) -> bool {
        let (all_pos, all_neg) =
            self.edges()
                .fold((true, true), |(all_pos, all_neg), ([x1, y1], [x2, y2])| {
                    let a = y1 - y2;
                    let b = x2 - x1;
                    let c = -(a * x1 + b * y1);
                    let value = a * px + b * py + c;
                    (all_pos && value >= eps, all_neg && value <= -eps)
                });
        all_pos || all_neg
    }

    /// Pairs of consecutive corners, wrapping around to the first.
    fn edges(&self) -> impl Iterator<Item = ([T; 2], [T; 2])> + '_ {
        (0..4).map(move |index| (self.corners[index], self.corners[(index + 1) % 4]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn parallelogram() -> QuadriBox<f64> {
        QuadriBox::from_xy([10.0, 10.0, 20.0, 10.0, 24.0, 20.0, 14.0, 20.0])
    }

    #[test]
    fn quadri_box_geometry() {
        let quad = parallelogram();
        let [cx, cy] = quad.center();
        assert_abs_diff_eq!(cx, 17.0);
        assert_abs_diff_eq!(cy, 15.0);
        assert_abs_diff_eq!(quad.area(), 100.0);
        assert_abs_diff_eq!(quad.width(), 10.0);
        assert_abs_diff_eq!(quad.height(), 10.0);
    }

    #[test]
    fn quadri_box_area_ignores_winding() {
        let [c1, c2, c3, c4] = *parallelogram().corners();
        let reversed = QuadriBox::from_corners([c4, c3, c2, c1]);
        assert_abs_diff_eq!(reversed.area(), 100.0);
        assert!(reversed.contains_point([17.0, 15.0], 0.01));
    }

    #[test]
    fn quadri_box_degenerate_height() {
        let quad = QuadriBox::from_xy([1.0, 1.0, 1.0, 1.0, 3.0, 4.0, 0.0, 4.0]);
        assert_abs_diff_eq!(quad.width(), 0.0);
        assert_abs_diff_eq!(quad.height(), 0.0);
    }

    #[test]
    fn quadri_box_bounding_rect() {
        let rect = parallelogram().bounding_rect();
        assert_eq!(rect, TLBR::from_tlbr([10.0, 10.0, 20.0, 24.0]));

        let quad = QuadriBox::from_tlbr(&rect);
        assert_eq!(
            quad.to_xy(),
            [10.0, 10.0, 24.0, 10.0, 24.0, 20.0, 10.0, 20.0]
        );
    }

    #[test]
    fn quadri_box_border_point_is_outside() {
        let quad = parallelogram();
        assert!(!quad.contains_point([15.0, 10.0], 0.01));
        assert!(quad.contains_point([15.0, 10.5], 0.01));
    }

    #[test]
    fn quadri_box_from_slice() {
        assert!(QuadriBox::<f32>::try_from_slice(&[1.0; 7]).is_err());
        let quad = QuadriBox::try_from_slice(&parallelogram().to_xy()).unwrap();
        assert_eq!(quad, parallelogram());
    }
}
