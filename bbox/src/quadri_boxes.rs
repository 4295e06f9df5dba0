//! Batched quadrilateral boxes.

use super::{FlipDirection, QuadriBox, QUADRI_BOX_DIM, TLBR};
use crate::{common::*, Element, Transform, HW};

/// The default margin used by point containment tests.
pub const DEFAULT_INSIDE_EPS: f64 = 0.01;

/// A batch of oriented quadrilaterals.
///
/// The boxes are stored in an array of shape `(..., 8)`. Each trailing
/// lane holds `x1, y1, x2, y2, x3, y3, x4, y4`, and the leading axes form
/// the batch shape. Every transformation returns a new instance backed by
/// a fresh array and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadriBoxes<T> {
    tensor: ArrayD<T>,
}

impl<T> QuadriBoxes<T>
where
    T: Element,
{
    pub fn new<D>(tensor: Array<T, D>) -> Result<Self>
    where
        D: Dimension,
    {
        let tensor = tensor.into_dyn();
        ensure!(
            tensor.ndim() >= 2,
            "the box array must have at least 2 dimensions, but get shape {:?}",
            tensor.shape()
        );
        let box_dim = tensor.shape()[tensor.ndim() - 1];
        ensure!(
            box_dim == QUADRI_BOX_DIM,
            "the last dimension of the box array must be {}, but get {}",
            QUADRI_BOX_DIM,
            box_dim
        );
        Ok(Self { tensor })
    }

    /// Stack boxes into an array of shape `(N, 8)`.
    pub fn from_quads(quads: &[QuadriBox<T>]) -> Self {
        let tensor = Array2::from_shape_fn((quads.len(), QUADRI_BOX_DIM), |(index, coord)| {
            quads[index].to_xy()[coord]
        });
        Self {
            tensor: tensor.into_dyn(),
        }
    }

    /// Convert axis-aligned rectangles to quadrilaterals, shape `(N, 8)`.
    pub fn from_tlbr(rects: &[TLBR<T>]) -> Self {
        let quads: Vec<_> = rects.iter().map(QuadriBox::from_tlbr).collect();
        Self::from_quads(&quads)
    }

    pub fn tensor(&self) -> &ArrayD<T> {
        &self.tensor
    }

    pub fn into_tensor(self) -> ArrayD<T> {
        self.tensor
    }

    /// The shape of the batch, that is the array shape without the trailing 8.
    pub fn batch_shape(&self) -> &[usize] {
        let shape = self.tensor.shape();
        &shape[..(shape.len() - 1)]
    }

    pub fn num_boxes(&self) -> usize {
        self.batch_shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.num_boxes() == 0
    }

    /// Iterate over the boxes in row-major batch order.
    pub fn iter(&self) -> impl Iterator<Item = QuadriBox<T>> + '_ {
        self.tensor
            .lanes(self.box_axis())
            .into_iter()
            .map(QuadriBox::from_lane)
    }

    /// Box centers with shape `(..., 2)`.
    pub fn centers(&self) -> ArrayD<T> {
        self.map_to_points(|quad| quad.center())
    }

    pub fn areas(&self) -> ArrayD<T> {
        self.map_to_scalars(|quad| quad.area())
    }

    pub fn widths(&self) -> ArrayD<T> {
        self.map_to_scalars(|quad| quad.width())
    }

    pub fn heights(&self) -> ArrayD<T> {
        self.map_to_scalars(|quad| quad.height())
    }

    /// The enclosing axis-aligned rectangles in the batch shape.
    pub fn bounding_rects(&self) -> ArrayD<TLBR<T>> {
        self.map_to_scalars(|quad| quad.bounding_rect())
    }

    /// Mirror the boxes within an image of size `img_shape`.
    pub fn flip(&self, img_shape: &HW<T>, direction: FlipDirection) -> Self {
        let h = img_shape.h();
        let w = img_shape.w();

        self.map_boxes(|quad| {
            quad.map_corners(|[x, y]| match direction {
                FlipDirection::Horizontal => [w - x, y],
                FlipDirection::Vertical => [x, h - y],
                FlipDirection::Diagonal => [w - x, h - y],
            })
        })
    }

    /// Shift the boxes by `[dx, dy]`.
    pub fn translate(&self, offset: [T; 2]) -> Self {
        self.transform(&Transform::from_offset(offset))
    }

    /// Return a copy of the boxes.
    ///
    /// Clamping the corners of an oriented box to the image changes its
    /// shape, so the boxes are left as they are.
    pub fn clip(&self, img_shape: &HW<T>) -> Self {
        warn!(
            "clipping quadrilateral boxes to {:?}x{:?} keeps the boxes unchanged",
            img_shape.h(),
            img_shape.w()
        );
        self.clone()
    }

    /// Rotate the boxes about `center` by `angle` degrees.
    ///
    /// Positive angles rotate counter-clockwise as seen on an image whose
    /// y axis points down.
    pub fn rotate(&self, center: [T; 2], angle: T) -> Self {
        let [cx, cy] = center;
        let (sin, cos) = angle.to_radians().sin_cos();

        self.map_boxes(|quad| {
            quad.map_corners(|[x, y]| {
                let dx = x - cx;
                let dy = y - cy;
                [cx + cos * dx + sin * dy, cy - sin * dx + cos * dy]
            })
        })
    }

    /// Apply a 3x3 homography to every corner.
    pub fn project(&self, matrix: ArrayView2<'_, T>) -> Result<Self> {
        ensure!(
            matrix.shape() == [3, 3],
            "the projection matrix must have shape [3, 3], but get {:?}",
            matrix.shape()
        );
        let m = |row: usize, col: usize| matrix[[row, col]];

        Ok(self.map_boxes(|quad| {
            quad.map_corners(|[x, y]| {
                let px = m(0, 0) * x + m(0, 1) * y + m(0, 2);
                let py = m(1, 0) * x + m(1, 1) * y + m(1, 2);
                let pz = m(2, 0) * x + m(2, 1) * y + m(2, 2);
                [px / pz, py / pz]
            })
        }))
    }

    /// Scale the coordinates by `[sx, sy]`, or divide by them when `mapping_back` is set.
    pub fn rescale(&self, scale_factor: [T; 2], mapping_back: bool) -> Self {
        let [sx, sy] = scale_factor;
        let scale = if mapping_back {
            [T::one() / sx, T::one() / sy]
        } else {
            [sx, sy]
        };
        self.transform(&Transform::from_scale(scale))
    }

    /// Scale every box about its own center.
    ///
    /// Both factors must be equal so that the box shape is kept.
    pub fn resize_bboxes(&self, scale_factor: [T; 2]) -> Result<Self> {
        let [sx, sy] = scale_factor;
        ensure!(
            sx == sy,
            "the scaling factors must be equal to keep the box shape, but get {:?} and {:?}",
            sx,
            sy
        );

        Ok(self.map_boxes(|quad| {
            let [cx, cy] = quad.center();
            quad.map_corners(|[x, y]| [(x - cx) * sx + cx, (y - cy) * sy + cy])
        }))
    }

    pub fn transform(&self, transform: &Transform<T>) -> Self {
        self.map_boxes(|quad| quad.transform(transform))
    }

    /// Test the boxes against the image area, returning a mask in the batch shape.
    ///
    /// By default the box center must lie strictly inside the image
    /// extended by `allowed_border`. With `all_inside`, every corner must
    /// lie within that area instead.
    pub fn is_inside(
        &self,
        img_shape: &HW<T>,
        all_inside: bool,
        allowed_border: T,
    ) -> ArrayD<bool> {
        let max_x = img_shape.w() + allowed_border;
        let max_y = img_shape.h() + allowed_border;
        let min = -allowed_border;

        self.map_to_scalars(|quad| {
            if all_inside {
                quad.corners()
                    .iter()
                    .all(|&[x, y]| x >= min && x <= max_x && y >= min && y <= max_y)
            } else {
                let [cx, cy] = quad.center();
                cx > min && cx < max_x && cy > min && cy < max_y
            }
        })
    }

    /// Test whether the box centers fall inside the image.
    pub fn is_bboxes_inside(&self, img_shape: &HW<T>) -> ArrayD<bool> {
        self.is_inside(img_shape, false, T::zero())
    }

    /// Test every point of an `(M, 2)` array against every box.
    ///
    /// The result has shape `(M, N)` where `N` is [QuadriBoxes::num_boxes].
    pub fn find_inside_points(&self, points: ArrayView2<'_, T>) -> Result<Array2<bool>> {
        self.find_inside_points_with_eps(points, default_eps()?)
    }

    pub fn find_inside_points_with_eps(
        &self,
        points: ArrayView2<'_, T>,
        eps: T,
    ) -> Result<Array2<bool>> {
        ensure_point_array(&points)?;
        let quads: Vec<_> = self.iter().collect();

        let mask = Array2::from_shape_fn((points.nrows(), quads.len()), |(pi, bi)| {
            quads[bi].contains_point([points[[pi, 0]], points[[pi, 1]]], eps)
        });
        Ok(mask)
    }

    /// Test the i-th point against the i-th box, returning a mask of length `N`.
    pub fn find_inside_points_aligned(&self, points: ArrayView2<'_, T>) -> Result<Vec<bool>> {
        ensure_point_array(&points)?;
        ensure!(
            points.nrows() == self.num_boxes(),
            "expect {} points to align with boxes, but get {}",
            self.num_boxes(),
            points.nrows()
        );
        let eps = default_eps()?;

        let mask = self
            .iter()
            .zip(points.outer_iter())
            .map(|(quad, point)| quad.contains_point([point[0], point[1]], eps))
            .collect();
        Ok(mask)
    }

    fn box_axis(&self) -> Axis {
        Axis(self.tensor.ndim() - 1)
    }

    fn map_boxes<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&QuadriBox<T>) -> QuadriBox<T>,
    {
        let mut tensor = self.tensor.clone();
        let axis = self.box_axis();

        tensor.lanes_mut(axis).into_iter().for_each(|mut lane| {
            let quad = f(&QuadriBox::from_lane(lane.view()));
            lane.iter_mut()
                .zip(quad.to_xy())
                .for_each(|(dst, src)| *dst = src);
        });

        Self { tensor }
    }

    fn map_to_scalars<B, F>(&self, mut f: F) -> ArrayD<B>
    where
        F: FnMut(&QuadriBox<T>) -> B,
    {
        self.tensor
            .map_axis(self.box_axis(), |lane| f(&QuadriBox::from_lane(lane)))
    }

    fn map_to_points<F>(&self, mut f: F) -> ArrayD<T>
    where
        F: FnMut(&QuadriBox<T>) -> [T; 2],
    {
        let shape: Vec<_> = self.batch_shape().iter().copied().chain([2]).collect();
        let mut points = ArrayD::zeros(IxDyn(&shape));
        let axis = self.box_axis();

        points
            .lanes_mut(axis)
            .into_iter()
            .zip(self.tensor.lanes(axis))
            .for_each(|(mut point, lane)| {
                let [x, y] = f(&QuadriBox::from_lane(lane));
                point[0] = x;
                point[1] = y;
            });

        points
    }
}

impl<T> TryFrom<ArrayD<T>> for QuadriBoxes<T>
where
    T: Element,
{
    type Error = anyhow::Error;

    fn try_from(tensor: ArrayD<T>) -> Result<Self> {
        Self::new(tensor)
    }
}

fn default_eps<T>() -> Result<T>
where
    T: Element,
{
    T::from(DEFAULT_INSIDE_EPS).ok_or_else(|| {
        format_err!(
            "unable to represent {} in the element type",
            DEFAULT_INSIDE_EPS
        )
    })
}

fn ensure_point_array<T>(points: &ArrayView2<'_, T>) -> Result<()> {
    ensure!(
        points.ncols() == 2,
        "points must have shape [M, 2], but get {:?}",
        points.shape()
    );
    Ok(())
}
