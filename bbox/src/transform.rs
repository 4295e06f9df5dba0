use super::{QuadriBox, QuadriBoxes, Rect, TLBR};
use crate::{common::*, Element, HW};

/// Axis-aligned scaling followed by an offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sy: T,
    pub sx: T,
    pub ty: T,
    pub tx: T,
}

impl<T> Transform<T>
where
    T: Copy + Num,
{
    pub fn from_scale([sx, sy]: [T; 2]) -> Self {
        Self {
            sy,
            sx,
            ty: T::zero(),
            tx: T::zero(),
        }
    }

    pub fn from_offset([tx, ty]: [T; 2]) -> Self {
        Self {
            sy: T::one(),
            sx: T::one(),
            ty,
            tx,
        }
    }

    /// Map a point given in `[x, y]` order.
    pub fn apply(&self, [x, y]: [T; 2]) -> [T; 2] {
        [x * self.sx + self.tx, y * self.sy + self.ty]
    }
}

impl<T> Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn from_rects<R>(src: &R, tgt: &R) -> Self
    where
        R: Rect<Type = T>,
    {
        let sy = tgt.h() / src.h();
        let sx = tgt.w() / src.w();
        let ty = tgt.t() - src.t() * sy;
        let tx = tgt.l() - src.l() * sx;

        Self { sy, sx, ty, tx }
    }

    pub fn try_from_sizes_exact(src_size: &HW<T>, tgt_size: &HW<T>) -> Result<Self> {
        let src = TLBR::try_from_tlhw([T::zero(), T::zero(), src_size.h(), src_size.w()])?;
        let tgt = TLBR::try_from_tlhw([T::zero(), T::zero(), tgt_size.h(), tgt_size.w()])?;
        Ok(Self::from_rects(&src, &tgt))
    }

    /// Scale the source size to fit the target while keeping the aspect
    /// ratio, and center it on the target.
    pub fn try_from_sizes_letterbox(src_size: &HW<T>, tgt_size: &HW<T>) -> Result<Self> {
        let (new_h, new_w) = if tgt_size.h() * src_size.w() <= tgt_size.w() * src_size.h() {
            let new_h = tgt_size.h();
            let new_w = src_size.w() * tgt_size.h() / src_size.h();
            (new_h, new_w)
        } else {
            let new_h = src_size.h() * tgt_size.w() / src_size.w();
            let new_w = tgt_size.w();
            (new_h, new_w)
        };

        let two = T::one() + T::one();
        let off_y = (tgt_size.h() - new_h) / two;
        let off_x = (tgt_size.w() - new_w) / two;

        let src = TLBR::try_from_tlhw([T::zero(), T::zero(), src_size.h(), src_size.w()])?;
        let tgt = TLBR::try_from_tlhw([off_y, off_x, new_h, new_w])?;

        Ok(Self::from_rects(&src, &tgt))
    }
}

impl<T> Transform<T>
where
    T: Copy + Num + Neg<Output = T>,
{
    pub fn inverse(&self) -> Self {
        let sy = T::one() / self.sy;
        let sx = T::one() / self.sx;
        let ty = -self.ty / self.sy;
        let tx = -self.tx / self.sx;

        Self { sy, sx, ty, tx }
    }
}

impl<T> Mul<&TLBR<T>> for &Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    type Output = TLBR<T>;

    fn mul(self, rhs: &TLBR<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&QuadriBox<T>> for &Transform<T>
where
    T: Element,
{
    type Output = QuadriBox<T>;

    fn mul(self, rhs: &QuadriBox<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&QuadriBoxes<T>> for &Transform<T>
where
    T: Element,
{
    type Output = QuadriBoxes<T>;

    fn mul(self, rhs: &QuadriBoxes<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&Transform<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = Transform<T>;

    fn mul(self, rhs: &Transform<T>) -> Self::Output {
        Transform {
            sx: self.sx * rhs.sx,
            sy: self.sy * rhs.sy,
            tx: rhs.tx * self.sx + self.tx,
            ty: rhs.ty * self.sy + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_transform_inverse() {
        let orig = Transform {
            sx: 2.0,
            sy: 2.0,
            tx: 1.0,
            ty: 1.0,
        };
        assert_eq!(orig.inverse().inverse(), orig);
        assert_eq!(&orig * &orig.inverse(), Transform::from_scale([1.0, 1.0]));
    }

    #[test]
    fn rect_resize_exact() {
        let transform = Transform::try_from_sizes_exact(
            &HW::from_hw([80.0, 80.0]),
            &HW::from_hw([20.0, 40.0]),
        )
        .unwrap();
        let expect = Transform {
            sx: 0.5,
            sy: 0.25,
            tx: 0.0,
            ty: 0.0,
        };
        assert_eq!(transform, expect);
    }

    #[test]
    fn rect_resize_letterbox() {
        let transform = Transform::try_from_sizes_letterbox(
            &HW::from_hw([80.0, 80.0]),
            &HW::from_hw([20.0, 40.0]),
        )
        .unwrap();
        let expect = Transform {
            sx: 0.25,
            sy: 0.25,
            tx: 10.0,
            ty: 0.0,
        };
        assert_eq!(transform, expect);

        let rect = &transform * &TLBR::from_tlbr([0.0, 0.0, 80.0, 80.0]);
        assert_eq!(rect, TLBR::from_tlbr([0.0, 10.0, 20.0, 30.0]));
    }
}
