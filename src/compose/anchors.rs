//! Per-category placement on the shared 400x400 canvas.

use kurbo::{Affine, Vec2};

use crate::model::selection::Category;

/// Where a category's layer sits on the canvas: translate, then uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Offset of the layer's origin in canvas units.
    pub translate: Vec2,
    /// Uniform scale applied to the layer's 400-unit box.
    pub scale: f64,
}

impl Anchor {
    const fn new(dx: f64, dy: f64, scale: f64) -> Self {
        Self {
            translate: Vec2::new(dx, dy),
            scale,
        }
    }

    /// Hand-tuned anchor for `category`.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Shape => Self::new(0.0, 0.0, 1.0),
            Category::Shoes => Self::new(100.0, 300.0, 0.5),
            Category::Uniform => Self::new(75.0, 150.0, 0.625),
            Category::FacialHair => Self::new(150.0, 110.0, 0.25),
            Category::Makeup => Self::new(150.0, 80.0, 0.25),
            Category::Eyewear => Self::new(140.0, 70.0, 0.3),
            Category::Hair => Self::new(110.0, 10.0, 0.45),
            Category::Headwear => Self::new(100.0, -10.0, 0.5),
        }
    }

    /// T(translate) * S(scale).
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// The anchor as an SVG `transform` attribute value.
    pub fn transform_attr(self) -> String {
        let [a, b, c, d, e, f] = self.to_affine().as_coeffs();
        format!("matrix({a} {b} {c} {d} {e} {f})")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/anchors.rs"]
mod tests;
