// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;

use kurbo::Affine;

use super::{Derivation, Derived, EffectKind, GeometryEffect};
use crate::filter::FilterOptions;
use crate::geometry::GeometryNode;
use crate::node::{Invalidatable as _, Node as _, NodeBase};
use crate::transform::Transform;

/// Derivation of [`GeometryTransform`].
pub struct TransformDerivation {
    transform: Rc<dyn Transform>,
}

impl core::fmt::Debug for TransformDerivation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransformDerivation")
            .field("transform", &self.transform.id())
            .finish()
    }
}

impl Derivation for TransformDerivation {
    const KIND: EffectKind = EffectKind::Transform;

    fn derive(&self, child: &dyn GeometryNode, _: &FilterOptions) -> Derived {
        let mut path = child.as_path();
        path.transform(self.transform.matrix());
        Derived::applied(path)
    }

    fn for_each_dependency(&self, f: &mut dyn FnMut(&NodeBase)) {
        f(self.transform.base());
    }

    fn revalidate_dependencies(&self) {
        // Only the matrix matters; its bounds and damage do not.
        self.transform.revalidate(None, Affine::IDENTITY);
    }
}

/// Maps the child's path through a [`Transform`] node.
///
/// The transform is observed alongside the child, so changing either
/// invalidates the effect.
pub type GeometryTransform = GeometryEffect<TransformDerivation>;

impl GeometryEffect<TransformDerivation> {
    /// Creates an effect mapping `child` through `transform`.
    #[must_use]
    pub fn new(child: Rc<dyn GeometryNode>, transform: Rc<dyn Transform>) -> Rc<Self> {
        Self::with_derivation(child, TransformDerivation { transform })
    }

    /// Returns the transform.
    #[must_use]
    pub fn transform(&self) -> &Rc<dyn Transform> {
        &self.derivation.transform
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::*;
    use crate::effect::test_util::square;
    use crate::geometry::Path;
    use crate::node::{Invalidatable as _, Node as _};
    use crate::transform::{Concat, Matrix};

    #[test]
    fn scale_doubles_coordinates_and_bounds() {
        let child = Path::from_bez(square(10.0));
        let effect = GeometryTransform::new(child, Matrix::new(Affine::scale(2.0)));
        let bounds = effect.revalidate(None, Affine::IDENTITY);
        assert_eq!(bounds, Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(effect.as_path().bez(), &(Affine::scale(2.0) * square(10.0)));
        assert!(effect.contains(Point::new(15.0, 15.0)));
    }

    #[test]
    fn transform_changes_invalidate() {
        let child = Path::from_bez(square(10.0));
        let matrix = Matrix::new(Affine::IDENTITY);
        let effect = GeometryTransform::new(child.clone(), matrix.clone());
        effect.revalidate(None, Affine::IDENTITY);
        assert!(!matrix.has_inval());

        matrix.set_matrix(Affine::translate((5.0, 0.0)));
        assert!(effect.has_inval());
        assert!(!child.has_inval());
        assert_eq!(
            effect.revalidate(None, Affine::IDENTITY),
            Rect::new(5.0, 0.0, 15.0, 10.0)
        );
    }

    #[test]
    fn composite_transforms_are_revalidated_first() {
        let child = Path::from_bez(square(1.0));
        let concat = Concat::new(
            Matrix::new(Affine::translate((1.0, 1.0))),
            Matrix::new(Affine::scale(3.0)),
        );
        let effect = GeometryTransform::new(child, concat.clone());
        assert!(concat.has_inval());
        assert_eq!(
            effect.revalidate(None, Affine::IDENTITY),
            Rect::new(1.0, 1.0, 4.0, 4.0)
        );
        assert!(!concat.has_inval());
    }

    #[test]
    fn dropping_the_effect_unregisters_from_both() {
        let child = Path::from_bez(square(10.0));
        let matrix = Matrix::new(Affine::IDENTITY);
        let effect = GeometryTransform::new(child.clone(), matrix.clone());
        assert_eq!(matrix.base().observer_count(), 1);
        assert_eq!(effect.transform().id(), matrix.id());

        drop(effect);
        assert_eq!(matrix.base().observer_count(), 0);
        assert_eq!(child.base().observer_count(), 0);
    }
}
