//! Scene tree: the spatial index over every renderable object.

use crate::error::{SceneError, SceneResult};
use crate::hit::{RaycastHit, Spatial};
use crate::kd_tree::{KdStats, KdTree, KdTreeConfig};
use crate::primitive::Primitive;
use lantern_math::{Aabb, Interval, Mat4, Plane, PlaneSide, Ray};

/// A primitive with a material assignment.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub primitive: Primitive,
    /// Index into the render context's material list
    pub material: usize,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, primitive: impl Into<Primitive>, material: usize) -> Self {
        Self {
            name: name.into(),
            primitive: primitive.into(),
            material,
        }
    }

    /// Place the object in the world.
    pub fn with_transform(mut self, matrix: Mat4) -> Self {
        self.primitive.transform(&matrix);
        self
    }
}

impl Spatial for SceneObject {
    fn bounds(&self) -> Aabb {
        self.primitive.bounds()
    }

    fn side_of_plane(&self, plane: &Plane) -> PlaneSide {
        self.primitive.side_of_plane(plane)
    }

    fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit> {
        self.primitive.intersect_ray(ray, ray_t)
    }
}

/// All renderable objects of a scene, indexed by a KD-tree.
///
/// Adding objects marks the tree dirty; `optimize` rebuilds it.
pub struct SceneTree {
    tree: KdTree<SceneObject>,
    dirty: bool,
}

impl SceneTree {
    pub fn new(config: KdTreeConfig) -> Self {
        Self {
            tree: KdTree::new(config),
            dirty: false,
        }
    }

    /// Add an object, returning its index.
    pub fn add(&mut self, object: SceneObject) -> SceneResult<usize> {
        if object.primitive.is_degenerate() {
            return Err(SceneError::DegeneratePrimitive {
                index: self.tree.len(),
            });
        }
        self.dirty = true;
        Ok(self.tree.push(object))
    }

    /// Rebuild the index over the current objects.
    pub fn optimize(&mut self) {
        self.tree.optimize();
        self.dirty = false;

        let stats = self.tree.stats();
        log::info!(
            "Scene tree built: {} objects, {} nodes, {} leaves",
            self.tree.len(),
            stats.node_count,
            stats.leaf_count
        );
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.tree.elements()
    }

    pub fn object(&self, index: usize) -> Option<&SceneObject> {
        self.tree.get(index)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        self.tree.bounds()
    }

    pub fn stats(&self) -> KdStats {
        self.tree.stats()
    }

    pub fn tree(&self) -> &KdTree<SceneObject> {
        &self.tree
    }

    /// Nearest hit along the ray; `hit.element` indexes `objects()`.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        self.tree.intersect_ray(ray, max_distance)
    }

    pub fn is_occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.tree.is_occluded(ray, max_distance)
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new(KdTreeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Sphere, Triangle};
    use lantern_math::Vec3;

    #[test]
    fn test_add_marks_dirty() {
        let mut scene = SceneTree::default();
        assert!(!scene.is_dirty());

        scene
            .add(SceneObject::new("ball", Sphere::new(Vec3::ZERO, 1.0), 0))
            .unwrap();
        assert!(scene.is_dirty());

        scene.optimize();
        assert!(!scene.is_dirty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_degenerate_primitives_rejected() {
        let mut scene = SceneTree::default();
        scene
            .add(SceneObject::new("ball", Sphere::new(Vec3::ZERO, 1.0), 0))
            .unwrap();

        let err = scene
            .add(SceneObject::new(
                "sliver",
                Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 3.0),
                0,
            ))
            .unwrap_err();
        assert_eq!(err, SceneError::DegeneratePrimitive { index: 1 });
        assert_eq!(scene.len(), 1);

        let err = scene
            .add(SceneObject::new("dot", Sphere::new(Vec3::ONE, 0.0), 0))
            .unwrap_err();
        assert_eq!(err, SceneError::DegeneratePrimitive { index: 1 });
    }

    #[test]
    fn test_raycast_reports_object_index() {
        let mut scene = SceneTree::default();
        for i in 0..20 {
            let center = Vec3::new(i as f32 * 3.0, 0.0, 0.0);
            scene
                .add(SceneObject::new(format!("ball{}", i), Sphere::new(center, 1.0), 0))
                .unwrap();
        }
        scene.optimize();

        let ray = Ray::new(Vec3::new(30.0, 5.0, 0.0), -Vec3::Y);
        let hit = scene.raycast(&ray, f32::INFINITY).unwrap();
        assert_eq!(hit.element, 10);
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert_eq!(scene.object(hit.element).unwrap().name, "ball10");
    }

    #[test]
    fn test_empty_scene_all_rays_miss() {
        let mut scene = SceneTree::default();
        scene.optimize();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.4, 0.5));
        assert!(scene.raycast(&ray, f32::INFINITY).is_none());
        assert!(!scene.is_occluded(&ray, 100.0));
    }

    #[test]
    fn test_with_transform() {
        let object = SceneObject::new("ball", Sphere::new(Vec3::ZERO, 1.0), 0)
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)));

        assert!((object.bounds().center().y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_scaled_sphere_raycast_matches_direct_test() {
        let object = SceneObject::new("ellipsoid", Sphere::new(Vec3::ZERO, 1.0), 0)
            .with_transform(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        let mut scene = SceneTree::default();
        scene.add(object.clone()).unwrap();
        scene.optimize();

        // Passes above the unscaled box but through the scaled sphere
        let ray = Ray::new(Vec3::new(0.0, 1.5, -5.0), Vec3::Z);
        let direct = object
            .intersect_ray(&ray, Interval::new(crate::hit::RAY_EPSILON, f32::INFINITY))
            .expect("scaled sphere should be hit");
        let hit = scene.raycast(&ray, f32::INFINITY).expect("tree should find the hit");

        assert!((hit.distance - direct.distance).abs() < 1e-4);
        let bounds = object.bounds();
        assert!(bounds.max.y >= 2.0 - 1e-5 && bounds.min.z <= -2.0 + 1e-5);
    }
}
