//! KD-tree spatial index.
//!
//! Elements are stored once in a flat vector; nodes hold indices into it.
//! Internal nodes own exactly two boxed children whose bounds partition the
//! parent's bounds at `split_point` along `axis`. Elements straddling the
//! split plane are referenced from both children.
//!
//! Traversal visits the child containing the ray origin first and only
//! descends into the far child when no hit was found before the split plane.

use crate::hit::{RaycastHit, Spatial, RAY_EPSILON};
use lantern_math::{Aabb, Interval, Plane, PlaneSide, Ray};
use serde::{Deserialize, Serialize};

/// How split positions are chosen when subdividing a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Split halfway along the node bounds.
    #[default]
    Midpoint,
    /// Minimise the surface area heuristic over element boundaries.
    SurfaceArea,
    /// Split at the element boundary nearest to the mean element center.
    MedianElement,
}

/// Build parameters for a `KdTree`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KdTreeConfig {
    /// Nodes with at most this many elements become leaves
    pub max_elements_per_leaf: usize,
    /// Nodes at this depth become leaves
    pub max_depth: usize,
    /// Outward bias applied to candidate split positions
    pub position_epsilon: f32,
    /// Abandon a split when more than this fraction of elements straddle it
    pub overlap_rejection_ratio: Option<f32>,
    pub split_strategy: SplitStrategy,
    /// SAH cost of visiting an internal node
    pub traversal_cost: f32,
    /// SAH cost of testing one element
    pub intersection_cost: f32,
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self {
            max_elements_per_leaf: 8,
            max_depth: 20,
            position_epsilon: 1e-4,
            overlap_rejection_ratio: Some(0.75),
            split_strategy: SplitStrategy::Midpoint,
            traversal_cost: 1.0,
            intersection_cost: 1.5,
        }
    }
}

impl KdTreeConfig {
    pub fn with_split_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.split_strategy = strategy;
        self
    }

    pub fn with_max_elements_per_leaf(mut self, count: usize) -> Self {
        self.max_elements_per_leaf = count;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_overlap_rejection_ratio(mut self, ratio: Option<f32>) -> Self {
        self.overlap_rejection_ratio = ratio;
        self
    }
}

/// Why a node stopped subdividing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafReason {
    /// Element count is within the per-leaf limit
    Small,
    /// Maximum depth reached
    DepthLimit,
    /// Too many elements straddled the best split plane
    Overlap,
    /// The node bounds have no usable extent along the split axis
    Degenerate,
}

/// A node of the tree.
#[derive(Debug)]
pub enum KdNode {
    Leaf {
        elements: Vec<usize>,
        reason: LeafReason,
    },
    Split {
        axis: usize,
        split_point: f32,
        lower: Box<KdNode>,
        upper: Box<KdNode>,
    },
}

impl KdNode {
    fn empty() -> Self {
        KdNode::Leaf {
            elements: Vec::new(),
            reason: LeafReason::Small,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, KdNode::Leaf { .. })
    }
}

/// Read-only view of one leaf, used for inspection and tests.
#[derive(Debug, Clone)]
pub struct LeafInfo<'a> {
    pub bounds: Aabb,
    pub depth: usize,
    pub elements: &'a [usize],
    pub reason: LeafReason,
}

/// Summary counts of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KdStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
    /// Total element references across leaves (counts duplicates)
    pub element_refs: usize,
}

/// KD-tree over any `Spatial` element type.
pub struct KdTree<T: Spatial> {
    elements: Vec<T>,
    root: KdNode,
    bounds: Aabb,
    config: KdTreeConfig,
}

impl<T: Spatial> KdTree<T> {
    /// Create an empty tree.
    pub fn new(config: KdTreeConfig) -> Self {
        Self {
            elements: Vec::new(),
            root: KdNode::empty(),
            bounds: Aabb::empty(),
            config,
        }
    }

    /// Create a tree over `elements` and build it immediately.
    pub fn build(elements: Vec<T>, config: KdTreeConfig) -> Self {
        let mut tree = Self {
            elements,
            root: KdNode::empty(),
            bounds: Aabb::empty(),
            config,
        };
        tree.optimize();
        tree
    }

    /// Append an element. It becomes visible to rays after the next `optimize`.
    pub fn push(&mut self, element: T) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn config(&self) -> &KdTreeConfig {
        &self.config
    }

    pub fn root(&self) -> &KdNode {
        &self.root
    }

    /// Rebuild the whole tree from the current element list.
    pub fn optimize(&mut self) {
        self.bounds = self
            .elements
            .iter()
            .fold(Aabb::empty(), |acc, e| acc.union(&e.bounds()));

        let indices: Vec<usize> = (0..self.elements.len()).collect();
        self.root = if indices.is_empty() {
            KdNode::empty()
        } else {
            self.subdivide(indices, self.bounds, 0, 0)
        };

        let stats = self.stats();
        log::debug!(
            "KD-tree built: {} elements, {} nodes, {} leaves, depth {}",
            self.elements.len(),
            stats.node_count,
            stats.leaf_count,
            stats.max_depth
        );
    }

    fn subdivide(&self, elements: Vec<usize>, bounds: Aabb, axis: usize, depth: usize) -> KdNode {
        if elements.len() <= self.config.max_elements_per_leaf {
            return KdNode::Leaf {
                elements,
                reason: LeafReason::Small,
            };
        }
        if depth >= self.config.max_depth {
            return KdNode::Leaf {
                elements,
                reason: LeafReason::DepthLimit,
            };
        }

        let split_point = match self.choose_split(&elements, &bounds, axis) {
            Some(p) => p,
            None => {
                return KdNode::Leaf {
                    elements,
                    reason: LeafReason::Degenerate,
                }
            }
        };

        let plane = Plane::axis_aligned(axis, split_point);
        let mut lower = Vec::new();
        let mut upper = Vec::new();
        let mut straddling = 0;
        for &index in &elements {
            match self.elements[index].side_of_plane(&plane) {
                PlaneSide::Back => lower.push(index),
                PlaneSide::Front => upper.push(index),
                PlaneSide::Spanning => {
                    lower.push(index);
                    upper.push(index);
                    straddling += 1;
                }
            }
        }

        if let Some(threshold) = self.config.overlap_rejection_ratio {
            if straddling as f32 / elements.len() as f32 > threshold {
                return KdNode::Leaf {
                    elements,
                    reason: LeafReason::Overlap,
                };
            }
        }

        let (lower_bounds, upper_bounds) = bounds.split(axis, split_point);
        let next_axis = (axis + 1) % 3;

        KdNode::Split {
            axis,
            split_point,
            lower: Box::new(self.subdivide(lower, lower_bounds, next_axis, depth + 1)),
            upper: Box::new(self.subdivide(upper, upper_bounds, next_axis, depth + 1)),
        }
    }

    /// Pick a split strictly inside `bounds` along `axis`.
    fn choose_split(&self, elements: &[usize], bounds: &Aabb, axis: usize) -> Option<f32> {
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);
        if !(lo.is_finite() && hi.is_finite()) || hi - lo <= 0.0 {
            return None;
        }
        let inside = |p: f32| p.is_finite() && p > lo && p < hi;

        let candidate = match self.config.split_strategy {
            SplitStrategy::Midpoint => None,
            SplitStrategy::SurfaceArea => self.surface_area_split(elements, bounds, axis),
            SplitStrategy::MedianElement => self.median_split(elements, axis),
        };

        candidate
            .filter(|&p| inside(p))
            .or_else(|| Some(midpoint_split(bounds, axis)).filter(|&p| inside(p)))
    }

    /// Lowest-cost element boundary under the surface area heuristic.
    fn surface_area_split(&self, elements: &[usize], bounds: &Aabb, axis: usize) -> Option<f32> {
        let eps = self.config.position_epsilon;
        let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

        let mut mins: Vec<f32> = Vec::with_capacity(elements.len());
        let mut maxs: Vec<f32> = Vec::with_capacity(elements.len());
        for &index in elements {
            let b = self.elements[index].bounds();
            mins.push(b.min[axis]);
            maxs.push(b.max[axis]);
        }

        let mut candidates: Vec<f32> = mins
            .iter()
            .map(|m| m - eps)
            .chain(maxs.iter().map(|m| m + eps))
            .filter(|&p| p > lo && p < hi)
            .collect();
        candidates.sort_by(f32::total_cmp);
        candidates.dedup();

        mins.sort_by(f32::total_cmp);
        maxs.sort_by(f32::total_cmp);

        let n = elements.len();
        let mut best: Option<(f32, f32)> = None;
        for &c in &candidates {
            // Elements overlapping each side; straddlers count on both
            let lower_count = mins.partition_point(|&m| m < c);
            let upper_count = n - maxs.partition_point(|&m| m <= c);

            let (lower_box, upper_box) = bounds.split(axis, c);
            let cost = self.config.traversal_cost
                + self.config.intersection_cost
                    * (upper_box.surface_area() * upper_count as f32
                        + lower_box.surface_area() * lower_count as f32);

            if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                best = Some((c, cost));
            }
        }

        best.map(|(c, _)| c)
    }

    /// Element boundary nearest to the mean center, pushed just past the element.
    fn median_split(&self, elements: &[usize], axis: usize) -> Option<f32> {
        if elements.is_empty() {
            return None;
        }
        let eps = self.config.position_epsilon;

        let mean = elements
            .iter()
            .map(|&i| self.elements[i].bounds().center()[axis])
            .sum::<f32>()
            / elements.len() as f32;

        elements
            .iter()
            .flat_map(|&i| {
                let b = self.elements[i].bounds();
                [b.min[axis] - eps, b.max[axis] + eps]
            })
            .min_by(|a, b| (a - mean).abs().total_cmp(&(b - mean).abs()))
    }

    /// Nearest hit with distance in `(RAY_EPSILON, max_distance]`.
    pub fn intersect_ray(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        let (t_min, t_max) = self
            .bounds
            .intersect_ray(ray, Interval::new(0.0, max_distance))?;
        let search = Interval::new(RAY_EPSILON, max_distance);
        self.intersect_node(&self.root, ray, t_min, t_max, search)
    }

    /// True if anything blocks the ray before `max_distance`.
    pub fn is_occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.intersect_ray(ray, max_distance).is_some()
    }

    fn intersect_node(
        &self,
        node: &KdNode,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        search: Interval,
    ) -> Option<RaycastHit> {
        match node {
            KdNode::Leaf { elements, .. } => {
                let mut closest: Option<RaycastHit> = None;
                for &index in elements {
                    let range = closest.map_or(search, |c| search.with_max(c.distance));
                    if let Some(mut hit) = self.elements[index].intersect_ray(ray, range) {
                        hit.element = index;
                        closest = Some(hit);
                    }
                }
                closest
            }
            KdNode::Split {
                axis,
                split_point,
                lower,
                upper,
            } => {
                let origin = ray.origin[*axis];
                let direction = ray.direction[*axis];

                let lower_first = origin < *split_point || (origin == *split_point && direction <= 0.0);
                let (near, far) = if lower_first {
                    (lower.as_ref(), upper.as_ref())
                } else {
                    (upper.as_ref(), lower.as_ref())
                };

                let t_split = if direction == 0.0 {
                    f32::INFINITY
                } else {
                    (split_point - origin) / direction
                };

                if t_split > t_max || t_split <= 0.0 {
                    // Plane is beyond the segment or behind the ray
                    self.intersect_node(near, ray, t_min, t_max, search)
                } else if t_split < t_min {
                    // Plane was crossed before the segment began
                    self.intersect_node(far, ray, t_min, t_max, search)
                } else {
                    let near_hit = self.intersect_node(near, ray, t_min, t_split, search);
                    if let Some(hit) = near_hit {
                        if hit.distance <= t_split {
                            return near_hit;
                        }
                    }
                    let far_hit = self.intersect_node(far, ray, t_split, t_max, search);
                    RaycastHit::closest(near_hit, far_hit)
                }
            }
        }
    }

    /// Visit every leaf with its bounds and depth.
    pub fn leaves(&self) -> Vec<LeafInfo<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![(&self.root, self.bounds, 0usize)];
        while let Some((node, bounds, depth)) = stack.pop() {
            match node {
                KdNode::Leaf { elements, reason } => out.push(LeafInfo {
                    bounds,
                    depth,
                    elements,
                    reason: *reason,
                }),
                KdNode::Split {
                    axis,
                    split_point,
                    lower,
                    upper,
                } => {
                    let (lower_bounds, upper_bounds) = bounds.split(*axis, *split_point);
                    stack.push((upper.as_ref(), upper_bounds, depth + 1));
                    stack.push((lower.as_ref(), lower_bounds, depth + 1));
                }
            }
        }
        out
    }

    pub fn stats(&self) -> KdStats {
        let mut stats = KdStats::default();
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(depth);
            match node {
                KdNode::Leaf { elements, .. } => {
                    stats.leaf_count += 1;
                    stats.element_refs += elements.len();
                }
                KdNode::Split { lower, upper, .. } => {
                    stack.push((lower.as_ref(), depth + 1));
                    stack.push((upper.as_ref(), depth + 1));
                }
            }
        }
        stats
    }
}

fn midpoint_split(bounds: &Aabb, axis: usize) -> f32 {
    (bounds.min[axis] + bounds.max[axis]) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    /// Solid axis-aligned box element.
    struct BoxElement(Aabb);

    impl Spatial for BoxElement {
        fn bounds(&self) -> Aabb {
            self.0
        }

        fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit> {
            let (t0, t1) = self.0.intersect_ray(ray, Interval::UNIVERSE)?;
            let t = if ray_t.admits(t0) {
                t0
            } else if ray_t.admits(t1) {
                t1
            } else {
                return None;
            };

            let p = ray.at(t);
            let c = self.0.center();
            let d = (p - c) / (self.0.extent() * 0.5);
            let a = d.abs();
            let axis = if a.x >= a.y && a.x >= a.z {
                0
            } else if a.y >= a.z {
                1
            } else {
                2
            };
            let mut normal = Vec3::ZERO;
            normal[axis] = d[axis].signum();
            Some(RaycastHit::new(ray, t, normal))
        }
    }

    const STRATEGIES: [SplitStrategy; 3] = [
        SplitStrategy::Midpoint,
        SplitStrategy::SurfaceArea,
        SplitStrategy::MedianElement,
    ];

    /// Grid of small disjoint boxes with random jitter.
    fn disjoint_boxes(rng: &mut StdRng, n: usize) -> Vec<BoxElement> {
        let mut out = Vec::new();
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    let cell = Vec3::new(x as f32, y as f32, z as f32) * 2.0;
                    let jitter = Vec3::new(rng.gen(), rng.gen(), rng.gen()) * 0.5;
                    let size = Vec3::new(
                        rng.gen_range(0.2..0.9),
                        rng.gen_range(0.2..0.9),
                        rng.gen_range(0.2..0.9),
                    );
                    let min = cell + jitter;
                    out.push(BoxElement(Aabb::new(min, min + size)));
                }
            }
        }
        out
    }

    fn random_boxes(rng: &mut StdRng, count: usize) -> Vec<BoxElement> {
        (0..count)
            .map(|_| {
                let min = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                let size = Vec3::new(
                    rng.gen_range(0.1..3.0),
                    rng.gen_range(0.1..3.0),
                    rng.gen_range(0.1..3.0),
                );
                BoxElement(Aabb::new(min, min + size))
            })
            .collect()
    }

    fn brute_force(elements: &[BoxElement], ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        let search = Interval::new(RAY_EPSILON, max_distance);
        elements
            .iter()
            .filter_map(|e| e.intersect_ray(ray, search))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    #[test]
    fn test_empty_tree_misses() {
        let tree: KdTree<BoxElement> = KdTree::build(Vec::new(), KdTreeConfig::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(tree.intersect_ray(&ray, f32::INFINITY).is_none());
        assert_eq!(tree.stats().leaf_count, 1);
    }

    #[test]
    fn test_small_set_is_single_leaf() {
        let mut rng = StdRng::seed_from_u64(1);
        let tree = KdTree::build(random_boxes(&mut rng, 5), KdTreeConfig::default());

        assert!(tree.root().is_leaf());
        assert_eq!(tree.leaves()[0].reason, LeafReason::Small);
    }

    #[test]
    fn test_midpoint_split_position() {
        let elements = vec![
            BoxElement(Aabb::new(Vec3::ZERO, Vec3::ONE)),
            BoxElement(Aabb::new(Vec3::new(9.0, 0.0, 0.0), Vec3::new(10.0, 1.0, 1.0))),
        ];
        let config = KdTreeConfig::default().with_max_elements_per_leaf(1);
        let tree = KdTree::build(elements, config);

        match tree.root() {
            KdNode::Split {
                axis, split_point, ..
            } => {
                assert_eq!(*axis, 0);
                assert!((split_point - 5.0).abs() < 1e-5);
            }
            KdNode::Leaf { .. } => panic!("expected a split"),
        }
    }

    #[test]
    fn test_sah_prefers_gap_between_clusters() {
        let mut elements = Vec::new();
        for i in 0..4 {
            let y = i as f32 * 0.1;
            elements.push(BoxElement(Aabb::new(Vec3::new(0.0, y, 0.0), Vec3::new(1.0, y + 0.05, 1.0))));
            elements.push(BoxElement(Aabb::new(Vec3::new(7.0, y, 0.0), Vec3::new(8.0, y + 0.05, 1.0))));
        }
        let config = KdTreeConfig::default()
            .with_split_strategy(SplitStrategy::SurfaceArea)
            .with_max_elements_per_leaf(4);
        let tree = KdTree::build(elements, config);

        match tree.root() {
            KdNode::Split { split_point, .. } => {
                // Either edge of the empty gap separates the clusters
                assert!(*split_point > 1.0 && *split_point < 7.0);
            }
            KdNode::Leaf { .. } => panic!("expected a split"),
        }
        let leaves = tree.leaves();
        assert!(leaves.iter().all(|l| l.elements.len() == 4));
    }

    #[test]
    fn test_median_split_lands_on_element_boundary() {
        let elements: Vec<BoxElement> = (0..5)
            .map(|i| {
                let x = i as f32 * 2.0;
                BoxElement(Aabb::new(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 1.0)))
            })
            .collect();
        let config = KdTreeConfig::default()
            .with_split_strategy(SplitStrategy::MedianElement)
            .with_max_elements_per_leaf(2);
        let tree = KdTree::build(elements, config);

        match tree.root() {
            KdNode::Split { split_point, .. } => {
                // Mean center is 4.5; nearest boundary is the middle box's min or max
                let eps = tree.config().position_epsilon;
                assert!(
                    (split_point - (4.0 - eps)).abs() < 1e-5
                        || (split_point - (5.0 + eps)).abs() < 1e-5
                );
            }
            KdNode::Leaf { .. } => panic!("expected a split"),
        }
    }

    #[test]
    fn test_overlap_rejection_keeps_large_leaf() {
        // Every box spans the whole x range, so any x split straddles them all
        let elements: Vec<BoxElement> = (0..20)
            .map(|_| BoxElement(Aabb::new(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0))))
            .collect();
        let tree = KdTree::build(elements, KdTreeConfig::default());

        assert!(tree.root().is_leaf());
        assert_eq!(tree.leaves()[0].reason, LeafReason::Overlap);
        assert_eq!(tree.leaves()[0].elements.len(), 20);
    }

    #[test]
    fn test_build_terminates_for_all_strategies() {
        let mut rng = StdRng::seed_from_u64(7);
        for strategy in STRATEGIES {
            for ratio in [Some(0.75), None] {
                let config = KdTreeConfig::default()
                    .with_split_strategy(strategy)
                    .with_overlap_rejection_ratio(ratio)
                    .with_max_depth(12);
                let max_per_leaf = config.max_elements_per_leaf;
                let max_depth = config.max_depth;
                let tree = KdTree::build(random_boxes(&mut rng, 300), config);

                for leaf in tree.leaves() {
                    let ok = match leaf.reason {
                        LeafReason::Small => leaf.elements.len() <= max_per_leaf,
                        LeafReason::DepthLimit => leaf.depth == max_depth,
                        LeafReason::Overlap => ratio.is_some(),
                        LeafReason::Degenerate => false,
                    };
                    assert!(ok, "{:?}: bad leaf {:?}", strategy, leaf.reason);
                    assert!(leaf.depth <= max_depth);
                }
            }
        }
    }

    #[test]
    fn test_partition_is_complete_and_consistent() {
        let mut rng = StdRng::seed_from_u64(11);
        for strategy in STRATEGIES {
            let config = KdTreeConfig::default().with_split_strategy(strategy);
            let tree = KdTree::build(random_boxes(&mut rng, 200), config);

            let mut seen = HashSet::new();
            for leaf in tree.leaves() {
                for &index in leaf.elements {
                    seen.insert(index);
                    let b = tree.elements()[index].bounds();
                    // Element overlaps the region of every leaf it was placed in
                    for axis in 0..3 {
                        assert!(b.max[axis] >= leaf.bounds.min[axis]);
                        assert!(b.min[axis] <= leaf.bounds.max[axis]);
                    }
                }
            }
            assert_eq!(seen.len(), tree.len(), "{:?}", strategy);
        }
    }

    #[test]
    fn test_traversal_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        for strategy in STRATEGIES {
            let config = KdTreeConfig::default()
                .with_split_strategy(strategy)
                .with_max_elements_per_leaf(2);
            let tree = KdTree::build(disjoint_boxes(&mut rng, 5), config);
            let extent = tree.bounds().extent();

            let mut hits = 0;
            for i in 0..200 {
                // Origins both inside and outside the populated volume
                let origin = tree.bounds().min - extent * 0.25
                    + Vec3::new(rng.gen(), rng.gen(), rng.gen()) * extent * 1.5;

                // Every other ray is aimed at a box center and must hit something
                let aimed = i % 2 == 0;
                let direction = if aimed {
                    let target = tree.elements()[rng.gen_range(0..tree.len())].bounds().center();
                    match (target - origin).try_normalize() {
                        Some(d) => d,
                        None => continue,
                    }
                } else {
                    Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    )
                    .normalize()
                };
                let ray = Ray::new(origin, direction);

                let expected = brute_force(tree.elements(), &ray, f32::INFINITY);
                let actual = tree.intersect_ray(&ray, f32::INFINITY);

                match (expected, actual) {
                    (None, None) => {}
                    (Some(e), Some(a)) => {
                        hits += 1;
                        assert!((e.distance - a.distance).abs() < 1e-4, "{:?}", strategy);
                        let b = tree.elements()[a.element].bounds();
                        assert!((a.point - a.point.clamp(b.min, b.max)).length() < 1e-3);
                    }
                    (e, a) => panic!("{:?}: brute force {:?} vs tree {:?}", strategy, e, a),
                }
            }
            assert!(hits >= 99, "{:?}: only {} hits", strategy, hits);
        }
    }

    #[test]
    fn test_axis_parallel_rays_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(5);
        let tree = KdTree::build(
            disjoint_boxes(&mut rng, 4),
            KdTreeConfig::default().with_max_elements_per_leaf(1),
        );

        for axis in 0..3 {
            for _ in 0..30 {
                let mut origin = tree.bounds().min
                    + Vec3::new(rng.gen(), rng.gen(), rng.gen()) * tree.bounds().extent();
                origin[axis] = tree.bounds().min[axis] - 1.0;
                let mut direction = Vec3::ZERO;
                direction[axis] = 1.0;
                let ray = Ray::new(origin, direction);

                let expected = brute_force(tree.elements(), &ray, f32::INFINITY).map(|h| h.distance);
                let actual = tree.intersect_ray(&ray, f32::INFINITY).map(|h| h.distance);
                match (expected, actual) {
                    (Some(e), Some(a)) => assert!((e - a).abs() < 1e-4),
                    (e, a) => assert_eq!(e, a),
                }
            }
        }
    }

    #[test]
    fn test_max_distance_limits_hits() {
        let elements = vec![BoxElement(Aabb::new(Vec3::new(5.0, -1.0, -1.0), Vec3::new(6.0, 1.0, 1.0)))];
        let tree = KdTree::build(elements, KdTreeConfig::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(tree.is_occluded(&ray, 10.0));
        assert!(!tree.is_occluded(&ray, 4.0));
    }

    #[test]
    fn test_config_partial_json() {
        let config: KdTreeConfig =
            serde_json::from_str(r#"{ "split_strategy": "surface_area", "max_depth": 4 }"#).unwrap();

        assert_eq!(config.split_strategy, SplitStrategy::SurfaceArea);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_elements_per_leaf, 8);
    }
}
