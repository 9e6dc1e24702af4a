use crate::FiducialView;

/// An ordered list of fiducial points in one shared 3-D coordinate frame,
/// stored as structure-of-arrays columns.
///
/// Order only matters as an index-correspondence encoding: index `i` of one
/// set may be assumed to pair with index `i` of another set of equal length.
/// An optional `labels` channel carries per-point marker names (e.g. `F-1`).
#[derive(Debug, Clone, PartialEq)]
pub struct FiducialSet {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub labels: Option<Vec<String>>,
}

impl FiducialSet {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            labels: None,
        }
    }

    pub fn from_xyz(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have same length");
        assert_eq!(x.len(), z.len(), "x and z must have same length");

        Self {
            x,
            y,
            z,
            labels: None,
        }
    }

    /// Attach one label per point.
    ///
    /// # Panics
    ///
    /// Panics if `labels.len()` does not match the point count.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        assert_eq!(
            labels.len(),
            self.len(),
            "labels must have one entry per point"
        );
        self.labels = Some(labels);
        self
    }

    /// Build from a flat interleaved `[x0, y0, z0, x1, y1, z1, ...]` buffer,
    /// the shape host fiducial nodes hand over.
    pub fn from_interleaved(data: &[f32], num_points: usize) -> Self {
        assert_eq!(
            data.len(),
            num_points * 3,
            "interleaved xyz input must have num_points * 3 floats"
        );

        let mut x = Vec::with_capacity(num_points);
        let mut y = Vec::with_capacity(num_points);
        let mut z = Vec::with_capacity(num_points);

        for chunk in data.chunks_exact(3).take(num_points) {
            x.push(chunk[0]);
            y.push(chunk[1]);
            z.push(chunk[2]);
        }

        Self::from_xyz(x, y, z)
    }

    pub fn view_from_interleaved(data: &[f32], num_points: usize) -> FiducialView<'_> {
        FiducialView::from_interleaved_xyz(data, num_points)
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(self.x.len(), self.z.len());
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn point(&self, i: usize) -> [f32; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    pub fn label(&self, i: usize) -> Option<&str> {
        self.labels.as_ref().map(|l| l[i].as_str())
    }

    pub fn iter_points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| [*x, *y, *z])
    }

    /// Build a new set from the points at the given indices, in that order.
    /// Labels ride along.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut x = Vec::with_capacity(indices.len());
        let mut y = Vec::with_capacity(indices.len());
        let mut z = Vec::with_capacity(indices.len());

        for &idx in indices {
            assert!(idx < self.len(), "index out of bounds in select");
            x.push(self.x[idx]);
            y.push(self.y[idx]);
            z.push(self.z[idx]);
        }

        let labels = self
            .labels
            .as_ref()
            .map(|l| indices.iter().map(|&idx| l[idx].clone()).collect());

        Self { x, y, z, labels }
    }

    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 3);
        for i in 0..self.len() {
            out.push(self.x[i]);
            out.push(self.y[i]);
            out.push(self.z[i]);
        }
        out
    }
}

impl Default for FiducialSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::FiducialSet;
    use proptest::prelude::*;

    #[test]
    fn new_is_empty() {
        let set = FiducialSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn from_xyz_builds_set() {
        let set = FiducialSet::from_xyz(vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.point(0), [1.0, 3.0, 5.0]);
        assert_eq!(set.point(1), [2.0, 4.0, 6.0]);
    }

    #[test]
    fn from_interleaved_deinterleaves() {
        let arr = vec![1.0, 10.0, 100.0, 2.0, 20.0, 200.0];
        let set = FiducialSet::from_interleaved(&arr, 2);
        assert_eq!(set.x, vec![1.0, 2.0]);
        assert_eq!(set.y, vec![10.0, 20.0]);
        assert_eq!(set.z, vec![100.0, 200.0]);
    }

    #[test]
    fn to_interleaved_interleaves() {
        let set = FiducialSet::from_xyz(vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        assert_eq!(set.to_interleaved(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn roundtrip_interleaved() {
        let src = vec![0.0, 1.0, 2.0, 3.0, -4.0, 5.0, 6.0, 7.0, 8.0];
        let set = FiducialSet::from_interleaved(&src, 3);
        assert_eq!(set.to_interleaved(), src);
    }

    #[test]
    fn select_subsets_points() {
        let set = FiducialSet::from_xyz(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![10.0, 11.0, 12.0, 13.0],
            vec![20.0, 21.0, 22.0, 23.0],
        );
        let selected = set.select(&[3, 1]);
        assert_eq!(selected.x, vec![3.0, 1.0]);
        assert_eq!(selected.y, vec![13.0, 11.0]);
        assert_eq!(selected.z, vec![23.0, 21.0]);
    }

    #[test]
    fn select_carries_labels() {
        let set = FiducialSet::from_xyz(vec![0.0, 1.0, 2.0], vec![0.0; 3], vec![0.0; 3])
            .with_labels(vec!["F-1".into(), "F-2".into(), "F-3".into()]);
        let selected = set.select(&[2, 0]);
        assert_eq!(selected.label(0), Some("F-3"));
        assert_eq!(selected.label(1), Some("F-1"));
    }

    #[test]
    fn label_is_none_without_channel() {
        let set = FiducialSet::from_xyz(vec![1.0], vec![2.0], vec![3.0]);
        assert_eq!(set.label(0), None);
    }

    #[test]
    fn iter_points_yields_xyz_triples() {
        let set = FiducialSet::from_xyz(vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        let pts: Vec<[f32; 3]> = set.iter_points().collect();
        assert_eq!(pts, vec![[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]]);
    }

    #[test]
    #[should_panic]
    fn from_xyz_panics_on_mismatch() {
        let _ = FiducialSet::from_xyz(vec![1.0], vec![2.0, 3.0], vec![4.0]);
    }

    #[test]
    #[should_panic]
    fn with_labels_panics_on_mismatch() {
        let _ = FiducialSet::from_xyz(vec![1.0, 2.0], vec![0.0; 2], vec![0.0; 2])
            .with_labels(vec!["F-1".into()]);
    }

    proptest! {
        #[test]
        fn roundtrip_preserves_interleaved_data(
            pts in prop::collection::vec((-1000.0f32..1000.0f32, -1000.0f32..1000.0f32, -1000.0f32..1000.0f32), 0..200)
        ) {
            let mut flat = Vec::with_capacity(pts.len() * 3);
            for (x, y, z) in &pts {
                flat.push(*x);
                flat.push(*y);
                flat.push(*z);
            }
            let set = FiducialSet::from_interleaved(&flat, pts.len());
            prop_assert_eq!(set.to_interleaved(), flat);
        }

        #[test]
        fn select_length_matches_indices(
            data in prop::collection::vec((-10.0f32..10.0f32, -10.0f32..10.0f32, -10.0f32..10.0f32), 1..100),
            idxs in prop::collection::vec(0usize..100, 0..100)
        ) {
            let n = data.len();
            let set = FiducialSet::from_xyz(
                data.iter().map(|p| p.0).collect(),
                data.iter().map(|p| p.1).collect(),
                data.iter().map(|p| p.2).collect(),
            );
            let valid: Vec<usize> = idxs.into_iter().filter(|i| *i < n).collect();
            let out = set.select(&valid);
            prop_assert_eq!(out.len(), valid.len());
        }
    }
}
