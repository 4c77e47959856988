// crates/aq_engine/src/extract.rs

//! 初始含水层提取
//!
//! 泉点所属单元在泉点高程处切片后可能分成多个片段，
//! 只保留表面离泉点最近的那一个。

use aq_mesh::{GeometryKernel, TriMesh};
use tracing::trace;

use crate::model::{Spring, Unit};
use crate::slicer::slice_nearest;

/// 提取泉点的初始片段，切片后没有剩余几何时返回 `None`
pub fn extract_initial<K: GeometryKernel + ?Sized>(
    kernel: &K,
    unit: &Unit,
    spring: &Spring,
) -> Option<TriMesh> {
    let fragment = slice_nearest(kernel, &unit.mesh, spring.elevation(), &spring.location)?;
    trace!(
        spring = spring.id,
        unit = unit.id,
        faces = fragment.n_faces(),
        "初始片段"
    );
    Some(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_geo::Point3D;
    use aq_mesh::generation::box_mesh;
    use aq_mesh::TriMeshKernel;

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    /// 底座加两根悬空立柱，三块互不相连
    fn block_unit() -> Unit {
        let mut mesh = box_mesh(p(0.0, 0.0, 0.0), p(3.0, 1.0, 1.0));
        mesh.append(&box_mesh(p(0.0, 0.0, 2.0), p(1.0, 1.0, 4.0)));
        mesh.append(&box_mesh(p(2.0, 0.0, 2.0), p(3.0, 1.0, 4.0)));
        Unit::new(5, mesh)
    }

    #[test]
    fn test_keeps_fragment_nearest_spring() {
        let kernel = TriMeshKernel::default();
        let unit = block_unit();
        let spring = Spring::new(1, p(2.5, 0.5, 3.0), 5);

        let fragment = extract_initial(&kernel, &unit, &spring).unwrap();
        let bbox = fragment.bbox();
        assert!((bbox.min.x - 2.0).abs() < 1e-12);
        assert!((bbox.max.z - 3.0).abs() < 1e-12);
        assert!((kernel.volume(&fragment) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_spring_below_unit() {
        let kernel = TriMeshKernel::default();
        let spring = Spring::new(1, p(0.5, 0.5, -0.1), 5);
        assert!(extract_initial(&kernel, &block_unit(), &spring).is_none());
    }

    #[test]
    fn test_spring_outside_footprint_still_picks_nearest() {
        let kernel = TriMeshKernel::default();
        let spring = Spring::new(1, p(-5.0, 0.5, 0.5), 5);
        let fragment = extract_initial(&kernel, &block_unit(), &spring).unwrap();
        assert_eq!(fragment.bbox().min.x, 0.0);
        assert!((kernel.volume(&fragment) - 1.5).abs() < 1e-9);
    }
}
