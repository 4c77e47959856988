// crates/aq_engine/src/calculator.rs

//! 含水层计算器
//!
//! 每个含水层由一个主泉点决定，水从泉点所在单元传播到相接触的单元。
//!
//! ```text
//! 1. 泉点按高程降序排列（同高程按 ID 升序）
//! 2. 对每个泉点：
//!    2.1 在所属单元上提取初始片段
//!    2.2 初始片段与已输出的片段相交则跳过（它属于更高泉点的含水层）
//!    2.3 否则从初始片段传播，得到该泉点的全部片段
//! 3. 计算每个片段的体积
//! ```
//!
//! 输入不会被修改。泉点引用不存在的单元、被引用单元不闭合时，
//! 在任何几何计算之前返回错误。

use std::collections::HashMap;

use aq_config::EngineConfig;
use aq_mesh::{GeometryKernel, TriMeshKernel};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::extract::extract_initial;
use crate::model::{BodyElement, Spring, Unit, UnitId};
use crate::propagation::Propagator;
use crate::volume::finalize_volumes;

/// 按高程降序排列泉点，同高程按 ID 升序
pub fn order_springs(springs: &[Spring]) -> Vec<Spring> {
    let mut ordered = springs.to_vec();
    ordered.sort_by(|a, b| {
        b.elevation()
            .total_cmp(&a.elevation())
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}

/// 含水层计算器
pub struct AquiferCalculator<K: GeometryKernel = TriMeshKernel> {
    kernel: K,
    config: EngineConfig,
}

impl AquiferCalculator<TriMeshKernel> {
    /// 使用默认几何内核，容差取自配置
    pub fn new(config: EngineConfig) -> Self {
        let kernel = TriMeshKernel::new(config.geometric_tolerance());
        Self { kernel, config }
    }
}

impl Default for AquiferCalculator<TriMeshKernel> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<K: GeometryKernel> AquiferCalculator<K> {
    /// 使用自定义几何内核
    pub fn with_kernel(kernel: K, config: EngineConfig) -> Self {
        Self { kernel, config }
    }

    /// 几何内核
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// 引擎配置
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 计算所有含水层片段
    ///
    /// 没有泉点产生片段时返回空列表。
    pub fn calculate(&self, units: &[Unit], springs: &[Spring]) -> EngineResult<Vec<BodyElement>> {
        let ordered = order_springs(springs);
        let resolved = self.resolve(units, &ordered)?;
        let propagator = Propagator::new(&self.kernel, self.config.strategy);

        let mut output: Vec<BodyElement> = Vec::new();
        let mut bodies = 0usize;
        for (spring, unit) in ordered.iter().zip(resolved) {
            let Some(seed) = extract_initial(&self.kernel, unit, spring) else {
                debug!(spring = spring.id, unit = unit.id, "泉点低于单元，跳过");
                continue;
            };

            if output.iter().any(|e| self.kernel.intersects(&seed, &e.mesh)) {
                debug!(spring = spring.id, unit = unit.id, "初始片段与已有含水层相交，跳过");
                continue;
            }

            let body = propagator.propagate(&seed, units, spring.elevation(), unit.id);
            debug!(spring = spring.id, fragments = body.len(), "含水层");
            if !body.is_empty() {
                bodies += 1;
            }
            output.extend(body.into_iter().map(|c| c.into_element(*spring)));
        }

        finalize_volumes(&self.kernel, &mut output, self.config.parallel_volumes);
        info!(
            units = units.len(),
            springs = springs.len(),
            bodies,
            fragments = output.len(),
            "含水层计算完成"
        );
        Ok(output)
    }

    /// 解析并检查每个泉点的单元，返回与 `springs` 一一对应的单元
    fn resolve<'u>(&self, units: &'u [Unit], springs: &[Spring]) -> EngineResult<Vec<&'u Unit>> {
        let mut by_id: HashMap<UnitId, &Unit> = HashMap::with_capacity(units.len());
        for unit in units {
            if by_id.contains_key(&unit.id) {
                warn!(unit = unit.id, "单元 ID 重复，使用第一个");
                continue;
            }
            by_id.insert(unit.id, unit);
        }

        let mut checked: HashMap<UnitId, bool> = HashMap::new();
        let mut resolved = Vec::with_capacity(springs.len());
        for spring in springs {
            if !spring.location.is_finite() {
                return Err(EngineError::InvalidSpring { spring: spring.id });
            }
            let unit = *by_id.get(&spring.unit_id).ok_or(EngineError::UnknownUnit {
                unit: spring.unit_id,
                spring: spring.id,
            })?;
            let closed = *checked
                .entry(unit.id)
                .or_insert_with(|| self.kernel.is_closed_manifold(&unit.mesh));
            if !closed {
                return Err(EngineError::InvalidGeometry { unit: unit.id });
            }
            resolved.push(unit);
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_geo::Point3D;
    use aq_config::PropagationStrategy;
    use aq_geo::Plane;
    use aq_mesh::generation::box_mesh;
    use aq_mesh::{FaceIndex, TriMesh};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn p(x: f64, y: f64, z: f64) -> Point3D {
        Point3D::new(x, y, z)
    }

    fn unit_box(id: UnitId) -> Unit {
        Unit::new(id, box_mesh(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)))
    }

    #[test]
    fn test_order_springs() {
        let springs = vec![
            Spring::new(3, p(0.0, 0.0, 1.0), 1),
            Spring::new(1, p(0.0, 0.0, 2.0), 1),
            Spring::new(2, p(0.0, 0.0, 1.0), 1),
            Spring::new(0, p(0.0, 0.0, -4.0), 1),
        ];
        let ids: Vec<_> = order_springs(&springs).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_unknown_unit() {
        let calc = AquiferCalculator::default();
        let err = calc
            .calculate(&[unit_box(1)], &[Spring::new(9, p(0.5, 0.5, 0.5), 4)])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownUnit { unit: 4, spring: 9 }));
        assert!(err.to_string().contains("invalid unit id 4"));
    }

    #[test]
    fn test_open_unit_is_rejected() {
        let closed = box_mesh(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let open = TriMesh::from_parts(closed.vertices().to_vec(), closed.faces()[2..].to_vec())
            .unwrap();
        let calc = AquiferCalculator::default();
        let err = calc
            .calculate(&[Unit::new(5, open)], &[Spring::new(1, p(0.5, 0.5, 0.5), 5)])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidGeometry { unit: 5 }));
    }

    #[test]
    fn test_errors_abort_before_any_result() {
        // 第一个泉点有效，第二个引用不存在的单元：整体失败
        let calc = AquiferCalculator::default();
        let springs = [
            Spring::new(1, p(0.5, 0.5, 0.9), 1),
            Spring::new(2, p(0.5, 0.5, 0.1), 8),
        ];
        assert!(calc.calculate(&[unit_box(1)], &springs).is_err());
    }

    #[test]
    fn test_non_finite_spring() {
        let calc = AquiferCalculator::default();
        let err = calc
            .calculate(&[unit_box(1)], &[Spring::new(3, p(0.5, f64::NAN, 0.5), 1)])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSpring { spring: 3 }));
    }

    #[test]
    fn test_single_box() {
        let calc = AquiferCalculator::default();
        let out = calc
            .calculate(&[unit_box(1)], &[Spring::new(7, p(0.5, 0.5, 0.5), 1)])
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].unit_id, 1);
        assert_eq!(out[0].spring.id, 7);
        assert!((out[0].volume - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_springs() {
        let calc = AquiferCalculator::default();
        assert!(calc.calculate(&[unit_box(1)], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let units = vec![unit_box(1)];
        let springs = vec![Spring::new(7, p(0.5, 0.5, 0.5), 1)];
        let before = (units.clone(), springs.clone());
        AquiferCalculator::default().calculate(&units, &springs).unwrap();
        assert_eq!(units, before.0);
        assert_eq!(springs, before.1);
    }

    /// 统计相交检测次数的内核
    #[derive(Default)]
    struct CountingKernel {
        inner: TriMeshKernel,
        intersects_calls: AtomicUsize,
    }

    impl GeometryKernel for CountingKernel {
        fn is_closed_manifold(&self, mesh: &TriMesh) -> bool {
            self.inner.is_closed_manifold(mesh)
        }

        fn clip_to_half_space(&self, mesh: &TriMesh, plane: &Plane, close_holes: bool) -> TriMesh {
            self.inner.clip_to_half_space(mesh, plane, close_holes)
        }

        fn connected_components(&self, mesh: &TriMesh) -> Vec<TriMesh> {
            self.inner.connected_components(mesh)
        }

        fn intersects(&self, a: &TriMesh, b: &TriMesh) -> bool {
            self.intersects_calls.fetch_add(1, Ordering::Relaxed);
            self.inner.intersects(a, b)
        }

        fn nearest_face(&self, mesh: &TriMesh, point: &Point3D) -> Option<FaceIndex> {
            self.inner.nearest_face(mesh, point)
        }

        fn keep_component_containing(&self, mesh: &TriMesh, face: FaceIndex) -> TriMesh {
            self.inner.keep_component_containing(mesh, face)
        }

        fn volume(&self, mesh: &TriMesh) -> f64 {
            self.inner.volume(mesh)
        }
    }

    #[test]
    fn test_custom_kernel_chain_tests_each_pair_once() {
        // A-B-C 依次接触，泉点在 A
        let units: Vec<Unit> = (0..3)
            .map(|i| {
                let x = i as f64;
                Unit::new(i, box_mesh(p(x, 0.0, 0.0), p(x + 1.0, 1.0, 1.0)))
            })
            .collect();
        let springs = [Spring::new(1, p(0.5, 0.5, 0.5), 0)];

        for strategy in [PropagationStrategy::Sequential, PropagationStrategy::Waves] {
            let config = EngineConfig {
                strategy,
                ..EngineConfig::default()
            };
            let calc = AquiferCalculator::with_kernel(CountingKernel::default(), config);
            let out = calc.calculate(&units, &springs).unwrap();
            assert_eq!(out.len(), 3);

            // (seed,A) (seed,B) (seed,C)✗ (A,C)✗ (B,C)；(A,B) 的目标已接受，不再检测，
            // 失败的 (seed,C) 也不重试
            assert_eq!(calc.kernel().intersects_calls.load(Ordering::Relaxed), 5);
        }
    }
}
