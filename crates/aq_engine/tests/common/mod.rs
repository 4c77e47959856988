//! 集成测试共用的单元与泉点构造

#![allow(dead_code)]

use aq_engine::{Spring, SpringId, Unit, UnitId};
use aq_geo::Point3D;
use aq_mesh::generation::{box_mesh, hollow_box};

/// 包围盒比较的相对容差
pub const BBOX_FRACTION: f64 = 0.02;

pub fn p(x: f64, y: f64, z: f64) -> Point3D {
    Point3D::new(x, y, z)
}

pub fn box_unit(id: UnitId, min: Point3D, max: Point3D) -> Unit {
    Unit::new(id, box_mesh(min, max))
}

pub fn spring(id: SpringId, unit: UnitId, x: f64, y: f64, z: f64) -> Spring {
    Spring::new(id, p(x, y, z), unit)
}

/// 三块依次错位相接的箱体，第四块相同形状但远离
///
/// 每块相对前一块平移 (size.x, 0, -0.3 * size.z)。
pub fn chained_boxes(size: Point3D) -> Vec<Unit> {
    let step = p(size.x, 0.0, -0.3 * size.z);
    let first = box_mesh(Point3D::ZERO, size);
    let second = first.translated(step);
    let third = second.translated(step);
    let far = third.translated(p(99.0, 0.0, 0.0));
    vec![
        Unit::new(42, first),
        Unit::new(101, second),
        Unit::new(213, third),
        Unit::new(1337, far),
    ]
}

/// 带内腔的单元 1（外壳 [-1,1]³，内腔 [-0.6,0.6]³）与腔内独立箱体单元 2（[-0.4,0.4]³）
pub fn nested_units() -> Vec<Unit> {
    vec![
        Unit::new(
            1,
            hollow_box(p(-1.0, -1.0, -1.0), p(1.0, 1.0, 1.0), p(-0.6, -0.6, -0.6), p(0.6, 0.6, 0.6)),
        ),
        box_unit(2, p(-0.4, -0.4, -0.4), p(0.4, 0.4, 0.4)),
    ]
}

/// 3×3 网格排列的箱体，顶面高度各不相同，列之间留有间隙
///
/// 同一列内的箱体在 y 方向相接，列与列在 x 方向间隔 0.5。
pub fn grid_units() -> Vec<Unit> {
    let heights = [[1.0, 2.0, 1.5], [0.8, 1.2, 2.4], [2.0, 0.6, 1.1]];
    let mut units = Vec::new();
    for (i, column) in heights.iter().enumerate() {
        for (j, &h) in column.iter().enumerate() {
            let x = i as f64 * 1.5;
            let y = j as f64;
            let id = (10 * i + j) as UnitId;
            units.push(box_unit(id, p(x, y, 0.0), p(x + 1.0, y + 1.0, h)));
        }
    }
    units
}
