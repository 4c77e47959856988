// crates/aq_engine/src/model.rs

//! 数据模型
//!
//! - [`Unit`]: 地质单元，闭合三角网格
//! - [`Spring`]: 泉点，锚定在某个单元上
//! - [`Candidate`]: 一次传播中某个单元在泉点高程处切出的连通片段
//! - [`BodyElement`]: 输出的含水层片段

use aq_foundation::arena::{ArenaTag, Idx};
use aq_geo::{BoundingBox3D, Point3D};
use aq_mesh::TriMesh;

/// 单元 ID
pub type UnitId = i64;

/// 泉点 ID
pub type SpringId = i64;

/// 地质单元
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// 单元 ID
    pub id: UnitId,
    /// 闭合网格
    pub mesh: TriMesh,
}

impl Unit {
    /// 创建单元
    pub fn new(id: UnitId, mesh: TriMesh) -> Self {
        Self { id, mesh }
    }
}

/// 泉点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// 泉点 ID
    pub id: SpringId,
    /// 位置
    pub location: Point3D,
    /// 所属单元
    pub unit_id: UnitId,
}

impl Spring {
    /// 创建泉点
    pub fn new(id: SpringId, location: Point3D, unit_id: UnitId) -> Self {
        Self { id, location, unit_id }
    }

    /// 截断高程
    #[inline]
    pub fn elevation(&self) -> f64 {
        self.location.z
    }
}

/// 候选池标签
#[derive(Debug, Clone, Copy)]
pub struct CandidateTag;
impl ArenaTag for CandidateTag {}

/// 候选片段句柄
pub type CandidateIndex = Idx<CandidateTag>;

/// 候选状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    /// 尚未归属
    Pending,
    /// 已并入当前含水层
    Accepted,
}

/// 候选片段
#[derive(Debug, Clone)]
pub struct Candidate {
    /// 来源单元
    pub unit_id: UnitId,
    /// 片段网格
    pub mesh: TriMesh,
    /// 状态
    pub state: CandidateState,
}

impl Candidate {
    /// 新的待定候选
    pub fn pending(unit_id: UnitId, mesh: TriMesh) -> Self {
        Self {
            unit_id,
            mesh,
            state: CandidateState::Pending,
        }
    }

    /// 是否待定
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state == CandidateState::Pending
    }

    /// 转为输出片段，体积稍后计算
    pub fn into_element(self, spring: Spring) -> BodyElement {
        BodyElement {
            mesh: self.mesh,
            unit_id: self.unit_id,
            spring,
            volume: 0.0,
        }
    }
}

/// 含水层片段
///
/// 共享同一泉点的片段组成一个含水层。
#[derive(Debug, Clone)]
pub struct BodyElement {
    /// 片段网格
    pub mesh: TriMesh,
    /// 来源单元
    pub unit_id: UnitId,
    /// 主泉点
    pub spring: Spring,
    /// 体积
    pub volume: f64,
}

impl BodyElement {
    /// 片段包围盒
    pub fn bbox(&self) -> BoundingBox3D {
        self.mesh.bbox()
    }
}
