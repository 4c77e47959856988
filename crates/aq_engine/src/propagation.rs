// crates/aq_engine/src/propagation.rs

//! 含水层传播
//!
//! 把所有单元在泉点高程处切片，得到候选池；从初始片段出发，
//! 用 FIFO 工作队列逐对检测相交，相交的候选并入含水层并继续向外扩展。
//!
//! # 规则
//!
//! - 候选池不预先排除任何片段，泉点所属单元自己的片段也在池中，
//!   并会在第一轮与初始片段相交而被接受。初始片段本身不单独输出。
//! - 一个候选在一次传播中最多被接受一次。
//! - 检测失败的 (源, 目标) 对直接丢弃，不再重试。目标之后若与其他
//!   已接受片段相交，会通过那个片段产生的新对被接受，所以结果等于
//!   相交图中初始片段所在的连通分量。
//!
//! # 策略
//!
//! - [`PropagationStrategy::Sequential`]: 逐对出队检测
//! - [`PropagationStrategy::Waves`]: 当前队列作为一轮，先并行检测所有对，
//!   再按队列顺序串行接受。与串行策略的结果和顺序完全一致。

use std::collections::VecDeque;

use aq_config::PropagationStrategy;
use aq_foundation::arena::Arena;
use aq_mesh::{GeometryKernel, TriMesh};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::model::{Candidate, CandidateIndex, CandidateState, CandidateTag, Unit, UnitId};
use crate::slicer::slice;

// ============================================================
// 候选池
// ============================================================

/// 一次传播的候选池
///
/// 候选只追加不删除，接受时只改状态。
#[derive(Debug, Default)]
pub struct CandidatePool {
    candidates: Arena<Candidate, CandidateTag>,
    accepted: Vec<CandidateIndex>,
}

impl CandidatePool {
    /// 在 `elevation` 处切片所有单元，按单元顺序和片段顺序入池
    pub fn build<K: GeometryKernel + ?Sized>(kernel: &K, units: &[Unit], elevation: f64) -> Self {
        let sliced: Vec<(UnitId, Vec<TriMesh>)> = units
            .par_iter()
            .map(|unit| (unit.id, slice(kernel, &unit.mesh, elevation)))
            .collect();

        let candidates = sliced
            .into_iter()
            .flat_map(|(unit_id, parts)| {
                parts.into_iter().map(move |mesh| Candidate::pending(unit_id, mesh))
            })
            .collect();
        Self {
            candidates,
            accepted: Vec::new(),
        }
    }

    /// 候选数
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// 获取候选
    pub fn get(&self, idx: CandidateIndex) -> Option<&Candidate> {
        self.candidates.get(idx)
    }

    /// 所有待定候选
    pub fn pending(&self) -> impl Iterator<Item = CandidateIndex> + '_ {
        self.candidates
            .iter()
            .filter(|(_, c)| c.is_pending())
            .map(|(idx, _)| idx)
    }

    /// 是否待定
    pub fn is_pending(&self, idx: CandidateIndex) -> bool {
        self.candidates.get(idx).is_some_and(Candidate::is_pending)
    }

    /// 接受候选，已接受或不存在时返回 `false`
    pub fn accept(&mut self, idx: CandidateIndex) -> bool {
        match self.candidates.get_mut(idx) {
            Some(c) if c.is_pending() => {
                c.state = CandidateState::Accepted;
                self.accepted.push(idx);
                true
            }
            _ => false,
        }
    }

    /// 已接受数
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// 按接受顺序取出已接受的候选
    pub fn into_accepted(self) -> Vec<Candidate> {
        let mut slots: Vec<Option<Candidate>> =
            self.candidates.into_vec().into_iter().map(Some).collect();
        self.accepted
            .iter()
            .filter_map(|idx| slots.get_mut(idx.as_usize()).and_then(Option::take))
            .collect()
    }
}

// ============================================================
// 传播
// ============================================================

/// 一对检测中的源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// 初始片段
    Seed,
    /// 池中已接受的候选
    Candidate(CandidateIndex),
}

type Flow = (Origin, CandidateIndex);

/// 传播统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// 候选池大小
    pub pool_size: usize,
    /// 相交检测次数
    pub intersection_tests: usize,
    /// 接受的片段数
    pub accepted: usize,
}

/// 传播引擎
pub struct Propagator<'k, K: GeometryKernel + ?Sized> {
    kernel: &'k K,
    strategy: PropagationStrategy,
}

impl<'k, K: GeometryKernel + ?Sized> Propagator<'k, K> {
    /// 创建传播引擎
    pub fn new(kernel: &'k K, strategy: PropagationStrategy) -> Self {
        Self { kernel, strategy }
    }

    /// 从初始片段传播，返回按接受顺序排列的片段
    pub fn propagate(
        &self,
        seed: &TriMesh,
        units: &[Unit],
        elevation: f64,
        source_unit: UnitId,
    ) -> Vec<Candidate> {
        self.propagate_with_stats(seed, units, elevation, source_unit).0
    }

    /// 同 [`Self::propagate`]，附带统计
    pub fn propagate_with_stats(
        &self,
        seed: &TriMesh,
        units: &[Unit],
        elevation: f64,
        source_unit: UnitId,
    ) -> (Vec<Candidate>, PropagationStats) {
        let mut pool = CandidatePool::build(self.kernel, units, elevation);
        let intersection_tests = match self.strategy {
            PropagationStrategy::Sequential => self.run_sequential(seed, &mut pool),
            PropagationStrategy::Waves => self.run_waves(seed, &mut pool),
        };

        let stats = PropagationStats {
            pool_size: pool.len(),
            intersection_tests,
            accepted: pool.accepted_count(),
        };
        debug!(
            source_unit,
            elevation,
            pool = stats.pool_size,
            tests = stats.intersection_tests,
            accepted = stats.accepted,
            "传播完成"
        );
        (pool.into_accepted(), stats)
    }

    fn origin_mesh<'a>(seed: &'a TriMesh, pool: &'a CandidatePool, origin: Origin) -> Option<&'a TriMesh> {
        match origin {
            Origin::Seed => Some(seed),
            Origin::Candidate(idx) => pool.get(idx).map(|c| &c.mesh),
        }
    }

    fn touches(&self, seed: &TriMesh, pool: &CandidatePool, (origin, target): Flow) -> bool {
        match (Self::origin_mesh(seed, pool, origin), pool.get(target)) {
            (Some(from), Some(to)) => self.kernel.intersects(from, &to.mesh),
            _ => false,
        }
    }

    fn run_sequential(&self, seed: &TriMesh, pool: &mut CandidatePool) -> usize {
        let mut worklist: VecDeque<Flow> = pool.pending().map(|c| (Origin::Seed, c)).collect();
        let mut tests = 0;

        while let Some(flow) = worklist.pop_front() {
            let target = flow.1;
            if !pool.is_pending(target) {
                continue;
            }
            tests += 1;
            if self.touches(seed, pool, flow) && pool.accept(target) {
                trace!(candidate = %target, "接受片段");
                worklist.extend(pool.pending().map(|c| (Origin::Candidate(target), c)));
            }
        }
        tests
    }

    fn run_waves(&self, seed: &TriMesh, pool: &mut CandidatePool) -> usize {
        let mut round: Vec<Flow> = pool.pending().map(|c| (Origin::Seed, c)).collect();
        let mut tests = 0;

        while !round.is_empty() {
            let live: Vec<Flow> = round.into_iter().filter(|f| pool.is_pending(f.1)).collect();
            tests += live.len();

            // 并行检测
            let shared: &CandidatePool = pool;
            let hits: Vec<bool> = live
                .par_iter()
                .map(|&flow| self.touches(seed, shared, flow))
                .collect();

            // 串行接受
            let mut next = Vec::new();
            for (&(_, target), hit) in live.iter().zip(hits) {
                if hit && pool.accept(target) {
                    trace!(candidate = %target, "接受片段");
                    next.extend(pool.pending().map(|c| (Origin::Candidate(target), c)));
                }
            }
            round = next;
        }
        tests
    }
}
