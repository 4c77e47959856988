// crates/aq_engine/src/volume.rs

//! 体积计算
//!
//! 各片段互相独立，可以并行。

use aq_mesh::GeometryKernel;
use rayon::prelude::*;

use crate::model::BodyElement;

/// 计算所有片段的体积
pub fn finalize_volumes<K: GeometryKernel + ?Sized>(
    kernel: &K,
    elements: &mut [BodyElement],
    parallel: bool,
) {
    if parallel {
        elements
            .par_iter_mut()
            .for_each(|e| e.volume = kernel.volume(&e.mesh));
    } else {
        for e in elements.iter_mut() {
            e.volume = kernel.volume(&e.mesh);
        }
    }
}

/// 总体积
pub fn total_volume(elements: &[BodyElement]) -> f64 {
    elements.iter().map(|e| e.volume).sum()
}
