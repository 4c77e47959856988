//! 只追加的泛型 Arena
//!
//! 为一次计算过程中创建的同类对象（例如某一高程下的切片候选体）
//! 分配稳定的整数句柄。
//!
//! # 设计目标
//!
//! - **稳定句柄**: 元素只追加不删除，`Idx<Tag>` 在 Arena 生命周期内始终有效
//! - **零成本抽象**: `Idx<Tag>` 与 `u32` 完全相同的内存布局
//! - **类型安全**: 通过标记类型防止不同 Arena 的索引混用
//!
//! 需要"移除"语义的调用方应在旁路状态数组中以标记位表示，
//! 而不是回收槽位。
//!
//! # 示例
//!
//! ```
//! use aq_foundation::arena::{Arena, ArenaTag};
//!
//! #[derive(Debug, Clone, Copy)]
//! struct FragmentTag;
//! impl ArenaTag for FragmentTag {}
//!
//! let mut arena: Arena<&str, FragmentTag> = Arena::new();
//! let a = arena.push("a");
//! let b = arena.push("b");
//!
//! assert_eq!(arena[a], "a");
//! assert_eq!(arena.get(b), Some(&"b"));
//! assert_eq!(arena.len(), 2);
//! ```

use std::fmt;
use std::marker::PhantomData;

// ============================================================================
// 标记类型
// ============================================================================

/// Arena 标记 trait，用于类型安全地区分不同用途的 Arena
pub trait ArenaTag: 'static + Copy + Send + Sync {}

// ============================================================================
// 索引类型
// ============================================================================

/// 轻量级类型安全索引（4字节）
///
/// 使用 `PhantomData<fn() -> Tag>` 确保自动满足 `Send`/`Sync`，
/// 且不要求 `Tag` 本身实现任何 trait。
#[repr(transparent)]
pub struct Idx<Tag> {
    index: u32,
    _marker: PhantomData<fn() -> Tag>,
}

// 手动实现，避免 derive 对 Tag 施加约束
impl<Tag> Copy for Idx<Tag> {}

impl<Tag> Clone for Idx<Tag> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tag> PartialEq for Idx<Tag> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<Tag> Eq for Idx<Tag> {}

impl<Tag> PartialOrd for Idx<Tag> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<Tag> Ord for Idx<Tag> {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<Tag> std::hash::Hash for Idx<Tag> {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<Tag> fmt::Debug for Idx<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({})", self.index)
    }
}

impl<Tag> fmt::Display for Idx<Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

impl<Tag> Idx<Tag> {
    /// 无效索引常量
    pub const INVALID: Self = Self {
        index: u32::MAX,
        _marker: PhantomData,
    };

    /// 创建新索引
    ///
    /// Debug 模式下，若 `index` 为 `u32::MAX` 会触发 panic（与 INVALID 冲突）。
    #[inline]
    pub const fn new(index: u32) -> Self {
        debug_assert!(index != u32::MAX, "index cannot be u32::MAX (reserved for INVALID)");
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// 从 `usize` 创建索引
    #[inline]
    pub fn from_usize(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        Self::new(index as u32)
    }

    /// 获取原始索引值
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// 转换为 `usize`
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.index as usize
    }

    /// 检查索引是否有效
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.index != u32::MAX
    }
}

impl<Tag> Default for Idx<Tag> {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

impl<Tag> From<u32> for Idx<Tag> {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl<Tag> From<Idx<Tag>> for usize {
    #[inline]
    fn from(idx: Idx<Tag>) -> Self {
        idx.as_usize()
    }
}

// ============================================================================
// Arena 实现
// ============================================================================

/// 只追加的泛型内存池
///
/// # 类型参数
/// - `T`: 存储的元素类型
/// - `Tag`: 标记类型，用于防止不同 Arena 的索引混用
pub struct Arena<T, Tag: ArenaTag> {
    items: Vec<T>,
    _marker: PhantomData<Tag>,
}

impl<T, Tag: ArenaTag> Default for Arena<T, Tag> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, Tag: ArenaTag> Clone for Arena<T, Tag> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug, Tag: ArenaTag> fmt::Debug for Arena<T, Tag> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T, Tag: ArenaTag> Arena<T, Tag> {
    /// 创建空 Arena
    #[inline]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// 创建指定容量的 Arena
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// 元素数量
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 追加元素并返回其句柄
    pub fn push(&mut self, value: T) -> Idx<Tag> {
        let idx = Idx::from_usize(self.items.len());
        self.items.push(value);
        idx
    }

    /// 获取元素的不可变引用
    #[inline]
    pub fn get(&self, idx: Idx<Tag>) -> Option<&T> {
        if !idx.is_valid() {
            return None;
        }
        self.items.get(idx.as_usize())
    }

    /// 获取元素的可变引用
    #[inline]
    pub fn get_mut(&mut self, idx: Idx<Tag>) -> Option<&mut T> {
        if !idx.is_valid() {
            return None;
        }
        self.items.get_mut(idx.as_usize())
    }

    /// 检查句柄是否属于本 Arena
    #[inline]
    pub fn contains(&self, idx: Idx<Tag>) -> bool {
        idx.is_valid() && idx.as_usize() < self.items.len()
    }

    /// 按插入顺序遍历（句柄, 元素）
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Idx<Tag>, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, value)| (Idx::from_usize(i), value))
    }

    /// 按插入顺序遍历所有句柄
    pub fn indices(&self) -> impl ExactSizeIterator<Item = Idx<Tag>> {
        (0..self.items.len()).map(Idx::from_usize)
    }

    /// 以切片形式访问全部元素
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// 消耗 Arena，按插入顺序返回元素
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T, Tag: ArenaTag> std::ops::Index<Idx<Tag>> for Arena<T, Tag> {
    type Output = T;

    #[inline]
    fn index(&self, idx: Idx<Tag>) -> &Self::Output {
        &self.items[idx.as_usize()]
    }
}

impl<T, Tag: ArenaTag> std::ops::IndexMut<Idx<Tag>> for Arena<T, Tag> {
    #[inline]
    fn index_mut(&mut self, idx: Idx<Tag>) -> &mut Self::Output {
        &mut self.items[idx.as_usize()]
    }
}

impl<T, Tag: ArenaTag> FromIterator<T> for Arena<T, Tag> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            _marker: PhantomData,
        }
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct TestTag;
    impl ArenaTag for TestTag {}

    type TestArena = Arena<i32, TestTag>;

    #[test]
    fn test_new_arena() {
        let arena: TestArena = Arena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_push_and_get() {
        let mut arena: TestArena = Arena::new();
        let a = arena.push(1);
        let b = arena.push(2);

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&1));
        assert_eq!(arena[b], 2);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn test_handles_are_stable() {
        let mut arena: TestArena = Arena::with_capacity(2);
        let first = arena.push(10);
        for i in 0..100 {
            arena.push(i);
        }
        assert_eq!(arena[first], 10);
    }

    #[test]
    fn test_get_mut() {
        let mut arena: TestArena = Arena::new();
        let idx = arena.push(42);
        if let Some(value) = arena.get_mut(idx) {
            *value = 100;
        }
        assert_eq!(arena[idx], 100);
    }

    #[test]
    fn test_invalid_index() {
        let mut arena: TestArena = Arena::new();
        arena.push(1);
        assert_eq!(arena.get(Idx::INVALID), None);
        assert!(!arena.contains(Idx::INVALID));
        assert!(!arena.contains(Idx::new(5)));
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let arena: TestArena = (0..4).collect();
        let collected: Vec<(u32, i32)> = arena.iter().map(|(i, v)| (i.index(), *v)).collect();
        assert_eq!(collected, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(arena.indices().count(), 4);
    }

    #[test]
    fn test_idx_ordering() {
        let a: Idx<TestTag> = Idx::new(1);
        let b: Idx<TestTag> = Idx::new(2);
        assert!(a < b);
        assert_eq!(a, Idx::from(1u32));
        assert_eq!(usize::from(b), 2);
    }
}
