//! 分组：把有序序列切成固定大小的有序分组（最后一组可能更小）。
//!
//! 同一个原语同时用于两层：外层按 `batch_row_count` 切分独立返回的语句组，
//! 内层按 `multi_line_num` 把多行合并进同一条 INSERT 的 VALUES 列表。

use crate::error::BuildError;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

/// 惰性分组迭代器。源迭代器可 `Clone` 时，克隆出的 `Chunks` 会从头重新枚举。
#[derive(Debug, Clone)]
pub struct Chunks<I> {
    iter: I,
    size: NonZeroUsize,
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.size.get();
        let hint = self.iter.size_hint().0.max(1);
        let mut group = Vec::with_capacity(size.min(hint));
        while group.len() < size {
            match self.iter.next() {
                Some(item) => group.push(item),
                None => break,
            }
        }
        if group.is_empty() { None } else { Some(group) }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.iter.size_hint();
        let size = self.size.get();
        (lo.div_ceil(size), hi.map(|h| h.div_ceil(size)))
    }
}

impl<I: FusedIterator> FusedIterator for Chunks<I> {}

/// 按 `size` 分组；空输入产生零个分组。
pub fn chunked<I: IntoIterator>(items: I, size: NonZeroUsize) -> Chunks<I::IntoIter> {
    Chunks {
        iter: items.into_iter(),
        size,
    }
}

/// 把调用方传入的分组大小校验为正数。
pub(crate) fn group_size(value: usize, name: &'static str) -> Result<NonZeroUsize, BuildError> {
    NonZeroUsize::new(value).ok_or(BuildError::InvalidBatchSize { name })
}
