//! 分段计算
//!
//! 题目序列按每段 10 题切分，段号从 0 开始

use std::fmt;
use std::ops::Range;

use crate::error::DataShapeError;

/// 每段题目数
pub const SECTION_SIZE: usize = 10;

/// 分段索引
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Section(pub usize);

impl Section {
    pub const FIRST: Section = Section(0);

    pub fn index(self) -> usize {
        self.0
    }

    /// 解析查询参数中的 section，缺失或非法时取 0
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(Section)
            .unwrap_or_default()
    }

    /// 本段在展开序列中的范围，越界时返回空范围
    pub fn range(self, total: usize) -> Range<usize> {
        let start = self.0.saturating_mul(SECTION_SIZE).min(total);
        let end = start.saturating_add(SECTION_SIZE).min(total);
        start..end
    }

    /// 本段范围；没有题目或段号越界时返回对应的数据错误
    pub fn checked_range(self, total: usize) -> Result<Range<usize>, DataShapeError> {
        if total == 0 {
            return Err(DataShapeError::EmptyDocument);
        }
        let range = self.range(total);
        if range.is_empty() {
            return Err(DataShapeError::SectionOutOfRange {
                section: self.0,
                total_sections: total_sections(total),
            });
        }
        Ok(range)
    }

    /// 取出本段的题目切片
    pub fn slice<T>(self, items: &[T]) -> &[T] {
        &items[self.range(items.len())]
    }

    /// 下一段（循环），没有题目时返回 None
    pub fn next(self, total_questions: usize) -> Option<Section> {
        let sections = total_sections(total_questions);
        if sections == 0 {
            return None;
        }
        Some(Section((self.0 % sections + 1) % sections))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 总段数 = ceil(total / 10)
pub fn total_sections(total_questions: usize) -> usize {
    total_questions.div_ceil(SECTION_SIZE)
}
