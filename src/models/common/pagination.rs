use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

impl PaginationQuery {
    /// 规范化后的 (page, size)：页码从 1 开始，单页 1..=100 条
    pub fn normalized(&self) -> (i64, i64) {
        (self.page.max(1), self.size.clamp(1, 100))
    }
}

impl<T: TS> PaginatedResponse<T> {
    /// 对已排序的完整序列做分页切片
    pub fn from_sorted(items: Vec<T>, query: &PaginationQuery) -> Self {
        let (page, size) = query.normalized();
        let total = items.len() as i64;
        let total_pages = (total + size - 1) / size;
        // 页码来自客户端，乘法需饱和，超出范围即为空页
        let skip = usize::try_from((page - 1).saturating_mul(size)).unwrap_or(usize::MAX);

        let items = items
            .into_iter()
            .skip(skip)
            .take(size as usize)
            .collect();

        Self {
            items,
            pagination: PaginationInfo {
                page,
                page_size: size,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sorted_slices_requested_page() {
        let query = PaginationQuery { page: 2, size: 2 };
        let resp = PaginatedResponse::from_sorted(vec![1, 2, 3, 4, 5], &query);
        assert_eq!(resp.items, vec![3, 4]);
        assert_eq!(resp.pagination.total, 5);
        assert_eq!(resp.pagination.total_pages, 3);
    }

    #[test]
    fn test_from_sorted_past_last_page_is_empty() {
        let query = PaginationQuery { page: 9, size: 10 };
        let resp = PaginatedResponse::from_sorted(vec![1, 2, 3], &query);
        assert!(resp.items.is_empty());
        assert_eq!(resp.pagination.total_pages, 1);
    }

    #[test]
    fn test_from_sorted_huge_page_does_not_overflow() {
        let query = PaginationQuery {
            page: i64::MAX,
            size: 100,
        };
        let resp = PaginatedResponse::from_sorted(vec![1, 2, 3], &query);
        assert!(resp.items.is_empty());
        assert_eq!(resp.pagination.page, i64::MAX);
        assert_eq!(resp.pagination.total, 3);
        assert_eq!(resp.pagination.total_pages, 1);
    }

    #[test]
    fn test_normalized_clamps_values() {
        let query = PaginationQuery { page: 0, size: 1000 };
        assert_eq!(query.normalized(), (1, 100));
    }

    #[test]
    fn test_deserialize_string_page() {
        let query: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":5}"#).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.size, 5);
    }
}
