//! 客户端路由
//!
//! `/`、`/upload` → 上传页；`/questions?section=N` → 答题页；`/end?section=N` → 完成页

use std::fmt;

use reqwest::Url;

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::Section;

/// 页面路由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// 上传页
    Upload,
    /// 答题页
    Questions { section: Section },
    /// 完成页
    End { section: Section },
}

impl Route {
    /// 解析路由字符串，section 缺失或非法时取 0
    pub fn parse(input: &str) -> AppResult<Route> {
        let trimmed = input.trim();
        let path = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };

        let invalid = || {
            AppError::Config(ConfigError::InvalidRoute {
                route: input.to_string(),
            })
        };

        let url = Url::parse(&format!("http://app.local{}", path)).map_err(|_| invalid())?;

        let section = Section::from_query(
            url.query_pairs()
                .find(|(key, _)| key == "section")
                .map(|(_, value)| value.into_owned())
                .as_deref(),
        );

        match url.path().trim_end_matches('/') {
            "" | "/upload" => Ok(Route::Upload),
            "/questions" => Ok(Route::Questions { section }),
            "/end" => Ok(Route::End { section }),
            _ => Err(invalid()),
        }
    }

    pub fn section(&self) -> Option<Section> {
        match self {
            Route::Upload => None,
            Route::Questions { section } | Route::End { section } => Some(*section),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Upload => write!(f, "/upload"),
            Route::Questions { section } => write!(f, "/questions?section={}", section),
            Route::End { section } => write!(f, "/end?section={}", section),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_aliases() {
        assert_eq!(Route::parse("/").unwrap(), Route::Upload);
        assert_eq!(Route::parse("/upload").unwrap(), Route::Upload);
        assert_eq!(Route::parse("upload").unwrap(), Route::Upload);
    }

    #[test]
    fn test_section_query() {
        assert_eq!(
            Route::parse("/questions?section=2").unwrap(),
            Route::Questions { section: Section(2) }
        );
        assert_eq!(
            Route::parse("/end?foo=1&section=4").unwrap(),
            Route::End { section: Section(4) }
        );
    }

    #[test]
    fn test_section_defaults_to_zero() {
        assert_eq!(
            Route::parse("/questions").unwrap(),
            Route::Questions { section: Section(0) }
        );
        assert_eq!(
            Route::parse("/questions?section=-3").unwrap(),
            Route::Questions { section: Section(0) }
        );
        assert_eq!(
            Route::parse("/end?section=two").unwrap(),
            Route::End { section: Section(0) }
        );
    }

    #[test]
    fn test_unknown_route() {
        assert!(Route::parse("/about").is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for route in [
            Route::Upload,
            Route::Questions { section: Section(3) },
            Route::End { section: Section(1) },
        ] {
            assert_eq!(Route::parse(&route.to_string()).unwrap(), route);
        }
    }
}
