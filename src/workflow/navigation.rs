//! 页面导航与视图令牌
//!
//! 每次导航都会让代数 +1；视图持有进入时的令牌，
//! 异步请求返回后先检查令牌，过期的结果直接丢弃

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::workflow::route::Route;

/// 视图令牌
#[derive(Debug, Clone)]
pub struct ViewToken {
    issued: u64,
    live: Arc<AtomicU64>,
}

impl ViewToken {
    /// 令牌所属的视图是否仍在显示
    pub fn is_current(&self) -> bool {
        self.live.load(Ordering::SeqCst) == self.issued
    }

    /// 不挂在任何导航器上的令牌（永远有效）
    pub fn detached() -> Self {
        Self {
            issued: 0,
            live: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// 导航器：持有当前路由和代数
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    generation: Arc<AtomicU64>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// 为当前视图签发令牌
    pub fn token(&self) -> ViewToken {
        ViewToken {
            issued: self.generation.load(Ordering::SeqCst),
            live: self.generation.clone(),
        }
    }

    /// 跳转到新路由，之前签发的令牌全部失效
    pub fn navigate(&mut self, route: Route) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        info!("🧭 导航: {} → {}", self.current, route);
        self.current = route;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    #[test]
    fn test_navigation_expires_tokens() {
        let mut nav = Navigator::new(Route::Upload);
        let upload_token = nav.token();
        assert!(upload_token.is_current());

        nav.navigate(Route::Questions { section: Section(0) });
        assert!(!upload_token.is_current());
        assert!(nav.token().is_current());
        assert_eq!(nav.current(), Route::Questions { section: Section(0) });
    }

    #[test]
    fn test_same_route_still_new_generation() {
        let mut nav = Navigator::new(Route::Upload);
        let first = nav.token();
        nav.navigate(Route::Upload);
        assert!(!first.is_current());
    }

    #[test]
    fn test_detached_token() {
        assert!(ViewToken::detached().is_current());
    }
}
