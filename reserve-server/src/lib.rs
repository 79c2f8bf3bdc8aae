//! Reserve Server - 餐厅预订调度服务
//!
//! # 架构概述
//!
//! 核心是桌台预订调度：在有限的物理桌台上分配带时间区间的预订请求，
//! 防止重复预订，并向订阅客户端实时推送状态变更。
//!
//! # 模块结构
//!
//! ```text
//! reserve-server/src/
//! ├── core/          # 配置、状态
//! ├── auth/          # JWT 认证 (身份由外部认证服务签发)
//! ├── api/           # HTTP 路由和处理器 + WebSocket
//! ├── db/            # 数据库层 (SQLite + 仓储)
//! ├── scheduler/     # 预订调度器 + 可用性查询引擎
//! ├── notify/        # 实时通知中心 (房间订阅/广播)
//! └── utils/         # 错误类型、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod scheduler;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{AppState, Config};
pub use db::DbService;
pub use notify::{NotifyHub, Room};
pub use scheduler::ReservationScheduler;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
