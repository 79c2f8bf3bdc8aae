use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::NotifyHub;
use crate::scheduler::ReservationScheduler;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池实现浅拷贝，克隆成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | jwt | JWT 认证服务 |
/// | notify | 实时通知中心 (房间订阅状态仅存于本进程) |
/// | scheduler | 预订调度器 |
#[derive(Clone)]
pub struct AppState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务
    pub jwt: Arc<JwtService>,
    /// 实时通知中心
    pub notify: Arc<NotifyHub>,
    /// 预订调度器
    pub scheduler: ReservationScheduler,
}

impl AppState {
    /// 初始化服务器状态：打开数据库 (执行迁移)、构建各服务
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// 从已打开的数据库构建状态 (测试常用：内存数据库)
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt = Arc::new(JwtService::new(config.jwt.clone()));
        let notify = Arc::new(NotifyHub::new());
        let scheduler = ReservationScheduler::new(db.pool.clone(), notify.clone());
        Self {
            config,
            db,
            jwt,
            notify,
            scheduler,
        }
    }
}
