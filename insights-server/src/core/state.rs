use std::path::Path;
use std::sync::Arc;

use crate::auth::Credentials;
use crate::core::Config;
use crate::dataset::{DISHES_TABLE, DatasetService, TOPPINGS_TABLE};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求处理器持有一份克隆。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | dataset | Arc<DatasetService> | CSV 数据表快照缓存 |
/// | credentials | Credentials | 共享 Basic 凭证对 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据表服务 (reload-on-change 快照缓存)
    pub dataset: Arc<DatasetService>,
    /// 配置的共享凭证对
    credentials: Credentials,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`Self::initialize`] 方法代替
    pub fn new(config: Config, dataset: Arc<DatasetService>, credentials: Credentials) -> Self {
        Self {
            config,
            dataset,
            credentials,
        }
    }

    /// 初始化服务器状态
    ///
    /// 预热加载两张数据表并记录行数；加载失败只告警，
    /// 请求到达时再各自失败 (文件修好后无需重启即可恢复)。
    pub fn initialize(config: &Config) -> Self {
        let dataset = Arc::new(DatasetService::new(Path::new(&config.data_dir)));
        let credentials = Credentials::new(&config.api_username, &config.api_password);

        if credentials.is_incomplete() {
            tracing::warn!(
                "API_USERNAME/API_PASSWORD not fully configured; every API request will be rejected"
            );
        }

        let checks: [(&str, crate::utils::AppResult<usize>); 2] = [
            (DISHES_TABLE, dataset.order_lines().map(|rows| rows.len())),
            (TOPPINGS_TABLE, dataset.topping_lines().map(|rows| rows.len())),
        ];
        for (table, result) in checks {
            match result {
                Ok(rows) => tracing::info!(table, rows, "Table ready"),
                Err(e) => tracing::warn!(
                    table,
                    error = %e,
                    "Table not loadable at startup; requests will fail until the file is fixed"
                ),
            }
        }

        Self::new(config.clone(), dataset, credentials)
    }

    /// 获取配置的共享凭证对
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_with_missing_tables_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);

        // No CSV files exist yet; initialization must still succeed
        let state = ServerState::initialize(&config);
        assert!(state.dataset.order_lines().is_err());
    }

    #[test]
    fn test_state_is_cheaply_cloneable() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        let state = ServerState::initialize(&config);

        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.dataset, &clone.dataset));
    }
}
