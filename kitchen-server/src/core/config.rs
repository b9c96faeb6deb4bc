use chrono_tz::Tz;
use shared::models::StockLevels;
use std::path::PathBuf;

/// 服务器配置 - 厨房服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（`.env` 文件由 dotenv 加载）：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (database/, logs/) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | TIMEZONE | Asia/Jakarta | 营业时区 (统计报表) |
/// | LOW_STOCK_THRESHOLD | 10 | 低库存告警阈值 |
/// | STRICT_STATUS_TRANSITIONS | false | 只允许订单状态前进 |
/// | MENU_PATH | - | 菜单 JSON 文件 (缺省使用内置菜单) |
/// | INITIAL_STOCK | - | 初始库存，如 `ayam=20,jamur=20` (仅在库存为空时写入) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/kitchen INITIAL_STOCK=ayam=50,jamur=50 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 营业时区
    pub timezone: Tz,
    pub low_stock_threshold: u64,
    /// true: 状态只能前进，completed 之后不可变更
    pub strict_status_transitions: bool,
    pub menu_path: Option<String>,
    pub initial_stock: Option<StockLevels>,
}

/// Parse `ayam=20,jamur=20`; malformed pairs are skipped
pub fn parse_stock_levels(raw: &str) -> StockLevels {
    raw.split(',')
        .filter_map(|pair| {
            let (name, count) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), count.trim().parse::<u64>().ok()?))
        })
        .collect()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(false),
            timezone: env_parse("TIMEZONE").unwrap_or(chrono_tz::Asia::Jakarta),
            low_stock_threshold: env_parse("LOW_STOCK_THRESHOLD").unwrap_or(10),
            strict_status_transitions: env_parse("STRICT_STATUS_TRANSITIONS").unwrap_or(false),
            menu_path: std::env::var("MENU_PATH").ok().filter(|p| !p.trim().is_empty()),
            initial_stock: std::env::var("INITIAL_STOCK")
                .ok()
                .map(|raw| parse_stock_levels(&raw))
                .filter(|levels| !levels.is_empty()),
        }
    }

    /// 使用自定义工作目录
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    /// work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        self.work_dir().join("database")
    }

    /// work_dir/database/kitchen.redb
    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("kitchen.redb")
    }

    /// work_dir/logs
    pub fn log_dir(&self) -> PathBuf {
        self.work_dir().join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock_levels() {
        let levels = parse_stock_levels(" ayam = 20, jamur=15 ,bad, =3, tofu=x");
        assert_eq!(levels.get("ayam"), 20);
        assert_eq!(levels.get("jamur"), 15);
        assert_eq!(levels.iter().count(), 2);
    }

    #[test]
    fn test_derived_paths() {
        let config = Config::with_work_dir("/tmp/kitchen");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/kitchen/database/kitchen.redb"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/kitchen/logs"));
    }
}
