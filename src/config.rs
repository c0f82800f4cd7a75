//! Settings：生成参数的全局默认值（批大小、多行合并数、临时表后缀）。
//!
//! 每个 builder 在构造时拷贝一份当前默认值，之后可以单独覆盖，互不影响。

use std::sync::{Mutex, MutexGuard, OnceLock};

/// 单条 INSERT 合并多少行的默认值。
pub const DEFAULT_MULTI_LINE_NUM: usize = 25;

/// MERGE 临时表名后缀的默认值。
pub const DEFAULT_STAGING_SUFFIX: &str = "temp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// 单条 INSERT 的 VALUES 列表最多合并的行数。
    pub multi_line_num: usize,
    /// 每个独立返回的语句组最多包含的行数。
    pub batch_row_count: usize,
    /// MERGE 临时表 = 小写表名 + 后缀。
    pub staging_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            multi_line_num: DEFAULT_MULTI_LINE_NUM,
            batch_row_count: usize::MAX,
            staging_suffix: DEFAULT_STAGING_SUFFIX.to_string(),
        }
    }
}

static DEFAULT_SETTINGS: OnceLock<Mutex<Settings>> = OnceLock::new();
static DEFAULT_SETTINGS_LOCK: Mutex<()> = Mutex::new(());

fn settings_cell() -> &'static Mutex<Settings> {
    DEFAULT_SETTINGS.get_or_init(|| Mutex::new(Settings::default()))
}

/// 获取当前全局默认 Settings。
pub fn default_settings() -> Settings {
    settings_cell()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// 设置全局默认 Settings，返回旧值。
pub fn set_default_settings(settings: Settings) -> Settings {
    let mut g = settings_cell().lock().unwrap_or_else(|e| e.into_inner());
    std::mem::replace(&mut *g, settings)
}

/// 修改全局默认 Settings 的 RAII guard（会持有一个全局锁，避免并行测试互相干扰）。
pub struct DefaultSettingsGuard {
    _lock: MutexGuard<'static, ()>,
    old: Settings,
}

impl Drop for DefaultSettingsGuard {
    fn drop(&mut self) {
        let _ = set_default_settings(self.old.clone());
    }
}

/// 在一个作用域内临时设置默认 Settings，并保证退出作用域后自动恢复。
pub fn set_default_settings_scoped(settings: Settings) -> DefaultSettingsGuard {
    let lock = DEFAULT_SETTINGS_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_settings(settings);
    DefaultSettingsGuard { _lock: lock, old }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scoped_settings_are_restored() {
        let _outer = set_default_settings_scoped(Settings::default());
        {
            // 持有外层 guard 时不能再取锁；直接 set 并手动还原。
            let old = set_default_settings(Settings {
                multi_line_num: 2,
                ..Settings::default()
            });
            assert_eq!(default_settings().multi_line_num, 2);
            set_default_settings(old);
        }
        assert_eq!(default_settings(), Settings::default());
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.multi_line_num, 25);
        assert_eq!(s.batch_row_count, usize::MAX);
        assert_eq!(s.staging_suffix, "temp");
    }
}
