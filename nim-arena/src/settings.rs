//! 对局平台设置
//!
//! 提供设置数据结构与 JSON 持久化。缺失字段取默认值，
//! 文件不存在或格式无效时回退到默认设置。

use std::path::Path;

use anyhow::Context;
use nim_ai::SearchConfig;
use nim_core::SEARCH_MAX_COUNTERS;
use serde::{Deserialize, Serialize};

/// 基准测试默认参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkDefaults {
    /// 每个难度的对局数
    pub trials: u32,
    /// 随机种子
    pub seed: u64,
    pub player1: String,
    pub player2: String,
}

impl Default for BenchmarkDefaults {
    fn default() -> Self {
        Self {
            trials: 25,
            seed: 123,
            player1: "Alpha-Beta".to_string(),
            player2: "Reflex".to_string(),
        }
    }
}

/// 对局平台设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// 允许搜索 AI 参与的最大总棋子数
    pub search_max_counters: u32,
    /// 搜索深度策略
    pub search: SearchConfig,
    pub benchmark: BenchmarkDefaults,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            search_max_counters: SEARCH_MAX_COUNTERS,
            search: SearchConfig::default(),
            benchmark: BenchmarkDefaults::default(),
        }
    }
}

impl ArenaSettings {
    /// 从文件加载设置，失败时使用默认设置
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("已加载设置: {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("设置文件格式无效: {}，使用默认设置", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("无法读取设置文件: {}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 保存设置到文件
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
            }
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content).with_context(|| format!("写入设置文件失败: {:?}", path))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }
}
