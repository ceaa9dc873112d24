//! 在场收割器
//!
//! 周期性扫描注册表，驱逐超过 TTL 未心跳的参与者并补发离场通知。
//! `sweep` 可被测试直接调用，单次扫描是确定性的；
//! `start`/`stop` 负责后台定时任务的生命周期。

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use domain::Timestamp;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::clock::Clock;
use crate::error::ApplicationResult;
use crate::services::{MessageStore, ParticipantRegistry};

/// 收割器配置
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// 无心跳多久后有资格被驱逐
    pub ttl: Duration,
    /// 两次扫描之间的间隔
    pub sweep_interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10),
            sweep_interval: Duration::from_secs(15),
        }
    }
}

/// 单次扫描的结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub evicted: usize,
    pub failed: usize,
}

pub struct PresenceReaper {
    registry: Arc<ParticipantRegistry>,
    messages: Arc<MessageStore>,
    clock: Arc<dyn Clock>,
    config: ReaperConfig,
    is_running: Arc<RwLock<bool>>,
}

impl PresenceReaper {
    pub fn new(
        registry: Arc<ParticipantRegistry>,
        messages: Arc<MessageStore>,
        clock: Arc<dyn Clock>,
        config: ReaperConfig,
    ) -> Self {
        Self {
            registry,
            messages,
            clock,
            config,
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// 执行一次扫描
    ///
    /// 每个参与者独立处理：单个失败只记录日志并计入统计，
    /// 不中断同一轮中其余参与者。驱逐加离场通知作为一个工作单元，
    /// 在本函数返回前全部完成。
    pub async fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let ttl = TimeDelta::from_std(self.config.ttl).unwrap_or(TimeDelta::MAX);
        let stale_before = now.checked_sub_signed(ttl).unwrap_or(Timestamp::MIN_UTC);

        let mut report = SweepReport::default();

        let participants = match self.registry.list().await {
            Ok(participants) => participants,
            Err(err) => {
                error!(error = %err, code = err.error_code(), "扫描失败：无法读取参与者列表");
                report.failed += 1;
                return report;
            }
        };
        report.scanned = participants.len();

        for participant in participants {
            if participant.last_heartbeat >= stale_before {
                continue;
            }
            match self.evict_and_notify(&participant.name, stale_before).await {
                // 驱逐决策在移除时刻重新验证过；false 表示心跳抢先刷新，本轮放过
                Ok(true) => report.evicted += 1,
                Ok(false) => {}
                Err(err) => {
                    report.failed += 1;
                    error!(
                        name = %participant.name,
                        error = %err,
                        code = err.error_code(),
                        "驱逐失败，继续处理其余参与者"
                    );
                }
            }
        }

        if report.evicted > 0 || report.failed > 0 {
            info!(
                scanned = report.scanned,
                evicted = report.evicted,
                failed = report.failed,
                "扫描完成"
            );
        }
        report
    }

    async fn evict_and_notify(
        &self,
        name: &str,
        stale_before: Timestamp,
    ) -> ApplicationResult<bool> {
        if !self.registry.evict_if_stale(name, stale_before).await? {
            return Ok(false);
        }
        self.messages
            .append_system(name, format!("{name} leaves the room"))
            .await?;
        Ok(true)
    }

    /// 启动周期扫描任务；已在运行则什么都不做
    pub async fn start(self: &Arc<Self>) {
        {
            let mut running = self.is_running.write().await;
            if *running {
                return;
            }
            *running = true;
        }

        let reaper = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(reaper.config.sweep_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if !*reaper.is_running.read().await {
                    break;
                }
                reaper.sweep().await;
            }
            info!("在场收割器已停止");
        });

        info!(
            ttl = ?self.config.ttl,
            sweep_interval = ?self.config.sweep_interval,
            "在场收割器已启动"
        );
    }

    /// 停止周期扫描；已在途的那一轮会完整收尾
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }
}
