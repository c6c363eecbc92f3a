//! 服务启动生命周期状态机
//!
//! 启动流程单向推进：
//! `Init → DbConnecting → DbReady → ListenerBound → Registered → Serving`，
//! 任一步骤失败进入吸收态 `Fatal`。没有回退边：进入 Fatal 后整个进程退出，
//! 由外部监控器从头重启，已获取的资源随进程退出隐式释放。

use std::sync::Arc;

use thiserror::Error;

use crate::health::HealthState;

/// 启动阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    DbConnecting,
    DbReady,
    ListenerBound,
    Registered,
    Serving,
    Fatal,
}

impl Phase {
    /// 唯一合法的下一阶段；Fatal 只能经由 `Lifecycle::fail` 进入
    fn successor(self) -> Option<Phase> {
        match self {
            Phase::Init => Some(Phase::DbConnecting),
            Phase::DbConnecting => Some(Phase::DbReady),
            Phase::DbReady => Some(Phase::ListenerBound),
            Phase::ListenerBound => Some(Phase::Registered),
            Phase::Registered => Some(Phase::Serving),
            Phase::Serving | Phase::Fatal => None,
        }
    }
}

/// 非法的阶段跳转
#[derive(Debug, Error)]
#[error("invalid lifecycle transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: Phase,
    pub to: Phase,
}

/// 生命周期状态，同时是健康标志的唯一写端
pub struct Lifecycle {
    phase: Phase,
    health: Arc<HealthState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Init,
            health: Arc::new(HealthState::new()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 健康标志的共享句柄，交给健康上报服务只读使用
    pub fn health(&self) -> Arc<HealthState> {
        Arc::clone(&self.health)
    }

    fn advance(&mut self, to: Phase) -> Result<(), InvalidTransition> {
        if self.phase.successor() == Some(to) {
            self.phase = to;
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self.phase,
                to,
            })
        }
    }

    pub fn db_connecting(&mut self) -> Result<(), InvalidTransition> {
        self.advance(Phase::DbConnecting)
    }

    pub fn db_ready(&mut self) -> Result<(), InvalidTransition> {
        self.advance(Phase::DbReady)
    }

    /// 端口绑定完成。服务从此刻起物理上可以接受调用，
    /// 因此先于注册置为 SERVING。
    pub fn listener_bound(&mut self) -> Result<(), InvalidTransition> {
        self.advance(Phase::ListenerBound)?;
        self.health.set_serving();
        Ok(())
    }

    pub fn registered(&mut self) -> Result<(), InvalidTransition> {
        self.advance(Phase::Registered)
    }

    pub fn serving(&mut self) -> Result<(), InvalidTransition> {
        self.advance(Phase::Serving)
    }

    /// 从任意阶段进入 Fatal；Fatal 吸收一切后续转移
    pub fn fail(&mut self) {
        self.phase = Phase::Fatal;
        self.health.set_not_serving();
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_walk_reaches_serving() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), Phase::Init);

        lifecycle.db_connecting().unwrap();
        lifecycle.db_ready().unwrap();
        lifecycle.listener_bound().unwrap();
        lifecycle.registered().unwrap();
        lifecycle.serving().unwrap();
        assert_eq!(lifecycle.phase(), Phase::Serving);
    }

    #[test]
    fn health_flips_to_serving_exactly_at_listener_bound() {
        let mut lifecycle = Lifecycle::new();
        let health = lifecycle.health();

        assert!(!health.is_serving());
        lifecycle.db_connecting().unwrap();
        assert!(!health.is_serving());
        lifecycle.db_ready().unwrap();
        assert!(!health.is_serving());

        lifecycle.listener_bound().unwrap();
        assert!(health.is_serving());
    }

    #[test]
    fn skipped_transition_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.db_connecting().unwrap();

        let err = lifecycle.listener_bound().unwrap_err();
        assert_eq!(err.from, Phase::DbConnecting);
        assert_eq!(err.to, Phase::ListenerBound);
        assert_eq!(lifecycle.phase(), Phase::DbConnecting);
    }

    #[test]
    fn no_transition_out_of_serving() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.db_connecting().unwrap();
        lifecycle.db_ready().unwrap();
        lifecycle.listener_bound().unwrap();
        lifecycle.registered().unwrap();
        lifecycle.serving().unwrap();

        assert!(lifecycle.db_connecting().is_err());
        assert!(lifecycle.serving().is_err());
    }

    /// 注册失败的服务绝不能停留在可被发现但已死、或运行中但不可发现的状态
    #[test]
    fn registration_failure_after_bind_is_fatal_and_clears_serving() {
        let mut lifecycle = Lifecycle::new();
        let health = lifecycle.health();

        lifecycle.db_connecting().unwrap();
        lifecycle.db_ready().unwrap();
        lifecycle.listener_bound().unwrap();
        assert!(health.is_serving());

        lifecycle.fail();
        assert_eq!(lifecycle.phase(), Phase::Fatal);
        assert!(!health.is_serving());
    }

    #[test]
    fn fatal_is_absorbing() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.fail();

        assert!(lifecycle.db_connecting().is_err());
        lifecycle.fail();
        assert_eq!(lifecycle.phase(), Phase::Fatal);
    }
}
