use embassy_time::Instant;

use crate::{
    config::ButtonConfig,
    debounce::{DebouncedEdge, Edge},
    ButtonId,
};

/// 单个按键当前所处的按压阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressPhase {
    Idle,
    Pressed {
        start: Instant,
    },
    /// 已达到长按阈值，正在等待组合窗口的结论。
    LongHoldPending {
        start: Instant,
        promoted_at: Instant,
    },
    /// 长按（或组合长按）事件已经处理完毕，只等待释放或超时。
    LongHoldActive {
        start: Instant,
    },
}

/// `PressTracker` 每次状态推进的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// 释放时长落在单击区间内。
    Click,
    /// 刚刚达到长按阈值，需要交给组合仲裁。
    Promoted { at: Instant },
    /// 在组合窗口结束前就释放了。
    ReleasedDuringHold,
    /// 长按超时，已强制复位。
    Timeout,
}

/// 跟踪一个按键从按下到释放（或晋升、超时）的整个过程。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressTracker {
    id: ButtonId,
    phase: PressPhase,
}

impl PressTracker {
    pub const fn new(id: ButtonId) -> Self {
        Self {
            id,
            phase: PressPhase::Idle,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == PressPhase::Idle
    }

    /// 处理一个消抖后的电平变化。
    pub fn on_edge(&mut self, edge: DebouncedEdge, config: &ButtonConfig) -> Option<PressOutcome> {
        match (self.phase, edge.edge) {
            (PressPhase::Idle, Edge::Rising) => {
                self.phase = PressPhase::Pressed { start: edge.at };
                None
            }
            (PressPhase::Pressed { start }, Edge::Falling) => {
                self.phase = PressPhase::Idle;
                let held = edge.at.saturating_duration_since(start);
                if held < config.accidental_click {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("{}: accidental press ({} ms) ignored", self.id, held.as_millis());
                    None
                } else if held < config.max_click {
                    Some(PressOutcome::Click)
                } else {
                    // 太长不算单击，又不够长按
                    None
                }
            }
            (PressPhase::LongHoldPending { .. }, Edge::Falling) => {
                self.phase = PressPhase::Idle;
                Some(PressOutcome::ReleasedDuringHold)
            }
            (PressPhase::LongHoldActive { .. }, Edge::Falling) => {
                self.phase = PressPhase::Idle;
                None
            }
            // 超时复位后按键仍被按住，它的释放沿在空闲态下被忽略
            _ => None,
        }
    }

    /// 根据经过的时间推进状态，每次调用最多前进一步。
    pub fn poll(&mut self, now: Instant, config: &ButtonConfig) -> Option<PressOutcome> {
        match self.phase {
            PressPhase::Idle => None,
            PressPhase::Pressed { start } => {
                if now.saturating_duration_since(start) >= config.long_press_time {
                    self.phase = PressPhase::LongHoldPending {
                        start,
                        promoted_at: now,
                    };
                    Some(PressOutcome::Promoted { at: now })
                } else {
                    None
                }
            }
            PressPhase::LongHoldPending { start, .. } | PressPhase::LongHoldActive { start } => {
                if now.saturating_duration_since(start) >= config.long_press_timeout {
                    self.phase = PressPhase::Idle;
                    Some(PressOutcome::Timeout)
                } else {
                    None
                }
            }
        }
    }

    /// 组合窗口已有结论：长按事件已经（或将由调用方）发出，进入保持阶段。
    pub fn settle(&mut self) {
        if let PressPhase::LongHoldPending { start, .. } = self.phase {
            self.phase = PressPhase::LongHoldActive { start };
        }
    }

    pub fn reset(&mut self) {
        self.phase = PressPhase::Idle;
    }
}
