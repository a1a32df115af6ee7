use embassy_time::{Duration, Instant};

use crate::ButtonId;

/// 消抖后的电平变化方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// 按下。
    Rising,
    /// 释放。
    Falling,
}

/// 一次被接受的电平变化。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebouncedEdge {
    pub edge: Edge,
    /// 原始电平第一次稳定在新值上的时刻。
    ///
    /// 当变化被消抖时间挡住、之后才被接受时，它早于接受时刻，
    /// 因此按压时长按真实的按下/释放时刻计算。
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Channel {
    pressed: bool,
    last_transition: Option<Instant>,
    candidate_since: Option<Instant>,
}

impl Channel {
    const fn new() -> Self {
        Self {
            pressed: false,
            last_transition: None,
            candidate_since: None,
        }
    }
}

/// 两个按键各自独立的消抖过滤器。
///
/// 只有当原始电平与当前逻辑电平不同，并且距离上一次被接受的变化
/// 已经过了 `debounce` 时，新电平才会被接受。
pub struct Debouncer {
    debounce: Duration,
    channels: [Channel; 2],
}

impl Debouncer {
    pub const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            channels: [Channel::new(); 2],
        }
    }

    /// 输入一次原始采样，如果产生了被接受的变化则返回它。
    pub fn observe(&mut self, id: ButtonId, pressed: bool, now: Instant) -> Option<DebouncedEdge> {
        let debounce = self.debounce;
        let channel = &mut self.channels[id.index()];

        if pressed == channel.pressed {
            // 抖回原电平，之前的候选作废
            channel.candidate_since = None;
            return None;
        }

        let since = *channel.candidate_since.get_or_insert(now);
        let settled = match channel.last_transition {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= debounce,
        };
        if !settled {
            return None;
        }

        channel.pressed = pressed;
        channel.last_transition = Some(now);
        channel.candidate_since = None;

        let edge = if pressed { Edge::Rising } else { Edge::Falling };
        Some(DebouncedEdge { edge, at: since })
    }

    /// 当前的逻辑电平。
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.channels[id.index()].pressed
    }

    /// 是否有一个被消抖时间挡住、尚未接受的电平变化。
    pub fn is_settling(&self, id: ButtonId) -> bool {
        self.channels[id.index()].candidate_since.is_some()
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn reset(&mut self) {
        self.channels = [Channel::new(); 2];
    }
}
