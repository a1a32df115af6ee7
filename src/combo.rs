use embassy_time::{Duration, Instant};

use crate::ButtonId;

/// 一个打开着的组合检测窗口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComboWindow {
    pub button: ButtonId,
    pub opened_at: Instant,
}

/// 晋升通知的仲裁结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComboVerdict {
    /// 另一个按键的窗口仍然打开，组合成立。
    Combo { partner: ButtonId },
    /// 为该按键打开了窗口，等待另一个按键。
    Waiting,
}

/// 在两个按键之间判定组合长按。
///
/// 任一时刻最多只有一个窗口。窗口是半开区间 `[opened_at, opened_at + window)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboArbiter {
    window: Option<ComboWindow>,
}

impl ComboArbiter {
    pub const fn new() -> Self {
        Self { window: None }
    }

    pub fn window(&self) -> Option<ComboWindow> {
        self.window
    }

    /// 某个按键达到了长按阈值。
    ///
    /// 调用前需要先调用同一时刻的 [`expire`](Self::expire)，
    /// 这样留下的窗口一定还在有效期内。
    pub fn promote(&mut self, id: ButtonId, now: Instant, window: Duration) -> ComboVerdict {
        if let Some(open) = self.window {
            if open.button == id.other()
                && now.saturating_duration_since(open.opened_at) < window
            {
                self.window = None;
                return ComboVerdict::Combo {
                    partner: open.button,
                };
            }
        }
        self.window = Some(ComboWindow {
            button: id,
            opened_at: now,
        });
        ComboVerdict::Waiting
    }

    /// 关闭已经到期的窗口，返回其所属的按键。
    pub fn expire(&mut self, now: Instant, window: Duration) -> Option<ButtonId> {
        match self.window {
            Some(open) if now.saturating_duration_since(open.opened_at) >= window => {
                self.window = None;
                Some(open.button)
            }
            _ => None,
        }
    }

    /// 窗口所属的按键提前释放，撤销窗口。
    pub fn withdraw(&mut self, id: ButtonId) -> bool {
        match self.window {
            Some(open) if open.button == id => {
                self.window = None;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.window = None;
    }
}
