use core::fmt;

use embassy_time::Duration;

/// 消抖时间：两次被接受的电平变化之间至少间隔这么久。
pub const DEBOUNCE_TIME: Duration = Duration::from_millis(250);
/// 短于此时长的按压视为触点抖动，不产生任何事件。
pub const ACCIDENTAL_CLICK_TIME: Duration = Duration::from_millis(200);
/// 仍然算作单击的最长按压时长（不含）。
pub const MAX_CLICK_TIME: Duration = Duration::from_millis(500);
/// 按住超过此时长即晋升为长按。
pub const LONG_BUTTON_HOLD: Duration = Duration::from_millis(1000);
/// 长按开始后，等待另一个按键也进入长按的窗口。
pub const LONG_DOUBLE_CHECK: Duration = Duration::from_millis(200);
/// 长按持续到此时长后强制复位（防止按键卡死）。
pub const LONG_BUTTON_TIMEOUT: Duration = Duration::from_millis(2000);
/// 异步轮询驱动的采样周期。
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 双键手势识别的时间参数。
///
/// 所有时长都从按键的消抖后按下时刻开始计算，
/// 除了 `combo_window`，它从第一个按键晋升为长按的时刻开始计算。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// 消抖持续时间。
    ///
    /// 同一个按键上一次被接受的电平变化之后，这段时间内的任何变化都不会被接受。
    pub debounce: Duration,

    /// 误触阈值。按压时长小于该值时直接丢弃。
    pub accidental_click: Duration,

    /// 单击的上限。按压时长位于 `[accidental_click, max_click)` 时产生 `Click`。
    pub max_click: Duration,

    /// 触发长按所需的持续按压时间。
    pub long_press_time: Duration,

    /// 组合长按的检测窗口。
    ///
    /// 第一个按键晋升为长按后，如果另一个按键在此窗口内也晋升，
    /// 则只产生一个 `ComboLongPress`。
    pub combo_window: Duration,

    /// 长按超时。按压总时长达到该值时产生 `LongPressTimeout` 并复位。
    pub long_press_timeout: Duration,

    /// `GestureButtons` 轮询引脚的周期，同步识别器不使用。
    pub poll_interval: Duration,
}

impl Default for ButtonConfig {
    /// 机器人固件使用的默认参数。
    ///
    /// - 消抖: 250ms
    /// - 误触阈值: 200ms
    /// - 单击上限: 500ms
    /// - 长按阈值: 1000ms
    /// - 组合窗口: 200ms
    /// - 长按超时: 2000ms
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_TIME,
            accidental_click: ACCIDENTAL_CLICK_TIME,
            max_click: MAX_CLICK_TIME,
            long_press_time: LONG_BUTTON_HOLD,
            combo_window: LONG_DOUBLE_CHECK,
            long_press_timeout: LONG_BUTTON_TIMEOUT,
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl ButtonConfig {
    /// 检查各个时间阈值之间的先后关系。
    ///
    /// 识别器本身接受任意配置，但只有满足
    /// `accidental_click <= max_click <= long_press_time < long_press_timeout`
    /// 的配置才能得到有意义的手势。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accidental_click > self.max_click {
            return Err(ConfigError::AccidentalAboveClick);
        }
        if self.max_click > self.long_press_time {
            return Err(ConfigError::ClickAboveLongPress);
        }
        if self.long_press_time >= self.long_press_timeout {
            return Err(ConfigError::TimeoutBeforeLongPress);
        }
        if self.combo_window == Duration::from_ticks(0) {
            return Err(ConfigError::EmptyComboWindow);
        }
        if self.poll_interval == Duration::from_ticks(0) {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

/// `ButtonConfig::validate` 发现的问题。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    AccidentalAboveClick,
    ClickAboveLongPress,
    TimeoutBeforeLongPress,
    EmptyComboWindow,
    ZeroPollInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::AccidentalAboveClick => "accidental_click must not exceed max_click",
            Self::ClickAboveLongPress => "max_click must not exceed long_press_time",
            Self::TimeoutBeforeLongPress => "long_press_timeout must be longer than long_press_time",
            Self::EmptyComboWindow => "combo_window must be non-zero",
            Self::ZeroPollInterval => "poll_interval must be non-zero",
        };
        f.write_str(msg)
    }
}
