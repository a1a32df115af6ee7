use crate::ButtonInput;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// 定义GPIO按钮的有效电平。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

/// 一个直接由GPIO输入引脚驱动的按键。
///
/// 读取失败的引脚一律按“未按下”处理。
pub struct GpioButton<P: InputPin> {
    pin: P,
    active_level: ActiveLevel,
}

impl<P: InputPin> GpioButton<P> {
    /// 创建一个新的GPIO按键。
    ///
    /// # 参数
    /// * `pin`: 一个实现了 `InputPin` 的GPIO引脚。要在 `GestureButtons` 中使用，
    ///   它还需要实现 `embedded_hal_async::digital::Wait`。
    /// * `active_level`: 按键按下时的有效电平。
    pub fn new(pin: P, active_level: ActiveLevel) -> Self {
        Self { pin, active_level }
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

impl<P> ButtonInput for GpioButton<P>
where
    P: InputPin + Wait,
{
    fn is_pressed(&mut self) -> bool {
        match self.active_level {
            ActiveLevel::Low => self.pin.is_low().unwrap_or(false),
            ActiveLevel::High => self.pin.is_high().unwrap_or(false),
        }
    }

    async fn wait_for_press(&mut self) {
        match self.active_level {
            ActiveLevel::Low => self.pin.wait_for_low().await.unwrap_or_default(),
            ActiveLevel::High => self.pin.wait_for_high().await.unwrap_or_default(),
        }
    }
}
