use embassy_time::Instant;

use crate::{
    combo::{ComboArbiter, ComboVerdict},
    config::ButtonConfig,
    debounce::Debouncer,
    tracker::{PressOutcome, PressPhase, PressTracker},
    ButtonId, GestureEvent,
};

/// 单次 `tick` 最多产生的事件数。
///
/// 正常轮询下最多两个；只有两次轮询间隔极长时，
/// 同一个按键才可能在一次 `tick` 里既完成长按又超时。
pub const MAX_EVENTS_PER_TICK: usize = 4;

/// 一次 `tick` 产生的事件，按发生顺序排列。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GestureEvents {
    buf: [Option<GestureEvent>; MAX_EVENTS_PER_TICK],
    len: u8,
    read: u8,
}

impl GestureEvents {
    pub const fn new() -> Self {
        Self {
            buf: [None; MAX_EVENTS_PER_TICK],
            len: 0,
            read: 0,
        }
    }

    fn push(&mut self, event: GestureEvent) {
        if let Some(slot) = self.buf.get_mut(self.len as usize) {
            *slot = Some(event);
            self.len += 1;
        }
    }

    /// 取出最早的一个尚未读取的事件。
    pub fn pop(&mut self) -> Option<GestureEvent> {
        if self.read >= self.len {
            return None;
        }
        let event = self.buf[self.read as usize].take();
        self.read += 1;
        event
    }

    /// 尚未读取的事件数。
    pub fn len(&self) -> usize {
        (self.len - self.read) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.read >= self.len
    }

    pub fn iter(&self) -> impl Iterator<Item = GestureEvent> + '_ {
        self.buf[self.read as usize..self.len as usize]
            .iter()
            .filter_map(|slot| *slot)
    }
}

impl Iterator for GestureEvents {
    type Item = GestureEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }
}

/// 双键手势识别器。
///
/// 由外部以固定周期调用 [`tick`](Self::tick)，传入当前时刻和两个按键的原始电平。
/// 识别器内部不读时钟、不启动定时器，所有状态只在 `tick` 中改变。
pub struct GestureRecognizer {
    config: ButtonConfig,
    debouncer: Debouncer,
    trackers: [PressTracker; 2],
    arbiter: ComboArbiter,
}

impl GestureRecognizer {
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            debouncer: Debouncer::new(config.debounce),
            trackers: [
                PressTracker::new(ButtonId::Left),
                PressTracker::new(ButtonId::Right),
            ],
            arbiter: ComboArbiter::new(),
        }
    }

    /// 推进一步。`left`/`right` 为 `true` 表示该按键当前被按下。
    pub fn tick(&mut self, now: Instant, left: bool, right: bool) -> GestureEvents {
        let mut events = GestureEvents::new();
        let levels = [left, right];

        for id in ButtonId::ALL {
            let Some(edge) = self.debouncer.observe(id, levels[id.index()], now) else {
                continue;
            };
            #[cfg(feature = "defmt")]
            defmt::trace!("{}: {} at {} ms", id, edge.edge, edge.at.as_millis());

            match self.trackers[id.index()].on_edge(edge, &self.config) {
                Some(PressOutcome::Click) => events.push(GestureEvent::Click(id)),
                Some(PressOutcome::ReleasedDuringHold) => {
                    self.arbiter.withdraw(id);
                    events.push(GestureEvent::LongPress(id));
                }
                _ => {}
            }
        }

        // 先关闭到期的窗口，再处理本次的晋升
        if let Some(id) = self.arbiter.expire(now, self.config.combo_window) {
            #[cfg(feature = "defmt")]
            defmt::debug!("{}: no combo partner, plain long press", id);
            self.trackers[id.index()].settle();
            events.push(GestureEvent::LongPress(id));
        }

        for id in ButtonId::ALL {
            match self.trackers[id.index()].poll(now, &self.config) {
                Some(PressOutcome::Promoted { at }) => {
                    match self.arbiter.promote(id, at, self.config.combo_window) {
                        ComboVerdict::Combo { partner } => {
                            #[cfg(feature = "defmt")]
                            defmt::debug!("combo long press ({} joined {})", id, partner);
                            self.trackers[id.index()].settle();
                            self.trackers[partner.index()].settle();
                            events.push(GestureEvent::ComboLongPress);
                        }
                        ComboVerdict::Waiting => {
                            #[cfg(feature = "defmt")]
                            defmt::debug!("{}: long hold, waiting for partner", id);
                        }
                    }
                }
                Some(PressOutcome::Timeout) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("{}: long press timed out", id);
                    // 窗口还没到期就超时了，先补发这次长按
                    if self.arbiter.withdraw(id) {
                        events.push(GestureEvent::LongPress(id));
                    }
                    events.push(GestureEvent::LongPressTimeout(id));
                }
                _ => {}
            }
        }

        events
    }

    /// 没有进行中的按压、没有组合窗口、两个按键都处于释放状态。
    pub fn is_idle(&self) -> bool {
        self.arbiter.window().is_none()
            && ButtonId::ALL.into_iter().all(|id| {
                self.trackers[id.index()].is_idle()
                    && !self.debouncer.is_pressed(id)
                    && !self.debouncer.is_settling(id)
            })
    }

    pub fn phase(&self, id: ButtonId) -> PressPhase {
        self.trackers[id.index()].phase()
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ButtonConfig) {
        self.config = config;
        self.debouncer.set_debounce(config.debounce);
    }

    /// 丢弃所有进行中的按压、组合窗口和消抖历史。
    pub fn reset(&mut self) {
        self.debouncer.reset();
        for tracker in self.trackers.iter_mut() {
            tracker.reset();
        }
        self.arbiter.reset();
    }
}
