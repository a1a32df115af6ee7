#![no_std]
#![allow(async_fn_in_trait)]

pub mod combo;
pub mod config;
pub mod debounce;
pub mod gpio;
pub mod recognizer;
pub mod tracker;

pub use config::*;
pub use recognizer::{GestureEvents, GestureRecognizer};

use embassy_futures::select::select;
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    pubsub::{PubSubChannel, Publisher, Subscriber},
};
use embassy_time::{Instant, Ticker};

/// 机器人上的两个物理按键。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Left,
    Right,
}

impl ButtonId {
    pub const ALL: [ButtonId; 2] = [ButtonId::Left, ButtonId::Right];

    pub const fn index(self) -> usize {
        match self {
            ButtonId::Left => 0,
            ButtonId::Right => 1,
        }
    }

    pub const fn other(self) -> ButtonId {
        match self {
            ButtonId::Left => ButtonId::Right,
            ButtonId::Right => ButtonId::Left,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Click(ButtonId),
    LongPress(ButtonId),
    LongPressTimeout(ButtonId),
    /// 两个按键在组合窗口内先后进入长按。
    ComboLongPress,
}

/// 一个可以被轮询的物理按键。
pub trait ButtonInput {
    /// 当前是否处于按下状态（不做消抖）。
    fn is_pressed(&mut self) -> bool;

    /// 等待按键进入按下状态，已经按下时立即返回。
    async fn wait_for_press(&mut self);
}

pub type GestureChannel<const CAP: usize, const SUBS: usize, const PUBS: usize> =
    PubSubChannel<CriticalSectionRawMutex, GestureEvent, CAP, SUBS, PUBS>;
pub type GesturePublisher<'a, const CAP: usize, const SUBS: usize, const PUBS: usize> =
    Publisher<'a, CriticalSectionRawMutex, GestureEvent, CAP, SUBS, PUBS>;
pub type GestureSubscriber<'a, const CAP: usize, const SUBS: usize, const PUBS: usize> =
    Subscriber<'a, CriticalSectionRawMutex, GestureEvent, CAP, SUBS, PUBS>;

/// 把两个物理按键和 [`GestureRecognizer`] 接在一起的异步驱动。
///
/// 有按键活动时按 `poll_interval` 轮询；两个按键都松开且识别器空闲时，
/// 挂起等待任一按键被按下。
pub struct GestureButtons<L: ButtonInput, R: ButtonInput> {
    left: L,
    right: R,
    recognizer: GestureRecognizer,
    pending: GestureEvents,
}

impl<L: ButtonInput, R: ButtonInput> GestureButtons<L, R> {
    pub fn new(left: L, right: R, config: ButtonConfig) -> Self {
        Self {
            left,
            right,
            recognizer: GestureRecognizer::new(config),
            pending: GestureEvents::new(),
        }
    }

    pub async fn next_event(&mut self) -> GestureEvent {
        let mut ticker = Ticker::every(self.recognizer.config().poll_interval);
        loop {
            // 上一次 tick 可能产生了多个事件
            if let Some(event) = self.pending.pop() {
                return event;
            }

            if self.recognizer.is_idle() && !self.left.is_pressed() && !self.right.is_pressed() {
                select(self.left.wait_for_press(), self.right.wait_for_press()).await;
                ticker = Ticker::every(self.recognizer.config().poll_interval);
            }

            let left = self.left.is_pressed();
            let right = self.right.is_pressed();
            self.pending = self.recognizer.tick(Instant::now(), left, right);
            if self.pending.is_empty() {
                ticker.next().await;
            }
        }
    }

    /// 把识别到的每个事件发布到通道上。这是需要 spawn 到后台的任务。
    pub async fn run<const CAP: usize, const SUBS: usize, const PUBS: usize>(
        mut self,
        publisher: GesturePublisher<'_, CAP, SUBS, PUBS>,
    ) -> ! {
        loop {
            let event = self.next_event().await;
            publisher.publish(event).await;
        }
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn set_config(&mut self, new_config: ButtonConfig) {
        self.recognizer.set_config(new_config);
    }

    pub fn left_mut(&mut self) -> &mut L {
        &mut self.left
    }

    pub fn right_mut(&mut self) -> &mut R {
        &mut self.right
    }

    /// 重置识别状态，并丢弃尚未取走的事件。
    pub fn reset(&mut self) {
        self.recognizer.reset();
        self.pending = GestureEvents::new();
    }
}
