use butterfly_buttons::{
    config::ButtonConfig, tracker::PressPhase, ButtonId, GestureEvent, GestureRecognizer,
};
use embassy_time::Instant;

const TICK_MS: u64 = 10;

// --- 合成时间驱动 ---

struct Sim {
    recognizer: GestureRecognizer,
    now: u64,
    left: bool,
    right: bool,
    log: Vec<(u64, GestureEvent)>,
}

impl Sim {
    fn new() -> Self {
        Self {
            recognizer: GestureRecognizer::new(ButtonConfig::default()),
            now: 0,
            left: false,
            right: false,
            log: Vec::new(),
        }
    }

    fn tick(&mut self) {
        let events = self
            .recognizer
            .tick(Instant::from_millis(self.now), self.left, self.right);
        for event in events {
            self.log.push((self.now, event));
        }
    }

    /// 按 10ms 的周期一直轮询到 `t`（不含），然后停在 `t`。
    fn run_until(&mut self, t: u64) {
        while self.now < t {
            self.tick();
            self.now += TICK_MS;
        }
    }

    /// 直接跳到 `t` 轮询一次，模拟调度器长时间没有调用。
    fn tick_at(&mut self, t: u64) {
        self.now = t;
        self.tick();
    }

    fn set(&mut self, id: ButtonId, pressed: bool) {
        match id {
            ButtonId::Left => self.left = pressed,
            ButtonId::Right => self.right = pressed,
        }
    }

    fn events(&self) -> Vec<GestureEvent> {
        self.log.iter().map(|(_, e)| *e).collect()
    }
}

/// 在 t=0 按下左键，按住 `duration` 后松开，再空转到 3000ms。
fn single_press(duration: u64) -> Sim {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.run_until(duration);
    sim.set(ButtonId::Left, false);
    sim.run_until(3000);
    sim
}

#[test]
fn test_click_example_scenario() {
    let sim = single_press(300);
    assert_eq!(sim.log, vec![(300, GestureEvent::Click(ButtonId::Left))]);
}

#[test]
fn test_accidental_press_is_ignored() {
    for duration in [20, 100, 190] {
        let sim = single_press(duration);
        assert!(sim.log.is_empty(), "{duration}ms press produced {:?}", sim.log);
    }
}

#[test]
fn test_click_window() {
    for duration in [200, 250, 400, 490] {
        let sim = single_press(duration);
        assert_eq!(
            sim.events(),
            vec![GestureEvent::Click(ButtonId::Left)],
            "{duration}ms press"
        );
    }
}

#[test]
fn test_release_between_click_and_long_press_is_silent() {
    for duration in [500, 700, 990] {
        let sim = single_press(duration);
        assert!(sim.log.is_empty(), "{duration}ms press produced {:?}", sim.log);
    }
}

#[test]
fn test_short_release_bounce_still_measures_real_duration() {
    // 220ms 的按压在 250ms 消抖期内松开，释放沿要等到 250ms 才被接受，
    // 但按压时长按真实的 220ms 计算
    let sim = single_press(220);
    assert_eq!(sim.log, vec![(250, GestureEvent::Click(ButtonId::Left))]);
}

#[test]
fn test_lone_long_press_fires_while_held() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.run_until(1010);
    assert_eq!(
        sim.recognizer.phase(ButtonId::Left),
        PressPhase::LongHoldPending {
            start: Instant::from_millis(0),
            promoted_at: Instant::from_millis(1000),
        }
    );
    assert!(sim.log.is_empty());

    sim.run_until(1500);
    sim.set(ButtonId::Left, false);
    sim.run_until(3000);

    // 组合窗口结束时发出，而不是松开时
    assert_eq!(sim.log, vec![(1200, GestureEvent::LongPress(ButtonId::Left))]);
    assert!(sim.recognizer.is_idle());
}

#[test]
fn test_release_inside_combo_window_still_reports_long_press() {
    let sim = single_press(1100);
    assert_eq!(sim.log, vec![(1100, GestureEvent::LongPress(ButtonId::Left))]);
}

#[test]
fn test_stuck_button_times_out_and_recovers() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.run_until(2500);
    assert_eq!(
        sim.log,
        vec![
            (1200, GestureEvent::LongPress(ButtonId::Left)),
            (2000, GestureEvent::LongPressTimeout(ButtonId::Left)),
        ]
    );
    assert_eq!(sim.recognizer.phase(ButtonId::Left), PressPhase::Idle);

    // 松开后马上再点一次
    sim.set(ButtonId::Left, false);
    sim.run_until(2600);
    sim.set(ButtonId::Left, true);
    sim.run_until(2900);
    sim.set(ButtonId::Left, false);
    sim.run_until(3500);

    assert_eq!(sim.log.len(), 3);
    assert_eq!(sim.log[2], (3000, GestureEvent::Click(ButtonId::Left)));
}

#[test]
fn test_combo_example_scenario() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.run_until(50);
    sim.set(ButtonId::Right, true);
    sim.run_until(1500);
    sim.set(ButtonId::Left, false);
    sim.set(ButtonId::Right, false);
    sim.run_until(3000);

    assert_eq!(sim.log, vec![(1050, GestureEvent::ComboLongPress)]);
}

#[test]
fn test_combo_on_the_same_tick() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Right, true);
    sim.set(ButtonId::Left, true);
    sim.run_until(1500);
    sim.set(ButtonId::Left, false);
    sim.set(ButtonId::Right, false);
    sim.run_until(3000);

    assert_eq!(sim.log, vec![(1000, GestureEvent::ComboLongPress)]);
}

#[test]
fn test_late_partner_gets_separate_long_presses() {
    for gap in [200, 300] {
        let mut sim = Sim::new();
        sim.set(ButtonId::Left, true);
        sim.run_until(gap);
        sim.set(ButtonId::Right, true);
        sim.run_until(1800);
        sim.set(ButtonId::Left, false);
        sim.set(ButtonId::Right, false);
        sim.run_until(3000);

        assert_eq!(
            sim.log,
            vec![
                (1200, GestureEvent::LongPress(ButtonId::Left)),
                (1200 + gap, GestureEvent::LongPress(ButtonId::Right)),
            ],
            "gap {gap}ms"
        );
    }
}

#[test]
fn test_combo_hold_times_out_both_buttons() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.set(ButtonId::Right, true);
    sim.run_until(2500);

    assert_eq!(
        sim.log,
        vec![
            (1000, GestureEvent::ComboLongPress),
            (2000, GestureEvent::LongPressTimeout(ButtonId::Left)),
            (2000, GestureEvent::LongPressTimeout(ButtonId::Right)),
        ]
    );
}

#[test]
fn test_click_on_one_button_during_long_press_on_the_other() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Right, true);
    sim.run_until(1100);
    sim.set(ButtonId::Left, true);
    sim.run_until(1400);
    sim.set(ButtonId::Left, false);
    sim.run_until(1500);
    sim.set(ButtonId::Right, false);
    sim.run_until(3000);

    assert_eq!(
        sim.log,
        vec![
            (1200, GestureEvent::LongPress(ButtonId::Right)),
            (1400, GestureEvent::Click(ButtonId::Left)),
        ]
    );
}

#[test]
fn test_simultaneous_clicks_come_out_in_one_tick() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.set(ButtonId::Right, true);
    sim.run_until(300);
    sim.set(ButtonId::Left, false);
    sim.set(ButtonId::Right, false);
    sim.run_until(1000);

    assert_eq!(
        sim.log,
        vec![
            (300, GestureEvent::Click(ButtonId::Left)),
            (300, GestureEvent::Click(ButtonId::Right)),
        ]
    );
}

#[test]
fn test_reset_drops_open_sessions() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.run_until(1050);
    assert!(!sim.recognizer.is_idle());

    sim.recognizer.reset();
    sim.set(ButtonId::Left, false);
    sim.run_until(3000);

    assert!(sim.log.is_empty());
    assert!(sim.recognizer.is_idle());
}

#[test]
fn test_custom_config() {
    let config = ButtonConfig {
        long_press_time: embassy_time::Duration::from_millis(600),
        ..ButtonConfig::default()
    };
    let mut sim = Sim::new();
    sim.recognizer.set_config(config);
    sim.set(ButtonId::Left, true);
    sim.run_until(900);

    assert_eq!(sim.log, vec![(800, GestureEvent::LongPress(ButtonId::Left))]);
}

#[test]
fn test_sparse_ticks_timeout_while_waiting_for_partner() {
    // 第一次晚到的轮询同时越过长按阈值和超时，只能先晋升；
    // 下一次轮询超时时组合窗口还开着，长按不能丢
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    for t in [0, 10, 2100] {
        sim.tick_at(t);
    }
    assert!(matches!(
        sim.recognizer.phase(ButtonId::Left),
        PressPhase::LongHoldPending { .. }
    ));
    assert!(sim.log.is_empty());

    sim.tick_at(2110);
    sim.tick_at(2400);

    assert_eq!(
        sim.log,
        vec![
            (2110, GestureEvent::LongPress(ButtonId::Left)),
            (2110, GestureEvent::LongPressTimeout(ButtonId::Left)),
        ]
    );
    assert_eq!(sim.recognizer.phase(ButtonId::Left), PressPhase::Idle);
}

#[test]
fn test_late_tick_settles_and_times_out_together() {
    let mut sim = Sim::new();
    sim.set(ButtonId::Left, true);
    sim.tick_at(0);
    sim.tick_at(1000);

    let events: Vec<_> = sim
        .recognizer
        .tick(Instant::from_millis(2300), true, false)
        .collect();

    assert_eq!(
        events,
        vec![
            GestureEvent::LongPress(ButtonId::Left),
            GestureEvent::LongPressTimeout(ButtonId::Left),
        ]
    );
    assert_eq!(sim.recognizer.phase(ButtonId::Left), PressPhase::Idle);
}
