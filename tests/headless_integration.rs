use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use schulte::app::{App, Control};
use schulte::best_time::BestTimes;
use schulte::config::Settings;
use schulte::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use schulte::sequence::Mode;
use schulte::trial::Phase;
use schulte::ui::layout::{fitted_grid, screen_layout};

const TERMINAL: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn new_app(size: usize, mode: Mode) -> App {
    let settings = Settings {
        size,
        mode,
        ..Settings::default()
    };
    App::new(settings, BestTimes::in_memory(), None)
}

/// Terminal position of the centre of the cell holding `symbol`
fn click_on(app: &App, symbol: &str) -> AppEvent {
    let geo = fitted_grid(
        screen_layout(TERMINAL).grid,
        app.settings.size,
        app.trial.sequence(),
    )
    .unwrap();
    let r = geo.cell_rect(app.trial.cell_of(symbol).unwrap());
    AppEvent::Click {
        column: r.x + r.width / 2,
        row: r.y + r.height / 2,
    }
}

/// Small event loop mirroring the binary's, bounded by `max_steps`
fn drive<E, T>(app: &mut App, runner: &Runner<E, T>, max_steps: usize) -> Vec<Phase>
where
    E: schulte::runtime::AppEventSource,
    T: schulte::runtime::Ticker,
{
    let mut phases = vec![app.trial.phase()];
    for _ in 0..max_steps {
        let Some(event) = runner.step(app.needs_tick()) else {
            break;
        };
        let now = Instant::now();
        match event {
            AppEvent::Tick => app.on_tick(now),
            AppEvent::Resize => {}
            AppEvent::Click { column, row } => {
                app.on_click(column, row, TERMINAL, now);
            }
            AppEvent::Key(k) => {
                if app.on_key(k, now) == Control::Quit {
                    break;
                }
            }
        }
        if phases.last() != Some(&app.trial.phase()) {
            phases.push(app.trial.phase());
        }
    }
    phases
}

#[test]
fn headless_clicks_complete_a_three_by_three() {
    let mut app = new_app(3, Mode::Ascending);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    for n in 1..=9 {
        tx.send(click_on(&app, &n.to_string())).unwrap();
    }
    tx.send(key(KeyCode::Esc)).unwrap();

    let phases = drive(&mut app, &runner, 200);

    assert_eq!(phases, vec![Phase::Idle, Phase::Running, Phase::Finished]);
    assert_eq!(app.trial.progress(), 9);
    assert_eq!(app.best, Some(app.display_ms));
    assert!(app.new_best);
}

#[test]
fn headless_wrong_clicks_do_not_advance() {
    let mut app = new_app(4, Mode::Descending);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(click_on(&app, "1")).unwrap();
    tx.send(click_on(&app, "2")).unwrap();
    tx.send(click_on(&app, "16")).unwrap();
    tx.send(key(KeyCode::Esc)).unwrap();

    drive(&mut app, &runner, 200);

    assert_eq!(app.trial.phase(), Phase::Running);
    assert_eq!(app.trial.progress(), 1);
    assert_eq!(app.trial.target(), Some("15"));
}

#[test]
fn headless_keyboard_only_session() {
    let mut app = new_app(3, Mode::Letters);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Char(' '))).unwrap();
    for letter in ["A", "B", "C", "D", "E", "F", "G", "H", "I"] {
        // walk the cursor from the top-left corner to the letter
        let cell = app.trial.cell_of(letter).unwrap();
        for _ in 0..3 {
            tx.send(key(KeyCode::Up)).unwrap();
            tx.send(key(KeyCode::Left)).unwrap();
        }
        for _ in 0..cell / 3 {
            tx.send(key(KeyCode::Down)).unwrap();
        }
        for _ in 0..cell % 3 {
            tx.send(key(KeyCode::Right)).unwrap();
        }
        tx.send(key(KeyCode::Enter)).unwrap();
    }
    tx.send(key(KeyCode::Esc)).unwrap();

    let phases = drive(&mut app, &runner, 500);

    assert_eq!(phases, vec![Phase::Idle, Phase::Running, Phase::Finished]);
    assert!(app.best.is_some());
}

#[test]
fn headless_ticks_stop_after_finish() {
    let mut app = new_app(3, Mode::Ascending);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(2)),
    );

    tx.send(key(KeyCode::Char(' '))).unwrap();
    drive(&mut app, &runner, 1);
    assert!(app.needs_tick());

    // let a few ticks through while running
    let ticks_while_running = (0..5)
        .filter(|_| runner.step(app.needs_tick()) == Some(AppEvent::Tick))
        .count();
    assert_eq!(ticks_while_running, 5);

    let now = Instant::now();
    for n in 1..=9 {
        let cell = app.trial.cell_of(&n.to_string()).unwrap();
        app.pick(cell, now);
    }
    assert!(!app.needs_tick());
    let frozen = app.display_ms;

    // nothing pending and no ticking requested: the source is only polled for real events
    drop(tx);
    assert_eq!(runner.step(app.needs_tick()), None);
    app.on_tick(Instant::now() + Duration::from_secs(3));
    assert_eq!(app.display_ms, frozen);
}

#[test]
fn headless_regenerate_mid_trial() {
    let mut app = new_app(5, Mode::Ascending);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(click_on(&app, "1")).unwrap();
    tx.send(click_on(&app, "2")).unwrap();
    tx.send(key(KeyCode::Char('r'))).unwrap();
    tx.send(key(KeyCode::Esc)).unwrap();

    let phases = drive(&mut app, &runner, 200);

    assert_eq!(phases, vec![Phase::Idle, Phase::Running, Phase::Idle]);
    assert_eq!(app.trial.progress(), 0);
    assert_eq!(app.display_ms, 0);
    assert_eq!(app.best, None);
}
