use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, terminal,
};
use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use cloudhop::audio::Audio;
use cloudhop::game::{Input, RunState, StepEvent};
use cloudhop::render::{PixelBuf, draw_frame};

fn main() -> io::Result<()> {
    // Acquire audio before raw mode so a failure still prints readably.
    let audio = Audio::new().map_err(io::Error::other)?;

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut state = RunState::new();
    let mut rng = rand::thread_rng();

    let frame_dur = Duration::from_millis(16); // ~60 fps
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        let mut input = Input::default();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        cleanup(&mut out)?;
                        return Ok(());
                    }
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => input.flap = true,
                    KeyCode::Char('m') => input.toggle_mute = true,
                    _ => {}
                },
                Event::Resize(c, r) => {
                    buf.resize(c as usize, r as usize * 2);
                }
                _ => {}
            }
        }

        // A stall (resize drag, ^Z) must not teleport the player.
        let dt = last.elapsed().as_secs_f64().min(0.1);
        last = Instant::now();

        let cue = state.step(input, dt, &mut rng);
        if input.toggle_mute {
            audio.set_muted(state.muted);
        }
        if cue == Some(StepEvent::Died) {
            audio.play_death();
        }

        draw_frame(&state, &mut buf);
        buf.render(&mut out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
