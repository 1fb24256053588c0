use rand::Rng;

// ── Playfield constants ─────────────────────────────────────────────────────

// Logical playfield; rendering projects this onto the terminal pixel grid.
pub const PLAYFIELD_W: f64 = 600.0;
pub const PLAYFIELD_H: f64 = 450.0;

pub const GRAVITY: f64 = 510.0;
pub const FLAP_SPEED: f64 = -300.0;

pub const PLAYER_START: (f64, f64) = (50.0, 50.0);
pub const PLAYER_SIZE: (f64, f64) = (50.0, 50.0);
pub const HITBOX_OFFSET: (f64, f64) = (0.0, 15.0);
pub const HITBOX_SIZE: (f64, f64) = (50.0, 20.0);

pub const PIPE_WIDTH: f64 = 70.0;
pub const PIPE_SPEED: f64 = 180.0;
pub const PIPE_SPAWN_X: f64 = PLAYFIELD_W + 20.0;
pub const GAP_SIZE_MIN: i32 = 95;
pub const GAP_SIZE_MAX: i32 = 130;
pub const GAP_Y_MIN: i32 = 60;
pub const GAP_Y_MAX: i32 = 280;

// Spawn cadence counts frames, not seconds.
pub const SPAWN_FRAMES: i32 = 150;
pub const SPAWN_JITTER: i32 = 10;
pub const SCORE_STEP: i32 = SPAWN_FRAMES / 5;

// Units/s per background layer index.
pub const SCROLL_RATE: f64 = 50.0;

// ── Geometry ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Player ──────────────────────────────────────────────────────────────────

/// The player's body: a display rectangle plus a smaller hitbox derived from
/// it. `falling` stays false until the first flap, so the sprite hangs still
/// on the menu screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub falling: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            x: PLAYER_START.0,
            y: PLAYER_START.1,
            vx: 0.0,
            vy: 0.0,
            falling: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: PLAYER_SIZE.0,
            h: PLAYER_SIZE.1,
        }
    }

    // Always derived from position, never stored.
    pub fn hitbox(&self) -> Rect {
        Rect {
            x: self.x + HITBOX_OFFSET.0,
            y: self.y + HITBOX_OFFSET.1,
            w: HITBOX_SIZE.0,
            h: HITBOX_SIZE.1,
        }
    }

    /// One frame of kinematics. The floor is a resting surface and the
    /// ceiling a barrier; neither ends the run.
    pub fn update(&mut self, flap: bool, dt: f64) {
        if self.falling {
            self.vy += GRAVITY * dt;
        }
        if flap {
            self.vy = FLAP_SPEED;
            self.falling = true;
        }

        self.x += self.vx * dt;
        self.y += self.vy * dt;

        let hitbox = self.hitbox();
        if hitbox.bottom() >= PLAYFIELD_H {
            self.y = PLAYFIELD_H - HITBOX_SIZE.1 - HITBOX_OFFSET.1;
            self.vy = 0.0;
        } else if hitbox.y <= 0.0 {
            self.y = -HITBOX_OFFSET.1;
            self.vy = self.vy.max(0.0);
        }
    }

    fn halt(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
        self.falling = false;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

// ── Pipes ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pipe {
    pub rect: Rect,
}

impl Pipe {
    /// A pipe pair sharing one gap: top piece spans ceiling..gap_y, bottom
    /// piece spans gap_y+gap_size..floor, both at the spawn column.
    pub fn pair(gap_y: f64, gap_size: f64) -> (Pipe, Pipe) {
        let top = Pipe {
            rect: Rect {
                x: PIPE_SPAWN_X,
                y: 0.0,
                w: PIPE_WIDTH,
                h: gap_y,
            },
        };
        let bottom = Pipe {
            rect: Rect {
                x: PIPE_SPAWN_X,
                y: gap_y + gap_size,
                w: PIPE_WIDTH,
                h: PLAYFIELD_H - gap_y - gap_size,
            },
        };
        (top, bottom)
    }
}

// ── Run state ───────────────────────────────────────────────────────────────

/// Each arm owns only the data its mode needs: dropping the arm is the reset.
#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    Menu,
    Playing {
        pipes: Vec<Pipe>,
        score: u32,
        spawn_timer: i32,
    },
    Dead {
        pipes: Vec<Pipe>,
        score: u32,
    },
}

/// Edge-triggered inputs gathered for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input {
    pub flap: bool,
    pub toggle_mute: bool,
}

/// Cues the shell forwards to the audio layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    Died,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub mode: Mode,
    pub player: Player,
    pub muted: bool,
    pub best: u32,
    /// Parallax offsets, one per background layer, wrapped to the playfield
    /// width. Cosmetic only.
    pub scroll: [f64; 4],
}

impl RunState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Menu,
            player: Player::new(),
            muted: false,
            best: 0,
            scroll: [0.0; 4],
        }
    }

    pub fn pipes(&self) -> &[Pipe] {
        match &self.mode {
            Mode::Menu => &[],
            Mode::Playing { pipes, .. } | Mode::Dead { pipes, .. } => pipes,
        }
    }

    pub fn score(&self) -> u32 {
        match &self.mode {
            Mode::Menu => 0,
            Mode::Playing { score, .. } | Mode::Dead { score, .. } => *score,
        }
    }

    /// Advance the whole game by one frame. `dt` scales motion; the spawn
    /// countdown is frame-counted and ignores it.
    pub fn step(&mut self, input: Input, dt: f64, rng: &mut impl Rng) -> Option<StepEvent> {
        if input.toggle_mute {
            self.muted = !self.muted;
        }

        for (i, offset) in self.scroll.iter_mut().enumerate() {
            *offset = (*offset + i as f64 * SCROLL_RATE * dt) % PLAYFIELD_W;
        }

        match &mut self.mode {
            Mode::Menu => {
                if input.flap {
                    self.mode = Mode::Playing {
                        pipes: Vec::new(),
                        score: 0,
                        spawn_timer: SPAWN_FRAMES,
                    };
                    self.player.update(true, dt);
                } else {
                    self.player.update(false, dt);
                }
                None
            }
            Mode::Playing {
                pipes,
                score,
                spawn_timer,
            } => {
                self.player.update(input.flap, dt);

                *spawn_timer -= 1;
                // Five score ticks per cycle: thresholds 4k, 3k, 2k, k, 0.
                // Jitter keeps the reset value above 4k, so each threshold is
                // crossed exactly once.
                if *spawn_timer % SCORE_STEP == 0 && *spawn_timer < SPAWN_FRAMES {
                    *score += 1;
                }
                if *spawn_timer <= 0 {
                    *spawn_timer = SPAWN_FRAMES + rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER);
                    let gap_size = rng.gen_range(GAP_SIZE_MIN..=GAP_SIZE_MAX) as f64;
                    let gap_y = rng.gen_range(GAP_Y_MIN..=GAP_Y_MAX) as f64;
                    let (top, bottom) = Pipe::pair(gap_y, gap_size);
                    pipes.push(top);
                    pipes.push(bottom);
                }

                for pipe in pipes.iter_mut() {
                    pipe.rect.x -= PIPE_SPEED * dt;
                }

                let hitbox = self.player.hitbox();
                let hit = pipes.iter().any(|p| p.rect.overlaps(&hitbox));
                pipes.retain(|p| p.rect.right() >= 0.0);

                if hit {
                    self.player.halt();
                    let pipes = std::mem::take(pipes);
                    let score = *score;
                    self.best = self.best.max(score);
                    self.mode = Mode::Dead { pipes, score };
                    return Some(StepEvent::Died);
                }
                None
            }
            Mode::Dead { .. } => {
                if input.flap {
                    self.player = Player::new();
                    self.mode = Mode::Menu;
                }
                None
            }
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
