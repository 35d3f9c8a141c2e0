use super::letters::{drift_letters, place_letters, text_points, LetterPlacement, TextPoint};
use super::{generate_flocks, shape_offset, FlockSpec, PageMetrics, FLOCK_PALETTE};
use crate::color::Rgba;
use crate::surface::{Composite, RadialGradient, Surface};
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::TAU;
use std::ops::Range;

pub const TRAIL_LEN: usize = 10;

// Text formation toggles at most this often (ms)
pub const FORMATION_TOGGLE_MS: f64 = 20_000.0;
// Per-frame progress while forming / releasing
pub const FORM_RATE: f32 = 0.008;
pub const RELEASE_RATE: f32 = 0.015;

const MAX_SPEED: f32 = 3.0;
const MIN_SPEED: f32 = 0.5;
const STALL_KICK: f32 = 0.4;
const INFLUENCE_RADIUS: f32 = 120.0;
const SEPARATION_RADIUS: f32 = 40.0;
const POINTER_RADIUS: f32 = 150.0;
const POINTER_FORCE: f32 = 1.5;
// Particles may cross the outer 20% of an obstacle
const OBSTACLE_CORE: f32 = 0.8;
const OBSTACLE_FORCE: f32 = 0.3;
const OPACITY_EASE: f32 = 0.02;
const MAX_DEPTH_OPACITY: f32 = 0.9;
const FORMED_OPACITY: f32 = 0.9;
const WRAP_MARGIN: f32 = 50.0;
// Trail segments longer than this are wrap jumps and are not drawn
const TRAIL_BREAK: f32 = 100.0;

/// Fixed-capacity ring of the most recent positions, oldest first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trail {
    points: [Vec2; TRAIL_LEN],
    head: usize,
    len: usize,
}

impl Trail {
    pub fn push(&mut self, p: Vec2) {
        self.points[self.head] = p;
        self.head = (self.head + 1) % TRAIL_LEN;
        self.len = (self.len + 1).min(TRAIL_LEN);
    }

    /// Drop the history and start again from `p`.
    pub fn reset(&mut self, p: Vec2) {
        self.len = 0;
        self.push(p);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        let start = (self.head + TRAIL_LEN - self.len) % TRAIL_LEN;
        (0..self.len).map(move |k| self.points[(start + k) % TRAIL_LEN])
    }

    pub fn last(&self) -> Option<Vec2> {
        (self.len > 0).then(|| self.points[(self.head + TRAIL_LEN - 1) % TRAIL_LEN])
    }
}

#[derive(Clone, Debug)]
pub struct FieldParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    pub size: f32,
    pub opacity: f32,
    pub flock: usize,
    pub trail: Trail,
}

/// A page element particles steer around, in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(left + width / 2.0, top + height / 2.0),
            radius: width.max(height) / 2.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Formation {
    forming: bool,
    progress: f32,
    last_toggle_ms: Option<f64>,
    letters: Vec<LetterPlacement>,
}

impl Formation {
    pub fn is_forming(&self) -> bool {
        self.forming
    }

    /// 0 = free flocking, 1 = fully formed word.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn letters(&self) -> &[LetterPlacement] {
        &self.letters
    }
}

/// The flocks, their particles and the wordmark formation.
pub struct ParticleField {
    page: PageMetrics,
    opacity: f32,
    flocks: Vec<FlockSpec>,
    ranges: Vec<Range<usize>>,
    particles: Vec<FieldParticle>,
    pointer: Option<Vec2>,
    obstacles: Vec<Obstacle>,
    scroll_y: f32,
    formation: Formation,
    points: Vec<TextPoint>,
    assigned: Vec<Option<usize>>,
    taken: Vec<bool>,
    rng: StdRng,
}

impl ParticleField {
    /// `opacity` scales every particle (0..1).
    pub fn new(page: PageMetrics, opacity: f32, seed: u64) -> Self {
        let mut field = Self {
            page,
            opacity: opacity.clamp(0.0, 1.0),
            flocks: Vec::new(),
            ranges: Vec::new(),
            particles: Vec::new(),
            pointer: None,
            obstacles: Vec::new(),
            scroll_y: 0.0,
            formation: Formation::default(),
            points: Vec::new(),
            assigned: Vec::new(),
            taken: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        };
        field.populate();
        field
    }

    /// New page geometry; flocks are laid out again.
    pub fn resize(&mut self, page: PageMetrics) {
        self.page = page;
        self.populate();
    }

    pub fn page(&self) -> &PageMetrics {
        &self.page
    }

    pub fn flocks(&self) -> &[FlockSpec] {
        &self.flocks
    }

    pub fn particles(&self) -> &[FieldParticle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [FieldParticle] {
        &mut self.particles
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    /// Text targets from the last step; empty when not forming.
    pub fn text_points(&self) -> &[TextPoint] {
        &self.points
    }

    /// Text point index each particle is pulled toward.
    pub fn assignments(&self) -> &[Option<usize>] {
        &self.assigned
    }

    /// Pointer in page coordinates, `None` when unknown.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    pub fn set_obstacles(&mut self, obstacles: impl IntoIterator<Item = Obstacle>) {
        self.obstacles.clear();
        self.obstacles.extend(obstacles);
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
    }

    fn populate(&mut self) {
        self.flocks = generate_flocks(&self.page, &mut self.rng);
        self.particles.clear();
        self.ranges.clear();

        for (id, spec) in self.flocks.iter().enumerate() {
            let start = self.particles.len();
            let rng = &mut self.rng;
            let cx = if spec.full_width {
                rng.gen::<f32>() * self.page.width
            } else {
                200.0 + rng.gen::<f32>() * (self.page.width - 400.0)
            };
            let center = Vec2::new(cx, spec.center_y);
            let own_color = FLOCK_PALETTE[id % FLOCK_PALETTE.len()];
            let heading = rng.gen::<f32>() * TAU;
            let speed = 1.2 + rng.gen::<f32>() * 0.8;
            let factor = spec.density.spread_factor();

            for i in 0..spec.size {
                let mut pos = center + shape_offset(spec, i, rng) * factor;
                pos += Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * factor * 30.0;
                let color = if spec.multi_color {
                    *FLOCK_PALETTE.choose(rng).unwrap_or(&own_color)
                } else {
                    own_color
                };
                let base_opacity = 0.7 + rng.gen::<f32>() * 0.3;
                let opacity = if pos.y > self.page.fold {
                    self.page.depth_ratio(pos.y) * MAX_DEPTH_OPACITY * base_opacity
                } else {
                    0.0
                };
                let jitter = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * 0.2;
                self.particles.push(FieldParticle {
                    pos,
                    vel: Vec2::new(heading.cos(), heading.sin()) * speed + jitter,
                    color,
                    size: 0.8 + rng.gen::<f32>() * 1.2,
                    opacity,
                    flock: id,
                    trail: Trail::default(),
                });
            }
            self.ranges.push(start..self.particles.len());
        }

        self.assigned.clear();
        self.assigned.resize(self.particles.len(), None);
        log::info!(
            "flock: {} flocks, {} particles on a {}x{} page",
            self.flocks.len(),
            self.particles.len(),
            self.page.width,
            self.page.height
        );
    }

    /// One display frame.
    pub fn tick(&mut self, now_ms: f64) {
        self.update_formation(now_ms);
        self.step(now_ms);
    }

    fn update_formation(&mut self, now_ms: f64) {
        let last = *self.formation.last_toggle_ms.get_or_insert(now_ms);
        if now_ms - last > FORMATION_TOGGLE_MS {
            self.formation.last_toggle_ms = Some(now_ms);
            let scrolled = self.scroll_y > self.page.fold * 0.5;
            if scrolled && !self.formation.forming {
                self.formation.forming = true;
                self.formation.progress = 0.0;
                self.formation.letters =
                    place_letters(self.particles.iter().map(|p| p.pos), &self.page, &mut self.rng);
                log::debug!("flock: forming wordmark");
            } else if self.formation.forming {
                self.formation.forming = false;
                log::debug!("flock: releasing wordmark");
            }
        }

        let f = &mut self.formation;
        if f.forming {
            f.progress = (f.progress + FORM_RATE).min(1.0);
        } else if f.progress > 0.0 {
            f.progress = (f.progress - RELEASE_RATE).max(0.0);
        }
    }

    fn assign_points(&mut self) {
        self.assigned.iter_mut().for_each(|a| *a = None);
        if self.formation.progress <= 0.0 {
            self.points.clear();
            return;
        }
        if self.formation.forming && self.formation.progress > 0.9 {
            drift_letters(&mut self.formation.letters, &self.page);
        }
        text_points(&self.formation.letters, &mut self.points);

        self.taken.clear();
        self.taken.resize(self.particles.len(), false);
        for (k, point) in self.points.iter().enumerate() {
            let nearest = self
                .particles
                .iter()
                .enumerate()
                .filter(|(i, _)| !self.taken[*i])
                .map(|(i, p)| (i, p.pos.distance_squared(point.pos)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((i, _)) = nearest {
                self.taken[i] = true;
                self.assigned[i] = Some(k);
            }
        }
    }

    fn step(&mut self, now_ms: f64) {
        self.assign_points();
        let progress = self.formation.progress;
        let now_s = (now_ms / 1000.0) as f32;

        for i in 0..self.particles.len() {
            let target = self.assigned[i].map(|k| self.points[k]);
            let (pos, mut vel, flock) = {
                let p = &self.particles[i];
                (p.pos, p.vel, p.flock)
            };

            if let Some(tp) = target {
                let to = tp.pos - pos;
                let dist = to.length();
                vel += to * progress * 0.3;
                vel *= 1.0 - progress * 0.1;
                if dist > 200.0 {
                    vel += to * 0.002;
                }
                if dist < 5.0 && progress > 0.8 {
                    // Hold position with a slight struggle.
                    let jitter = Vec2::new(self.rng.gen::<f32>() - 0.5, self.rng.gen::<f32>() - 0.5);
                    let orbit = now_s + i as f32 * 0.1;
                    vel += jitter * 0.2 + Vec2::new(orbit.cos(), orbit.sin()) * 0.05;
                    vel += to * 0.3;
                    vel *= 0.85;
                }
                if progress > 0.9 && dist > 2.0 {
                    vel += to * 0.5;
                    vel *= 0.9;
                }
            }

            let Some(spec) = self.flocks.get(flock) else {
                continue;
            };
            let reduction = if target.is_some() {
                1.0 - progress * 0.95
            } else {
                1.0 - progress * 0.3
            };
            vel += flocking(&self.particles, self.ranges[flock].clone(), i, pos, vel, spec) * reduction;

            if let Some(m) = self.pointer {
                let away = pos - m;
                let d = away.length();
                if d > 0.0 && d < POINTER_RADIUS {
                    vel += away / d * ((POINTER_RADIUS - d) / POINTER_RADIUS) * POINTER_FORCE;
                }
            }
            for o in &self.obstacles {
                let away = pos - o.center;
                let d = away.length();
                let r = o.radius * OBSTACLE_CORE;
                if d > 0.0 && d < r {
                    vel += away / d * ((r - d) / r) * OBSTACLE_FORCE;
                }
            }

            let speed = vel.length();
            if speed > MAX_SPEED {
                vel = vel / speed * MAX_SPEED;
            }
            if speed < MIN_SPEED {
                let a = self.rng.gen::<f32>() * TAU;
                vel += Vec2::new(a.cos(), a.sin()) * STALL_KICK;
            }
            let pos = pos + vel;

            let mut lit = 0.0;
            if let Some(tp) = target {
                let dist = tp.pos.distance(pos);
                let delay = self.formation.letters.get(tp.letter).map_or(0.0, |l| l.delay);
                let local = (progress - delay).max(0.0);
                if local > 0.0 {
                    lit = local * 0.9;
                    if dist < 200.0 {
                        lit = (lit * 0.7 + (1.0 - dist / 200.0) * 0.9).min(FORMED_OPACITY);
                    }
                }
                if progress > 0.9 && dist < 10.0 {
                    lit = FORMED_OPACITY;
                }
            }
            let target_opacity = if lit > 0.0 {
                lit
            } else if pos.y > self.page.fold {
                self.page.depth_ratio(pos.y) * MAX_DEPTH_OPACITY
            } else {
                0.0
            };

            let page = self.page;
            let p = &mut self.particles[i];
            p.vel = vel;
            p.pos = pos;
            p.opacity += (target_opacity - p.opacity) * OPACITY_EASE;
            p.trail.push(pos);

            let mut wrapped = false;
            if p.pos.x < -WRAP_MARGIN {
                p.pos.x = page.width + WRAP_MARGIN;
                wrapped = true;
            }
            if p.pos.x > page.width + WRAP_MARGIN {
                p.pos.x = -WRAP_MARGIN;
                wrapped = true;
            }
            // Vertical wrapping would tear letters apart mid-formation.
            if progress < 0.5 {
                if p.pos.y < page.fold {
                    p.pos.y = page.height - WRAP_MARGIN;
                    wrapped = true;
                }
                if p.pos.y > page.height + WRAP_MARGIN {
                    p.pos.y = page.fold + 100.0;
                    wrapped = true;
                }
            }
            if wrapped {
                p.trail.reset(p.pos);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.set_composite(Composite::SourceOver);
        surface.set_alpha(1.0);
        surface.clear(0.0, 0.0, self.page.width, self.page.height);

        for p in &self.particles {
            let alpha = p.opacity * self.opacity * 0.2;
            if p.trail.len() <= 2 || alpha <= 0.0 {
                continue;
            }
            surface.set_alpha(alpha);
            let pts: SmallVec<[Vec2; TRAIL_LEN]> = p.trail.iter().collect();
            for seg in pts.windows(2) {
                if seg[0].distance(seg[1]) <= TRAIL_BREAK {
                    surface.stroke_line(seg[0], seg[1], p.size * 0.5, p.color);
                }
            }
        }

        for p in &self.particles {
            let alpha = p.opacity * self.opacity;
            if alpha <= 0.0 {
                continue;
            }
            surface.set_alpha(alpha);
            surface.fill_circle(p.pos, p.size, p.color);

            let glow = RadialGradient::new(p.pos, 0.0, p.size * 2.0)
                .stop(0.0, p.color)
                .stop(1.0, p.color.with_alpha(0.0));
            surface.set_alpha(alpha * 0.1);
            let r = p.size * 2.0;
            surface.fill_radial_gradient(&glow, p.pos.x - r, p.pos.y - r, r * 2.0, r * 2.0);
        }
        surface.set_alpha(1.0);
    }
}

// Separation, alignment and cohesion from flockmates in `range`.
fn flocking(
    particles: &[FieldParticle],
    range: Range<usize>,
    me: usize,
    pos: Vec2,
    vel: Vec2,
    spec: &FlockSpec,
) -> Vec2 {
    let influence = INFLUENCE_RADIUS * spec.density.influence();
    let personal = SEPARATION_RADIUS * spec.density.influence();
    let mut separation = Vec2::ZERO;
    let mut heading = Vec2::ZERO;
    let mut center = Vec2::ZERO;
    let mut neighbours = 0u32;

    for j in range {
        if j == me {
            continue;
        }
        let other = &particles[j];
        let away = pos - other.pos;
        let d = away.length();
        if d <= 0.0 || d >= influence {
            continue;
        }
        neighbours += 1;
        if d < personal {
            separation += away / d * ((personal - d) / personal);
        }
        heading += other.vel;
        center += other.pos;
    }

    let mut steer = separation * spec.density.separation();
    if neighbours > 0 {
        let n = neighbours as f32;
        steer += (heading / n - vel) * spec.density.alignment();
        steer += (center / n - pos) * spec.density.cohesion();
    }
    steer
}
