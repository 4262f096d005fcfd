//! The particle field.
//!
//! A [`Field`] owns the particle population, the list of source images and the
//! shared [`Pointer`]. It samples the active image through a [`Surface`] on a
//! fixed grid, turns every opaque cell into a particle, and on image switches
//! re-anchors the particles it already has instead of rebuilding them.
//!
//! # Frame cycle
//!
//! ```ignore
//! use pixeldust::prelude::*;
//!
//! let mut canvas = Canvas::new(800, 600);
//! let mut field = Field::new(800, 600, vec![logo, portrait], EffectConfig::new())?;
//! field.init(&mut canvas);
//!
//! loop {
//!     field.set_pointer(mouse_x, mouse_y);
//!     field.frame(&mut canvas); // clear, draw, then update
//! }
//! ```
//!
//! # Reconciliation
//!
//! [`Field::switch_image`] walks the new grid in the same row-major order as
//! [`Field::init`]. The n-th opaque cell takes the n-th particle counted from
//! the tail of the current population, keeping its position, velocity and
//! elasticity so it glides over to its new home. Cells beyond the old
//! population size get fresh, scattered particles; particles beyond the new
//! cell count are dropped.

use glam::Vec2;
use image::RgbaImage;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::color::{sample_color, Color};
use crate::config::EffectConfig;
use crate::error::{FieldError, ImageLoadError};
use crate::input::{Command, Pointer};
use crate::particle::Particle;
use crate::surface::Surface;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reconciliation {
    /// Particles re-anchored from the previous population.
    pub reused: usize,
    /// Particles constructed because the pool ran out.
    pub created: usize,
    /// Previous particles with no cell left for them.
    pub dropped: usize,
}

impl Reconciliation {
    /// Size of the population after the pass.
    pub fn total(&self) -> usize {
        self.reused + self.created
    }
}

/// Grid walk over a sampled pixel buffer.
#[derive(Debug, Clone, Copy)]
struct Sampler {
    width: u32,
    height: u32,
    spacing: usize,
    brightness: f32,
    color: Option<[u8; 3]>,
}

impl Sampler {
    /// Opaque cells in row-major order, with their origin and display color.
    fn cells<'a>(&self, pixels: &'a [u8]) -> impl Iterator<Item = (Vec2, Color)> + 'a {
        let Sampler {
            width,
            height,
            spacing,
            brightness,
            color,
        } = *self;

        (0..height).step_by(spacing).flat_map(move |y| {
            (0..width).step_by(spacing).filter_map(move |x| {
                let index = (y as usize * width as usize + x as usize) * 4;
                sample_color(pixels, index, brightness, color)
                    .map(|c| (Vec2::new(x as f32, y as f32), c))
            })
        })
    }
}

/// Simulation container: particles, source images and pointer state.
#[derive(Debug)]
pub struct Field {
    config: EffectConfig,
    width: u32,
    height: u32,
    images: Vec<RgbaImage>,
    active_image: usize,
    placement: Vec2,
    particles: Vec<Particle>,
    pointer: Pointer,
    rng: SmallRng,
    populated: bool,
}

impl Field {
    /// Create an empty field of `width x height` pixels.
    ///
    /// Fails when either dimension is zero, the config is invalid or `images`
    /// is empty. Call [`Field::init`] to build the population.
    pub fn new(
        width: u32,
        height: u32,
        images: Vec<RgbaImage>,
        config: EffectConfig,
    ) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::ZeroSize { width, height });
        }
        config.validate()?;
        if images.is_empty() {
            return Err(ImageLoadError::NoImages.into());
        }

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut field = Self {
            pointer: Pointer::new(config.influence_radius),
            config,
            width,
            height,
            images,
            active_image: 0,
            placement: Vec2::ZERO,
            particles: Vec::new(),
            rng,
            populated: false,
        };
        field.placement = field.compute_placement();
        Ok(field)
    }

    /// Sample the active image and build the population from scratch.
    pub fn init<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let pixels = self.sample_active_image(surface);
        let sampler = self.sampler();
        let bounds = self.bounds();
        let size = self.config.block_size();

        self.particles.clear();
        for (origin, color) in sampler.cells(&pixels) {
            self.particles.push(Particle::new(
                origin,
                color,
                size,
                self.config.ease,
                bounds,
                &mut self.rng,
            ));
        }
        self.populated = true;

        log::debug!(
            "built {} particles from image {}",
            self.particles.len(),
            self.active_image
        );
    }

    /// Advance to the next image (wrapping around) and reconcile the
    /// population with its pixel grid.
    pub fn switch_image<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Reconciliation {
        self.active_image = (self.active_image + 1) % self.images.len();
        self.placement = self.compute_placement();

        let pixels = self.sample_active_image(surface);
        let sampler = self.sampler();
        let report = self.reconcile(sampler, &pixels);
        self.populated = true;

        log::info!(
            "switched to image {}: {} reused, {} created, {} dropped",
            self.active_image,
            report.reused,
            report.created,
            report.dropped
        );
        report
    }

    /// Map the opaque cells of `pixels` onto the current population.
    ///
    /// Reversing the pool lets the n-th cell reuse index n in place, which is
    /// the n-th particle from the old tail; the vector only grows when the new
    /// grid has more opaque cells than there are particles.
    fn reconcile(&mut self, sampler: Sampler, pixels: &[u8]) -> Reconciliation {
        let bounds = self.bounds();
        let size = self.config.block_size();

        self.particles.reverse();
        let pool = self.particles.len();
        let mut count = 0;

        for (origin, color) in sampler.cells(pixels) {
            if count < pool {
                self.particles[count].reinit(origin, color);
            } else {
                self.particles.push(Particle::new(
                    origin,
                    color,
                    size,
                    self.config.ease,
                    bounds,
                    &mut self.rng,
                ));
            }
            count += 1;
        }
        self.particles.truncate(count);

        Reconciliation {
            reused: count.min(pool),
            created: count.saturating_sub(pool),
            dropped: pool.saturating_sub(count),
        }
    }

    /// Advance every particle one step.
    pub fn update(&mut self) {
        let vibrate = self.config.vibrate.as_ref();
        for particle in &mut self.particles {
            particle.update(&self.pointer, vibrate, &mut self.rng);
        }
    }

    /// Render every particle.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for particle in &self.particles {
            particle.draw(surface);
        }
    }

    /// One full frame: clear the surface, draw, then update.
    ///
    /// The surface shows the state the particles had when the frame started;
    /// the step taken afterwards becomes visible on the next frame.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear(0.0, 0.0, self.width as f32, self.height as f32);
        self.draw(surface);
        self.update();
    }

    /// Throw every particle to a random point inside the field.
    pub fn scatter(&mut self) {
        let bounds = self.bounds();
        for particle in &mut self.particles {
            particle.warp(bounds, &mut self.rng);
        }
        log::info!("scattered {} particles", self.particles.len());
    }

    /// Apply an external command. [`Command::Exit`] is left to the caller.
    pub fn apply<S: Surface + ?Sized>(&mut self, command: Command, surface: &mut S) {
        match command {
            Command::Scatter => self.scatter(),
            Command::SwitchImage => {
                self.switch_image(surface);
            }
            Command::Exit => {}
        }
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer.set(x, y);
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether [`Field::init`] (or a switch) has built a population.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn active_image_index(&self) -> usize {
        self.active_image
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Top-left corner of the scaled, centered active image.
    pub fn placement(&self) -> Vec2 {
        self.placement
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn bounds(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn active(&self) -> &RgbaImage {
        &self.images[self.active_image]
    }

    fn scaled_size(&self) -> Vec2 {
        let (w, h) = self.active().dimensions();
        Vec2::new(w as f32, h as f32) * self.config.scale
    }

    fn compute_placement(&self) -> Vec2 {
        self.bounds() * 0.5 - self.scaled_size() * 0.5
    }

    fn sampler(&self) -> Sampler {
        Sampler {
            width: self.width,
            height: self.height,
            spacing: self.config.particle_spacing as usize,
            brightness: self.config.brightness,
            color: self.config.color,
        }
    }

    /// Draw the active image on a cleared surface and read the field area back.
    fn sample_active_image<S: Surface + ?Sized>(&self, surface: &mut S) -> Vec<u8> {
        let size = self.scaled_size();
        surface.clear(0.0, 0.0, self.width as f32, self.height as f32);
        surface.draw_image(
            self.active(),
            self.placement.x,
            self.placement.y,
            size.x,
            size.y,
        );
        surface.read_pixels(0, 0, self.width, self.height)
    }
}
