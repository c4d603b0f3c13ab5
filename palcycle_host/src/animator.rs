// Copyright 2026 the Palcycle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-callback dispatch for one raster shown on several outputs.

use std::path::Path;

use palcycle_core::error::LoadError;
use palcycle_core::ilbm;
use palcycle_core::output::OutputId;
use palcycle_core::pacing::{CyclePacer, PacerConfig};
use palcycle_core::raster::IndexedRaster;
use palcycle_core::trace::Tracer;
use palcycle_render::{Canvas, DamageRegion, OutputSurface, Role, SurfaceConfig};

/// Owns a raster and the surfaces presenting it.
///
/// The first output added drives the animation. Frame callbacks from any
/// output go through [`on_frame`](Self::on_frame); only the driver's
/// timestamps feed the pacer.
#[derive(Debug)]
pub struct Animator {
    raster: IndexedRaster,
    pacer: CyclePacer,
    surfaces: Vec<OutputSurface>,
}

impl Animator {
    /// Creates an animator with no outputs.
    #[must_use]
    pub fn new(raster: IndexedRaster, pacer: PacerConfig) -> Self {
        Self {
            raster,
            pacer: CyclePacer::new(pacer),
            surfaces: Vec::new(),
        }
    }

    /// Decodes the image at `path` and wraps it in an animator.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read or decoded.
    pub fn load(path: impl AsRef<Path>, pacer: PacerConfig) -> Result<Self, LoadError> {
        Ok(Self::new(ilbm::decode_file(path)?, pacer))
    }

    /// The animated raster.
    #[must_use]
    pub fn raster(&self) -> &IndexedRaster {
        &self.raster
    }

    /// Surfaces in the order they were added.
    #[must_use]
    pub fn outputs(&self) -> &[OutputSurface] {
        &self.surfaces
    }

    /// The surface for `id`, if it is known.
    #[must_use]
    pub fn output(&self, id: OutputId) -> Option<&OutputSurface> {
        self.surfaces.iter().find(|s| s.id() == id)
    }

    /// The output currently driving the animation.
    #[must_use]
    pub fn driver(&self) -> Option<OutputId> {
        self.surfaces
            .iter()
            .find(|s| s.role() == Role::Driver)
            .map(OutputSurface::id)
    }

    /// Ticks dropped by the pacer so far.
    #[must_use]
    pub fn dropped_ticks(&self) -> u64 {
        self.pacer.dropped_ticks()
    }

    /// Starts presenting on `id`.
    ///
    /// Returns `false` if the output was already known, in which case nothing
    /// changes.
    pub fn add_output(&mut self, id: OutputId, config: SurfaceConfig) -> bool {
        if self.output(id).is_some() {
            return false;
        }
        let role = if self.surfaces.is_empty() {
            Role::Driver
        } else {
            Role::Follower
        };
        self.surfaces.push(OutputSurface::new(id, role, config));
        true
    }

    /// Stops presenting on `id`, handing the driver role on if needed.
    ///
    /// Returns the removed surface.
    pub fn remove_output(&mut self, id: OutputId) -> Option<OutputSurface> {
        let index = self.surfaces.iter().position(|s| s.id() == id)?;
        let removed = self.surfaces.remove(index);
        if removed.role() == Role::Driver {
            if let Some(next) = self.surfaces.first_mut() {
                next.set_role(Role::Driver);
                // Marks cleared by the old driver are gone; repaint everything.
                next.request_full_redraw();
            }
            // The new driver's timestamps may use another base.
            self.pacer.reset();
        }
        Some(removed)
    }

    /// Handles a frame callback for `id` stamped `now_ms`, drawing into
    /// `canvas`.
    ///
    /// Returns `None` for an unknown output, otherwise the region the
    /// presenter must mark damaged before committing.
    pub fn on_frame(
        &mut self,
        id: OutputId,
        now_ms: u32,
        canvas: &mut Canvas<'_>,
        tracer: &mut Tracer<'_>,
    ) -> Option<DamageRegion> {
        let surface = self.surfaces.iter_mut().find(|s| s.id() == id)?;
        let ticks = match surface.role() {
            Role::Driver => self.pacer.advance(now_ms),
            Role::Follower => 0,
        };
        Some(surface.frame(&mut self.raster, canvas, ticks, tracer))
    }
}
