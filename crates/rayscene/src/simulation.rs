//! Particle systems and cloth.
//!
//! Both own a [`ParticleSimulator`] built by `simulation_init` and advanced
//! by `simulation_update`. The simulated shape (a point set for particle
//! systems, a quad mesh for cloth) is rewritten from the particles by the
//! simulator hooks, so queries always see the latest update.

use crate::config::{ClothParams, ParticleSystemParams, SimulationParams};
use crate::{Primitive, PrimitiveGroup, PrimitiveKind, Scene, SceneError};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rayscene_math::{violated, Frame3, Point2, Point3, Vec3};
use rayscene_physics::{
    Contact, ForceField, Particle, ParticleCollider, ParticleSimulator, ParticleSpring, SimulationHooks,
};
use rayscene_raytrace::{intersect_nearest, Ray};
use rayscene_shape::{Geometry, Mesh, PointSet, Shape};

const NOT_INITIALIZED: &str = "simulation updated before it was initialized";

/// A shape particles bounce off, placed in the simulated primitive's space.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCollider {
    /// Obstacle geometry.
    pub shape: Shape,
    /// Placement of the shape.
    pub frame: Frame3,
}

impl ParticleCollider for ShapeCollider {
    fn contact(&self, from: &Point3, to: &Point3) -> Option<Contact> {
        let ray = Ray::segment(*from, *to).to_local(&self.frame);
        intersect_nearest(&self.shape, &ray).map(|hit| Contact {
            pos: self.frame.transform_point(&hit.pos()),
            norm: self.frame.transform_vector(&hit.geom_norm),
        })
    }
}

fn new_simulator(params: &SimulationParams, colliders: &[ShapeCollider]) -> ParticleSimulator {
    let mut simulator = ParticleSimulator::new(ForceField::Uniform {
        gravity: params.gravity,
        wind: params.wind,
        air_friction: params.air_friction,
    });
    simulator.steps_per_sec = params.steps_per_sec;
    simulator.damping = params.damping;
    simulator.colliders = colliders
        .iter()
        .map(|c| Box::new(c.clone()) as Box<dyn ParticleCollider>)
        .collect();
    simulator
}

/// Uniform draw from an inclusive `[min, max]` range; `min` when the range
/// is degenerate.
fn draw(rng: &mut Pcg32, [min, max]: [f64; 2]) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Particles emitted from the surface of a source shape.
#[derive(Debug)]
pub struct ParticleSystem {
    /// Forces, step rate and collision damping.
    pub params: SimulationParams,
    /// Emission rates and initial particle ranges.
    pub emission: ParticleSystemParams,
    /// Shape particles are emitted from; it must support sampling.
    pub source: Shape,
    /// Obstacles.
    pub colliders: Vec<ShapeCollider>,
    points: Shape,
    simulator: Option<ParticleSimulator>,
    rng: Pcg32,
}

impl ParticleSystem {
    /// A system with no particles yet.
    pub fn new(params: SimulationParams, emission: ParticleSystemParams, source: Shape) -> Self {
        let rng = Pcg32::seed_from_u64(emission.seed);
        Self {
            params,
            emission,
            source,
            colliders: Vec::new(),
            points: PointSet::default().into(),
            simulator: None,
            rng,
        }
    }

    /// Live particles drawn as a point set.
    pub fn shape(&self) -> &Shape {
        &self.points
    }

    /// The simulator, once initialized.
    pub fn simulator(&self) -> Option<&ParticleSimulator> {
        self.simulator.as_ref()
    }

    /// Drop every particle and restart emission from the configured seed.
    pub fn init(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.emission.seed);
        self.points = PointSet::default().into();
        self.simulator = Some(new_simulator(&self.params, &self.colliders));
        log::debug!("particle system initialized with {} colliders", self.colliders.len());
    }

    /// Advance by `dt` seconds. Fatal before [`ParticleSystem::init`].
    pub fn update(&mut self, dt: f64) {
        let Some(simulator) = self.simulator.as_mut() else {
            violated(NOT_INITIALIZED)
        };
        let mut emitter = Emitter {
            source: &self.source,
            emission: &self.emission,
            rng: &mut self.rng,
            points: &mut self.points,
        };
        simulator.update(dt, &mut emitter);
        log::trace!("{} live particles", simulator.particles.len());
    }
}

struct Emitter<'a> {
    source: &'a Shape,
    emission: &'a ParticleSystemParams,
    rng: &'a mut Pcg32,
    points: &'a mut Shape,
}

impl SimulationHooks for Emitter<'_> {
    fn begin_update(&mut self, particles: &mut Vec<Particle>, dt: f64) {
        particles.retain(|p| p.timer > 0.0);

        let [lo, hi] = self.emission.particles_per_sec;
        let rate = if hi > lo { self.rng.gen_range(lo..=hi) } else { lo };
        let count = (dt * f64::from(rate)).round().max(0.0) as usize;
        for _ in 0..count {
            let e: f64 = self.rng.gen();
            let uv = Point2::new(self.rng.gen(), self.rng.gen());
            let sample = self.source.sample_uniform(e, uv);
            let speed = draw(self.rng, self.emission.init_speed);
            particles.push(Particle {
                pos: sample.pos,
                norm: sample.norm,
                vel: sample.norm * speed,
                timer: draw(self.rng, self.emission.init_timer),
                radius: draw(self.rng, self.emission.init_radius),
                ..Default::default()
            });
        }
    }

    fn end_update(&mut self, particles: &mut Vec<Particle>, _dt: f64) {
        self.points.geometry = Geometry::PointSet(PointSet {
            pos: particles.iter().map(|p| p.pos).collect(),
            radius: particles.iter().map(|p| p.radius).collect(),
            ..Default::default()
        });
    }
}

/// Rectangular cloth simulated as a spring lattice.
#[derive(Debug)]
pub struct Cloth {
    /// Forces, step rate and collision damping.
    pub params: SimulationParams,
    /// Obstacles.
    pub colliders: Vec<ShapeCollider>,
    cloth: ClothParams,
    mesh: Shape,
    simulator: Option<ParticleSimulator>,
}

impl Cloth {
    /// Cloth over a flat grid centered at the origin in the xy plane.
    pub fn new(params: SimulationParams, cloth: ClothParams) -> Result<Self, SceneError> {
        let [gx, gy] = cloth.grid;
        if gx == 0 || gy == 0 {
            return Err(SceneError::EmptyClothGrid(gx, gy));
        }
        let count = (gx + 1) * (gy + 1);
        if let Some(&vertex) = cloth.pinned.iter().find(|&&v| v >= count) {
            return Err(SceneError::PinnedVertex { vertex, count });
        }
        Ok(Self {
            params,
            colliders: Vec::new(),
            mesh: grid_mesh(&cloth),
            cloth,
            simulator: None,
        })
    }

    /// Grid and spring parameters.
    pub fn cloth_params(&self) -> &ClothParams {
        &self.cloth
    }

    /// The deformed grid.
    pub fn shape(&self) -> &Shape {
        &self.mesh
    }

    /// The simulator, once initialized.
    pub fn simulator(&self) -> Option<&ParticleSimulator> {
        self.simulator.as_ref()
    }

    /// Reset the grid to flat and rebuild particles and springs.
    pub fn init(&mut self) -> Result<(), SceneError> {
        self.mesh = grid_mesh(&self.cloth);
        let mut simulator = new_simulator(&self.params, &self.colliders);

        let [gx, gy] = self.cloth.grid;
        let [sx, sy] = self.cloth.size;
        let radius = (sx / gx as f64 + sy / gy as f64) / 2.0;
        simulator.particles = self
            .mesh
            .positions()
            .iter()
            .zip(self.mesh.normals())
            .map(|(pos, norm)| Particle {
                pos: *pos,
                norm: *norm,
                radius,
                mass: self.cloth.density / (radius * radius),
                oriented: true,
                ..Default::default()
            })
            .collect();
        for &v in &self.cloth.pinned {
            simulator.particles[v].pinned = true;
        }

        let c = &self.cloth;
        let idx = |i: usize, j: usize| j * (gx + 1) + i;
        for j in 0..gy {
            for i in 0..gx {
                let (i0, i1, i2, i3) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
                let mut links = vec![(i0, i1, c.stretch), (i0, i3, c.stretch), (i0, i2, c.shear), (i1, i3, c.shear)];
                if j + 2 <= gy {
                    links.push((i0, idx(i, j + 2), c.bend));
                }
                if i + 2 <= gx {
                    links.push((i0, idx(i + 2, j), c.bend));
                }
                for (a, b, ks) in links {
                    let spring = ParticleSpring::at_rest(&simulator.particles, a, b, ks, c.spring_damping);
                    simulator.add_spring(spring)?;
                }
            }
        }

        log::debug!(
            "cloth initialized with {} particles and {} springs",
            simulator.particles.len(),
            simulator.springs().len()
        );
        self.simulator = Some(simulator);
        Ok(())
    }

    /// Advance by `dt` seconds. Fatal before [`Cloth::init`].
    pub fn update(&mut self, dt: f64) {
        let Some(simulator) = self.simulator.as_mut() else {
            violated(NOT_INITIALIZED)
        };
        simulator.update(dt, &mut ClothSync { mesh: &mut self.mesh });
    }
}

/// Copies particle positions into the mesh after every sub-step and
/// smoothed mesh normals back into the particles.
struct ClothSync<'a> {
    mesh: &'a mut Shape,
}

impl SimulationHooks for ClothSync<'_> {
    fn end_step(&mut self, particles: &mut [Particle], _dt: f64) {
        for (pos, p) in self.mesh.positions_mut().iter_mut().zip(particles.iter()) {
            *pos = p.pos;
        }
        self.mesh.smooth_normals();
        for (p, norm) in particles.iter_mut().zip(self.mesh.normals()) {
            p.norm = *norm;
        }
    }
}

/// `(gx + 1) * (gy + 1)` vertices, row-major in x, with one quad per cell.
fn grid_mesh(cloth: &ClothParams) -> Shape {
    let [gx, gy] = cloth.grid;
    let [sx, sy] = cloth.size;
    let mut mesh = Mesh::default();
    for j in 0..=gy {
        for i in 0..=gx {
            let (u, v) = (i as f64 / gx as f64, j as f64 / gy as f64);
            mesh.pos.push(Point3::new((u - 0.5) * sx, (v - 0.5) * sy, 0.0));
            mesh.norm.push(Vec3::z());
            mesh.texcoord.push(Point2::new(u, v));
        }
    }
    let idx = |i: usize, j: usize| j * (gx + 1) + i;
    for j in 0..gy {
        for i in 0..gx {
            mesh.quad.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }
    mesh.into()
}

/// A simulated primitive.
#[derive(Debug)]
pub enum Simulated {
    /// Emitted particles.
    ParticleSystem(ParticleSystem),
    /// Spring-lattice cloth.
    Cloth(Cloth),
}

impl Simulated {
    /// The current simulated shape.
    pub fn shape(&self) -> &Shape {
        match self {
            Simulated::ParticleSystem(p) => p.shape(),
            Simulated::Cloth(c) => c.shape(),
        }
    }

    /// Build or rebuild the simulator.
    pub fn init(&mut self) -> Result<(), SceneError> {
        match self {
            Simulated::ParticleSystem(p) => {
                p.init();
                Ok(())
            }
            Simulated::Cloth(c) => c.init(),
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        match self {
            Simulated::ParticleSystem(p) => p.update(dt),
            Simulated::Cloth(c) => c.update(dt),
        }
    }
}

impl From<ParticleSystem> for Simulated {
    fn from(p: ParticleSystem) -> Self {
        Simulated::ParticleSystem(p)
    }
}

impl From<Cloth> for Simulated {
    fn from(c: Cloth) -> Self {
        Simulated::Cloth(c)
    }
}

impl Primitive {
    /// Whether the primitive is simulated.
    pub fn simulation_has(&self) -> bool {
        matches!(self.kind, PrimitiveKind::Simulated(_))
    }

    /// Build the simulator of a simulated primitive; no-op otherwise.
    pub fn simulation_init(&mut self) -> Result<(), SceneError> {
        match &mut self.kind {
            PrimitiveKind::Simulated(s) => s.init(),
            _ => Ok(()),
        }
    }

    /// Advance a simulated primitive by `dt` seconds; no-op otherwise.
    pub fn simulation_update(&mut self, dt: f64) {
        if let PrimitiveKind::Simulated(s) = &mut self.kind {
            s.update(dt);
        }
    }
}

impl PrimitiveGroup {
    /// Whether any primitive is simulated.
    pub fn simulation_has(&self) -> bool {
        self.prims.iter().any(Primitive::simulation_has)
    }

    /// Initialize every simulated primitive.
    pub fn simulation_init(&mut self) -> Result<(), SceneError> {
        self.prims.iter_mut().try_for_each(Primitive::simulation_init)
    }

    /// Advance every simulated primitive.
    pub fn simulation_update(&mut self, dt: f64) {
        for p in &mut self.prims {
            p.simulation_update(dt);
        }
    }
}

impl Scene {
    /// Whether anything in the scene is simulated.
    pub fn simulation_has(&self) -> bool {
        self.prims.simulation_has()
    }

    /// Initialize every simulated primitive.
    pub fn simulation_init(&mut self) -> Result<(), SceneError> {
        self.prims.simulation_init()
    }

    /// Advance every simulated primitive.
    pub fn simulation_update(&mut self, dt: f64) {
        self.prims.simulation_update(dt);
    }
}
