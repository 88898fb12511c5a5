use log::{debug, info};

use crate::{
    anemone::{Anemone, ConsumptionScan},
    config::Config,
    error::Result,
    food::FoodSet,
    phases,
    rng::{SimRng, create_rng},
    types::{Point3, Vector3, ensure_finite_scalar, ensure_finite_vector},
};

/// End conditions for [`Simulation::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunLimits {
    /// Maximum number of steps to execute.
    pub max_timesteps: u64,
    /// Stop once fewer than this many pieces of food remain.
    pub min_remaining_food: usize,
}

impl RunLimits {
    /// Whether another step may run after `steps` steps with `remaining` food.
    pub fn allows_step(&self, steps: u64, remaining: usize) -> bool {
        steps < self.max_timesteps && remaining >= self.min_remaining_food
    }
}

/// Outcome of a single [`Simulation::step`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Positions of the food eaten during the step.
    pub consumed: Vec<Point3>,
}

/// Outcome of [`Simulation::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub steps: u64,
    pub remaining_food: usize,
    pub consumed: usize,
}

/// One anemone feeding on drifting food.
#[derive(Debug)]
pub struct Simulation {
    pub anemone: Anemone,
    pub food: FoodSet,
    current: Vector3,
    max_diffusion: f64,
    scan: ConsumptionScan,
    rng: SimRng,
}

impl Simulation {
    /// Assembles a simulation from already-built parts.
    ///
    /// ### Errors
    /// Fails when `current` or `max_diffusion` is not finite.
    pub fn new(
        anemone: Anemone,
        food: FoodSet,
        current: Vector3,
        max_diffusion: f64,
        rng: SimRng,
    ) -> Result<Self> {
        ensure_finite_vector("current", current)?;
        ensure_finite_scalar("max_food_diffusion_per_timestep", max_diffusion)?;
        Ok(Self {
            anemone,
            food,
            current,
            max_diffusion,
            scan: ConsumptionScan::default(),
            rng,
        })
    }

    /// Builds the anemone, scatters the food and seeds the RNG from `cfg`.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let model = &cfg.model;

        if let Some(seed) = cfg.simulation.random_seed {
            debug!("Setting random seed to: {seed}");
        }
        let mut rng = create_rng(cfg.simulation.random_seed);

        let current = model.current();
        let food = FoodSet::random_in_unit_octant(model.num_pieces_food, &mut rng);

        let anemone = Anemone::new(
            model.num_tentacles,
            model.disk_center(),
            model.disk_radius,
            model.disk_normal_vector(),
            model.tentacle_length,
            model.num_tentacle_elements,
        )?;

        let sim = Self::new(
            anemone,
            food,
            current,
            cfg.simulation.max_food_diffusion_per_timestep,
            rng,
        )?;
        Ok(sim.with_scan(cfg.simulation.consumption_scan))
    }

    pub fn with_scan(mut self, scan: ConsumptionScan) -> Self {
        self.scan = scan;
        self
    }

    pub fn current(&self) -> Vector3 {
        self.current
    }

    pub fn max_diffusion(&self) -> f64 {
        self.max_diffusion
    }

    pub fn scan(&self) -> ConsumptionScan {
        self.scan
    }

    /// Advances the model by one timestep.
    ///
    /// All food moves first (see [`phases::motion_phase`]); only then are
    /// consumption tests run against the new positions.
    pub fn step(&mut self) -> Result<StepReport> {
        phases::motion_phase(
            &mut self.food,
            self.current,
            self.max_diffusion,
            &mut self.rng,
        )?;
        let consumed = phases::consumption_phase(&self.anemone, &mut self.food, self.scan);
        Ok(StepReport { consumed })
    }

    /// Steps until `limits` say stop.
    ///
    /// Both end conditions are checked before every step, so a run that
    /// starts below the food floor executes no steps at all.
    pub fn run(&mut self, limits: RunLimits) -> Result<RunReport> {
        debug!(
            "Running for {} steps or until less than {} pieces of food remain",
            limits.max_timesteps, limits.min_remaining_food
        );

        let mut steps = 0;
        let mut consumed = 0;
        while limits.allows_step(steps, self.food.len()) {
            info!("Advancing to timestep: {steps}");
            consumed += self.step()?.consumed.len();
            steps += 1;
        }

        info!("Run ended after {steps} timesteps");
        info!("\t{} pieces of food remain", self.food.len());

        Ok(RunReport {
            steps,
            remaining_food: self.food.len(),
            consumed,
        })
    }
}
