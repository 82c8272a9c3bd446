//! Strongly typed tunables for every boss archetype.
//!
//! Every knob has a compile-time default supplied by [`BossTuning::for_kind`].
//! Designers may override any subset of knobs from a TOML document whose
//! top-level tables are named after bosses, for example:
//!
//! ```toml
//! [procrastinator.cadence]
//! telegraph_base = 0.9
//!
//! [sloth.slime]
//! volleys = [5, 8, 11]
//! ```
//!
//! Overrides are merged onto the boss's defaults, so a partial table only
//! changes the keys it names.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use reverie_core::{BossKind, Phase, ProjectileKind, StateId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised while applying a TOML tuning document.
#[derive(Debug, Error)]
pub enum TuningError {
    /// The document is not valid TOML or does not match the tuning schema.
    #[error("invalid tuning document: {0}")]
    Parse(#[from] toml::de::Error),
    /// The default tuning could not be converted into a TOML tree.
    #[error("failed to encode default tuning: {0}")]
    Encode(#[from] toml::ser::Error),
    /// A top-level table does not name a known boss.
    #[error("unknown boss section `{0}`")]
    UnknownBoss(String),
    /// A boss entry is present but is not a table.
    #[error("boss section `{0}` must be a table")]
    SectionNotTable(String),
    /// A knob was given a value that would stall or flood the simulation.
    #[error("`{field}` must be at least {min}, got {value}")]
    OutOfRange {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Smallest accepted value.
        min: f32,
        /// Value found in the document.
        value: f32,
    },
}

/// Shortest spiral emission interval; anything smaller floods the projectile set.
pub(crate) const MIN_SPAWN_INTERVAL: f32 = 1e-3;
/// Slowest accepted crush descent.
pub(crate) const MIN_DROP_SPEED: f32 = 1.0;

/// Complete set of tunables for a single boss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BossTuning {
    /// Body size and placement.
    pub body: BodyTuning,
    /// Health, stress, deadline and phase thresholds.
    pub vitals: VitalsTuning,
    /// Cooldown, telegraph and homing speed scaling.
    pub cadence: CadenceTuning,
    /// Free drift positioning.
    pub drift: DriftTuning,
    /// Weighted attack table consulted from the drift hub.
    pub selection: Vec<SelectionWeight>,
    /// Deadline checkpoints that shove the boss downward.
    pub checkpoints: CheckpointTuning,
    /// Fake-attack streak and backlog boost.
    pub backlog: BacklogTuning,
    /// Spread shot generator.
    pub spread: SpreadTuning,
    /// Linear-prediction shot generator.
    pub predictive_shot: PredictiveShotTuning,
    /// Interception-lead homing barrage.
    pub predictive_barrage: PredictiveBarrageTuning,
    /// Direct-aim homing barrage.
    pub homing_barrage: HomingBarrageTuning,
    /// Rotating laser sweep.
    pub laser_sweep: LaserSweepTuning,
    /// Logarithmic spiral burst.
    pub spiral: SpiralTuning,
    /// Poisson distraction field.
    pub distraction: DistractionTuning,
    /// Rain barrage from the top edge.
    pub rain: RainTuning,
    /// Ground patrol hub.
    pub crawl: CrawlTuning,
    /// Arcing slime fan.
    pub slime: SlimeLobTuning,
    /// Floating spore volley.
    pub spore: SporeLobTuning,
    /// Horizontal charge.
    pub dash: DashTuning,
    /// Burst along the freshest trail segments.
    pub eruption: EruptionTuning,
    /// Overhead slam that leaves a pool.
    pub crush: CrushTuning,
    /// Ground trail hazard.
    pub trail: TrailTuning,
    /// Terminal defeat state.
    pub fading: FadingTuning,
}

impl BossTuning {
    /// Default tuning for the provided boss archetype.
    #[must_use]
    pub fn for_kind(kind: BossKind) -> Self {
        match kind {
            BossKind::Perfectionist => Self::perfectionist(),
            BossKind::Procrastinator => Self::procrastinator(),
            BossKind::Hollow => Self::hollow(),
            BossKind::Sloth => Self::sloth(),
        }
    }

    /// Precise two-phase aerial boss that hovers near the top of the arena.
    #[must_use]
    pub fn perfectionist() -> Self {
        let mut tuning = Self::procrastinator();
        tuning.body = BodyTuning {
            width: 60.0,
            height: 60.0,
            grounded: false,
            spawn: [0.5, 100.0],
        };
        tuning.vitals = VitalsTuning {
            max_health: 500.0,
            max_stress: 100.0,
            initial_stress: 0.0,
            stress_growth_rate: 0.0,
            deadline_seconds: 0.0,
            phase_thresholds: vec![0.5],
            damage_stress_ratio: 0.0,
            damage_stress_cap: 0.0,
            interrupt_on_phase_advance: true,
        };
        tuning.cadence = CadenceTuning {
            cooldowns: vec![2.0, 0.5],
            cooldown_stress_slope: 0.0,
            cooldown_floor: 0.5,
            telegraph_base: 0.8,
            telegraph_stress_slope: 0.0,
            telegraph_floor: 0.4,
            homing_speed_base: ProjectileKind::Homing.speed(),
            homing_speed_stress_slope: 0.0,
        };
        tuning.drift = DriftTuning {
            approach_base: 0.05,
            approach_phase: 0.1,
            approach_deadline: 0.0,
            approach_stress: 0.0,
            amplitude_x: 220.0,
            amplitude_y: 20.0,
            min_separation_base: 260.0,
            min_separation_phase: 60.0,
            min_separation_deadline: 0.0,
            min_separation_stress: 0.0,
            y_max_deadline: 0.0,
            y_max_phase: 20.0,
            ..DriftTuning::default()
        };
        tuning.selection = vec![
            SelectionWeight::flat(StateId::SpreadShot, 1),
            SelectionWeight::flat(StateId::PredictiveShot, 1),
            SelectionWeight::flat(StateId::HomingBarrage, 2),
            SelectionWeight::flat(StateId::LaserSweep, 2),
        ];
        tuning.checkpoints.deadline_ratios = Vec::new();
        tuning
    }

    /// Stress and deadline driven aerial boss with the full mathematical pattern set.
    #[must_use]
    pub fn procrastinator() -> Self {
        Self {
            body: BodyTuning::default(),
            vitals: VitalsTuning::default(),
            cadence: CadenceTuning::default(),
            drift: DriftTuning::default(),
            selection: vec![
                SelectionWeight {
                    state: StateId::DistractionField,
                    min_phase: 1,
                    base: 0.9,
                    stress: 0.6,
                    urgency: 0.0,
                    phase_bonus: 0.0,
                },
                SelectionWeight {
                    state: StateId::PredictiveBarrage,
                    min_phase: 1,
                    base: 0.6,
                    stress: 0.9,
                    urgency: 0.0,
                    phase_bonus: 0.0,
                },
                SelectionWeight {
                    state: StateId::LogSpiralBurst,
                    min_phase: 1,
                    base: 0.4,
                    stress: 0.0,
                    urgency: 1.4,
                    phase_bonus: 0.4,
                },
                SelectionWeight {
                    state: StateId::RainBarrage,
                    min_phase: 3,
                    base: 1.6,
                    stress: 0.8,
                    urgency: 1.2,
                    phase_bonus: 0.0,
                },
            ],
            checkpoints: CheckpointTuning::default(),
            backlog: BacklogTuning::default(),
            spread: SpreadTuning::default(),
            predictive_shot: PredictiveShotTuning::default(),
            predictive_barrage: PredictiveBarrageTuning::default(),
            homing_barrage: HomingBarrageTuning::default(),
            laser_sweep: LaserSweepTuning::default(),
            spiral: SpiralTuning::default(),
            distraction: DistractionTuning::default(),
            rain: RainTuning::default(),
            crawl: CrawlTuning::default(),
            slime: SlimeLobTuning::default(),
            spore: SporeLobTuning::default(),
            dash: DashTuning::default(),
            eruption: EruptionTuning::default(),
            crush: CrushTuning::default(),
            trail: TrailTuning::default(),
            fading: FadingTuning::default(),
        }
    }

    /// Void-themed variant that rains shards instead of laser bolts.
    #[must_use]
    pub fn hollow() -> Self {
        let mut tuning = Self::procrastinator();
        tuning.body.height = 64.0;
        tuning.rain.kind = ProjectileKind::VoidShard;
        tuning
    }

    /// Grounded crawler with a slime trail, lobbed volleys and an enrage tier.
    #[must_use]
    pub fn sloth() -> Self {
        let mut tuning = Self::procrastinator();
        tuning.body = BodyTuning {
            width: 120.0,
            height: 90.0,
            grounded: true,
            spawn: [0.75, 0.0],
        };
        tuning.vitals = VitalsTuning {
            max_health: 520.0,
            max_stress: 100.0,
            initial_stress: 0.0,
            stress_growth_rate: 0.0,
            deadline_seconds: 0.0,
            phase_thresholds: vec![0.5, 0.35],
            damage_stress_ratio: 0.0,
            damage_stress_cap: 0.0,
            interrupt_on_phase_advance: false,
        };
        tuning.selection = Vec::new();
        tuning.checkpoints.deadline_ratios = Vec::new();
        tuning
    }

    /// Applies the boss's section of a TOML override document onto `self`.
    ///
    /// Documents without a section for `kind` leave the tuning untouched.
    pub fn with_overrides(&self, kind: BossKind, document: &str) -> Result<Self, TuningError> {
        let table: toml::Table = document.parse()?;
        for name in table.keys() {
            if BossKind::from_name(name).is_none() {
                return Err(TuningError::UnknownBoss(name.clone()));
            }
        }

        let Some(section) = table.get(kind.as_str()) else {
            return Ok(self.clone());
        };
        let toml::Value::Table(section) = section else {
            return Err(TuningError::SectionNotTable(kind.as_str().to_owned()));
        };

        let mut merged = toml::Value::try_from(self)?;
        if let toml::Value::Table(base) = &mut merged {
            merge_tables(base, section);
        }
        let tuned: Self = merged.try_into()?;
        tuned.validate()?;
        Ok(tuned)
    }

    /// Rejects knobs that would stall a state or make it emit without bound.
    pub fn validate(&self) -> Result<(), TuningError> {
        at_least("spiral.spawn_interval", self.spiral.spawn_interval, MIN_SPAWN_INTERVAL)?;
        at_least("crush.drop_speed", self.crush.drop_speed, MIN_DROP_SPEED)
    }
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), TuningError> {
    // NaN fails the comparison and is rejected too.
    if value >= min {
        Ok(())
    } else {
        Err(TuningError::OutOfRange { field, min, value })
    }
}

fn merge_tables(base: &mut toml::Table, overrides: &toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge_tables(existing, nested);
            }
            _ => {
                let _ = base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Looks up a per-phase value, saturating at the last configured entry.
pub(crate) fn per_phase<T: Copy>(values: &[T], phase: Phase, fallback: T) -> T {
    let index = usize::from(phase.get().saturating_sub(1));
    values
        .get(index)
        .or_else(|| values.last())
        .copied()
        .unwrap_or(fallback)
}

/// Body size and placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyTuning {
    /// Width of the collision box.
    pub width: f32,
    /// Height of the collision box.
    pub height: f32,
    /// Whether the boss stands on the ground instead of flying.
    pub grounded: bool,
    /// Spawn position: horizontal centre as a fraction of arena width, then top edge.
    pub spawn: [f32; 2],
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            width: 48.0,
            height: 48.0,
            grounded: false,
            spawn: [0.5, 120.0],
        }
    }
}

/// Health, stress, deadline and phase thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VitalsTuning {
    /// Full health at battle start.
    pub max_health: f32,
    /// Upper clamp of the stress scalar.
    pub max_stress: f32,
    /// Stress at battle start.
    pub initial_stress: f32,
    /// Passive stress gain per second.
    pub stress_growth_rate: f32,
    /// Length of the deadline countdown; zero disables urgency.
    pub deadline_seconds: f32,
    /// Descending health fractions at which each later phase begins.
    pub phase_thresholds: Vec<f32>,
    /// Fraction of received damage removed from stress.
    pub damage_stress_ratio: f32,
    /// Largest stress reduction a single hit can cause.
    pub damage_stress_cap: f32,
    /// Whether a phase advance aborts the active attack and returns to the hub.
    pub interrupt_on_phase_advance: bool,
}

impl Default for VitalsTuning {
    fn default() -> Self {
        Self {
            max_health: 520.0,
            max_stress: 100.0,
            initial_stress: 10.0,
            stress_growth_rate: 2.0,
            deadline_seconds: 120.0,
            phase_thresholds: vec![0.7, 0.35],
            damage_stress_ratio: 0.6,
            damage_stress_cap: 6.0,
            interrupt_on_phase_advance: false,
        }
    }
}

/// Cooldown, telegraph and homing speed scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CadenceTuning {
    /// Hub dwell time per phase before the next attack.
    pub cooldowns: Vec<f32>,
    /// Fractional cooldown reduction per point of stress.
    pub cooldown_stress_slope: f32,
    /// Shortest permitted cooldown.
    pub cooldown_floor: f32,
    /// Telegraph duration at zero stress.
    pub telegraph_base: f32,
    /// Fractional telegraph reduction per point of stress.
    pub telegraph_stress_slope: f32,
    /// Shortest permitted telegraph.
    pub telegraph_floor: f32,
    /// Launch speed of homing shots at zero stress.
    pub homing_speed_base: f32,
    /// Fractional homing speed increase per point of stress.
    pub homing_speed_stress_slope: f32,
}

impl Default for CadenceTuning {
    fn default() -> Self {
        Self {
            cooldowns: vec![1.8, 1.2, 0.9],
            cooldown_stress_slope: 0.0025,
            cooldown_floor: 0.5,
            telegraph_base: 1.1,
            telegraph_stress_slope: 0.003,
            telegraph_floor: 0.4,
            homing_speed_base: 200.0,
            homing_speed_stress_slope: 0.004,
        }
    }
}

/// Free drift positioning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriftTuning {
    /// Vertical coordinate of the resting drift centre.
    pub base_center_y: f32,
    /// How far above the player the drift centre aims.
    pub player_offset_y: f32,
    /// Exponential chase rate of the drift centre per second.
    pub chase_rate: f32,
    /// Fraction of the Lissajous amplitude removed at full approach.
    pub amplitude_shrink: f32,
    /// Lower clamp of the approach factor.
    pub approach_min: f32,
    /// Upper clamp of the approach factor.
    pub approach_max: f32,
    /// Approach at phase one, full deadline and zero stress.
    pub approach_base: f32,
    /// Approach added at the final phase.
    pub approach_phase: f32,
    /// Approach added as the deadline expires.
    pub approach_deadline: f32,
    /// Approach added at maximum stress.
    pub approach_stress: f32,
    /// Base angular frequency of the Lissajous path.
    pub omega: f32,
    /// Random range added to the angular frequency on each entry.
    pub omega_jitter: [f32; 2],
    /// Random range of the vertical phase offset.
    pub phase_offset: [f32; 2],
    /// Base horizontal amplitude.
    pub amplitude_x: f32,
    /// Random range added to the horizontal amplitude on each entry.
    pub amplitude_x_jitter: [f32; 2],
    /// Base vertical amplitude.
    pub amplitude_y: f32,
    /// Random range added to the vertical amplitude on each entry.
    pub amplitude_y_jitter: [f32; 2],
    /// Largest random starting time on the path.
    pub time_offset_max: f32,
    /// Seconds spent blending from the entry position onto the path.
    pub blend_time: f32,
    /// Minimum separation at phase one, full deadline and zero stress.
    pub min_separation_base: f32,
    /// Separation removed at the final phase.
    pub min_separation_phase: f32,
    /// Separation removed as the deadline expires.
    pub min_separation_deadline: f32,
    /// Separation removed at maximum stress.
    pub min_separation_stress: f32,
    /// Lower clamp of the minimum separation.
    pub min_separation_floor: f32,
    /// Upper clamp of the minimum separation.
    pub min_separation_ceiling: f32,
    /// Deepest top edge at phase one and full deadline.
    pub y_max_base: f32,
    /// Extra descent permitted as the deadline expires.
    pub y_max_deadline: f32,
    /// Extra descent permitted at the final phase.
    pub y_max_phase: f32,
    /// Distance kept between the boss and the bottom of the screen.
    pub y_max_margin: f32,
    /// Distance kept between the boss and the side and top edges.
    pub edge_margin: f32,
}

impl Default for DriftTuning {
    fn default() -> Self {
        Self {
            base_center_y: 120.0,
            player_offset_y: 80.0,
            chase_rate: 3.0,
            amplitude_shrink: 0.52,
            approach_min: 0.05,
            approach_max: 0.92,
            approach_base: 0.22,
            approach_phase: 0.38,
            approach_deadline: 0.38,
            approach_stress: 0.18,
            omega: 1.0,
            omega_jitter: [-0.15, 0.2],
            phase_offset: [0.6, 1.4],
            amplitude_x: 140.0,
            amplitude_x_jitter: [-30.0, 40.0],
            amplitude_y: 50.0,
            amplitude_y_jitter: [-10.0, 15.0],
            time_offset_max: 0.6,
            blend_time: 0.25,
            min_separation_base: 260.0,
            min_separation_phase: 160.0,
            min_separation_deadline: 140.0,
            min_separation_stress: 80.0,
            min_separation_floor: 80.0,
            min_separation_ceiling: 260.0,
            y_max_base: 220.0,
            y_max_deadline: 160.0,
            y_max_phase: 60.0,
            y_max_margin: 100.0,
            edge_margin: 40.0,
        }
    }
}

/// One row of the weighted attack table.
///
/// The weight is `(base + stress·s + urgency·(1 − r)) · (1 + phase_bonus·p)`
/// where `s` is the stress ratio, `r` the deadline ratio and `p` the phase
/// progress. Rows below `min_phase` have zero weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionWeight {
    /// Attack state entered when the row is chosen.
    pub state: StateId,
    /// Earliest phase in which the row is eligible.
    pub min_phase: u8,
    /// Constant weight.
    pub base: f32,
    /// Weight added at maximum stress.
    pub stress: f32,
    /// Weight added as the deadline expires.
    pub urgency: f32,
    /// Multiplicative bonus at the final phase.
    pub phase_bonus: f32,
}

impl SelectionWeight {
    /// Row with unit weight that becomes eligible at `min_phase`.
    #[must_use]
    pub const fn flat(state: StateId, min_phase: u8) -> Self {
        Self {
            state,
            min_phase,
            base: 1.0,
            stress: 0.0,
            urgency: 0.0,
            phase_bonus: 0.0,
        }
    }
}

/// Deadline checkpoints that shove the boss downward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointTuning {
    /// Descending deadline ratios at which a checkpoint fires.
    pub deadline_ratios: Vec<f32>,
    /// Impulse granted by the first checkpoint, before the per-stage step.
    pub impulse_base: f32,
    /// Impulse added per checkpoint stage.
    pub impulse_step: f32,
    /// Impulse lost per second.
    pub decay: f32,
    /// Fraction of the impulse converted into downward speed.
    pub descent_scale: f32,
}

impl Default for CheckpointTuning {
    fn default() -> Self {
        Self {
            deadline_ratios: vec![0.6, 0.4, 0.2],
            impulse_base: 160.0,
            impulse_step: 60.0,
            decay: 220.0,
            descent_scale: 0.5,
        }
    }
}

/// Fake-attack streak and backlog boost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacklogTuning {
    /// Multiplier reported while the boost is active.
    pub multiplier: f32,
    /// Seconds the boost stays active once cashed in.
    pub duration: f32,
    /// Fakes required before a completed barrage cashes in the boost.
    pub streak_to_cash_in: u32,
    /// Stress ratio below which a barrage may be faked.
    pub fake_stress_ratio: f32,
    /// Probability that an eligible barrage is faked.
    pub fake_probability: f32,
    /// Stress gained when a barrage is faked.
    pub fake_stress_gain: f32,
}

impl Default for BacklogTuning {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            duration: 4.0,
            streak_to_cash_in: 2,
            fake_stress_ratio: 0.3,
            fake_probability: 0.25,
            fake_stress_gain: 3.0,
        }
    }
}

/// Spread shot generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpreadTuning {
    /// Bullets per volley for each phase.
    pub counts: Vec<u32>,
    /// Total angular width of the fan in radians.
    pub spread: f32,
    /// Projectile fired.
    pub kind: ProjectileKind,
}

impl Default for SpreadTuning {
    fn default() -> Self {
        Self {
            counts: vec![7, 11],
            spread: FRAC_PI_3,
            kind: ProjectileKind::Normal,
        }
    }
}

/// Linear-prediction shot generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictiveShotTuning {
    /// Seconds of player motion extrapolated when aiming.
    pub prediction_time: f32,
    /// Shots per volley for each phase.
    pub shots: Vec<u32>,
    /// Horizontal distance between neighbouring aim points.
    pub offset_step: f32,
    /// Projectile fired.
    pub kind: ProjectileKind,
}

impl Default for PredictiveShotTuning {
    fn default() -> Self {
        Self {
            prediction_time: 0.8,
            shots: vec![1, 3],
            offset_step: 50.0,
            kind: ProjectileKind::Normal,
        }
    }
}

/// Interception-lead homing barrage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictiveBarrageTuning {
    /// Shots fired at zero stress.
    pub base_shots: u32,
    /// Stress points per additional shot.
    pub stress_per_extra_shot: f32,
    /// Largest number of stress-driven additional shots.
    pub max_extra_shots: u32,
    /// Seconds between shots.
    pub interval: f32,
    /// Seconds between shots while the backlog boost is active.
    pub boosted_interval: f32,
    /// Additional shots while the backlog boost is active.
    pub boosted_extra_shots: u32,
    /// Stress removed when the barrage completes.
    pub stress_relief: f32,
    /// Phase from which a completed barrage chains into the spiral burst.
    pub chain_phase: u8,
}

impl Default for PredictiveBarrageTuning {
    fn default() -> Self {
        Self {
            base_shots: 2,
            stress_per_extra_shot: 20.0,
            max_extra_shots: 3,
            interval: 0.35,
            boosted_interval: 0.32,
            boosted_extra_shots: 1,
            stress_relief: 4.0,
            chain_phase: 2,
        }
    }
}

/// Direct-aim homing barrage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomingBarrageTuning {
    /// Missiles per barrage.
    pub shots: u32,
    /// Seconds between missiles.
    pub interval: f32,
}

impl Default for HomingBarrageTuning {
    fn default() -> Self {
        Self {
            shots: 5,
            interval: 0.3,
        }
    }
}

/// Rotating laser sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaserSweepTuning {
    /// Seconds the sweep lasts.
    pub duration: f32,
    /// Total swept angle in radians.
    pub sweep: f32,
    /// Bolts emitted per second.
    pub rate: f32,
    /// Projectile fired.
    pub kind: ProjectileKind,
}

impl Default for LaserSweepTuning {
    fn default() -> Self {
        Self {
            duration: 2.0,
            sweep: FRAC_PI_2,
            rate: 10.0,
            kind: ProjectileKind::Laser,
        }
    }
}

/// Logarithmic spiral burst.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpiralTuning {
    /// Fraction of the boss telegraph used before the burst.
    pub telegraph_scale: f32,
    /// Shortest permitted telegraph.
    pub telegraph_floor: f32,
    /// Angular speed at full deadline.
    pub omega_base: f32,
    /// Angular speed added as the deadline expires.
    pub omega_deadline: f32,
    /// Fractional angular speed gain per unit of backlog boost.
    pub omega_boost: f32,
    /// Exponential growth rate at zero stress.
    pub k_base: f32,
    /// Growth rate added at maximum stress.
    pub k_stress: f32,
    /// Fractional growth rate gain per unit of backlog boost.
    pub k_boost: f32,
    /// Starting speed as a fraction of the projectile's nominal speed.
    pub base_speed_scale: f32,
    /// Projectile whose nominal speed seeds the spiral.
    pub speed_reference: ProjectileKind,
    /// Seconds between emitted bullets.
    pub spawn_interval: f32,
    /// Seconds the burst lasts.
    pub duration: f32,
    /// Projectile fired.
    pub kind: ProjectileKind,
    /// Phase from which the burst chains into the rain barrage.
    pub chain_phase: u8,
}

impl Default for SpiralTuning {
    fn default() -> Self {
        Self {
            telegraph_scale: 0.8,
            telegraph_floor: 0.25,
            omega_base: 2.6,
            omega_deadline: 1.6,
            omega_boost: 0.12,
            k_base: 0.14,
            k_stress: 0.10,
            k_boost: 0.18,
            base_speed_scale: 0.55,
            speed_reference: ProjectileKind::Normal,
            spawn_interval: 0.05,
            duration: 1.8,
            kind: ProjectileKind::Laser,
            chain_phase: 3,
        }
    }
}

/// Poisson distraction field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistractionTuning {
    /// Longest permitted telegraph.
    pub telegraph_cap: f32,
    /// Spawn rate at zero stress and full deadline.
    pub lambda0: f32,
    /// Fractional rate gain as the deadline expires.
    pub deadline_gain: f32,
    /// Fractional rate gain per unit of backlog boost.
    pub boost_gain: f32,
    /// Radius range of the spawn ring around the player.
    pub ring_radius: [f32; 2],
    /// Outward speed range as a fraction of the projectile's nominal speed.
    pub speed_scale: [f32; 2],
    /// Seconds the field lasts.
    pub duration: f32,
    /// Stress removed when the field completes.
    pub stress_relief: f32,
    /// Projectile fired.
    pub kind: ProjectileKind,
}

impl Default for DistractionTuning {
    fn default() -> Self {
        Self {
            telegraph_cap: 0.9,
            lambda0: 10.0,
            deadline_gain: 0.8,
            boost_gain: 0.5,
            ring_radius: [28.0, 64.0],
            speed_scale: [0.25, 0.45],
            duration: 1.3,
            stress_relief: 4.0,
            kind: ProjectileKind::Normal,
        }
    }
}

/// Rain barrage from the top edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RainTuning {
    /// Fraction of the boss telegraph used before the rain.
    pub telegraph_scale: f32,
    /// Shortest permitted telegraph.
    pub telegraph_floor: f32,
    /// Spawn rate at zero stress and full deadline.
    pub lambda0: f32,
    /// Fractional rate gain as the deadline expires.
    pub deadline_gain: f32,
    /// Fractional rate gain at maximum stress.
    pub stress_gain: f32,
    /// Fractional rate gain per unit of backlog boost.
    pub boost_gain: f32,
    /// Probability that a drop is drawn near the player instead of uniformly.
    pub player_mix: f32,
    /// Standard deviation of drops drawn near the player.
    pub player_sigma: f32,
    /// Distance kept between drops and the side edges.
    pub edge_margin: f32,
    /// Vertical spawn coordinate.
    pub spawn_y: f32,
    /// Largest horizontal speed jitter.
    pub vx_jitter: f32,
    /// Fall speed at full deadline as a fraction of the nominal speed.
    pub vy_base: f32,
    /// Fall speed fraction added as the deadline expires.
    pub vy_deadline: f32,
    /// Seconds the rain lasts at zero stress.
    pub duration_base: f32,
    /// Seconds added at maximum stress.
    pub duration_stress: f32,
    /// Projectile fired.
    pub kind: ProjectileKind,
}

impl Default for RainTuning {
    fn default() -> Self {
        Self {
            telegraph_scale: 0.7,
            telegraph_floor: 0.2,
            lambda0: 22.0,
            deadline_gain: 0.8,
            stress_gain: 0.6,
            boost_gain: 0.4,
            player_mix: 0.6,
            player_sigma: 120.0,
            edge_margin: 20.0,
            spawn_y: -10.0,
            vx_jitter: 40.0,
            vy_base: 0.8,
            vy_deadline: 0.4,
            duration_base: 1.6,
            duration_stress: 0.3,
            kind: ProjectileKind::Laser,
        }
    }
}

/// Ground patrol hub.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlTuning {
    /// Walking speed at phase one.
    pub move_speed: f32,
    /// Walking speed multiplier for each phase.
    pub phase_speed: Vec<f32>,
    /// Seconds between retargets toward the player for each phase.
    pub retarget_intervals: Vec<f32>,
    /// Seconds of player motion added to the patrol target.
    pub lead_time: f32,
    /// Distance kept between the patrol target and the side edges.
    pub edge_padding: f32,
    /// Distance at which the patrol target counts as reached.
    pub arrive_distance: f32,
    /// Fallback patrol targets as fractions of arena width.
    pub patrol_points: Vec<f32>,
    /// Seconds between slime volleys for each phase.
    pub slime_cooldowns: Vec<f32>,
    /// Seconds between dashes for each phase.
    pub dash_cooldowns: Vec<f32>,
    /// Seconds between spore volleys for each phase.
    pub spore_cooldowns: Vec<f32>,
    /// Seconds between crushes for each phase; the last entry is the enraged one.
    pub crush_cooldowns: Vec<f32>,
    /// Seconds between eruptions for each phase.
    pub eruption_intervals: Vec<f32>,
}

impl Default for CrawlTuning {
    fn default() -> Self {
        Self {
            move_speed: 110.0,
            phase_speed: vec![1.0, 1.2, 1.5],
            retarget_intervals: vec![0.5, 0.35],
            lead_time: 0.25,
            edge_padding: 60.0,
            arrive_distance: 10.0,
            patrol_points: vec![0.15, 0.33, 0.5, 0.67, 0.85],
            slime_cooldowns: vec![3.0, 2.2, 1.3],
            dash_cooldowns: vec![6.5, 5.5, 3.3],
            spore_cooldowns: vec![7.5, 6.4, 3.8],
            crush_cooldowns: vec![11.0, 8.5, 4.675],
            eruption_intervals: vec![9.0, 7.65, 5.355],
        }
    }
}

/// Arcing slime fan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlimeLobTuning {
    /// Telegraph before the volley.
    pub telegraph: f32,
    /// Globs per volley for each phase.
    pub volleys: Vec<u32>,
    /// Raw fan width for each phase.
    pub spreads: Vec<f32>,
    /// Conversion from raw fan width to radians.
    pub span_scale: f32,
    /// Launch speed for each phase.
    pub speeds: Vec<f32>,
    /// Random range added to each glob's launch speed.
    pub speed_jitter: [f32; 2],
    /// Seconds of player motion extrapolated when aiming.
    pub lead_time: f32,
    /// Height of the launch point as a fraction of body height from the top.
    pub origin_height: f32,
}

impl Default for SlimeLobTuning {
    fn default() -> Self {
        Self {
            telegraph: 0.9,
            volleys: vec![6, 9, 12],
            spreads: vec![0.85, 1.05, 1.21],
            span_scale: 0.25,
            speeds: vec![190.0, 210.0, 227.0],
            speed_jitter: [-24.0, 36.0],
            lead_time: 0.35,
            origin_height: 0.25,
        }
    }
}

/// Floating spore volley.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SporeLobTuning {
    /// Telegraph before the volley.
    pub telegraph: f32,
    /// Spores per volley for each phase.
    pub counts: Vec<u32>,
    /// Horizontal speed spread for each phase.
    pub spreads: Vec<f32>,
    /// Range of the initial upward speed.
    pub vertical_speed: [f32; 2],
    /// Seconds the spore floats; used to lead the player.
    pub float_time: f32,
}

impl Default for SporeLobTuning {
    fn default() -> Self {
        Self {
            telegraph: 0.7,
            counts: vec![3, 5, 7],
            spreads: vec![60.0, 60.0, 80.0],
            vertical_speed: [-55.0, -35.0],
            float_time: 1.3,
        }
    }
}

/// Horizontal charge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashTuning {
    /// Seconds the dash lasts.
    pub duration: f32,
    /// Charge speed for each phase.
    pub speeds: Vec<f32>,
    /// Damage dealt by the single body contact.
    pub contact_damage: f32,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            duration: 0.9,
            speeds: vec![250.0, 250.0, 312.5],
            contact_damage: 11.0,
        }
    }
}

/// Burst along the freshest trail segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EruptionTuning {
    /// Number of most recent segments that erupt.
    pub segments: usize,
    /// Damage per erupting segment the player overlaps.
    pub burst_damage: f32,
    /// Age added to each erupting segment.
    pub age_added: f32,
}

impl Default for EruptionTuning {
    fn default() -> Self {
        Self {
            segments: 6,
            burst_damage: 28.0,
            age_added: 0.6,
        }
    }
}

/// Overhead slam that leaves a pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrushTuning {
    /// Warning shown while the body lifts and tracks the player.
    pub telegraph: f32,
    /// Height above the ground the lift aims for.
    pub lift_height: f32,
    /// Share of the telegraph spent lifting.
    pub lift_share: f32,
    /// Shortest lift.
    pub lift_min: f32,
    /// Seconds of player motion added to the slam target.
    pub lead_time: f32,
    /// Distance kept between the slam target and the side edges.
    pub edge_padding: f32,
    /// Descent speed once the telegraph ends.
    pub drop_speed: f32,
    /// Centre distance within which the impact hits.
    pub impact_radius: f32,
    /// Impact damage as a fraction of the player's maximum health.
    pub impact_ratio: f32,
}

impl Default for CrushTuning {
    fn default() -> Self {
        Self {
            telegraph: 1.2,
            lift_height: 320.0,
            lift_share: 0.55,
            lift_min: 0.35,
            lead_time: 0.25,
            edge_padding: 40.0,
            drop_speed: 900.0,
            impact_radius: 140.0,
            impact_ratio: 0.33,
        }
    }
}

/// Ground trail hazard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrailTuning {
    /// Horizontal distance travelled between dropped segments.
    pub drop_distance: f32,
    /// Width and height of each segment.
    pub segment_size: [f32; 2],
    /// How far a segment sinks below the boss's feet.
    pub embed: f32,
    /// Seconds a segment lives.
    pub lifetime: f32,
    /// Damage per second while standing in a segment.
    pub dps: f32,
    /// Damage multiplier applied to a player who stands still.
    pub idle_multiplier: f32,
    /// Damage multiplier applied in the final phase.
    pub enrage_multiplier: f32,
    /// Horizontal speed at or below which the player counts as idle.
    pub idle_speed: f32,
    /// Horizontal velocity multiplier applied while in contact.
    pub slow: f32,
    /// Width and height of the pool a crush leaves.
    pub pool_size: [f32; 2],
    /// How far a pool sinks below the boss's feet.
    pub pool_embed: f32,
    /// Seconds a pool lives.
    pub pool_lifetime: f32,
    /// Damage per second while standing in a pool.
    pub pool_dps: f32,
    /// Pool damage multiplier applied to a player who stands still.
    pub pool_idle_multiplier: f32,
}

impl Default for TrailTuning {
    fn default() -> Self {
        Self {
            drop_distance: 36.0,
            segment_size: [48.0, 14.0],
            embed: 6.0,
            lifetime: 6.0,
            dps: 10.0,
            idle_multiplier: 1.8,
            enrage_multiplier: 1.3,
            idle_speed: 25.0,
            slow: 0.6,
            pool_size: [170.0, 38.0],
            pool_embed: 4.0,
            pool_lifetime: 8.0,
            pool_dps: 26.0,
            pool_idle_multiplier: 1.9,
        }
    }
}

/// Terminal defeat state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FadingTuning {
    /// Seconds the fade lasts before the boss reports full defeat.
    pub duration: f32,
}

impl Default for FadingTuning {
    fn default() -> Self {
        Self { duration: 4.0 }
    }
}
