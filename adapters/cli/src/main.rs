#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Reverie boss battle.

mod avatar;

use std::{collections::BTreeMap, fmt, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use reverie_core::{Arena, BossKind, Command, DamageSource, Event, StateId};
use reverie_system_boss::BossTuning;
use reverie_world::{apply, query, World};

use crate::avatar::ScriptedAvatar;

/// Runs a scripted avatar against one boss and prints how the battle went.
#[derive(Debug, Parser)]
#[command(name = "reverie", version)]
#[command(about = "Headless boss battle simulator")]
struct Args {
    /// Boss to fight: perfectionist, procrastinator, hollow or sloth
    #[arg(long, value_parser = parse_boss, default_value = "procrastinator")]
    boss: BossKind,

    /// Seed for every random draw made by the boss
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds before the run is called a timeout
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Fixed simulation steps per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// TOML file with per-boss tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn parse_boss(name: &str) -> Result<BossKind, String> {
    BossKind::from_name(&name.to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = BossKind::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("unknown boss `{name}`, expected one of {}", known.join(", "))
    })
}

/// Merges an override document onto the boss defaults, keeping the defaults when it is rejected.
fn resolve_tuning(kind: BossKind, document: &str) -> BossTuning {
    let defaults = BossTuning::for_kind(kind);
    match defaults.with_overrides(kind, document) {
        Ok(tuning) => tuning,
        Err(error) => {
            warn!("ignoring tuning overrides for {kind}: {error}");
            defaults
        }
    }
}

fn load_tuning(kind: BossKind, path: Option<&PathBuf>) -> Result<BossTuning> {
    let Some(path) = path else {
        return Ok(BossTuning::for_kind(kind));
    };
    let document = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    Ok(resolve_tuning(kind, &document))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Victory,
    Defeat,
    Timeout,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

/// Totals gathered from the event stream of one run.
#[derive(Debug)]
struct Summary {
    boss: BossKind,
    seed: u64,
    outcome: Outcome,
    elapsed: f32,
    boss_health: f32,
    player_health: f32,
    boss_hits: u32,
    damage_dealt: f32,
    damage_taken: BTreeMap<&'static str, f32>,
    peak_projectiles: usize,
    final_phase: u8,
    visits: BTreeMap<StateId, u32>,
}

impl Summary {
    fn new(boss: BossKind, seed: u64) -> Self {
        Self {
            boss,
            seed,
            outcome: Outcome::Timeout,
            elapsed: 0.0,
            boss_health: 0.0,
            player_health: 0.0,
            boss_hits: 0,
            damage_dealt: 0.0,
            damage_taken: BTreeMap::new(),
            peak_projectiles: 0,
            final_phase: 1,
            visits: BTreeMap::new(),
        }
    }

    fn record(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { dt } => self.elapsed += dt,
            Event::BossStateChanged { to, .. } => *self.visits.entry(*to).or_default() += 1,
            Event::PhaseAdvanced { phase } => self.final_phase = phase.get(),
            Event::PlayerHit { damage, source } => {
                let label = match source {
                    DamageSource::Projectile(_) => "projectiles",
                    DamageSource::Trail => "trail",
                    DamageSource::Contact => "contact",
                };
                *self.damage_taken.entry(label).or_default() += damage;
            }
            Event::BossHit { damage } => {
                self.boss_hits += 1;
                self.damage_dealt += damage;
            }
            Event::BossDefeated => self.outcome = Outcome::Victory,
            Event::PlayerSlowed { .. } => {}
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (seed {}): {}", self.boss, self.seed, self.outcome)?;
        writeln!(f, "  elapsed          {:.2}s", self.elapsed)?;
        writeln!(f, "  boss health      {:.1}", self.boss_health)?;
        writeln!(f, "  player health    {:.1}", self.player_health)?;
        writeln!(f, "  final phase      {}", self.final_phase)?;
        writeln!(
            f,
            "  damage dealt     {:.1} over {} hits",
            self.damage_dealt, self.boss_hits
        )?;
        for (source, damage) in &self.damage_taken {
            writeln!(f, "  taken from {source:<13} {damage:.1}")?;
        }
        writeln!(f, "  peak projectiles {}", self.peak_projectiles)?;
        for (state, count) in &self.visits {
            writeln!(f, "  visits {state:<17} {count}")?;
        }
        Ok(())
    }
}

fn simulate(args: &Args, tuning: BossTuning) -> Result<Summary> {
    if args.fps == 0 {
        bail!("--fps must be at least 1");
    }
    if !args.seconds.is_finite() || args.seconds <= 0.0 {
        bail!("--seconds must be a positive number");
    }

    let arena = Arena::default();
    let dt = 1.0 / args.fps as f32;
    let ticks = (args.seconds * args.fps as f32).ceil() as u64;
    let mut world = World::new(args.boss, tuning, arena, args.seed);
    let mut avatar = ScriptedAvatar::new(&arena);
    let mut summary = Summary::new(args.boss, args.seed);
    let mut events = Vec::new();

    info!("{}", query::welcome_banner(&world));
    for _ in 0..ticks {
        avatar.stride(dt, &arena);
        if let Some(shot) = avatar.trigger(dt, &query::boss_view(&world)) {
            apply(&mut world, shot, &mut avatar, &mut events);
        }
        apply(&mut world, Command::Tick { dt }, &mut avatar, &mut events);

        for event in events.drain(..) {
            summary.record(&event);
        }
        summary.peak_projectiles = summary
            .peak_projectiles
            .max(query::projectiles(&world).len());

        if summary.outcome == Outcome::Victory {
            break;
        }
        if avatar.is_down() {
            summary.outcome = Outcome::Defeat;
            break;
        }
    }

    summary.boss_health = query::boss_view(&world).health;
    summary.player_health = avatar.health();
    Ok(summary)
}

/// Entry point for the Reverie command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let tuning = load_tuning(args.boss, args.tuning.as_ref())?;
    let summary = simulate(&args, tuning)?;
    info!(
        "{} finished as {} after {:.2}s",
        summary.boss, summary.outcome, summary.elapsed
    );
    print!("{summary}");
    Ok(())
}
