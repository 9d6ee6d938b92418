//! The end-to-end driver.
//!
//! Each tick of [`Simulation::step`]:
//!
//! 1. The client issues a scripted input, predicts it and sends it uplink.
//! 2. The authority applies whatever inputs have arrived, ticks its bots and
//!    broadcasts every character's state downlink.
//! 3. Arrived states are queued in the [`StateInbox`] and drained into the
//!    session, which then renders remote characters.
//! 4. The shared clock advances by [`TICK_MS`].

use anyhow::{Context, Result};
use charsync_client::{
    CharacterWorld, Clock, ManualClock, PredictionConfig, PredictionSession, StateInbox,
};
use charsync_component::Entity;
use charsync_math::Vec3;
use charsync_protocol::{CharacterMoveInput, CharacterState, ClientEvent};
use tracing::{debug, info};

use crate::link::{Link, LinkConfig};
use crate::mover::KinematicMover;
use crate::server::{AuthorityServer, ServerConfig};
use crate::world::{SimColliders, SimWorld};

/// Simulated time per tick.
pub const TICK_MS: u32 = 16;

const START_MS: u64 = 1_000;

type ClientSession = PredictionSession<SimWorld, KinematicMover, SimColliders, ManualClock>;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub uplink: LinkConfig,
    pub downlink: LinkConfig,
    pub server: ServerConfig,
    pub prediction: PredictionConfig,
}

/// Counters and gaps at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimReport {
    pub ticks: u64,
    pub inputs_sent: u64,
    pub inputs_lost: u64,
    pub states_delivered: u64,
    pub states_lost: u64,
    pub pending_inputs: usize,
    pub messages_in_flight: usize,
    /// Distance between the client's prediction and the authority's state.
    pub prediction_gap: f32,
    /// Distance between where the bot is shown and where it really is.
    pub remote_gap: f32,
}

#[derive(Debug)]
pub struct Simulation {
    clock: ManualClock,
    session: ClientSession,
    server: AuthorityServer,
    uplink: Link<(Entity, CharacterMoveInput)>,
    downlink: Link<(Entity, CharacterState)>,
    inbox: StateInbox,
    player: Entity,
    bot: Entity,
    next_sequence: u64,
    ticks: u64,
    states_delivered: u64,
}

impl Simulation {
    /// Spawn the local player and one bot on both sides of the link.
    ///
    /// # Errors
    ///
    /// Fails if the prediction configuration is invalid.
    pub fn new(config: &SimConfig) -> Result<Self> {
        let clock = ManualClock::starting_at(START_MS);
        let now = clock.now_ms();

        let mut world = SimWorld::new();
        let player = world.spawn_character(Vec3::ZERO);
        let bot = world.spawn_character(Vec3::new(4.0, 0.0, 4.0));
        world.mark_local(player);

        let initial = |entity: Entity| {
            world
                .location(entity)
                .map(|location| CharacterState::initial(&location, now))
                .with_context(|| format!("{entity} spawned without a location"))
        };
        let mut server = AuthorityServer::new(config.server, KinematicMover::default());
        server.spawn(player, initial(player)?);
        server.spawn_bot(bot, initial(bot)?);

        let events = world.take_events();
        let mut session = PredictionSession::new(
            config.prediction.clone(),
            world,
            KinematicMover::default(),
            SimColliders::default(),
            clock.clone(),
        )
        .context("invalid prediction configuration")?;
        for event in events {
            session.handle(event);
        }

        Ok(Self {
            clock,
            session,
            server,
            uplink: Link::new("uplink", config.uplink),
            downlink: Link::new("downlink", config.downlink),
            inbox: StateInbox::new(),
            player,
            bot,
            next_sequence: 0,
            ticks: 0,
            states_delivered: 0,
        })
    }

    #[must_use]
    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// One tick with a scripted local input.
    pub fn step(&mut self) {
        self.next_sequence += 1;
        let input = scripted_input(self.next_sequence, self.clock.now_ms());
        self.advance(Some(input));
    }

    /// Tick without local input, letting the links drain.
    pub fn settle(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.advance(None);
        }
    }

    /// Run `ticks` scripted ticks and report.
    pub fn run(&mut self, ticks: u64) -> SimReport {
        for _ in 0..ticks {
            self.step();
            if self.ticks % 60 == 0 {
                let report = self.report();
                debug!(
                    tick = self.ticks,
                    pending_inputs = report.pending_inputs,
                    prediction_gap = report.prediction_gap,
                    remote_gap = report.remote_gap,
                    "progress"
                );
            }
        }
        self.report()
    }

    /// Despawn every character and let the session release its colliders.
    /// Returns how many colliders are still live afterwards.
    pub fn shutdown(&mut self) -> usize {
        let world = self.session.world_mut();
        world.despawn(self.bot);
        world.despawn(self.player);
        for event in world.take_events() {
            self.session.handle(event);
        }
        self.session.colliders().live()
    }

    fn advance(&mut self, input: Option<CharacterMoveInput>) {
        let now = self.clock.now_ms();
        self.ticks += 1;

        if let Some(input) = input {
            self.session.handle(ClientEvent::InputIssued {
                entity: self.player,
                input,
            });
            self.uplink.send(now, (self.player, input));
        }

        for (entity, input) in self.uplink.deliver(now) {
            self.server.apply_input(entity, &input);
        }
        self.server.tick(now, TICK_MS);
        for message in self.server.snapshot() {
            self.downlink.send(now, message);
        }

        for (entity, state) in self.downlink.deliver(now) {
            self.inbox.push(entity, state);
            self.states_delivered += 1;
        }
        self.session.drain_inbox(&self.inbox);
        self.session.update();

        self.clock.advance(u64::from(TICK_MS));
    }

    #[must_use]
    pub fn report(&self) -> SimReport {
        let prediction_gap = match (self.session.prediction(), self.server.state(self.player)) {
            (Some(engine), Some(truth)) => engine.predicted().position.distance(truth.position),
            _ => 0.0,
        };
        let remote_gap = match (self.session.world().shown(self.bot), self.server.state(self.bot)) {
            (Some(shown), Some(truth)) => shown.position.distance(truth.position),
            _ => 0.0,
        };
        SimReport {
            ticks: self.ticks,
            inputs_sent: self.uplink.sent(),
            inputs_lost: self.uplink.dropped(),
            states_delivered: self.states_delivered,
            states_lost: self.downlink.dropped(),
            pending_inputs: self
                .session
                .prediction()
                .map_or(0, |engine| engine.pending().len()),
            messages_in_flight: self.uplink.in_flight() + self.downlink.in_flight(),
            prediction_gap,
            remote_gap,
        }
    }
}

/// Walk a square, jumping now and then.
fn scripted_input(sequence: u64, now_ms: u64) -> CharacterMoveInput {
    let movement = match (sequence / 60) % 4 {
        0 => Vec3::Z,
        1 => Vec3::X,
        2 => Vec3::NEG_Z,
        _ => Vec3::NEG_X,
    };
    CharacterMoveInput::idle(sequence, now_ms, TICK_MS)
        .with_movement(movement)
        .with_jump(sequence % 90 == 0)
}

/// Log the outcome of a run.
pub fn log_report(session_id: impl std::fmt::Display, report: &SimReport) {
    info!(
        session = %session_id,
        ticks = report.ticks,
        inputs_sent = report.inputs_sent,
        inputs_lost = report.inputs_lost,
        states_delivered = report.states_delivered,
        states_lost = report.states_lost,
        pending_inputs = report.pending_inputs,
        messages_in_flight = report.messages_in_flight,
        prediction_gap = report.prediction_gap,
        remote_gap = report.remote_gap,
        "simulation finished"
    );
}
