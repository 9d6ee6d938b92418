//! The per-connection prediction session.
//!
//! A [`PredictionSession`] owns every piece of mutable prediction state for
//! one client: a record per tracked character, and the prediction engine of
//! the local player. It is driven by [`ClientEvent`]s and one
//! [`PredictionSession::update`] per render tick, and reaches physics, the
//! entity store and time only through its collaborators.
//!
//! ## Character lifecycle
//!
//! ```text
//!   CharacterAdded ──► Remote(history) ──LocalPlayerAssigned──► Local
//!         ▲                 │                                     │
//!         └─(re-add)        └──────── CharacterRemoved ◄──────────┘
//! ```
//!
//! Promotion drops the history and seeds the prediction engine from the
//! newest buffered sample. Demotion is not modelled: if another character is
//! promoted, the previous local character stops consuming states until it is
//! removed and added again.

use std::collections::HashMap;

use charsync_component::Entity;
use charsync_math::Vec3;
use charsync_protocol::{CharacterMoveInput, CharacterState, ClientEvent};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::collaborators::{
    CapsuleShape, CharacterMover, CharacterWorld, Clock, ColliderBackend, ColliderHandle,
};
use crate::config::{ArrivalOrdering, CorrectionMode, PredictionConfig};
use crate::correction::VisualCorrection;
use crate::error::ConfigError;
use crate::history::StateHistory;
use crate::inbox::StateInbox;
use crate::prediction::PredictionEngine;
use crate::sampler;

/// How a tracked character's states are consumed.
#[derive(Debug, Clone)]
pub enum Tracking {
    /// Observed from the network and rendered from its history.
    Remote(StateHistory),
    /// Predicted locally; its states live in the session's engine.
    Local,
}

/// Everything the session keeps for one tracked character.
#[derive(Debug, Clone)]
pub struct CharacterRecord {
    collider: Option<ColliderHandle>,
    tracking: Tracking,
}

impl CharacterRecord {
    #[must_use]
    pub fn collider(&self) -> Option<ColliderHandle> {
        self.collider
    }

    #[must_use]
    pub fn tracking(&self) -> &Tracking {
        &self.tracking
    }

    /// The state history, for remote characters.
    #[must_use]
    pub fn history(&self) -> Option<&StateHistory> {
        match &self.tracking {
            Tracking::Remote(history) => Some(history),
            Tracking::Local => None,
        }
    }
}

#[derive(Debug)]
struct LocalCharacter {
    entity: Entity,
    engine: PredictionEngine,
    correction: Option<VisualCorrection>,
}

/// Client-side prediction, reconciliation and remote interpolation for one
/// connection.
#[derive(Debug)]
pub struct PredictionSession<W, M, P, C> {
    id: Uuid,
    config: PredictionConfig,
    world: W,
    mover: M,
    colliders: P,
    clock: C,
    characters: HashMap<Entity, CharacterRecord>,
    local: Option<LocalCharacter>,
}

impl<W, M, P, C> PredictionSession<W, M, P, C>
where
    W: CharacterWorld,
    M: CharacterMover,
    P: ColliderBackend,
    C: Clock,
{
    /// Create a session.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn new(
        config: PredictionConfig,
        world: W,
        mover: M,
        colliders: P,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let id = Uuid::new_v4();
        info!(
            session = %id,
            history_capacity = config.history_capacity,
            render_delay_ms = config.render_delay_ms,
            "prediction session created"
        );
        Ok(Self {
            id,
            config,
            world,
            mover,
            colliders,
            clock,
            characters: HashMap::new(),
            local: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    #[must_use]
    pub fn colliders(&self) -> &P {
        &self.colliders
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The locally controlled character, if one has been assigned.
    #[must_use]
    pub fn local_player(&self) -> Option<Entity> {
        self.local.as_ref().map(|local| local.entity)
    }

    /// The local player's prediction engine.
    #[must_use]
    pub fn prediction(&self) -> Option<&PredictionEngine> {
        self.local.as_ref().map(|local| &local.engine)
    }

    #[must_use]
    pub fn record(&self, entity: Entity) -> Option<&CharacterRecord> {
        self.characters.get(&entity)
    }

    #[must_use]
    pub fn history(&self, entity: Entity) -> Option<&StateHistory> {
        self.record(entity).and_then(CharacterRecord::history)
    }

    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.characters.len()
    }

    fn is_local(&self, entity: Entity) -> bool {
        self.local_player() == Some(entity)
    }

    /// Dispatch one event.
    pub fn handle(&mut self, event: ClientEvent) {
        trace!(entity = %event.entity(), "client event");
        match event {
            ClientEvent::CharacterAdded { entity } => self.on_character_added(entity),
            ClientEvent::CharacterRemoved { entity } => self.on_character_removed(entity),
            ClientEvent::LocalPlayerAssigned { entity } => self.on_local_player_assigned(entity),
            ClientEvent::StateReceived { entity, state } => self.on_state_received(entity, state),
            ClientEvent::InputIssued { entity, input } => self.on_input(entity, input),
        }
    }

    /// Start tracking a character: create its collider and a history seeded
    /// with its current location.
    ///
    /// Entities without both a location and movement parameters are ignored.
    /// Re-adding a tracked character replaces its collider; a remote
    /// character also gets a fresh history.
    pub fn on_character_added(&mut self, entity: Entity) {
        let (Some(location), Some(movement)) =
            (self.world.location(entity), self.world.movement(entity))
        else {
            debug!(%entity, "entity lacks location or movement, not tracking");
            return;
        };

        let was_local = self.is_local(entity);
        if let Some(previous) = self.characters.remove(&entity) {
            debug!(%entity, "character re-added, replacing record");
            self.release_collider(entity, previous.collider);
        }

        let shape = CapsuleShape::for_character(&movement, &location);
        let collider = self.colliders.create_collider(
            entity,
            location.position,
            shape,
            movement.collision_group,
            movement.collides_with,
        );
        if collider.is_none() {
            warn!(%entity, "physics refused character collider");
        }

        let tracking = if was_local {
            Tracking::Local
        } else {
            let initial = CharacterState::initial(&location, self.clock.now_ms());
            Tracking::Remote(StateHistory::seeded(self.config.history_capacity, initial))
        };
        self.characters
            .insert(entity, CharacterRecord { collider, tracking });
        debug!(%entity, local = was_local, "tracking character");
    }

    /// Promote a character to the locally predicted one.
    ///
    /// The history is dropped and the prediction engine is seeded from its
    /// newest sample, or from the current location if there is none. An
    /// untracked character is added first.
    pub fn on_local_player_assigned(&mut self, entity: Entity) {
        if self.is_local(entity) {
            return;
        }
        if !self.characters.contains_key(&entity) {
            self.on_character_added(entity);
        }

        let buffered = self
            .history(entity)
            .and_then(StateHistory::latest)
            .copied();
        let seed = buffered.or_else(|| {
            self.world
                .location(entity)
                .map(|location| CharacterState::initial(&location, self.clock.now_ms()))
        });
        let (Some(seed), Some(record)) = (seed, self.characters.get_mut(&entity)) else {
            warn!(%entity, "cannot promote an entity that is not a character");
            return;
        };
        record.tracking = Tracking::Local;

        if let Some(previous) = self.local.take() {
            warn!(
                previous = %previous.entity,
                %entity,
                "local player replaced, previous character no longer consumes states"
            );
        }
        self.local = Some(LocalCharacter {
            entity,
            engine: PredictionEngine::new(seed, self.config.max_pending_inputs),
            correction: None,
        });
        info!(
            session = %self.id,
            %entity,
            seeded_from_history = buffered.is_some(),
            "local player assigned"
        );
    }

    /// Stop tracking a character and release its collider.
    pub fn on_character_removed(&mut self, entity: Entity) {
        let Some(record) = self.characters.remove(&entity) else {
            debug!(%entity, "removal of untracked entity ignored");
            return;
        };
        self.release_collider(entity, record.collider);
        if self.is_local(entity) {
            self.local = None;
            info!(session = %self.id, %entity, "local player removed");
        }
        debug!(%entity, "character untracked");
    }

    fn release_collider(&mut self, entity: Entity, collider: Option<ColliderHandle>) {
        match collider {
            Some(handle) => self.colliders.remove_collider(handle),
            None => trace!(%entity, "no collider to release"),
        }
    }

    /// Consume a state from the server.
    ///
    /// The local player's state triggers reconciliation. A remote character's
    /// state is buffered. States for anything else are dropped.
    pub fn on_state_received(&mut self, entity: Entity, state: CharacterState) {
        if let Some(local) = self.local.as_mut()
            && local.entity == entity
        {
            let report = local.engine.reconcile(entity, state, &self.mover);
            let shown = match self.config.correction {
                CorrectionMode::Snap => report.predicted,
                CorrectionMode::Smooth { blend_ms } => {
                    let now = self.clock.now_ms();
                    let error = report.previous_predicted.position - report.predicted.position;
                    if error != Vec3::ZERO {
                        local.correction = Some(match local.correction {
                            Some(active) => active.retarget(error, now),
                            None => VisualCorrection::start(error, now, blend_ms),
                        });
                    }
                    match local.correction {
                        Some(correction) => correction.apply(&report.predicted, now),
                        None => report.predicted,
                    }
                }
            };
            self.world.apply_state(entity, &shown);

            let divergence = report.divergence();
            if divergence > 0.0 {
                debug!(
                    %entity,
                    sequence = state.sequence,
                    divergence,
                    replayed = report.replayed,
                    "prediction corrected"
                );
            }
            return;
        }

        match self.characters.get_mut(&entity).map(|record| &mut record.tracking) {
            Some(Tracking::Remote(history)) => {
                if self.config.ordering == ArrivalOrdering::DropStale && history.is_stale(&state) {
                    debug!(
                        %entity,
                        timestamp_ms = state.timestamp_ms,
                        "stale remote state dropped"
                    );
                    return;
                }
                history.push(state);
            }
            Some(Tracking::Local) => {
                debug!(%entity, "state for replaced local player ignored");
            }
            None => {
                debug!(%entity, "state for untracked entity ignored");
            }
        }
    }

    /// Apply a local input immediately and queue it for replay.
    ///
    /// Inputs for anything other than the local player are dropped.
    pub fn on_input(&mut self, entity: Entity, input: CharacterMoveInput) {
        let Some(local) = self.local.as_mut().filter(|local| local.entity == entity) else {
            debug!(%entity, sequence = input.sequence, "input for non-local entity ignored");
            return;
        };
        let predicted = local.engine.apply_input(entity, input, &self.mover);
        let shown = match local.correction {
            Some(correction) => correction.apply(&predicted, self.clock.now_ms()),
            None => predicted,
        };
        self.world.apply_state(entity, &shown);
    }

    /// Hand every state waiting in `inbox` to the session. Returns how many
    /// were consumed.
    pub fn drain_inbox(&mut self, inbox: &StateInbox) -> usize {
        let drained = inbox.drain();
        let count = drained.len();
        for (entity, state) in drained {
            self.on_state_received(entity, state);
        }
        count
    }

    /// Per render tick: show every remote character at the delayed render
    /// time and advance the local player's visual correction.
    ///
    /// Returns the number of remote characters updated.
    pub fn update(&mut self) -> usize {
        let now = self.clock.now_ms();
        let render_time = sampler::render_time(now, self.config.render_delay_ms);

        let mut updated = 0;
        for (entity, record) in &self.characters {
            if let Tracking::Remote(history) = &record.tracking
                && let Some(sample) = sampler::sample(history, render_time)
            {
                self.world.apply_state(*entity, sample.state());
                updated += 1;
            }
        }

        if let Some(local) = self.local.as_mut()
            && let Some(correction) = local.correction
        {
            let shown = correction.apply(local.engine.predicted(), now);
            self.world.apply_state(local.entity, &shown);
            if correction.is_complete(now) {
                local.correction = None;
            }
        }

        trace!(render_time, updated, "remote characters sampled");
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::ManualClock;
    use crate::test_support::{CountingColliders, LinearMover, RecordingWorld, input, state_at};

    type TestSession =
        PredictionSession<RecordingWorld, LinearMover, CountingColliders, ManualClock>;

    const NOW: u64 = 10_000;
    const REMOTE: Entity = Entity(1);
    const PLAYER: Entity = Entity(2);

    fn session_with(config: PredictionConfig, colliders: CountingColliders) -> TestSession {
        let mut world = RecordingWorld::default();
        world.spawn_character(REMOTE, Vec3::new(5.0, 0.0, 5.0));
        world.spawn_character(PLAYER, Vec3::ZERO);
        PredictionSession::new(
            config,
            world,
            LinearMover,
            colliders,
            ManualClock::starting_at(NOW),
        )
        .unwrap()
    }

    fn session() -> TestSession {
        session_with(PredictionConfig::default(), CountingColliders::default())
    }

    fn with_local_player(mut session: TestSession) -> TestSession {
        session.handle(ClientEvent::CharacterAdded { entity: PLAYER });
        session.handle(ClientEvent::LocalPlayerAssigned { entity: PLAYER });
        session
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = PredictionSession::new(
            PredictionConfig::default().with_history_capacity(0),
            RecordingWorld::default(),
            LinearMover,
            CountingColliders::default(),
            ManualClock::default(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroHistoryCapacity);
    }

    #[test]
    fn test_character_added_seeds_history_and_collider() {
        let mut session = session();
        session.handle(ClientEvent::CharacterAdded { entity: REMOTE });

        let history = session.history(REMOTE).unwrap();
        assert_eq!(history.len(), 1);
        let seed = history.latest().unwrap();
        assert_eq!(seed.position, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(seed.velocity, Vec3::ZERO);
        assert_eq!(seed.sequence, 0);
        assert_eq!(seed.timestamp_ms, NOW);

        assert!(session.record(REMOTE).unwrap().collider().is_some());
        assert_eq!(session.colliders().live.len(), 1);
    }

    #[test]
    fn test_entity_without_location_is_not_tracked() {
        let mut session = session();
        let stranger = Entity(99);
        session.on_character_added(stranger);
        assert!(session.record(stranger).is_none());
        assert!(session.colliders().live.is_empty());
    }

    #[test]
    fn test_re_add_replaces_collider() {
        let mut session = session();
        session.on_character_added(REMOTE);
        let first = session.record(REMOTE).unwrap().collider().unwrap();
        session.on_character_added(REMOTE);
        let second = session.record(REMOTE).unwrap().collider().unwrap();
        assert_ne!(first, second);
        assert_eq!(session.colliders().removed, vec![first]);
        assert_eq!(session.colliders().live.len(), 1);
    }

    #[test]
    fn test_remote_states_are_buffered_then_interpolated() {
        let mut session = session();
        session.on_character_added(REMOTE);
        session.on_state_received(REMOTE, state_at(0, NOW + 100, Vec3::new(0.0, 0.0, 0.0)));
        session.on_state_received(REMOTE, state_at(0, NOW + 200, Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(session.history(REMOTE).unwrap().len(), 3);

        // Render time = NOW + 250 - 100 = NOW + 150, halfway between samples.
        session.clock().set(NOW + 250);
        assert_eq!(session.update(), 1);
        let shown = session.world().last_applied(REMOTE).unwrap();
        assert!(shown.position.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_update_extrapolates_when_no_newer_sample() {
        let mut session = session();
        session.on_character_added(REMOTE);
        let mut newest = state_at(0, NOW + 100, Vec3::ZERO);
        newest.velocity = Vec3::new(0.0, 0.0, 2.0);
        session.on_state_received(REMOTE, newest);

        session.clock().set(NOW + 700);
        session.update();
        let shown = session.world().last_applied(REMOTE).unwrap();
        assert!(shown.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));
    }

    #[test]
    fn test_update_holds_pose_before_first_sample() {
        let mut session = session();
        session.on_character_added(REMOTE);
        // Seed is at NOW; render time NOW - 100 precedes it.
        assert_eq!(session.update(), 0);
        assert_eq!(session.world().applied_count(REMOTE), 0);
    }

    #[test]
    fn test_promotion_seeds_from_latest_sample() {
        let mut session = session();
        session.on_character_added(PLAYER);
        let latest = state_at(0, NOW + 50, Vec3::new(3.0, 1.0, 0.0));
        session.on_state_received(PLAYER, latest);

        session.handle(ClientEvent::LocalPlayerAssigned { entity: PLAYER });

        assert_eq!(session.local_player(), Some(PLAYER));
        assert!(session.history(PLAYER).is_none());
        assert!(matches!(
            session.record(PLAYER).unwrap().tracking(),
            Tracking::Local
        ));
        let engine = session.prediction().unwrap();
        assert_eq!(engine.predicted(), &latest);
        assert_eq!(engine.authoritative(), &latest);
        // The collider survives promotion.
        assert!(session.record(PLAYER).unwrap().collider().is_some());
    }

    #[test]
    fn test_promotion_of_untracked_character_tracks_it_first() {
        let mut session = session();
        session.on_local_player_assigned(PLAYER);
        assert_eq!(session.local_player(), Some(PLAYER));
        assert_eq!(session.colliders().live.len(), 1);
        let engine = session.prediction().unwrap();
        assert_eq!(engine.predicted().position, Vec3::ZERO);
    }

    #[test]
    fn test_repromotion_seeds_from_world_location() {
        let mut session = with_local_player(session());
        session.on_input(PLAYER, input(1, Vec3::new(10.0, 0.0, 0.0)));
        session.on_local_player_assigned(REMOTE);
        assert_eq!(session.local_player(), Some(REMOTE));

        // The old local character has no history, so its location seeds it.
        session.world_mut().locations.insert(
            PLAYER,
            charsync_math::Transform3D::from_position(Vec3::new(0.0, 0.0, 7.0)),
        );
        session.on_local_player_assigned(PLAYER);

        assert_eq!(session.local_player(), Some(PLAYER));
        let engine = session.prediction().unwrap();
        assert_eq!(engine.predicted().position, Vec3::new(0.0, 0.0, 7.0));
        assert_eq!(engine.authoritative().position, Vec3::new(0.0, 0.0, 7.0));
        assert_eq!(engine.predicted().sequence, 0);
        assert_eq!(engine.predicted().timestamp_ms, NOW);
        assert!(engine.pending().is_empty());

        // States for the re-promoted player reconcile again.
        session.on_state_received(PLAYER, state_at(1, NOW + 100, Vec3::X));
        let engine = session.prediction().unwrap();
        assert_eq!(engine.predicted().position, Vec3::X);
    }

    #[test]
    fn test_promotion_of_non_character_is_ignored() {
        let mut session = session();
        session.on_local_player_assigned(Entity(42));
        assert_eq!(session.local_player(), None);
    }

    #[test]
    fn test_local_player_not_sampled() {
        let mut session = with_local_player(session());
        session.clock().set(NOW + 1_000);
        assert_eq!(session.update(), 0);
        assert_eq!(session.world().applied_count(PLAYER), 0);
    }

    #[test]
    fn test_input_applies_immediately() {
        let mut session = with_local_player(session());
        session.handle(ClientEvent::InputIssued {
            entity: PLAYER,
            input: input(1, Vec3::new(10.0, 0.0, 0.0)),
        });
        let shown = session.world().last_applied(PLAYER).unwrap();
        assert!(shown.position.abs_diff_eq(Vec3::X, 1e-6));
        assert_eq!(session.prediction().unwrap().pending().len(), 1);
    }

    #[test]
    fn test_input_for_remote_entity_ignored() {
        let mut session = with_local_player(session());
        session.on_character_added(REMOTE);
        session.on_input(REMOTE, input(1, Vec3::X));
        assert_eq!(session.world().applied_count(REMOTE), 0);
        assert!(session.prediction().unwrap().pending().is_empty());
    }

    #[test]
    fn test_end_to_end_reconciliation() {
        let mut session = with_local_player(session());
        let inputs = [
            input(1, Vec3::new(10.0, 0.0, 0.0)),
            input(2, Vec3::new(0.0, 0.0, 10.0)),
            input(3, Vec3::new(-10.0, 0.0, 0.0)),
        ];
        for i in inputs {
            session.handle(ClientEvent::InputIssued {
                entity: PLAYER,
                input: i,
            });
        }

        let q2 = state_at(2, NOW + 200, Vec3::new(1.0, 0.0, 2.0));
        session.handle(ClientEvent::StateReceived {
            entity: PLAYER,
            state: q2,
        });

        let expected = LinearMover.step(&q2, &inputs[2], PLAYER);
        let engine = session.prediction().unwrap();
        assert_eq!(engine.predicted(), &expected);
        assert_eq!(engine.authoritative(), &q2);
        let pending: Vec<u64> = engine.pending().iter().map(|i| i.sequence).collect();
        assert_eq!(pending, vec![3]);
        // Snap correction: the reconciled state is shown as-is.
        assert_eq!(session.world().last_applied(PLAYER), Some(expected));
    }

    #[test]
    fn test_state_for_unknown_entity_ignored() {
        let mut session = session();
        session.on_state_received(Entity(77), state_at(0, NOW, Vec3::ZERO));
        assert_eq!(session.tracked_count(), 0);
        assert!(session.world().applied.is_empty());
    }

    #[test]
    fn test_state_after_removal_ignored() {
        let mut session = session();
        session.on_character_added(REMOTE);
        session.handle(ClientEvent::CharacterRemoved { entity: REMOTE });
        session.on_state_received(REMOTE, state_at(0, NOW, Vec3::ZERO));
        assert!(session.record(REMOTE).is_none());
        assert!(session.colliders().live.is_empty());
    }

    #[test]
    fn test_removal_without_collider_is_noop() {
        let mut session =
            session_with(PredictionConfig::default(), CountingColliders::refusing());
        session.on_character_added(REMOTE);
        assert!(session.record(REMOTE).unwrap().collider().is_none());
        session.on_character_removed(REMOTE);
        assert!(session.colliders().removed.is_empty());
        // Removing twice is also harmless.
        session.on_character_removed(REMOTE);
    }

    #[test]
    fn test_removing_local_player_clears_prediction() {
        let mut session = with_local_player(session());
        session.on_character_removed(PLAYER);
        assert_eq!(session.local_player(), None);
        assert!(session.prediction().is_none());
        assert!(session.colliders().live.is_empty());
    }

    #[test]
    fn test_replaced_local_player_ignores_states() {
        let mut session = with_local_player(session());
        session.on_local_player_assigned(REMOTE);
        assert_eq!(session.local_player(), Some(REMOTE));
        let before = session.world().applied.len();
        session.on_state_received(PLAYER, state_at(5, NOW, Vec3::ONE));
        assert_eq!(session.world().applied.len(), before);
    }

    #[test]
    fn test_drop_stale_ordering() {
        let config = PredictionConfig::default().with_ordering(ArrivalOrdering::DropStale);
        let mut session = session_with(config, CountingColliders::default());
        session.on_character_added(REMOTE);
        session.on_state_received(REMOTE, state_at(0, NOW + 200, Vec3::ZERO));
        session.on_state_received(REMOTE, state_at(0, NOW + 100, Vec3::ZERO));
        let kept: Vec<u64> = session
            .history(REMOTE)
            .unwrap()
            .iter()
            .map(|s| s.timestamp_ms)
            .collect();
        assert_eq!(kept, vec![NOW, NOW + 200]);
    }

    #[test]
    fn test_accept_all_ordering_keeps_out_of_order_states() {
        let mut session = session();
        session.on_character_added(REMOTE);
        session.on_state_received(REMOTE, state_at(0, NOW + 200, Vec3::ZERO));
        session.on_state_received(REMOTE, state_at(0, NOW + 100, Vec3::ZERO));
        assert_eq!(session.history(REMOTE).unwrap().len(), 3);
    }

    #[test]
    fn test_smooth_correction_converges_to_prediction() {
        let config = PredictionConfig::default()
            .with_correction(CorrectionMode::Smooth { blend_ms: 100 });
        let mut session = with_local_player(session_with(config, CountingColliders::default()));
        session.on_input(PLAYER, input(1, Vec3::new(10.0, 0.0, 0.0)));

        // Server puts the player 2 units further along x.
        let server = state_at(1, NOW + 100, Vec3::new(3.0, 0.0, 0.0));
        session.on_state_received(PLAYER, server);

        let shown = session.world().last_applied(PLAYER).unwrap();
        assert!(shown.position.abs_diff_eq(Vec3::X, 1e-6));
        assert_eq!(session.prediction().unwrap().predicted(), &server);

        session.clock().advance(50);
        session.update();
        let halfway = session.world().last_applied(PLAYER).unwrap();
        assert!(halfway.position.x > 1.0 && halfway.position.x < 3.0);

        session.clock().advance(50);
        session.update();
        assert_eq!(session.world().last_applied(PLAYER), Some(server));

        // Finished corrections stop re-applying the local state.
        let count = session.world().applied_count(PLAYER);
        session.update();
        assert_eq!(session.world().applied_count(PLAYER), count);
    }

    #[test]
    fn test_drain_inbox_routes_states() {
        let mut session = with_local_player(session());
        session.on_character_added(REMOTE);
        session.on_input(PLAYER, input(1, Vec3::X));

        let inbox = StateInbox::new();
        inbox.push(REMOTE, state_at(0, NOW + 10, Vec3::ZERO));
        inbox.push(PLAYER, state_at(1, NOW + 100, Vec3::ZERO));
        inbox.push(Entity(500), state_at(0, NOW, Vec3::ZERO));

        assert_eq!(session.drain_inbox(&inbox), 3);
        assert_eq!(session.history(REMOTE).unwrap().len(), 2);
        assert!(session.prediction().unwrap().pending().is_empty());
        assert!(inbox.is_empty());
    }
}
