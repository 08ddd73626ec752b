//! Fixed timestep simulation tick
//!
//! Update order is fixed: player, guards, loot, then capture and extraction
//! checks. Guards only read the player, and removals are applied after the
//! loot pass has finished iterating.

use glam::Vec2;

use super::guard::{GuardState, Perception};
use super::state::{HeistPhase, HeistState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent, each axis in [-1, 1]
    pub move_dir: Vec2,
    /// Crouch toggle (edge-triggered)
    pub toggle_crouch: bool,
    /// Run toggle (edge-triggered)
    pub toggle_run: bool,
    /// Held while working on nearby loot
    pub steal: bool,
}

/// Advance the heist by one fixed timestep
pub fn tick(state: &mut HeistState, input: &TickInput, dt: f32) {
    if state.phase != HeistPhase::Playing {
        return;
    }
    state.time_ticks += 1;

    update_player(state, input);
    update_guards(state, dt);
    update_loot(state, input.steal, dt);
    check_outcome(state);
}

fn update_player(state: &mut HeistState, input: &TickInput) {
    if input.toggle_crouch {
        state.player.toggle_crouch();
    }
    if input.toggle_run {
        state.player.toggle_run();
    }
    state.player.steer(input.move_dir);
    state.player.update(&state.level.obstacles);
}

fn update_guards(state: &mut HeistState, dt: f32) {
    let hidden = state.player_hidden();
    let player = (!hidden).then_some(&state.player);
    let los_step = state.tuning.heist.los_step;

    for guard in &mut state.guards {
        let perception =
            guard.update(dt, player, &state.level.obstacles, los_step, &mut state.rng);
        if perception == Perception::Heard {
            log::debug!("tick {}: guard {} heard a noise", state.time_ticks, guard.id);
        }
    }
}

fn update_loot(state: &mut HeistState, steal: bool, dt: f32) {
    let reach = state.tuning.heist.steal_reach;
    let player_pos = state.player.pos();

    // Keep working only while the key is held and the item is still in reach
    let current = state.stealing.filter(|id| {
        state
            .loot
            .get(*id)
            .is_some_and(|item| item.pos.distance(player_pos) <= reach)
    });
    if !(steal && current.is_some()) {
        if let Some(id) = state.stealing.take() {
            if let Some(item) = state.loot.get_mut(id) {
                item.stop_stealing();
            }
            state.player.stop_looting();
        }
    }

    if steal && state.stealing.is_none() {
        if let Some(id) = state.loot.nearest(player_pos, reach).map(|item| item.id) {
            if let Some(item) = state.loot.get_mut(id) {
                item.start_stealing();
            }
            state.stealing = Some(id);
            state.player.start_looting();
        }
    }

    let finished = state.loot.update(dt);
    for id in finished {
        state.score += u64::from(state.loot.collect(id));
        if state.stealing == Some(id) {
            state.stealing = None;
            state.player.stop_looting();
        }
    }
}

fn check_outcome(state: &mut HeistState) {
    let hidden = state.player_hidden();
    let caught_by = state
        .guards
        .iter()
        .find(|g| g.state == GuardState::Alerted && state.touches_player(*g))
        .map(|g| g.id);

    if let Some(id) = caught_by.filter(|_| !hidden) {
        state.phase = HeistPhase::Caught;
        log::info!(
            "Caught by guard {} after {} ticks, {} stolen",
            id,
            state.time_ticks,
            state.loot.collected_value
        );
        return;
    }

    let at_exit = state.player.pos().distance(state.extraction_point())
        <= state.tuning.heist.extraction_radius;
    if at_exit && state.loot.collected_value > 0 {
        state.phase = HeistPhase::Escaped;
        log::info!(
            "Escaped after {} ticks with {} ({:.0}% of the vault)",
            state.time_ticks,
            state.loot.collected_value,
            state.loot.collection_progress()
        );
    }
}
