//! Hit resolution
//!
//! Each live needle is tested against the live targets in a fixed priority
//! order and the first contact decides its fate: weak point, body, shield,
//! reflector, then the playfield bounds. A needle resolves at most one
//! outcome per tick.

use glam::Vec2;

use super::collision::{circle_collision, out_of_bounds};
use super::events::{GameEvent, HitKind};
use super::needle::Needle;
use super::session::GameSession;
use super::target::Virus;
use super::tick::Playfield;
use crate::consts::*;

/// Resolve contacts for every live needle, in needle order
pub fn resolve(
    session: &mut GameSession,
    targets: &mut [Virus],
    needles: &mut [Needle],
    playfield: &Playfield,
    events: &mut Vec<GameEvent>,
) {
    for needle in needles.iter_mut() {
        if !needle.is_alive() {
            continue;
        }
        resolve_needle(session, targets, needle, playfield, events);
    }
}

/// Resolve a single needle; returns the outcome tag if anything happened
pub fn resolve_needle(
    session: &mut GameSession,
    targets: &mut [Virus],
    needle: &mut Needle,
    playfield: &Playfield,
    events: &mut Vec<GameEvent>,
) -> Option<HitKind> {
    let pos = needle.pos;

    // 1. Weak points
    let weak_hit = targets.iter().enumerate().find_map(|(t, virus)| {
        if virus.is_dead() {
            return None;
        }
        virus
            .check_weak_point(pos, needle.radius)
            .map(|w| (t, virus.weak_points[w].decoy))
    });
    if let Some((t, decoy)) = weak_hit {
        needle.destroy();
        if decoy {
            session.on_blocked();
            session.request_hit_stop(HIT_STOP_BLOCKED);
            return Some(emit_hit(events, session, HitKind::Blocked, pos, needle, Some(t)));
        }

        let outcome = session.on_weak_point_hit();
        let drops = session.apply_drops();
        let killed = targets[t].apply_damage(1.0);
        session.apply_level_damage(1.0);

        let kind = if killed {
            session.request_hit_stop(HIT_STOP_KILL);
            HitKind::Kill
        } else {
            session.request_hit_stop(HIT_STOP_WEAK_POINT);
            outcome.kind
        };
        emit_hit(events, session, kind, pos, needle, Some(t));
        if outcome.super_granted {
            events.push(GameEvent::SuperNeedleGranted {
                total: session.super_needles(),
            });
        }
        if !drops.is_empty() {
            events.push(GameEvent::Drops { pos, drops });
        }
        return Some(kind);
    }

    // 2. Core
    let body_hit = targets
        .iter()
        .position(|virus| !virus.is_dead() && virus.check_body(pos, needle.radius));
    if let Some(t) = body_hit {
        needle.destroy();
        session.on_body_hit();
        return Some(emit_hit(events, session, HitKind::Body, pos, needle, Some(t)));
    }

    // 3. Shields; super needles pass through
    if !needle.is_super() {
        let shield_hit = targets.iter().enumerate().find_map(|(t, virus)| {
            if virus.is_dead() {
                return None;
            }
            virus.check_shield(pos, needle.radius).map(|s| (t, s))
        });
        if let Some((t, s)) = shield_hit {
            needle.destroy();
            session.on_shield_hit();
            targets[t].hit_shield(s);
            return Some(emit_hit(events, session, HitKind::Shield, pos, needle, Some(t)));
        }
    }

    // 4. Reflectors; neutral for the session
    let reflector_hit = targets.iter().enumerate().find_map(|(t, virus)| {
        if virus.is_dead() {
            return None;
        }
        virus
            .check_reflector(pos, needle.radius)
            .map(|r| (t, virus.reflectors[r].pos, virus.reflectors[r].radius))
    });
    if let Some((t, center, radius)) = reflector_hit {
        let kind = if needle.bounces_remaining > 0 {
            needle.bounces_remaining -= 1;
            let contact = circle_collision(pos, needle.radius, center, radius, -needle.dir);
            needle.bounce(contact.normal);
            // Push out so the next tick doesn't re-hit the same reflector
            needle.pos += contact.normal * (contact.penetration + 1.0);
            HitKind::Bounce
        } else {
            needle.destroy();
            HitKind::Absorbed
        };
        return Some(emit_hit(events, session, kind, pos, needle, Some(t)));
    }

    // 5. Playfield bounds
    if out_of_bounds(pos, playfield.width, playfield.height) {
        let first_report = needle.mark_missed();
        needle.destroy();
        if first_report {
            session.on_miss();
            return Some(emit_hit(events, session, HitKind::Miss, pos, needle, None));
        }
    }

    None
}

fn emit_hit(
    events: &mut Vec<GameEvent>,
    session: &GameSession,
    kind: HitKind,
    pos: Vec2,
    needle: &Needle,
    target: Option<usize>,
) -> HitKind {
    events.push(GameEvent::Hit {
        kind,
        pos,
        needle_id: needle.id,
        target,
        combo: session.combo(),
    });
    kind
}
