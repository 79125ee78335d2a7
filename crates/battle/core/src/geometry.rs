//! Targeting and movement geometry.

use crate::state::{Arena, Obstacle, Participant, ParticipantId, Position};

/// Nearest candidate by Euclidean distance that is alive, not dying and not
/// excluded. Ties keep the candidates' input order.
pub fn find_closest_target<'a>(
    from: &Participant,
    candidates: impl IntoIterator<Item = &'a Participant>,
    exclude: &[ParticipantId],
) -> Option<&'a Participant> {
    let mut best: Option<(&'a Participant, f32)> = None;
    for candidate in candidates {
        if !candidate.is_alive() || exclude.contains(&candidate.id) {
            continue;
        }
        let distance = from.position.distance_to(candidate.position);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(participant, _)| participant)
}

/// Whether the segment `from -> to` avoids every obstacle.
///
/// An arena without obstacles always has line of sight.
pub fn has_line_of_sight(arena: &Arena, from: Position, to: Position) -> bool {
    arena
        .obstacles
        .iter()
        .all(|obstacle| !segment_hits(obstacle, from, to))
}

/// Slab test of a segment against an axis-aligned rectangle.
fn segment_hits(obstacle: &Obstacle, from: Position, to: Position) -> bool {
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;
    let axes = [
        (from.x, to.x - from.x, obstacle.min.x, obstacle.max.x),
        (from.y, to.y - from.y, obstacle.min.y, obstacle.max.y),
    ];

    for (origin, delta, lo, hi) in axes {
        if delta.abs() < f32::EPSILON {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let t1 = (lo - origin) / delta;
        let t2 = (hi - origin) / delta;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// Step toward `to`, scaled by `speed * tick_seconds` and never closer than
/// `stop_distance`. Returns `(dx, dy)`.
pub fn movement_vector(
    from: Position,
    to: Position,
    speed: f32,
    tick_seconds: f32,
    stop_distance: f32,
) -> (f32, f32) {
    let distance = from.distance_to(to);
    let remaining = distance - stop_distance.max(0.0);
    if remaining <= 0.0 || distance <= f32::EPSILON || speed <= 0.0 {
        return (0.0, 0.0);
    }
    let step = (speed * tick_seconds).min(remaining);
    ((to.x - from.x) / distance * step, (to.y - from.y) / distance * step)
}

/// Full-speed step directly away from `threat`. Coincident positions flee
/// along +x.
pub fn flee_vector(from: Position, threat: Position, speed: f32, tick_seconds: f32) -> (f32, f32) {
    let step = speed.max(0.0) * tick_seconds;
    let distance = from.distance_to(threat);
    if distance <= f32::EPSILON {
        return (step, 0.0);
    }
    ((from.x - threat.x) / distance * step, (from.y - threat.y) / distance * step)
}

pub fn clamp_to_arena(arena: &Arena, position: Position) -> Position {
    Position::new(
        position.x.clamp(0.0, arena.width.max(0.0)),
        position.y.clamp(0.0, arena.height.max(0.0)),
    )
}

/// Point `distance` away from `threat` on the ray through `from`, kept
/// inside the arena.
pub fn reposition_point(
    arena: &Arena,
    from: Position,
    threat: Position,
    distance: f32,
) -> Position {
    let gap = from.distance_to(threat);
    let (ux, uy) = if gap <= f32::EPSILON {
        (1.0, 0.0)
    } else {
        ((from.x - threat.x) / gap, (from.y - threat.y) / gap)
    };
    clamp_to_arena(arena, threat.offset(ux * distance, uy * distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CombatStats;

    fn unit(name: &str, x: f32, y: f32, id: u32) -> Participant {
        let mut p = Participant::enemy(name, CombatStats { max_hp: 10.0, ..Default::default() })
            .at(x, y);
        p.id = ParticipantId(id);
        p
    }

    #[test]
    fn closest_skips_dead_dying_and_excluded() {
        let me = unit("me", 0.0, 0.0, 1);
        let mut dead = unit("dead", 1.0, 0.0, 2);
        dead.current_hp = 0.0;
        let mut dying = unit("dying", 2.0, 0.0, 3);
        dying.dying_ticks_remaining = Some(2);
        let excluded = unit("excluded", 3.0, 0.0, 4);
        let far = unit("far", 10.0, 0.0, 5);

        let candidates = [dead, dying, excluded, far];
        let found = find_closest_target(&me, &candidates, &[ParticipantId(4)]);
        assert_eq!(found.map(|p| p.id), Some(ParticipantId(5)));
    }

    #[test]
    fn closest_ties_keep_input_order() {
        let me = unit("me", 0.0, 0.0, 1);
        let candidates = [unit("a", 0.0, 5.0, 2), unit("b", 5.0, 0.0, 3)];
        let found = find_closest_target(&me, &candidates, &[]);
        assert_eq!(found.map(|p| p.id), Some(ParticipantId(2)));
    }

    #[test]
    fn closest_of_nothing_is_none() {
        let me = unit("me", 0.0, 0.0, 1);
        assert!(find_closest_target(&me, std::iter::empty(), &[]).is_none());
    }

    #[test]
    fn line_of_sight_without_obstacles_is_always_clear() {
        let arena = Arena::new(100.0, 100.0);
        assert!(has_line_of_sight(&arena, Position::new(0.0, 0.0), Position::new(100.0, 100.0)));
    }

    #[test]
    fn wall_blocks_line_of_sight() {
        let arena = Arena::new(100.0, 100.0).with_obstacle(Obstacle::new(40.0, 0.0, 60.0, 80.0));
        assert!(!has_line_of_sight(&arena, Position::new(10.0, 10.0), Position::new(90.0, 10.0)));
        assert!(has_line_of_sight(&arena, Position::new(10.0, 90.0), Position::new(90.0, 90.0)));
    }

    #[test]
    fn movement_never_overshoots_stop_distance() {
        let (dx, dy) = movement_vector(Position::ORIGIN, Position::new(10.0, 0.0), 100.0, 0.1, 4.0);
        assert_eq!((dx, dy), (6.0, 0.0));

        let (dx, dy) = movement_vector(Position::ORIGIN, Position::new(10.0, 0.0), 20.0, 0.1, 4.0);
        assert_eq!((dx, dy), (2.0, 0.0));

        let (dx, dy) = movement_vector(Position::ORIGIN, Position::new(3.0, 0.0), 20.0, 0.1, 4.0);
        assert_eq!((dx, dy), (0.0, 0.0));
    }

    #[test]
    fn flee_moves_away() {
        let (dx, dy) = flee_vector(Position::new(5.0, 5.0), Position::new(5.0, 0.0), 10.0, 0.5);
        assert_eq!((dx, dy), (0.0, 5.0));
    }

    #[test]
    fn reposition_point_stays_in_arena() {
        let arena = Arena::new(50.0, 50.0);
        let point = reposition_point(
            &arena,
            Position::new(45.0, 25.0),
            Position::new(40.0, 25.0),
            30.0,
        );
        assert_eq!(point, Position::new(50.0, 25.0));
    }
}
