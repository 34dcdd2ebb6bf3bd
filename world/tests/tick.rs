use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use scrollmap_core::{
    Action, ActionCell, CellCoord, CellType, Command, Event, Facing, LevelData, LevelId,
    LevelLoadError, MovementKey, PathGeneration, SessionState, StepDelta,
};
use scrollmap_world::{self as world, query, SessionConfig, World};

#[test]
fn held_key_moves_one_cell_per_tick() {
    let mut world = loaded_world(level(&[".....", ".....", "....."], Vec::new()), (2, 1));

    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });
    let events = step(&mut world, Command::Tick);

    assert_eq!(query::player_cell(&world), CellCoord::new(3, 1));
    assert_eq!(
        events,
        vec![
            Event::FacingChanged {
                facing: Facing::Right,
            },
            Event::PlayerMoved {
                from: CellCoord::new(2, 1),
                to: CellCoord::new(3, 1),
                delta: StepDelta::new(1, 0),
                facing: Facing::Right,
                animation: Duration::from_millis(95),
            },
        ]
    );

    let _ = step(&mut world, Command::KeyUp { key: MovementKey::Right });
    let events = step(&mut world, Command::Tick);
    assert_eq!(
        events,
        vec![Event::FacingChanged {
            facing: Facing::Stand,
        }]
    );
    assert_eq!(query::player_cell(&world), CellCoord::new(3, 1));
}

#[test]
fn blocked_steps_never_move_the_player() {
    let mut world = loaded_world(level(&["..#", "..#"], Vec::new()), (1, 0));
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });

    for _ in 0..5 {
        let events = step(&mut world, Command::Tick);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. })));
        assert_eq!(query::player_cell(&world), CellCoord::new(1, 0));
    }

    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Left });
    let _ = step(&mut world, Command::KeyUp { key: MovementKey::Right });
    let _ = step(&mut world, Command::Tick);
    let _ = step(&mut world, Command::Tick);
    assert_eq!(query::player_cell(&world), CellCoord::new(0, 0));
}

#[test]
fn held_key_overrides_pending_path() {
    let mut world = loaded_world(level(&[".....", ".....", "....."], Vec::new()), (2, 1));
    let generation = request_path(&mut world, CellCoord::new(4, 1));
    let _ = step(
        &mut world,
        Command::AssignPath {
            generation,
            path: vec![CellCoord::new(3, 1), CellCoord::new(4, 1)],
        },
    );

    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Down });
    let _ = step(&mut world, Command::Tick);

    assert_eq!(query::player_cell(&world), CellCoord::new(2, 2));
    assert!(query::pending_path(&world).is_empty());

    let _ = step(&mut world, Command::KeyUp { key: MovementKey::Down });
    let _ = step(&mut world, Command::Tick);
    assert_eq!(query::player_cell(&world), CellCoord::new(2, 2));
}

#[test]
fn assigned_path_is_consumed_one_cell_per_tick() {
    let mut world = loaded_world(level(&["...", "...", "..."], Vec::new()), (2, 2));
    let generation = request_path(&mut world, CellCoord::new(0, 2));
    let events = step(
        &mut world,
        Command::AssignPath {
            generation,
            path: vec![CellCoord::new(1, 2), CellCoord::new(0, 2)],
        },
    );
    assert_eq!(
        events,
        vec![Event::PathAssigned {
            generation,
            steps: 2,
        }]
    );

    let _ = step(&mut world, Command::Tick);
    assert_eq!(query::player_cell(&world), CellCoord::new(1, 2));
    assert_eq!(query::pending_path(&world), vec![CellCoord::new(0, 2)]);
    let _ = step(&mut world, Command::Tick);
    assert_eq!(query::player_cell(&world), CellCoord::new(0, 2));
    assert_eq!(query::facing(&world), Facing::Left);
}

#[test]
fn blocked_path_step_drops_the_rest_of_the_path() {
    let mut world = loaded_world(level(&["...", ".#.", "..."], Vec::new()), (1, 0));
    let generation = request_path(&mut world, CellCoord::new(1, 2));
    let _ = step(
        &mut world,
        Command::AssignPath {
            generation,
            path: vec![CellCoord::new(1, 1), CellCoord::new(1, 2)],
        },
    );

    let _ = step(&mut world, Command::Tick);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 0));
    assert!(query::pending_path(&world).is_empty());
}

#[test]
fn stale_path_results_are_discarded() {
    let mut world = loaded_world(level(&[".....", "....."], Vec::new()), (0, 0));
    let first = request_path(&mut world, CellCoord::new(4, 0));
    let second = request_path(&mut world, CellCoord::new(0, 1));
    assert!(second > first);

    let events = step(
        &mut world,
        Command::AssignPath {
            generation: first,
            path: vec![CellCoord::new(1, 0)],
        },
    );
    assert!(events.is_empty());
    assert!(query::pending_path(&world).is_empty());

    let _ = step(
        &mut world,
        Command::AssignPath {
            generation: second,
            path: vec![CellCoord::new(0, 1)],
        },
    );
    assert_eq!(query::pending_path(&world), vec![CellCoord::new(0, 1)]);
}

#[test]
fn invalid_path_requests_keep_the_current_path() {
    let mut world = loaded_world(level(&["..#", "..."], Vec::new()), (0, 0));
    let generation = request_path(&mut world, CellCoord::new(0, 1));
    let _ = step(
        &mut world,
        Command::AssignPath {
            generation,
            path: vec![CellCoord::new(0, 1)],
        },
    );

    let blocked = step(
        &mut world,
        Command::RequestPath {
            destination: CellCoord::new(2, 0),
        },
    );
    let same_cell = step(
        &mut world,
        Command::RequestPath {
            destination: CellCoord::new(0, 0),
        },
    );

    assert!(blocked.is_empty());
    assert!(same_cell.is_empty());
    assert_eq!(query::path_generation(&world), generation);
    assert_eq!(query::pending_path(&world), vec![CellCoord::new(0, 1)]);
}

#[test]
fn gold_items_pay_out_once_per_level() {
    let gold = ActionCell {
        x: 3,
        y: 3,
        action: Action::Item {
            image: Some("gold.png".to_owned()),
            add_gold: Some(10),
            add_to_inventory: None,
        },
    };
    let mut world = loaded_world(open_level(5, 5, vec![gold]), (2, 3));

    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });
    let events = step(&mut world, Command::Tick);
    assert_eq!(query::gold(&world), 10);
    assert!(events.contains(&Event::ItemCollected {
        cell: CellCoord::new(3, 3),
        image: Some("gold.png".to_owned()),
        gold: 10,
        total_gold: 10,
    }));
    let moved = events
        .iter()
        .position(|event| matches!(event, Event::PlayerMoved { .. }));
    let collected = events
        .iter()
        .position(|event| matches!(event, Event::ItemCollected { .. }));
    assert!(moved < collected, "position must commit before the action fires");

    let _ = step(&mut world, Command::KeyUp { key: MovementKey::Right });
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Left });
    let _ = step(&mut world, Command::Tick);
    let _ = step(&mut world, Command::KeyUp { key: MovementKey::Left });
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });
    let events = step(&mut world, Command::Tick);

    assert_eq!(query::player_cell(&world), CellCoord::new(3, 3));
    assert_eq!(query::gold(&world), 10);
    assert!(query::action_cells(&world).is_empty());
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ItemCollected { .. })));
}

#[test]
fn new_level_cells_transition_to_the_target_level() {
    let portal = ActionCell {
        x: 4,
        y: 4,
        action: Action::NewLevel {
            level: LevelId::new(2),
            start_x: Some(1),
            start_y: Some(1),
        },
    };
    let coin = ActionCell {
        x: 3,
        y: 4,
        action: Action::Item {
            image: None,
            add_gold: Some(7),
            add_to_inventory: None,
        },
    };
    let mut world = loaded_world(open_level(5, 5, vec![coin, portal]), (2, 4));
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });
    let _ = step(&mut world, Command::Tick);
    let generation = request_path(&mut world, CellCoord::new(4, 3));

    let events = step(&mut world, Command::Tick);

    assert_eq!(query::player_cell(&world), CellCoord::new(4, 4));
    assert!(events.ends_with(&[
        Event::StateChanged {
            from: SessionState::Play,
            to: SessionState::Transitioning,
        },
        Event::StateChanged {
            from: SessionState::Transitioning,
            to: SessionState::Init,
        },
        Event::LevelRequested {
            level: LevelId::new(2),
        },
    ]));
    assert_eq!(query::state(&world), SessionState::Init);
    assert!(query::held_keys(&world).is_empty());
    assert!(query::pending_path(&world).is_empty());
    assert_eq!(query::pending_level(&world), Some(LevelId::new(2)));

    // Ticks and input are suspended until the level arrives.
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Left });
    assert!(step(&mut world, Command::Tick).is_empty());
    assert!(step(
        &mut world,
        Command::AssignPath {
            generation,
            path: vec![CellCoord::new(4, 3)],
        },
    )
    .is_empty());

    let events = step(
        &mut world,
        Command::LoadLevel {
            level: LevelId::new(2),
            data: open_level(3, 3, Vec::new()),
        },
    );

    assert_eq!(
        events.last(),
        Some(&Event::StateChanged {
            from: SessionState::Init,
            to: SessionState::Play,
        })
    );
    assert_eq!(query::state(&world), SessionState::Play);
    assert_eq!(query::level_id(&world), Some(LevelId::new(2)));
    assert_eq!(query::player_cell(&world), CellCoord::new(1, 1));
    assert_eq!(query::gold(&world), 7);
    assert!(query::held_keys(&world).is_empty());
}

#[test]
fn new_level_without_start_keeps_position() {
    let portal = ActionCell {
        x: 1,
        y: 0,
        action: Action::NewLevel {
            level: LevelId::new(3),
            start_x: Some(0),
            start_y: None,
        },
    };
    let mut world = loaded_world(open_level(3, 3, vec![portal]), (0, 0));
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });
    let _ = step(&mut world, Command::Tick);

    let _ = step(
        &mut world,
        Command::LoadLevel {
            level: LevelId::new(3),
            data: open_level(3, 3, Vec::new()),
        },
    );

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 0));
}

#[test]
fn input_outside_play_is_ignored() {
    let mut world = World::new();
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Down });
    let _ = step(
        &mut world,
        Command::RequestPath {
            destination: CellCoord::new(1, 1),
        },
    );
    assert!(step(&mut world, Command::Tick).is_empty());

    load(&mut world, LevelId::new(1), open_level(3, 3, Vec::new()), (0, 0));
    let _ = step(&mut world, Command::Tick);

    assert!(query::held_keys(&world).is_empty());
    assert_eq!(query::player_cell(&world), CellCoord::new(0, 0));
}

#[test]
fn malformed_levels_leave_the_session_in_init() {
    let mut world = World::new();
    let _ = step(
        &mut world,
        Command::RequestLevel {
            level: LevelId::new(1),
            start: Some(CellCoord::new(0, 0)),
        },
    );

    let events = step(
        &mut world,
        Command::LoadLevel {
            level: LevelId::new(1),
            data: level(&["...", ".."], Vec::new()),
        },
    );

    assert_eq!(
        events,
        vec![Event::LevelLoadFailed {
            level: LevelId::new(1),
            error: LevelLoadError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            },
        }]
    );
    assert_eq!(query::state(&world), SessionState::Init);
    assert_eq!(query::level_id(&world), None);
}

#[test]
fn unwalkable_start_fails_the_load() {
    let mut world = World::new();
    let _ = step(
        &mut world,
        Command::RequestLevel {
            level: LevelId::new(1),
            start: Some(CellCoord::new(2, 0)),
        },
    );

    let events = step(
        &mut world,
        Command::LoadLevel {
            level: LevelId::new(1),
            data: level(&["..#"], Vec::new()),
        },
    );

    assert_eq!(
        events,
        vec![Event::LevelLoadFailed {
            level: LevelId::new(1),
            error: LevelLoadError::UnwalkableStart {
                cell: CellCoord::new(2, 0),
            },
        }]
    );
    assert_eq!(query::state(&world), SessionState::Init);
}

#[test]
fn loader_failures_are_reported_for_the_pending_level_only() {
    let mut world = World::new();
    let _ = step(
        &mut world,
        Command::RequestLevel {
            level: LevelId::new(4),
            start: None,
        },
    );

    let unrelated = step(
        &mut world,
        Command::LevelLoadFailed {
            level: LevelId::new(9),
            reason: "missing".to_owned(),
        },
    );
    let events = step(
        &mut world,
        Command::LevelLoadFailed {
            level: LevelId::new(4),
            reason: "missing".to_owned(),
        },
    );

    assert!(unrelated.is_empty());
    assert_eq!(
        events,
        vec![Event::LevelLoadFailed {
            level: LevelId::new(4),
            error: LevelLoadError::Unavailable {
                level: LevelId::new(4),
                reason: "missing".to_owned(),
            },
        }]
    );
    assert_eq!(query::pending_level(&world), None);
}

#[test]
fn animation_duration_tracks_tick_period() {
    let config = SessionConfig {
        tick_period: Duration::from_millis(120),
    };
    let mut world = World::with_config(config);
    load(&mut world, LevelId::new(1), open_level(2, 1, Vec::new()), (0, 0));
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });

    let events = step(&mut world, Command::Tick);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::PlayerMoved { animation, .. } if *animation == Duration::from_millis(114)
    )));
}

#[test]
fn queries_expose_the_loaded_level() {
    let coin = ActionCell {
        x: 3,
        y: 0,
        action: Action::Item {
            image: None,
            add_gold: Some(1),
            add_to_inventory: None,
        },
    };
    let mut world = loaded_world(level(&["..#.", "...."], vec![coin]), (0, 1));

    assert_eq!(query::level_name(&world), Some("test"));
    assert_eq!(query::dimensions(&world), Some((4, 2)));
    assert_eq!(query::glyph_at(&world, CellCoord::new(2, 0)), Some('#'));
    assert_eq!(query::glyph_at(&world, CellCoord::new(4, 0)), None);
    assert!(!query::is_walkable(&world, CellCoord::new(2, 0)));
    assert_eq!(query::config(&world), SessionConfig::default());
    let actions = query::action_cells(&world);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].0, CellCoord::new(3, 0));

    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Up });
    let _ = step(&mut world, Command::KeyDown { key: MovementKey::Right });
    assert_eq!(query::input_direction(&world), StepDelta::new(1, -1));
    let _ = step(&mut world, Command::Tick);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 0));
    assert_eq!(query::facing(&world), Facing::Right);
}

#[test]
fn session_replay_is_deterministic() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "session replay diverged");
}

fn replay() -> u64 {
    let coin = ActionCell {
        x: 2,
        y: 2,
        action: Action::Item {
            image: None,
            add_gold: Some(3),
            add_to_inventory: None,
        },
    };
    let mut world = loaded_world(open_level(4, 4, vec![coin]), (0, 0));
    let script = [
        Command::KeyDown {
            key: MovementKey::Right,
        },
        Command::KeyDown {
            key: MovementKey::Down,
        },
        Command::Tick,
        Command::Tick,
        Command::KeyUp {
            key: MovementKey::Right,
        },
        Command::Tick,
        Command::KeyUp {
            key: MovementKey::Down,
        },
        Command::Tick,
    ];

    let mut hasher = DefaultHasher::new();
    for command in script {
        for event in step(&mut world, command) {
            format!("{event:?}").hash(&mut hasher);
        }
    }
    query::player_cell(&world).hash(&mut hasher);
    query::gold(&world).hash(&mut hasher);
    hasher.finish()
}

fn request_path(world: &mut World, destination: CellCoord) -> PathGeneration {
    let events = step(world, Command::RequestPath { destination });
    events
        .iter()
        .find_map(|event| match event {
            Event::PathRequested { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("path request accepted")
}

fn loaded_world(data: LevelData, start: (u32, u32)) -> World {
    let mut world = World::new();
    load(&mut world, LevelId::new(1), data, start);
    world
}

fn load(world: &mut World, level: LevelId, data: LevelData, start: (u32, u32)) {
    let _ = step(
        world,
        Command::RequestLevel {
            level,
            start: Some(CellCoord::new(start.0, start.1)),
        },
    );
    let _ = step(world, Command::LoadLevel { level, data });
    assert_eq!(query::state(world), SessionState::Play);
}

fn step(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn open_level(columns: usize, rows: usize, action_cells: Vec<ActionCell>) -> LevelData {
    let row = ".".repeat(columns);
    let map: Vec<&str> = (0..rows).map(|_| row.as_str()).collect();
    level(&map, action_cells)
}

fn level(map: &[&str], action_cells: Vec<ActionCell>) -> LevelData {
    LevelData {
        level_name: "test".to_owned(),
        map: map.iter().map(|row| (*row).to_owned()).collect(),
        cell_types: vec![
            CellType {
                glyph: '#',
                is_walkable: false,
                bg_color: None,
                image: None,
            },
            CellType {
                glyph: '.',
                is_walkable: true,
                bg_color: None,
                image: None,
            },
        ],
        action_cells,
    }
}
