use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scrollmap_core::{CellCoord, CellType, Command, Event, LevelData, LevelId, MovementKey};
use scrollmap_world::{self as world, query, LevelIndex, World};

const KEYS: [MovementKey; 4] = MovementKey::ALL;
static GLYPH_POOL: [char; 8] = ['.', '#', '~', ',', '^', '=', 'T', '_'];

#[test]
fn walkability_matches_the_declared_cell_types() {
    for seed in 200..232 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let palette = &GLYPH_POOL[..rng.gen_range(1..=GLYPH_POOL.len())];
        let cell_types: Vec<CellType> = palette
            .iter()
            .map(|glyph| CellType {
                glyph: *glyph,
                is_walkable: rng.gen_bool(0.5),
                bg_color: None,
                image: None,
            })
            .collect();
        let columns = rng.gen_range(1..10_u32);
        let rows = rng.gen_range(1..8_u32);
        let map: Vec<String> = (0..rows)
            .map(|_| {
                (0..columns)
                    .map(|_| palette[rng.gen_range(0..palette.len())])
                    .collect()
            })
            .collect();
        let data = LevelData {
            level_name: "palette".to_owned(),
            map: map.clone(),
            cell_types: cell_types.clone(),
            action_cells: Vec::new(),
        };

        let index = LevelIndex::build(&data).expect("valid level");
        let graph = index.graph().view();
        for row in 0..rows + 3 {
            for column in 0..columns + 3 {
                let cell = CellCoord::new(column, row);
                let glyph = usize::try_from(row)
                    .ok()
                    .and_then(|row| map.get(row))
                    .and_then(|line| line.chars().nth(usize::try_from(column).ok()?));
                let expected = glyph.map_or(false, |glyph| {
                    cell_types
                        .iter()
                        .any(|cell_type| cell_type.glyph == glyph && cell_type.is_walkable)
                });

                assert_eq!(index.glyph_at(cell), glyph, "seed {seed}: glyph at {cell}");
                assert_eq!(index.is_walkable(cell), expected, "seed {seed}: {cell}");
                assert_eq!(
                    glyph.map_or(false, |glyph| index.walkability().contains(glyph)),
                    expected,
                    "seed {seed}: walkable set at {cell}"
                );
                assert_eq!(
                    graph.is_traversable(cell),
                    expected,
                    "seed {seed}: graph at {cell}"
                );
            }
        }
    }
}

#[test]
fn random_walks_never_leave_walkable_cells() {
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (data, start) = random_level(&mut rng, 9, 7);
        let mut world = World::new();
        let _ = step(
            &mut world,
            Command::RequestLevel {
                level: LevelId::new(1),
                start: Some(start),
            },
        );
        let _ = step(
            &mut world,
            Command::LoadLevel {
                level: LevelId::new(1),
                data,
            },
        );

        for _ in 0..200 {
            let key = KEYS[rng.gen_range(0..KEYS.len())];
            let command = if rng.gen_bool(0.5) {
                Command::KeyDown { key }
            } else {
                Command::KeyUp { key }
            };
            let _ = step(&mut world, command);

            let before = query::player_cell(&world);
            let events = step(&mut world, Command::Tick);
            let after = query::player_cell(&world);

            assert!(
                query::is_walkable(&world, after),
                "seed {seed}: player entered {after}"
            );
            let moved = events
                .iter()
                .any(|event| matches!(event, Event::PlayerMoved { .. }));
            assert_eq!(moved, before != after, "seed {seed}: move event mismatch");
        }
    }
}

#[test]
fn random_paths_only_commit_walkable_steps() {
    for seed in 100..116 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (data, start) = random_level(&mut rng, 6, 6);
        let mut world = World::new();
        let _ = step(
            &mut world,
            Command::RequestLevel {
                level: LevelId::new(1),
                start: Some(start),
            },
        );
        let _ = step(
            &mut world,
            Command::LoadLevel {
                level: LevelId::new(1),
                data,
            },
        );

        // Paths handed to the world are not validated up front; every
        // committed step must still land on a walkable cell.
        let path: Vec<CellCoord> = (0..12)
            .map(|_| CellCoord::new(rng.gen_range(0..6), rng.gen_range(0..6)))
            .collect();
        let generation = query::path_generation(&world);
        let _ = step(&mut world, Command::AssignPath { generation, path });

        for _ in 0..12 {
            let _ = step(&mut world, Command::Tick);
            assert!(query::is_walkable(&world, query::player_cell(&world)));
        }
    }
}

fn random_level(rng: &mut ChaCha8Rng, columns: u32, rows: u32) -> (LevelData, CellCoord) {
    let start = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
    let map = (0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| {
                    if CellCoord::new(column, row) == start || rng.gen_bool(0.7) {
                        '.'
                    } else {
                        '#'
                    }
                })
                .collect::<String>()
        })
        .collect();

    let data = LevelData {
        level_name: "random".to_owned(),
        map,
        cell_types: vec![
            CellType {
                glyph: '.',
                is_walkable: true,
                bg_color: None,
                image: None,
            },
            CellType {
                glyph: '#',
                is_walkable: false,
                bg_color: None,
                image: None,
            },
        ],
        action_cells: Vec::new(),
    };
    (data, start)
}

fn step(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}
