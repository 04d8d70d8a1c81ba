use std::collections::HashSet;

use tracing::debug;

use crate::config::GameConfig;
use crate::error::Result;
use crate::grid::{Grid, Vector2i};
use crate::input::Direction;
use crate::item::GridItem;
use crate::placement::{Placement, PlacementError, RandomSource};
use crate::snake::Snake;

/// Why the snake was sent back to its start cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResetCause {
    Obstacle,
    SelfCollision,
}

/// Something that happened during a tick, in rule order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickEvent {
    AteApple,
    AtePoison,
    Reset(ResetCause),
}

/// Read-only snapshot of the board handed to renderers and callers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FrameState {
    pub grid: Grid,
    /// Snake cells from tail to head.
    pub snake: Vec<Vector2i>,
    pub direction: Direction,
    pub target_length: usize,
    pub apple: Vector2i,
    pub poison_apple: Vector2i,
    pub stones: Vec<Vector2i>,
    /// Ticks simulated so far.
    pub tick: u64,
    pub reset: Option<ResetCause>,
    pub events: Vec<TickEvent>,
}

impl FrameState {
    #[must_use]
    pub fn head(&self) -> Vector2i {
        *self
            .snake
            .last()
            .expect("snake body must always contain at least one segment")
    }

    #[must_use]
    pub fn reset_occurred(&self) -> bool {
        self.reset.is_some()
    }
}

/// Owns the board and advances it one tick at a time.
///
/// Fields are public so scenarios can be staged directly; placement
/// randomness stays private to the engine.
#[derive(Debug, Clone)]
pub struct SimulationEngine<S> {
    pub snake: Snake,
    pub apple: GridItem,
    pub poison_apple: GridItem,
    pub stones: Vec<GridItem>,
    pub tick_count: u64,
    placement: Placement<S>,
}

impl<S: RandomSource> SimulationEngine<S> {
    /// Builds a board from a validated config.
    ///
    /// The snake starts on the center cell; the apple, the poison apple and
    /// the stones are then placed in that order, each avoiding everything
    /// placed before it.
    pub fn new(config: &GameConfig, source: S) -> Result<Self> {
        config.validate()?;
        let grid = config.grid();
        let mut placement = Placement::new(grid, source);
        let snake = Snake::new(grid.center());

        let mut excluded: HashSet<Vector2i> = snake.segments().copied().collect();
        let apple = GridItem::apple(place(&mut placement, &mut excluded)?);
        let poison_apple = GridItem::poison_apple(place(&mut placement, &mut excluded)?);
        let stones = (0..config.stone_count)
            .map(|_| place(&mut placement, &mut excluded).map(GridItem::stone))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            width = grid.width(),
            height = grid.height(),
            stones = stones.len(),
            "board_created"
        );

        Ok(Self {
            snake,
            apple,
            poison_apple,
            stones,
            tick_count: 0,
            placement,
        })
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.placement.grid()
    }

    /// Snapshot of the board before the first tick.
    #[must_use]
    pub fn initial_state(&self) -> FrameState {
        self.snapshot()
    }

    /// Snapshot of the current board with no tick events attached.
    #[must_use]
    pub fn snapshot(&self) -> FrameState {
        self.frame(Vec::new())
    }

    /// Queues a turn for the next tick; reversing into the body is refused.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        self.snake.request_turn(direction)
    }

    /// Advances the simulation by one step.
    ///
    /// Applies the pending turn, moves the snake, then checks apple, poison
    /// apple, stones and self collision in that order. Every rule is
    /// evaluated every tick against the head as it stands after the
    /// previous rules.
    pub fn tick(&mut self, intent: Option<Direction>) -> Result<FrameState> {
        if let Some(direction) = intent {
            self.request_turn(direction);
        }

        self.tick_count += 1;
        let grid = self.grid();
        self.snake.update_direction();
        self.snake.move_forward(grid);

        let mut events = Vec::new();

        if self.apple.is_at(self.snake.head()) {
            self.snake.grow();
            let excluded = self.occupied_except_apple();
            self.apple.relocate(self.placement.choose(&excluded)?);
            debug!(
                tick = self.tick_count,
                target_length = self.snake.target_length(),
                "apple_eaten"
            );
            events.push(TickEvent::AteApple);
        }

        if self.poison_apple.is_at(self.snake.head()) {
            self.snake.shrink();
            let excluded = self.occupied_except_poison();
            self.poison_apple.relocate(self.placement.choose(&excluded)?);
            debug!(
                tick = self.tick_count,
                target_length = self.snake.target_length(),
                "poison_apple_eaten"
            );
            events.push(TickEvent::AtePoison);
        }

        let head = self.snake.head();
        if self.stones.iter().any(|stone| stone.is_at(head)) {
            self.snake.reset();
            self.relocate_stones()?;
            debug!(tick = self.tick_count, cause = "obstacle", "snake_reset");
            events.push(TickEvent::Reset(ResetCause::Obstacle));
        }

        if self.snake.head_overlaps_body() {
            self.snake.reset();
            debug!(tick = self.tick_count, cause = "self_collision", "snake_reset");
            events.push(TickEvent::Reset(ResetCause::SelfCollision));
        }

        Ok(self.frame(events))
    }

    /// Moves every stone, each avoiding the snake, both apples and the
    /// stones already moved in this batch.
    fn relocate_stones(&mut self) -> std::result::Result<(), PlacementError> {
        let mut excluded = self.snake_cells();
        excluded.insert(self.apple.position);
        excluded.insert(self.poison_apple.position);

        for stone in &mut self.stones {
            stone.relocate(place(&mut self.placement, &mut excluded)?);
        }

        Ok(())
    }

    fn occupied_except_apple(&self) -> HashSet<Vector2i> {
        let mut excluded = self.snake_cells();
        excluded.insert(self.poison_apple.position);
        excluded.extend(self.stones.iter().map(|stone| stone.position));
        excluded
    }

    fn occupied_except_poison(&self) -> HashSet<Vector2i> {
        let mut excluded = self.snake_cells();
        excluded.insert(self.apple.position);
        excluded.extend(self.stones.iter().map(|stone| stone.position));
        excluded
    }

    fn snake_cells(&self) -> HashSet<Vector2i> {
        self.snake.segments().copied().collect()
    }

    fn frame(&self, events: Vec<TickEvent>) -> FrameState {
        let reset = events.iter().rev().find_map(|event| match event {
            TickEvent::Reset(cause) => Some(*cause),
            _ => None,
        });

        FrameState {
            grid: self.grid(),
            snake: self.snake.segments().copied().collect(),
            direction: self.snake.direction(),
            target_length: self.snake.target_length(),
            apple: self.apple.position,
            poison_apple: self.poison_apple.position,
            stones: self.stones.iter().map(|stone| stone.position).collect(),
            tick: self.tick_count,
            reset,
            events,
        }
    }
}

/// Chooses a free cell and marks it taken.
fn place<S: RandomSource>(
    placement: &mut Placement<S>,
    excluded: &mut HashSet<Vector2i>,
) -> std::result::Result<Vector2i, PlacementError> {
    let cell = placement.choose(excluded)?;
    excluded.insert(cell);
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::GameConfig;
    use crate::grid::Vector2i;
    use crate::input::Direction;
    use crate::item::GridItem;
    use crate::placement::{RandomSource, RngSource};
    use crate::snake::Snake;

    use super::{ResetCause, SimulationEngine, TickEvent};

    fn engine(seed: u64) -> SimulationEngine<RngSource<rand::rngs::StdRng>> {
        SimulationEngine::new(&GameConfig::default(), RngSource::seeded(seed))
            .expect("default config is valid")
    }

    /// Moves every item into the far corner so staged scenarios do not
    /// trip over random placements.
    fn clear_board<S: RandomSource>(engine: &mut SimulationEngine<S>) {
        engine.apple = GridItem::apple(Vector2i::new(0, 0));
        engine.poison_apple = GridItem::poison_apple(Vector2i::new(1, 0));
        engine.stones = vec![
            GridItem::stone(Vector2i::new(2, 0)),
            GridItem::stone(Vector2i::new(3, 0)),
            GridItem::stone(Vector2i::new(4, 0)),
        ];
    }

    #[test]
    fn initial_items_are_disjoint_and_avoid_the_snake() {
        for seed in 0..20 {
            let state = engine(seed).initial_state();
            let mut cells = HashSet::new();

            assert!(cells.insert(state.head()));
            assert!(cells.insert(state.apple));
            assert!(cells.insert(state.poison_apple));
            for stone in &state.stones {
                assert!(cells.insert(*stone), "seed {seed}: stone overlaps");
            }
            assert_eq!(state.stones.len(), 3);
            assert_eq!(state.snake, vec![Vector2i::new(16, 12)]);
            assert_eq!(state.tick, 0);
            assert!(!state.reset_occurred());
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            ticks_per_second: 0,
            ..GameConfig::default()
        };

        assert!(SimulationEngine::new(&config, RngSource::seeded(0)).is_err());
    }

    #[test]
    fn tick_with_intent_turns_before_moving() {
        let mut engine = engine(1);
        clear_board(&mut engine);

        let state = engine.tick(Some(Direction::Up)).expect("tick succeeds");

        assert_eq!(state.head(), Vector2i::new(16, 11));
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.tick, 1);
        assert!(state.events.is_empty());
    }

    #[test]
    fn reverse_intent_is_ignored() {
        let mut engine = engine(1);
        clear_board(&mut engine);

        let state = engine.tick(Some(Direction::Left)).expect("tick succeeds");

        assert_eq!(state.head(), Vector2i::new(17, 12));
        assert_eq!(state.direction, Direction::Right);
    }

    #[test]
    fn eating_apple_grows_on_following_tick() {
        let mut engine = engine(2);
        clear_board(&mut engine);
        engine.apple = GridItem::apple(Vector2i::new(17, 12));

        let ate = engine.tick(None).expect("tick succeeds");
        assert_eq!(ate.events, vec![TickEvent::AteApple]);
        assert_eq!(ate.target_length, 2);
        assert_eq!(ate.snake.len(), 1);
        assert_ne!(ate.apple, Vector2i::new(17, 12));

        let grown = engine.tick(None).expect("tick succeeds");
        assert_eq!(grown.snake, vec![Vector2i::new(17, 12), Vector2i::new(18, 12)]);
    }

    #[test]
    fn poison_shrinks_long_snake() {
        let mut engine = engine(3);
        clear_board(&mut engine);
        engine.snake = Snake::from_segments(
            Vector2i::new(16, 12),
            vec![Vector2i::new(8, 8), Vector2i::new(9, 8), Vector2i::new(10, 8)],
            Direction::Right,
        );
        engine.poison_apple = GridItem::poison_apple(Vector2i::new(11, 8));

        let state = engine.tick(None).expect("tick succeeds");
        assert_eq!(state.events, vec![TickEvent::AtePoison]);
        assert_eq!(state.target_length, 2);
        assert_eq!(state.snake.len(), 3);

        let shrunk = engine.tick(None).expect("tick succeeds");
        assert_eq!(shrunk.snake, vec![Vector2i::new(11, 8), Vector2i::new(12, 8)]);
    }

    #[test]
    fn self_collision_resets_snake() {
        let mut engine = engine(4);
        clear_board(&mut engine);
        engine.snake = Snake::from_segments(
            Vector2i::new(16, 12),
            vec![
                Vector2i::new(10, 11),
                Vector2i::new(10, 10),
                Vector2i::new(10, 9),
                Vector2i::new(11, 9),
                Vector2i::new(11, 10),
            ],
            Direction::Left,
        );

        let state = engine.tick(None).expect("tick succeeds");

        assert_eq!(state.reset, Some(ResetCause::SelfCollision));
        assert_eq!(state.snake, vec![Vector2i::new(16, 12)]);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.target_length, 1);
    }

    #[test]
    fn moving_into_the_vacated_tail_cell_is_not_a_collision() {
        let mut engine = engine(5);
        clear_board(&mut engine);
        engine.snake = Snake::from_segments(
            Vector2i::new(16, 12),
            vec![
                Vector2i::new(10, 10),
                Vector2i::new(10, 9),
                Vector2i::new(11, 9),
                Vector2i::new(11, 10),
            ],
            Direction::Left,
        );

        let state = engine.tick(None).expect("tick succeeds");

        assert!(!state.reset_occurred());
        assert_eq!(state.head(), Vector2i::new(10, 10));
    }

    #[test]
    fn only_first_matching_stone_triggers_one_reset() {
        let mut engine = engine(6);
        clear_board(&mut engine);
        engine.stones = vec![
            GridItem::stone(Vector2i::new(17, 12)),
            GridItem::stone(Vector2i::new(17, 12)),
            GridItem::stone(Vector2i::new(5, 5)),
        ];

        let state = engine.tick(None).expect("tick succeeds");

        assert_eq!(state.events, vec![TickEvent::Reset(ResetCause::Obstacle)]);
        assert_eq!(state.stones.len(), 3);
        let distinct: HashSet<_> = state.stones.iter().copied().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn placement_failure_surfaces_as_error() {
        let config = GameConfig {
            screen_width: 40,
            screen_height: 40,
            stone_count: 0,
            ..GameConfig::default()
        };
        let mut engine =
            SimulationEngine::new(&config, RngSource::seeded(7)).expect("2x2 board is valid");
        engine.snake = Snake::from_segments(
            Vector2i::new(1, 1),
            vec![Vector2i::new(0, 0), Vector2i::new(1, 0)],
            Direction::Down,
        );
        engine.snake.grow();
        engine.snake.grow();
        engine.apple = GridItem::apple(Vector2i::new(1, 1));
        engine.poison_apple = GridItem::poison_apple(Vector2i::new(0, 1));

        assert!(engine.tick(None).is_err());
    }
}
