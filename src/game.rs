use std::{thread::sleep, time::{Duration, Instant}};

use log::{debug, info};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::consts::TICK_PERIOD;
use crate::food::Food;
use crate::grid::Grid;
use crate::input::{command_for, Command};
use crate::render::{Canvas, Drawable};
use crate::snake::{Snake, Direction};
use crate::term::TermManager;

/// What a single step did to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Collided,
}

/// Everything one game session needs: the field, its entities and where they are drawn.
pub struct SnakeGame<C: Canvas, R: Rng> {
    grid: Grid,
    snake: Snake,
    food: Food,
    canvas: C,
    rng: R,
}

impl<C: Canvas, R: Rng> SnakeGame<C, R> {
    pub fn new(grid: Grid, canvas: C, mut rng: R) -> Self {
        let snake = Snake::new(grid.start_position());
        let mut food = Food::new(grid.start_position());
        food.respawn(&grid, &[snake.head()], &mut rng);

        SnakeGame { grid, snake, food, canvas, rng }
    }

    /// Paints the initial field.
    pub fn start(&mut self) -> anyhow::Result<()> {
        self.canvas.clear()?;
        self.food.draw(&mut self.canvas)?;
        self.snake.draw(&mut self.canvas)?;
        self.canvas.present()
    }

    /// Advances the game by one tick, after the turns read from the input.
    pub fn step(&mut self, turns: &[Direction]) -> anyhow::Result<TickOutcome> {
        for dir in turns {
            self.snake.set_pending_direction(*dir);
        }

        self.snake.commit_direction();
        self.snake.advance(&self.grid);

        let mut food_moved = false;
        let outcome = if self.snake.body_overlaps_head() {
            info!("Snake bit itself at length {}", self.snake.len());
            self.restart()?;
            TickOutcome::Collided
        } else if self.snake.head() == self.food.position() {
            self.snake.grow();
            debug!("Food eaten at {:?}, target length {}", self.food.position(), self.snake.target_length());

            let occupied: Vec<_> = self.snake.positions().iter().copied().collect();
            if self.food.respawn(&self.grid, &occupied, &mut self.rng).is_some() {
                food_moved = true;
            } else {
                info!("No free cell left for food at length {}, starting over", self.snake.len());
                self.restart()?;
            }
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        };

        self.snake.draw(&mut self.canvas)?;
        // After the snake: the new food may sit on the tail cell just erased
        if food_moved {
            self.food.draw(&mut self.canvas)?;
        }
        self.canvas.present()?;

        Ok(outcome)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn food(&self) -> &Food {
        &self.food
    }

    /// Ends the session, handing back the canvas for teardown.
    pub fn into_canvas(self) -> C {
        self.canvas
    }

    ///////////////////////////////////////////////////////////////////////////

    fn restart(&mut self) -> anyhow::Result<()> {
        self.canvas.clear()?;
        self.snake.reset();

        let occupied: Vec<_> = self.snake.positions().iter().copied().collect();
        self.food.respawn(&self.grid, &occupied, &mut self.rng);
        self.food.draw(&mut self.canvas)
    }
}

impl SnakeGame<TermManager, ThreadRng> {
    /// Runs at a fixed tick rate until the player quits.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.start()?;
        let mut clock = Clock::new(TICK_PERIOD);

        loop {
            clock.tick();

            let mut turns = vec![];
            for key_ev in self.canvas.read_key_events_queue()? {
                match command_for(&key_ev) {
                    Some(Command::Quit) => {
                        info!("Quit requested at length {}", self.snake().len());
                        return Ok(());
                    },
                    Some(Command::Turn(dir)) => turns.push(dir),
                    None => {}
                }
            }

            self.step(&turns)?;
        }
    }
}

/// Paces a loop to a constant period by sleeping off what is left of it.
struct Clock {
    period: Duration,
    last: Instant,
}

impl Clock {
    fn new(period: Duration) -> Self {
        Clock { period, last: Instant::now() }
    }

    fn tick(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FOOD_COLOR, SNAKE_COLOR};
    use crate::grid::Position;
    use crate::render::testing::{Op, RecordingCanvas};
    use crate::snake::Direction::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> SnakeGame<RecordingCanvas, StdRng> {
        SnakeGame::new(Grid::default(), RecordingCanvas::default(), StdRng::seed_from_u64(42))
    }

    #[test]
    fn clock_paces_ticks() {
        let start = Instant::now();
        let mut clock = Clock::new(Duration::from_millis(20));
        clock.tick();
        clock.tick();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn food_starts_off_the_snake() {
        let game = game();
        assert_ne!(game.food().position(), game.snake().head());
    }

    #[test]
    fn start_paints_food_then_snake() {
        let mut game = game();
        game.start().unwrap();
        let food = game.food().position();
        assert_eq!(game.canvas.take(), vec![
            Op::Clear,
            Op::Draw(food, FOOD_COLOR),
            Op::Draw(Position::new(320, 240), SNAKE_COLOR),
            Op::Present,
        ]);
    }

    #[test]
    fn idle_snake_moves_left() {
        let mut game = game();
        game.food.place(Position::new(0, 0));

        for _ in 0..3 {
            assert_eq!(game.step(&[]).unwrap(), TickOutcome::Moved);
        }

        assert_eq!(game.snake().head(), Position::new(320 - 3 * 20, 240));
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().target_length(), 1);
        assert_eq!(game.food().position(), Position::new(0, 0));
    }

    #[test]
    fn step_redraws_only_changed_cells() {
        let mut game = game();
        game.food.place(Position::new(0, 0));
        game.step(&[]).unwrap();

        assert_eq!(game.canvas.take(), vec![
            Op::Erase(Position::new(320, 240)),
            Op::Draw(Position::new(300, 240), SNAKE_COLOR),
            Op::Present,
        ]);
    }

    #[test]
    fn eating_grows_and_moves_food() {
        let mut game = game();
        game.food.place(Position::new(300, 240));

        assert_eq!(game.step(&[]).unwrap(), TickOutcome::Ate);
        assert_eq!(game.snake().target_length(), 2);
        assert_eq!(game.snake().len(), 1);
        assert!(!game.snake().positions().contains(&game.food().position()));

        let new_food = game.food().position();
        assert_eq!(game.canvas.take(), vec![
            Op::Erase(Position::new(320, 240)),
            Op::Draw(Position::new(300, 240), SNAKE_COLOR),
            Op::Draw(new_food, FOOD_COLOR),
            Op::Present,
        ]);

        // Growth shows up on the following step: nothing is erased
        game.food.place(Position::new(0, 0));
        game.step(&[]).unwrap();
        assert_eq!(game.snake().len(), 2);
        assert_eq!(game.canvas.take(), vec![
            Op::Draw(Position::new(280, 240), SNAKE_COLOR),
            Op::Present,
        ]);
    }

    #[test]
    fn turns_apply_before_moving() {
        let mut game = game();
        game.food.place(Position::new(0, 0));
        game.step(&[]).unwrap();
        game.step(&[Up]).unwrap();
        assert_eq!(game.snake().head(), Position::new(300, 220));

        // Reversal is dropped, the snake keeps going up
        game.step(&[Down]).unwrap();
        assert_eq!(game.snake().head(), Position::new(300, 200));
        assert_eq!(game.snake().direction(), Some(Up));
    }

    #[test]
    fn self_collision_resets() {
        let mut game = game();
        let body = [
            Position::new(100, 100),
            Position::new(120, 100),
            Position::new(120, 80),
            Position::new(100, 80),
            Position::new(80, 80),
        ];
        game.snake = Snake::with_body(game.grid.start_position(), &body, Up);
        game.food.place(Position::new(0, 0));

        assert_eq!(game.step(&[]).unwrap(), TickOutcome::Collided);
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().head(), Position::new(320, 240));
        assert_eq!(game.snake().target_length(), 1);
        assert_ne!(game.food().position(), game.snake().head());

        let food = game.food().position();
        assert_eq!(game.canvas.take(), vec![
            Op::Clear,
            Op::Draw(food, FOOD_COLOR),
            Op::Draw(Position::new(320, 240), SNAKE_COLOR),
            Op::Present,
        ]);
    }

    #[test]
    fn collision_wins_over_food() {
        let mut game = game();
        let body = [
            Position::new(100, 100),
            Position::new(120, 100),
            Position::new(120, 80),
            Position::new(100, 80),
            Position::new(80, 80),
        ];
        game.snake = Snake::with_body(game.grid.start_position(), &body, Up);
        game.food.place(Position::new(100, 80));

        assert_eq!(game.step(&[]).unwrap(), TickOutcome::Collided);
        assert_eq!(game.snake().target_length(), 1);
    }

    #[test]
    fn food_on_vacated_tail_stays_visible() {
        // Three cells: after eating, the tail just left is the only free one
        let grid = Grid::new(60, 20, 20).unwrap();
        let mut game = SnakeGame::new(grid, RecordingCanvas::default(), StdRng::seed_from_u64(8));
        let body = [Position::new(20, 0), Position::new(0, 0)];
        game.snake = Snake::with_body(grid.start_position(), &body, Right);
        game.food.place(Position::new(40, 0));

        assert_eq!(game.step(&[]).unwrap(), TickOutcome::Ate);
        assert_eq!(game.food().position(), Position::new(0, 0));

        let ops = game.canvas.take();
        let last_touch = ops.iter().rev().find(|op| match op {
            Op::Draw(pos, _) | Op::Erase(pos) => *pos == Position::new(0, 0),
            _ => false,
        });
        assert_eq!(last_touch, Some(&Op::Draw(Position::new(0, 0), FOOD_COLOR)));
        assert_eq!(ops.last(), Some(&Op::Present));
    }

    #[test]
    fn full_board_starts_over() {
        let grid = Grid::new(40, 20, 20).unwrap();
        let mut game = SnakeGame::new(grid, RecordingCanvas::default(), StdRng::seed_from_u64(3));
        game.snake = Snake::with_body(Position::new(0, 0), &[Position::new(0, 0)], Right);
        game.food.place(Position::new(20, 0));

        // Eating the food leaves the 2-cell board without a free cell
        game.snake.grow();
        assert_eq!(game.step(&[]).unwrap(), TickOutcome::Ate);
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().target_length(), 1);
        assert_eq!(game.snake().head(), Position::new(0, 0));
        assert_eq!(game.food().position(), Position::new(20, 0));
    }

    #[test]
    fn length_matches_target_after_every_step() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(5);
        let dirs = [Up, Down, Left, Right];

        for _ in 0..2000 {
            let turns: Vec<Direction> = if rng.gen_bool(0.3) {
                vec![dirs[rng.gen_range(0..dirs.len())]]
            } else {
                vec![]
            };

            // Put food in the way now and then so the snake keeps growing
            if rng.gen_bool(0.2) {
                let next = game.grid.step(game.snake().head(), turns.first().copied().or(game.snake().direction()).unwrap_or(Left));
                if !game.snake().positions().contains(&next) {
                    game.food.place(next);
                }
            }

            let outcome = game.step(&turns).unwrap();
            let snake = game.snake();

            // Eating raises the target after the move, so the body catches up next step
            match outcome {
                TickOutcome::Ate => assert_eq!(snake.len() + 1, snake.target_length()),
                _ => assert_eq!(snake.len(), snake.target_length()),
            }
            assert!(!snake.positions().contains(&game.food().position()));
        }
    }
}
