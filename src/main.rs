mod consts;
mod food;
mod game;
mod grid;
mod input;
mod render;
mod snake;
mod term;

use std::fs::File;

use anyhow::Context;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

pub type TermInt = u16;

fn main() -> anyhow::Result<()> {
    // The terminal is the game screen, so logs go to a file
    let log_file = File::create(consts::LOG_FILE).context("creating log file")?;
    WriteLogger::init(LevelFilter::Info, Config::default(), log_file)
        .context("initializing logger")?;

    let grid = grid::Grid::new(consts::FIELD_WIDTH, consts::FIELD_HEIGHT, consts::CELL_SIZE)
        .context("invalid field geometry")?;
    info!(
        "Starting on a {}x{} field, {} cells of {}px",
        grid.width(), grid.height(), grid.cell_count(), grid.cell_size()
    );

    let mut term = term::TermManager::new(grid)?;
    if let Err(err) = term.setup() {
        term.restore();
        return Err(err);
    }

    let mut game = game::SnakeGame::new(grid, term, rand::thread_rng());
    let res = game.run();

    // Leave the terminal usable whatever happened in the loop
    game.into_canvas().restore();
    info!("Exiting");
    res
}
