use std::fs::File;

use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use sidewinder::game::SnakeSession;

fn main() -> Result<(), std::io::Error> {
    // Stdout is the play surface, so logs go to a file
    WriteLogger::init(LevelFilter::Info, Config::default(), File::create("sidewinder.log")?)
        .expect("Failed to initialize logger");
    info!("starting sidewinder");

    let mut session = SnakeSession::new();
    session.initialize();
    session.show_intro();
    session.run();

    Ok(())
}
