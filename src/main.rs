use log::{error, info};
use nikakudori::game::{EngineSettings, GameSession, GameStatus};

fn init_logging() {
    env_logger::init();
}

/// Generates a board from the environment and plays it out, always taking the
/// first available pair.
fn main() {
    init_logging();

    let settings = EngineSettings::from_env();
    let mut session = match GameSession::from_settings(&settings) {
        Ok(session) => session,
        Err(err) => {
            error!("Could not generate a board: {}", err);
            std::process::exit(1);
        }
    };

    if let Some(code) = session.layout_code() {
        println!("layout {} seed {}", code, session.seed());
    } else {
        println!("seed {}", session.seed());
    }
    println!("{:?}", session.board());

    while session.status() == GameStatus::InProgress {
        let Some(&pair) = session.matches().first() else {
            break;
        };
        if session.try_match(pair.first, pair.second).is_none() {
            error!("Listed pair {} could not be matched", pair);
            break;
        }
    }
    session.settle_removals();

    info!("Finished after {} moves", session.history().len());
    match session.status() {
        GameStatus::Won => println!("cleared the board in {} moves", session.history().len()),
        _ => {
            println!(
                "stuck with {} tiles left after {} moves",
                session.remaining_tiles(),
                session.history().len()
            );
            println!("{:?}", session.board());
        }
    }
}
