//! Headless match-3 runner (default binary).
//!
//! Starts a level and serves it over the adapter protocol. With
//! `MATCH3_AI_DISABLED=1` it prints the opening board and exits.
//!
//! ```text
//! match3 [--level <path.json>] [--seed <u32>]
//! ```

use anyhow::{bail, Context, Result};

use match3::adapter::{load_level, Adapter, Session};
use match3::core::{GameState, LevelConfig};

struct Args {
    level: Option<String>,
    seed: u32,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        level: None,
        seed: 1,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--level" => args.level = Some(it.next().context("--level needs a path")?),
            "--seed" => {
                let v = it.next().context("--seed needs a value")?;
                args.seed = v.parse().with_context(|| format!("bad seed {:?}", v))?;
            }
            other => bail!("unknown argument {:?}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = match &args.level {
        Some(path) => load_level(path)?,
        None => LevelConfig::default(),
    };

    let mut game = GameState::new(config, args.seed).context("invalid level")?;
    game.start();
    println!(
        "[Match3] Level started: {}x{}, {} moves, seed {}",
        game.board().width(),
        game.board().height(),
        game.moves_left(),
        game.seed()
    );

    let Some(mut adapter) = Adapter::start_from_env()? else {
        println!("{}", game.board());
        return Ok(());
    };

    let mut session = Session::new(game);
    while let Some(cmd) = adapter.recv_blocking() {
        for msg in session.handle(cmd) {
            adapter.send(msg);
        }
    }
    Ok(())
}
