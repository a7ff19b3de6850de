mod script;

use std::{env, error::Error, process::ExitCode};

use bracket_geometry::prelude::Point;
use chrono::{DateTime, Duration, Local};
use monkpath::{
    FocusEngine, ProgressDocument, ProgressStore, progress::JsonFileStore,
};
use script::{Script, ScriptCommand};

const USAGE: &str = "usage: monkpath <progress.json> <script.txt> [seed]";

struct Driver {
    engine: FocusEngine,
    clock: DateTime<Local>,
}

impl Driver {
    fn run(&mut self, command: ScriptCommand) {
        match command {
            ScriptCommand::Session { mode, seconds } => {
                self.clock += Duration::seconds(i64::from(seconds));
                let report = self.engine.complete_session(mode, seconds, &self.clock);
                if let Err(reason) = report.outcome {
                    println!("session rejected: {}", reason.reason());
                }
            }
            ScriptCommand::Wait { seconds } => self.clock += Duration::seconds(seconds),
            ScriptCommand::ExtraStep => {
                if let Err(err) = self.engine.grant_extra_step(&self.clock) {
                    println!("extra step refused: {err}");
                }
            }
            ScriptCommand::Direction(direction) => self.engine.set_travel_direction(direction),
            ScriptCommand::Pending(steps) => self.engine.add_pending_steps(steps),
            ScriptCommand::Move { x, y } => {
                if let Err(err) = self.engine.move_monk(Point::new(x, y)) {
                    println!("cannot move: {err}");
                }
            }
            ScriptCommand::Walk { x, y } => {
                if let Err(err) = self.engine.walk_monk(Point::new(x, y)) {
                    println!("cannot walk: {err}");
                }
            }
            ScriptCommand::Place {
                token,
                x,
                y,
                rotation,
            } => {
                if let Err(err) = self.engine.place(&token, x, y, rotation, &self.clock) {
                    println!("cannot place {token}: {}", err.reason());
                }
            }
            ScriptCommand::Relocate { id, x, y } => {
                if let Err(err) = self.engine.move_item(&id, x, y) {
                    println!("cannot move {id}: {}", err.reason());
                }
            }
            ScriptCommand::Rotate { id, degrees } => {
                if let Err(err) = self.engine.rotate_item(&id, degrees) {
                    println!("cannot rotate {id}: {}", err.reason());
                }
            }
            ScriptCommand::Remove { id } => {
                if let Err(err) = self.engine.remove_item(&id) {
                    println!("cannot remove {id}: {}", err.reason());
                }
            }
            ScriptCommand::Status => print_status(self.engine.document()),
        }
        for entry in self.engine.drain_log() {
            println!("{entry}");
        }
    }
}

fn print_status(doc: &ProgressDocument) {
    println!(
        "monk at {},{} facing {:?} after {} steps; {} tiles revealed",
        doc.journey.tx,
        doc.journey.ty,
        doc.journey.facing,
        doc.journey.step,
        doc.fog.revealed_count()
    );
    println!(
        "today: {} steps, {} sparks, {} pending; streak {} day(s)",
        doc.steps_today, doc.sparks, doc.pending_steps, doc.streak.days
    );
    println!(
        "garden: {} placed, {} waiting, {} in satchel; relics: {}",
        doc.garden.placed.len(),
        doc.pending_tokens.len(),
        doc.inventory.len(),
        doc.relics.join(", ")
    );
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (progress_path, script_path) = match args {
        [_, progress, script, ..] => (progress, script),
        _ => return Err(USAGE.into()),
    };
    let seed = args.get(3).map(|raw| raw.parse::<u64>()).transpose()?;

    let mut store = JsonFileStore::new(progress_path);
    let doc = store.load_progress()?;
    let engine = match seed {
        Some(seed) => FocusEngine::seeded(doc, seed),
        None => FocusEngine::new(doc),
    };
    let mut driver = Driver {
        engine,
        clock: Local::now(),
    };

    let mut script = Script::from_file(script_path)?;
    while let Some(command) = script.next_command() {
        driver.run(command);
    }

    store.save_progress(driver.engine.document())?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("monkpath: {err}");
            ExitCode::FAILURE
        }
    }
}
