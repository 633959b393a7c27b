//! Rolls a pool and applies a selector: `4d6 h3`, `10d10 >=8`, `5d20 l2 r1`.

use dice_selector::{DiceSelector, DieCollection, Pool, Select};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn run(line: &str) -> Result<String, Box<dyn std::error::Error>> {
    let (pool, selector) = line.split_once(' ').unwrap_or((line, "*"));
    let pool: Pool = pool.parse()?;
    let selector: DiceSelector = selector.parse()?;

    let dice = pool.roll(&mut rand::thread_rng())?;
    let rolled: DieCollection = dice.iter().collect();
    let selected = selector.select(&rolled)?;

    let fmt_values = |c: &DieCollection| -> Result<String, dice_selector::DiceError> {
        Ok(c.values()?
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", "))
    };
    Ok(format!(
        "{} => [{}] {} => [{}]",
        pool,
        fmt_values(&rolled)?,
        selector,
        fmt_values(&selected)?
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            match run(line) {
                Ok(r) => println!("{}", r),
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
