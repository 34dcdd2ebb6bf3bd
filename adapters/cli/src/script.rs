//! Line-oriented input scripts standing in for a keyboard and pointer.
//!
//! ```text
//! # walk right for three ticks, then click a destination
//! press right
//! wait 300
//! release right
//! click 4 2
//! wait 500
//! frame
//! ```

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use scrollmap_core::{CellCoord, MovementKey};

/// One instruction of an input script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    /// Key pressed and held.
    Press(MovementKey),
    /// Key released.
    Release(MovementKey),
    /// Pointer click on a grid cell.
    Click(CellCoord),
    /// Let simulated time pass.
    Wait(Duration),
    /// Draw the current frame.
    Frame,
}

/// Parses a whole script, naming the offending line on failure.
pub fn parse(source: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (number, line) in (1..).zip(source.lines()) {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("line {number}: `{line}`"))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<ScriptStep> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        bail!("empty instruction");
    };
    let arguments: Vec<&str> = words.collect();

    let step = match (verb, arguments.as_slice()) {
        ("press", [key]) => ScriptStep::Press(parse_key(key)?),
        ("release", [key]) => ScriptStep::Release(parse_key(key)?),
        ("click", [x, y]) => ScriptStep::Click(CellCoord::new(
            x.parse::<u32>().with_context(|| format!("invalid column `{x}`"))?,
            y.parse::<u32>().with_context(|| format!("invalid row `{y}`"))?,
        )),
        ("wait", [millis]) => ScriptStep::Wait(Duration::from_millis(
            millis
                .parse::<u64>()
                .with_context(|| format!("invalid duration `{millis}`"))?,
        )),
        ("frame", []) => ScriptStep::Frame,
        ("press" | "release" | "click" | "wait" | "frame", _) => {
            bail!("wrong number of arguments for `{verb}`")
        }
        _ => bail!("unknown instruction `{verb}`"),
    };
    Ok(step)
}

fn parse_key(name: &str) -> Result<MovementKey> {
    match name {
        "left" => Ok(MovementKey::Left),
        "up" => Ok(MovementKey::Up),
        "right" => Ok(MovementKey::Right),
        "down" => Ok(MovementKey::Down),
        code => code
            .parse::<u32>()
            .ok()
            .and_then(MovementKey::from_key_code)
            .ok_or_else(|| anyhow!("unknown key `{name}`")),
    }
}
