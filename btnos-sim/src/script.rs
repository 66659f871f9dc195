//! Scripted touch input
//!
//! A touch script is a text file with one command per line. Durations are
//! in milliseconds and rounded up to whole polls of the shell loop.
//!
//! ```text
//! # open the Wi-Fi app and scan
//! tap 40 60
//! idle 200
//! tap 120 12          # task button 6
//! hold 40 260 1000    # frame button A: power down
//! stroke 50 80 150 80 # drag across the work area
//! ```
//!
//! | Command                  | Samples                                     |
//! |--------------------------|---------------------------------------------|
//! | `tap X Y`                | contact for 60 ms, then release             |
//! | `hold X Y [MS]`          | contact for `MS` (default 1000), then release |
//! | `press X Y MS`           | contact for `MS`, no release                |
//! | `stroke X1 Y1 X2 Y2`     | one contact per poll along a straight line  |
//! | `idle MS`                | no contact                                  |
//! | `zero`                   | a single `(0, 0)` driver sentinel           |

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use btnos_core::dispatch::POLL_INTERVAL_MS;
use btnos_core::geometry::Point;
use btnos_core::traits::{TouchController, TouchError};

const TAP_MS: u32 = 60;
const HOLD_MS: u32 = 1000;

/// Polls needed to cover `ms`, at least one
fn polls(ms: u32) -> usize {
    ms.div_ceil(POLL_INTERVAL_MS).max(1) as usize
}

/// Touch controller fed from a script
#[derive(Debug, Default)]
pub struct ScriptTouch {
    samples: VecDeque<Option<Point>>,
}

impl ScriptTouch {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut samples = VecDeque::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            parse_line(line, &mut samples).with_context(|| format!("line {}", n + 1))?;
        }
        Ok(Self { samples })
    }

    /// All samples have been read
    pub fn is_finished(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

fn parse_line(line: &str, out: &mut VecDeque<Option<Point>>) -> Result<()> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or("");
    let args = words
        .map(|w| w.parse::<u32>().map_err(|_| anyhow!("bad number '{}'", w)))
        .collect::<Result<Vec<_>>>()?;

    let point = |x: u32, y: u32| -> Result<Point> {
        let x = u16::try_from(x).map_err(|_| anyhow!("x {} out of range", x))?;
        let y = u16::try_from(y).map_err(|_| anyhow!("y {} out of range", y))?;
        Ok(Point::new(x, y))
    };
    let contact = |out: &mut VecDeque<Option<Point>>, p: Point, ms: u32| {
        out.extend(std::iter::repeat(Some(p)).take(polls(ms)));
    };

    match (command, args.as_slice()) {
        ("tap", [x, y]) => {
            contact(out, point(*x, *y)?, TAP_MS);
            out.push_back(None);
        }
        ("hold", [x, y]) | ("hold", [x, y, _]) => {
            let ms = args.get(2).copied().unwrap_or(HOLD_MS);
            contact(out, point(*x, *y)?, ms);
            out.push_back(None);
        }
        ("press", [x, y, ms]) => contact(out, point(*x, *y)?, *ms),
        ("stroke", [x1, y1, x2, y2]) => {
            let (a, b) = (point(*x1, *y1)?, point(*x2, *y2)?);
            let dx = i32::from(b.x) - i32::from(a.x);
            let dy = i32::from(b.y) - i32::from(a.y);
            let steps = dx.abs().max(dy.abs()).max(1);
            for i in 0..=steps {
                // Both ends are valid u16 so every point in between is too
                let x = i32::from(a.x) + dx * i / steps;
                let y = i32::from(a.y) + dy * i / steps;
                out.push_back(Some(Point::new(x as u16, y as u16)));
            }
        }
        ("idle", [ms]) => out.extend(std::iter::repeat(None).take(polls(*ms))),
        ("zero", []) => out.push_back(Some(Point::new(0, 0))),
        ("tap" | "hold" | "press" | "stroke" | "idle" | "zero", _) => {
            bail!("wrong number of arguments to '{}'", command)
        }
        _ => bail!("unknown command '{}'", command),
    }
    Ok(())
}

impl TouchController for ScriptTouch {
    fn read_point(&mut self) -> Result<Option<Point>, TouchError> {
        Ok(self.samples.pop_front().flatten())
    }
}
