//! Interpreter that grows a [`Geometry`] from a [`GrammarConfig`].
//!
//! The entry point is [`parse`]. Expansion and execution happen in one
//! depth-first walk: each alphabetic symbol is first executed as a turtle command,
//! then (while below the configured depth) replaced in place by one of its rule
//! variants, which is walked before the rest of the enclosing string. Memory is
//! proportional to the recursion depth rather than to the fully expanded string.

use crate::error::{LSystemError, SyntaxError};
use crate::geometry::{Geometry, Segment};
use crate::grammar::{self, ConstantTable, GrammarConfig, SymbolTable};
use crate::params::resolve_parameter;
use crate::turtle::{TurtleOp, TurtleState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Distance covered by one `F`.
const STEP_LENGTH: f32 = 1.0;

/// Compiles `config` and interprets its axiom.
///
/// Returns the drawn segments in interpretation order, or the first error
/// encountered. No partial geometry is ever returned.
pub fn parse(config: &GrammarConfig) -> Result<Geometry, LSystemError> {
    let _span = tracing::debug_span!("lsystem_parse", max_depth = config.max_depth).entered();
    let result = LSystemInterpreter::compile(config).and_then(|interpreter| interpreter.run());
    match &result {
        Ok(geometry) => tracing::debug!(segments = geometry.len(), "parse finished"),
        Err(err) => tracing::debug!(%err, "parse failed"),
    }
    result
}

/// A compiled grammar ready to be interpreted.
///
/// Every [`run`](Self::run) starts from a fresh turtle, stack and random generator
/// seeded from the configuration, so repeated runs yield identical geometry.
pub struct LSystemInterpreter<'a> {
    config: &'a GrammarConfig,
    symbols: SymbolTable,
    constants: ConstantTable,
}

impl<'a> LSystemInterpreter<'a> {
    /// Validates and indexes the rules and constants of `config`.
    pub fn compile(config: &'a GrammarConfig) -> Result<Self, LSystemError> {
        let (symbols, constants) = grammar::compile(config)?;
        Ok(Self {
            config,
            symbols,
            constants,
        })
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    /// Interprets the axiom.
    pub fn run(&self) -> Result<Geometry, LSystemError> {
        let mut walk = Walk {
            interpreter: self,
            turtle: TurtleState::new(self.config.default_thickness),
            stack: Vec::new(),
            rng: StdRng::seed_from_u64(self.config.seed as u64),
            geometry: Geometry::new(),
        };
        walk.interpret(&self.config.axiom)?;
        Ok(walk.geometry)
    }
}

/// A string being walked: its text, the offset of the next byte and its depth.
struct Frame<'i> {
    text: &'i str,
    cursor: usize,
    depth: u32,
}

/// Mutable state of one run.
struct Walk<'i, 'a> {
    interpreter: &'i LSystemInterpreter<'a>,
    turtle: TurtleState,
    stack: Vec<TurtleState>,
    rng: StdRng,
    geometry: Geometry,
}

impl<'i> Walk<'i, '_> {
    /// Walks `axiom` depth-first.
    ///
    /// Substitutions are pushed onto an explicit frame stack instead of the native
    /// call stack, so the depth limit is bounded only by heap memory.
    fn interpret(&mut self, axiom: &'i str) -> Result<(), LSystemError> {
        let config = self.interpreter.config;
        let mut frames = vec![Frame {
            text: axiom,
            cursor: 0,
            depth: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            let Some(&c) = frame.text.as_bytes().get(frame.cursor) else {
                frames.pop();
                continue;
            };

            self.execute(c, frame.text, &mut frame.cursor)?;
            frame.cursor += 1;

            let depth = frame.depth;
            if c.is_ascii_alphabetic()
                && depth < config.max_depth
                && let Some(text) = self.select(c as char, depth)
            {
                frames.push(Frame {
                    text,
                    cursor: 0,
                    depth: depth + 1,
                });
            }
        }

        Ok(())
    }

    /// Applies the turtle effect of the command byte at `*cursor`.
    fn execute(&mut self, c: u8, text: &str, cursor: &mut usize) -> Result<(), LSystemError> {
        let config = self.interpreter.config;
        let op = TurtleOp::from_byte(c);
        let position = *cursor;

        let value = if op.takes_parameter() {
            let default = match op {
                TurtleOp::Thicken | TurtleOp::Thin => config.thickness_factor,
                _ => config.default_angle,
            };
            resolve_parameter(text, cursor, default, &self.interpreter.constants)?
        } else {
            0.0
        };

        match op {
            TurtleOp::Draw => {
                let start = self.turtle.position;
                let width = self.turtle.thickness;
                self.turtle.advance(STEP_LENGTH);
                self.geometry.push(Segment {
                    start,
                    end: self.turtle.position,
                    width,
                });
            }
            TurtleOp::Yaw(s) => self.turtle.yaw(value * s),
            TurtleOp::Pitch(s) => self.turtle.pitch(value * s),
            TurtleOp::Roll(s) => self.turtle.roll(value * s),
            TurtleOp::TurnAround => self.turtle.turn_around(),
            TurtleOp::Thicken => self.turtle.scale_thickness(value, true),
            TurtleOp::Thin => {
                if value == 0.0 {
                    return Err(SyntaxError::ZeroDivisor { position }.into());
                }
                self.turtle.scale_thickness(value, false);
            }
            TurtleOp::Push => self.stack.push(self.turtle),
            TurtleOp::Pop => {
                self.turtle = self
                    .stack
                    .pop()
                    .ok_or(SyntaxError::UnmatchedBracket { position })?;
            }
            TurtleOp::Ignore => {}
        }

        Ok(())
    }

    /// Chooses the replacement for `symbol`, if it has a rule.
    fn select(&mut self, symbol: char, depth: u32) -> Option<&'i str> {
        let interpreter = self.interpreter;
        let group = interpreter.symbols.get(symbol)?;

        let replacement = if group.is_stochastic() {
            group.select(self.rng.r#gen::<f32>())
        } else {
            group.select(0.0)
        };

        tracing::trace!(%symbol, depth, replacement, "expanding symbol");
        Some(replacement)
    }
}
