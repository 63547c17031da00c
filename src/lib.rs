//! # sprout-lsystem
//!
//! A stochastic, parametric 3D L-System interpreter that grows branching line geometry.
//!
//! A [`GrammarConfig`] (axiom, rules, constants and turtle defaults) is compiled and
//! walked by a turtle that draws one [`Segment`] per `F`. The resulting [`Geometry`]
//! is engine-agnostic and can be handed to any line or cylinder renderer.
//!
//! ```
//! use sprout_lsystem::{GrammarConfig, Rule, parse};
//!
//! let config = GrammarConfig::new("A")
//!     .with_rule(Rule::new("A", "F[+A][-A]"))
//!     .with_max_depth(3);
//! let geometry = parse(&config).unwrap();
//! assert_eq!(geometry.len(), 7);
//! ```

pub mod error;
pub mod geometry;
pub mod grammar;
pub mod interpreter;
pub mod params;
pub mod presets;
pub mod turtle;

pub use error::*;
pub use geometry::*;
pub use grammar::*;
pub use interpreter::*;
pub use params::*;
pub use turtle::*;
