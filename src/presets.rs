//! Ready-made grammars.

use crate::grammar::{GrammarConfig, Rule};

/// A bushy 3D plant whose branches taper after every generation.
pub fn algae() -> GrammarConfig {
    GrammarConfig::new("F")
        .with_rule(Rule::new("F", "FF>-[F&+F+F]+[+F^-F-F]"))
        .with_max_depth(5)
        .with_angle(20.0)
        .with_thickness(0.3)
        .with_thickness_factor(0.98)
}

/// A stochastic branching shrub: each apex either forks in three or bends and continues.
pub fn stochastic_shrub() -> GrammarConfig {
    GrammarConfig::new("A")
        .with_constant("spread", 25.0)
        .with_rule(Rule::weighted("A", 0.6, "F<[&(spread)A]/(120)[&(spread)A]/(120)[&(spread)A]"))
        .with_rule(Rule::weighted("A", 0.4, "F+A"))
        .with_max_depth(6)
        .with_thickness(0.2)
        .with_thickness_factor(1.3)
}

/// All presets by display name.
pub fn all() -> Vec<(&'static str, GrammarConfig)> {
    vec![("Algae", algae()), ("Stochastic shrub", stochastic_shrub())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parse;

    #[test]
    fn presets_parse() {
        for (name, config) in all() {
            let geometry = parse(&config).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(!geometry.is_empty(), "{name} produced no geometry");
        }
    }

    #[test]
    fn algae_branches_taper() {
        let geometry = parse(&algae()).unwrap();
        let first = geometry.segments[0];
        assert_eq!(first.width, 0.3);
        assert!(geometry.iter().any(|s| s.width < 0.3));
        assert!(geometry.iter().all(|s| s.width <= 0.3));
    }
}
